//! Register banks, bus address decode and the backing register storage.
//!
//! The controller exposes a sparse 32-bit register space: a handful of fixed banks scattered
//! through the BAR. Every register name is a [`Reg`] whose storage slot is resolved at compile
//! time; bus offsets are decoded into the same type at run time so both paths index the
//! [`RegisterFile`] identically.

use core::ops::{Index, IndexMut};

use thiserror::Error;

/// A contiguous block of 32-bit registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bank {
    pub name: &'static str,
    /// Byte offset of the first register.
    pub base: u32,
    /// Number of 32-bit registers.
    pub count: u32,
}

impl Bank {
    /// Byte offset one past the last register of the bank.
    pub const fn end(&self) -> u32 {
        self.base + self.count * 4
    }
}

/// Every register bank, sorted by base offset. Banks never overlap.
pub const BANKS: [Bank; 11] = [
    Bank { name: "greg", base: 0x0000, count: 8 },
    Bank { name: "greg-pci", base: 0x1000, count: 5 },
    Bank { name: "txdma", base: 0x2000, count: 14 },
    Bank { name: "txdma-fifo", base: 0x2100, count: 7 },
    Bank { name: "wol", base: 0x3000, count: 5 },
    Bank { name: "rxdma", base: 0x4000, count: 11 },
    Bank { name: "rxdma-fifo", base: 0x4100, count: 9 },
    Bank { name: "mac", base: 0x6000, count: 78 },
    Bank { name: "mif", base: 0x6200, count: 8 },
    Bank { name: "pcs", base: 0x9000, count: 7 },
    Bank { name: "pcs-serdes", base: 0x9050, count: 4 },
];

const fn bank_starts() -> [usize; BANKS.len()] {
    let mut starts = [0usize; BANKS.len()];
    let mut i = 1;
    while i < BANKS.len() {
        starts[i] = starts[i - 1] + BANKS[i - 1].count as usize;
        i += 1;
    }
    starts
}

/// Index of each bank's first register in the flat [`RegisterFile`] storage.
const BANK_STARTS: [usize; BANKS.len()] = bank_starts();

/// Total number of registers across all banks.
pub const REG_COUNT: usize =
    BANK_STARTS[BANKS.len() - 1] + BANKS[BANKS.len() - 1].count as usize;

/// Why a bus offset does not name a register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("register offset {offset:#x} is not 32-bit aligned")]
    Unaligned { offset: u64 },
    #[error("register offset {offset:#x} is not backed by any register bank")]
    Unmapped { offset: u64 },
}

/// A decoded register: its bus offset plus the bank and storage slot that back it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Reg {
    offset: u32,
    bank: u8,
    slot: u16,
}

const fn locate(offset: u32) -> Option<(usize, usize)> {
    if offset & 3 != 0 {
        return None;
    }
    let mut i = 0;
    while i < BANKS.len() {
        let base = BANKS[i].base;
        let end = base + BANKS[i].count * 4;
        if offset >= base && offset < end {
            return Some((i, BANK_STARTS[i] + ((offset - base) / 4) as usize));
        }
        i += 1;
    }
    None
}

impl Reg {
    /// Name a register by offset. Evaluated in const context, so a typo in a register table is a
    /// build error rather than a run-time decode failure.
    pub(crate) const fn at(offset: u32) -> Self {
        match locate(offset) {
            Some((bank, slot)) => Self {
                offset,
                bank: bank as u8,
                slot: slot as u16,
            },
            None => panic!("register offset is not covered by any bank"),
        }
    }

    /// Decode a bus offset.
    pub fn decode(offset: u64) -> Result<Self, DecodeError> {
        if offset & 3 != 0 {
            return Err(DecodeError::Unaligned { offset });
        }
        let offset32 = u32::try_from(offset).map_err(|_| DecodeError::Unmapped { offset })?;

        let candidates = BANKS.partition_point(|bank| bank.base <= offset32);
        let Some(bank_idx) = candidates.checked_sub(1) else {
            return Err(DecodeError::Unmapped { offset });
        };
        let bank = &BANKS[bank_idx];
        if offset32 >= bank.end() {
            return Err(DecodeError::Unmapped { offset });
        }

        let index = ((offset32 - bank.base) / 4) as usize;
        Ok(Self {
            offset: offset32,
            bank: bank_idx as u8,
            slot: (BANK_STARTS[bank_idx] + index) as u16,
        })
    }

    pub const fn offset(self) -> u64 {
        self.offset as u64
    }

    pub fn bank(self) -> &'static Bank {
        &BANKS[self.bank as usize]
    }

    /// Register index within its bank.
    pub fn index(self) -> usize {
        ((self.offset - self.bank().base) / 4) as usize
    }

    pub(crate) const fn slot(self) -> usize {
        self.slot as usize
    }
}

/// Backing storage for every register in every bank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterFile {
    regs: [u32; REG_COUNT],
}

impl Default for RegisterFile {
    fn default() -> Self {
        Self::new()
    }
}

impl RegisterFile {
    pub fn new() -> Self {
        Self {
            regs: [0; REG_COUNT],
        }
    }

    pub fn set_bits(&mut self, reg: Reg, bits: u32) {
        self[reg] |= bits;
    }

    pub fn clear_bits(&mut self, reg: Reg, bits: u32) {
        self[reg] &= !bits;
    }

    /// Assemble a 64-bit DMA address from a high/low register pair.
    pub fn addr64(&self, hi: Reg, lo: Reg) -> u64 {
        (u64::from(self[hi]) << 32) | u64::from(self[lo])
    }
}

impl Index<Reg> for RegisterFile {
    type Output = u32;

    fn index(&self, reg: Reg) -> &u32 {
        &self.regs[reg.slot()]
    }
}

impl IndexMut<Reg> for RegisterFile {
    fn index_mut(&mut self, reg: Reg) -> &mut u32 {
        &mut self.regs[reg.slot()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn banks_are_sorted_and_disjoint() {
        for pair in BANKS.windows(2) {
            assert!(
                pair[0].end() <= pair[1].base,
                "{} overlaps {}",
                pair[0].name,
                pair[1].name
            );
        }
        assert_eq!(REG_COUNT, 156);
    }

    #[test]
    fn decode_matches_const_lookup_for_every_register() {
        let mut seen = vec![false; REG_COUNT];
        for bank in &BANKS {
            for i in 0..bank.count {
                let offset = bank.base + i * 4;
                let decoded = Reg::decode(u64::from(offset)).unwrap();
                assert_eq!(decoded, Reg::at(offset));
                assert_eq!(decoded.bank().name, bank.name);
                assert_eq!(decoded.index(), i as usize);
                assert!(!seen[decoded.slot()], "slot reused at {offset:#x}");
                seen[decoded.slot()] = true;
            }
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn decode_rejects_holes_and_misalignment() {
        assert_eq!(
            Reg::decode(0x0002),
            Err(DecodeError::Unaligned { offset: 0x0002 })
        );
        for offset in [0x0020u64, 0x0ffc, 0x1014, 0x2038, 0x211c, 0x5000, 0x6138, 0x6220, 0x901c]
        {
            assert_eq!(
                Reg::decode(offset),
                Err(DecodeError::Unmapped { offset }),
                "{offset:#x}"
            );
        }
        assert_eq!(
            Reg::decode(0x1_0000_0000),
            Err(DecodeError::Unmapped {
                offset: 0x1_0000_0000
            })
        );
    }

    #[test]
    fn addr64_joins_halves() {
        let hi = Reg::at(0x200c);
        let lo = Reg::at(0x2008);
        let mut regs = RegisterFile::new();
        regs[hi] = 0x1;
        regs[lo] = 0x2000_0000;
        assert_eq!(regs.addr64(hi, lo), 0x1_2000_0000);
    }
}
