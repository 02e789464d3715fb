use bitflags::bitflags;
use tracing::trace;

use crate::regfile::RegisterFile;
use crate::regs::{
    GREG_IMASK, GREG_STAT, GREG_STAT_TXNR, MAC_CSTAT, MAC_CSTAT_PTR, MAC_MCMASK, MAC_RXMASK,
    MAC_RXSTAT, MAC_TXMASK, MAC_TXSTAT,
};
use crate::SunGemDevice;

bitflags! {
    /// Interrupt causes in the global status register.
    #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
    pub struct GlobalStatus: u32 {
        /// A descriptor flagged INTME completed.
        const TXINTME = 1 << 0;
        /// The TX ring drained.
        const TXALL = 1 << 1;
        const TXDONE = 1 << 2;
        const RXDONE = 1 << 4;
        const RXNOBUF = 1 << 5;
        const RXTAGERR = 1 << 6;
        const PCS = 1 << 13;
        const TXMAC = 1 << 14;
        const RXMAC = 1 << 15;
        const MAC = 1 << 16;
        const MIF = 1 << 17;
        const PCIERR = 1 << 18;
    }
}

impl GlobalStatus {
    /// Causes cleared by a status read or an acknowledge write. `TXDONE` is sticky until reset.
    pub const LATCH: Self = Self::TXINTME
        .union(Self::TXALL)
        .union(Self::RXDONE)
        .union(Self::RXNOBUF)
        .union(Self::RXTAGERR);
}

/// Any unmasked cause set. The TX completion field is not a cause.
pub(crate) fn pending(regs: &RegisterFile) -> bool {
    let causes = regs[GREG_STAT] & !GREG_STAT_TXNR;
    causes & !regs[GREG_IMASK] != 0
}

/// Fold the MAC sub-unit status/mask pairs into their aggregate cause bits.
pub(crate) fn cascade(regs: &mut RegisterFile) {
    let pairs = [
        (
            GlobalStatus::TXMAC,
            regs[MAC_TXSTAT] & !regs[MAC_TXMASK] != 0,
        ),
        (
            GlobalStatus::RXMAC,
            regs[MAC_RXSTAT] & !regs[MAC_RXMASK] != 0,
        ),
        (
            GlobalStatus::MAC,
            (regs[MAC_CSTAT] & !MAC_CSTAT_PTR) & !regs[MAC_MCMASK] != 0,
        ),
    ];
    for (bit, active) in pairs {
        if active {
            regs.set_bits(GREG_STAT, bit.bits());
        } else {
            regs.clear_bits(GREG_STAT, bit.bits());
        }
    }
}

impl SunGemDevice {
    pub(crate) fn eval_irq(&mut self) {
        let level = pending(&self.regs);
        if level != self.irq_level {
            trace!(
                level,
                stat = self.regs[GREG_STAT],
                imask = self.regs[GREG_IMASK],
                "interrupt line changed"
            );
        }
        self.irq_level = level;
    }

    pub(crate) fn eval_cascade_irq(&mut self) {
        cascade(&mut self.regs);
        self.eval_irq();
    }

    /// Set or clear status causes and re-evaluate the interrupt line.
    pub(crate) fn update_status(&mut self, bits: GlobalStatus, set: bool) {
        if set {
            self.regs.set_bits(GREG_STAT, bits.bits());
        } else {
            self.regs.clear_bits(GREG_STAT, bits.bits());
        }
        self.eval_irq();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latch_covers_dma_causes_only() {
        assert_eq!(GlobalStatus::LATCH.bits(), 0x73);
    }

    #[test]
    fn txnr_field_never_asserts() {
        let mut regs = RegisterFile::new();
        regs[GREG_STAT] = GREG_STAT_TXNR;
        assert!(!pending(&regs));
        regs[GREG_STAT] |= GlobalStatus::RXDONE.bits();
        assert!(pending(&regs));
        regs[GREG_IMASK] = GlobalStatus::RXDONE.bits();
        assert!(!pending(&regs));
    }

    #[test]
    fn cascade_ignores_control_pointer_field() {
        let mut regs = RegisterFile::new();
        regs[MAC_CSTAT] = MAC_CSTAT_PTR;
        cascade(&mut regs);
        assert_eq!(regs[GREG_STAT], 0);

        regs[MAC_CSTAT] |= 0x1;
        regs[MAC_TXSTAT] = 0x4;
        regs[MAC_TXMASK] = 0x4;
        regs[MAC_RXSTAT] = 0x2;
        cascade(&mut regs);
        assert_eq!(
            regs[GREG_STAT],
            (GlobalStatus::MAC | GlobalStatus::RXMAC).bits()
        );
    }
}
