//! DMA descriptor layouts.
//!
//! Both rings use 16-byte little-endian descriptors: a 64-bit control/status word followed by a
//! 64-bit buffer address.

pub const DESC_LEN: usize = 16;

pub const TXDCTRL_BUFSZ: u64 = 0x0000_0000_0000_7fff;
/// Checksum window start, bytes from the start of the frame.
pub const TXDCTRL_CSTART: u64 = 0x0000_0000_001f_8000;
pub const TXDCTRL_CSTART_SHIFT: u32 = 15;
/// Where the computed checksum is stored.
pub const TXDCTRL_COFF: u64 = 0x0000_0000_1fe0_0000;
pub const TXDCTRL_COFF_SHIFT: u32 = 21;
pub const TXDCTRL_CENAB: u64 = 0x0000_0000_2000_0000;
pub const TXDCTRL_EOF: u64 = 0x0000_0000_4000_0000;
pub const TXDCTRL_SOF: u64 = 0x0000_0000_8000_0000;
pub const TXDCTRL_INTME: u64 = 0x0000_0001_0000_0000;
pub const TXDCTRL_NOCRC: u64 = 0x0000_0002_0000_0000;

pub const RXDCTRL_TCPCSUM: u64 = 0x0000_0000_0000_ffff;
pub const RXDCTRL_BUFSZ: u64 = 0x0000_0000_7fff_0000;
pub const RXDCTRL_BUFSZ_SHIFT: u32 = 16;
pub const RXDCTRL_OWN: u64 = 0x0000_0000_8000_0000;
pub const RXDCTRL_HASHVAL: u64 = 0x0fff_f000_0000_0000;
pub const RXDCTRL_HASHVAL_SHIFT: u32 = 44;
/// Frame passed the multicast hash filter.
pub const RXDCTRL_HPASS: u64 = 0x1000_0000_0000_0000;
/// Frame matched an alternate station address.
pub const RXDCTRL_ALTMAC: u64 = 0x2000_0000_0000_0000;
pub const RXDCTRL_BAD: u64 = 0x4000_0000_0000_0000;

fn split(bytes: &[u8; DESC_LEN]) -> (u64, u64) {
    let mut lo = [0u8; 8];
    let mut hi = [0u8; 8];
    lo.copy_from_slice(&bytes[..8]);
    hi.copy_from_slice(&bytes[8..]);
    (u64::from_le_bytes(lo), u64::from_le_bytes(hi))
}

fn join(word: u64, buffer: u64) -> [u8; DESC_LEN] {
    let mut bytes = [0u8; DESC_LEN];
    bytes[..8].copy_from_slice(&word.to_le_bytes());
    bytes[8..].copy_from_slice(&buffer.to_le_bytes());
    bytes
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxDesc {
    pub control: u64,
    pub buffer: u64,
}

impl TxDesc {
    pub fn from_bytes(bytes: [u8; DESC_LEN]) -> Self {
        let (control, buffer) = split(&bytes);
        Self { control, buffer }
    }

    pub fn to_bytes(&self) -> [u8; DESC_LEN] {
        join(self.control, self.buffer)
    }

    pub fn buf_len(&self) -> usize {
        (self.control & TXDCTRL_BUFSZ) as usize
    }

    pub fn is_sof(&self) -> bool {
        self.control & TXDCTRL_SOF != 0
    }

    pub fn is_eof(&self) -> bool {
        self.control & TXDCTRL_EOF != 0
    }

    pub fn int_me(&self) -> bool {
        self.control & TXDCTRL_INTME != 0
    }

    /// `(start, offset)` of the checksum window when offload is requested.
    pub fn checksum_request(&self) -> Option<(usize, usize)> {
        if self.control & TXDCTRL_CENAB == 0 {
            return None;
        }
        let start = (self.control & TXDCTRL_CSTART) >> TXDCTRL_CSTART_SHIFT;
        let offset = (self.control & TXDCTRL_COFF) >> TXDCTRL_COFF_SHIFT;
        Some((start as usize, offset as usize))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RxDesc {
    pub status: u64,
    pub buffer: u64,
}

impl RxDesc {
    pub fn from_bytes(bytes: [u8; DESC_LEN]) -> Self {
        let (status, buffer) = split(&bytes);
        Self { status, buffer }
    }

    pub fn to_bytes(&self) -> [u8; DESC_LEN] {
        join(self.status, self.buffer)
    }

    /// Reported frame length, FCS included unless stripping is enabled.
    pub fn frame_len(&self) -> usize {
        ((self.status & RXDCTRL_BUFSZ) >> RXDCTRL_BUFSZ_SHIFT) as usize
    }

    pub fn checksum(&self) -> u16 {
        (self.status & RXDCTRL_TCPCSUM) as u16
    }

    pub fn hash(&self) -> u16 {
        ((self.status & RXDCTRL_HASHVAL) >> RXDCTRL_HASHVAL_SHIFT) as u16
    }
}
