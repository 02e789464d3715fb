//! Sun GEM (UniNorth GMAC) Ethernet controller.
//!
//! The device model covers the guest-visible register file, the TX and RX descriptor ring
//! engines, the interrupt aggregator and a fixed 10/100 transceiver behind the management
//! interface. It is deliberately host-agnostic:
//!
//! - guest memory is reached through [`memory::MemoryBus`];
//! - transmitted frames are queued and drained with [`SunGemDevice::pop_tx_frame`];
//! - received frames are pushed with [`SunGemDevice::receive`] or
//!   [`SunGemDevice::enqueue_rx_frame`];
//! - the interrupt line is sampled with [`SunGemDevice::irq_level`].
//!
//! PCI config space, bus mastering and device snapshots are the platform's concern.

#![forbid(unsafe_code)]

mod checksum;
mod config;
mod desc;
mod device;
mod irq;
mod mii;
mod regfile;
pub mod regs;
mod rx;
mod tx;

#[cfg(test)]
mod tests;

pub use checksum::{address_crc, crc32_update, raw_checksum};
pub use config::{ConfigError, SunGemConfig};
pub use desc::*;
pub use device::SunGemDevice;
pub use irq::GlobalStatus;
pub use mii::{
    BCM5201_PHYID1, BCM5201_PHYID2, MII_ADVERTISE, MII_AUXSTAT, MII_BMCR, MII_BMSR, MII_LPA,
    MII_PHYSID1, MII_PHYSID2,
};
pub use regfile::{Bank, DecodeError, Reg, RegisterFile, BANKS, REG_COUNT};
pub use rx::AddressMatch;

/// Size of the register BAR.
pub const SUNGEM_MMIO_SIZE: u64 = 0x20_0000;

/// Largest frame the transmit engine assembles.
pub const MAX_PACKET_SIZE: usize = 9016;

/// Received frames shorter than this are dropped.
pub const MIN_RX_FRAME_LEN: usize = 6;

/// Received frames are zero-padded to this length before filtering.
pub const RX_PAD_LEN: usize = 60;

/// Trailer allowance for the CRC the wire would have carried.
pub const FCS_LEN: usize = 4;

/// Bound on each host-side frame queue. The oldest frame is dropped on overflow.
pub const MAX_HOST_QUEUE: usize = 256;
