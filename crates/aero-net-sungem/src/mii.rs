//! Management interface frames and the transceiver behind them.
//!
//! A single BCM5201-style 10/100 PHY answers at the configured address. Writes are accepted and
//! discarded; reads return fixed identity and capability values with the link bits following
//! the backend's link state.

use tracing::{debug, trace};

use crate::regs::{
    MIF_FRAME_DATA, MIF_FRAME_OP, MIF_FRAME_OP_SHIFT, MIF_FRAME_PHYAD, MIF_FRAME_PHYAD_SHIFT,
    MIF_FRAME_REGAD, MIF_FRAME_REGAD_SHIFT, MIF_FRAME_ST, MIF_FRAME_ST_SHIFT, MIF_FRAME_TALSB,
};

pub const MII_BMCR: u8 = 0x00;
pub const MII_BMSR: u8 = 0x01;
pub const MII_PHYSID1: u8 = 0x02;
pub const MII_PHYSID2: u8 = 0x03;
pub const MII_ADVERTISE: u8 = 0x04;
pub const MII_LPA: u8 = 0x05;
/// Broadcom auxiliary status.
pub const MII_AUXSTAT: u8 = 0x18;

pub const BMSR_LSTATUS: u16 = 0x0004;
pub const BMSR_ANEGCAPABLE: u16 = 0x0008;
pub const BMSR_ANEGCOMPLETE: u16 = 0x0020;
pub const BMSR_100FULL: u16 = 0x4000;
pub const ADVERTISE_100FULL: u16 = 0x0100;

pub const BCM5201_PHYID1: u16 = 0x0040;
pub const BCM5201_PHYID2: u16 = 0x6210;
/// 100 Mbit full duplex.
const AUXSTAT_100FD: u16 = 0x0003;

const FRAME_START: u32 = 0x1;
const OP_WRITE: u32 = 0x1;
const OP_READ: u32 = 0x2;

#[derive(Debug, Clone)]
pub(crate) struct PhyStub {
    addr: u8,
    link_up: bool,
}

impl PhyStub {
    pub fn new(addr: u8) -> Self {
        Self {
            addr,
            link_up: true,
        }
    }

    pub fn set_link_up(&mut self, up: bool) {
        self.link_up = up;
    }

    pub fn link_up(&self) -> bool {
        self.link_up
    }

    pub fn read(&self, phy: u8, reg: u8) -> u16 {
        if phy != self.addr {
            return 0xffff;
        }
        match reg {
            MII_BMCR => 0,
            MII_BMSR => {
                let mut bmsr = BMSR_100FULL | BMSR_ANEGCAPABLE;
                if self.link_up {
                    bmsr |= BMSR_ANEGCOMPLETE | BMSR_LSTATUS;
                }
                bmsr
            }
            MII_PHYSID1 => BCM5201_PHYID1,
            MII_PHYSID2 => BCM5201_PHYID2,
            MII_ADVERTISE | MII_LPA => ADVERTISE_100FULL,
            MII_AUXSTAT => AUXSTAT_100FD,
            _ => 0,
        }
    }

    /// Execute one management frame and return the value the frame register holds afterwards.
    pub fn frame_op(&self, frame: u32) -> u32 {
        let start = (frame & MIF_FRAME_ST) >> MIF_FRAME_ST_SHIFT;
        if start != FRAME_START {
            debug!(frame, "MIF frame without start marker");
            return 0xffff;
        }

        let op = (frame & MIF_FRAME_OP) >> MIF_FRAME_OP_SHIFT;
        let phy = ((frame & MIF_FRAME_PHYAD) >> MIF_FRAME_PHYAD_SHIFT) as u8;
        let reg = ((frame & MIF_FRAME_REGAD) >> MIF_FRAME_REGAD_SHIFT) as u8;
        match op {
            OP_WRITE => {
                trace!(phy, reg, data = frame & MIF_FRAME_DATA, "MII write ignored");
                frame | MIF_FRAME_TALSB
            }
            OP_READ => {
                let value = self.read(phy, reg);
                trace!(phy, reg, value, "MII read");
                u32::from(value) | MIF_FRAME_TALSB
            }
            _ => {
                debug!(op, "invalid MIF frame opcode");
                0xffff | MIF_FRAME_TALSB
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_frame(phy: u8, reg: u8) -> u32 {
        (FRAME_START << MIF_FRAME_ST_SHIFT)
            | (OP_READ << MIF_FRAME_OP_SHIFT)
            | (u32::from(phy) << MIF_FRAME_PHYAD_SHIFT)
            | (u32::from(reg) << MIF_FRAME_REGAD_SHIFT)
    }

    #[test]
    fn identity_registers() {
        let phy = PhyStub::new(0);
        assert_eq!(phy.frame_op(read_frame(0, MII_PHYSID1)), 0x0001_0040);
        assert_eq!(phy.frame_op(read_frame(0, MII_PHYSID2)), 0x0001_6210);
        assert_eq!(phy.frame_op(read_frame(0, MII_AUXSTAT)), 0x0001_0003);
        assert_eq!(phy.frame_op(read_frame(0, 0x1f)), MIF_FRAME_TALSB);
    }

    #[test]
    fn bmsr_tracks_link() {
        let mut phy = PhyStub::new(0);
        assert_eq!(phy.read(0, MII_BMSR), 0x402c);
        phy.set_link_up(false);
        assert_eq!(phy.read(0, MII_BMSR), 0x4008);
    }

    #[test]
    fn other_addresses_float() {
        let phy = PhyStub::new(3);
        assert_eq!(phy.read(0, MII_PHYSID1), 0xffff);
        assert_eq!(phy.read(3, MII_PHYSID1), BCM5201_PHYID1);
    }

    #[test]
    fn malformed_frames() {
        let phy = PhyStub::new(0);
        assert_eq!(phy.frame_op(read_frame(0, 2) & !MIF_FRAME_ST), 0xffff);
        let bad_op = (read_frame(0, 2) & !MIF_FRAME_OP) | (3 << MIF_FRAME_OP_SHIFT);
        assert_eq!(phy.frame_op(bad_op), 0x0001_ffff);

        let write = (FRAME_START << MIF_FRAME_ST_SHIFT) | (OP_WRITE << MIF_FRAME_OP_SHIFT) | 0xbeef;
        assert_eq!(phy.frame_op(write), write | MIF_FRAME_TALSB);
    }
}
