//! Register names and bit fields.
//!
//! Offsets are relative to the start of the MMIO BAR.

use crate::regfile::Reg;

// Global registers.
pub const GREG_SEBSTATE: Reg = Reg::at(0x0000);
pub const GREG_CFG: Reg = Reg::at(0x0004);
pub const GREG_STAT: Reg = Reg::at(0x000c);
pub const GREG_IMASK: Reg = Reg::at(0x0010);
pub const GREG_IACK: Reg = Reg::at(0x0014);
pub const GREG_STAT2: Reg = Reg::at(0x001c);
pub const GREG_PCIESTAT: Reg = Reg::at(0x1000);
pub const GREG_PCIEMASK: Reg = Reg::at(0x1004);
pub const GREG_BIFCFG: Reg = Reg::at(0x1008);
pub const GREG_BIFDIAG: Reg = Reg::at(0x100c);
pub const GREG_SWRST: Reg = Reg::at(0x1010);

/// TX completion index mirrored into the top of the status register.
pub const GREG_STAT_TXNR: u32 = 0xfff8_0000;
pub const GREG_STAT_TXNR_SHIFT: u32 = 19;

pub const GREG_PCIEMASK_MASK: u32 = 0x7;

pub const GREG_SWRST_TXRST: u32 = 0x0000_0001;
pub const GREG_SWRST_RXRST: u32 = 0x0000_0002;
pub const GREG_SWRST_RSTOUT: u32 = 0x0000_0004;

pub const GREG_IMASK_RESET: u32 = 0x0fff_ffff;

// TX DMA.
pub const TXDMA_KICK: Reg = Reg::at(0x2000);
pub const TXDMA_CFG: Reg = Reg::at(0x2004);
pub const TXDMA_DBLOW: Reg = Reg::at(0x2008);
pub const TXDMA_DBHI: Reg = Reg::at(0x200c);
pub const TXDMA_FWPTR: Reg = Reg::at(0x2014);
pub const TXDMA_FSWPTR: Reg = Reg::at(0x2018);
pub const TXDMA_FRPTR: Reg = Reg::at(0x201c);
pub const TXDMA_FSRPTR: Reg = Reg::at(0x2020);
pub const TXDMA_PCNT: Reg = Reg::at(0x2024);
pub const TXDMA_SMACHINE: Reg = Reg::at(0x2028);
pub const TXDMA_DPLOW: Reg = Reg::at(0x2030);
pub const TXDMA_DPHI: Reg = Reg::at(0x2034);
pub const TXDMA_TXDONE: Reg = Reg::at(0x2100);
pub const TXDMA_FADDR: Reg = Reg::at(0x2104);
pub const TXDMA_FTAG: Reg = Reg::at(0x2108);
pub const TXDMA_FDLOW: Reg = Reg::at(0x210c);
pub const TXDMA_FDHI: Reg = Reg::at(0x2110);
pub const TXDMA_FSZ: Reg = Reg::at(0x2118);

pub const TXDMA_CFG_ENABLE: u32 = 0x0000_0001;
pub const TXDMA_CFG_RESET: u32 = 0x0011_8010;
pub const TXDMA_FSZ_RESET: u32 = 0x90;

/// Ring size field shared by both DMA config registers: `32 << n` descriptors.
pub const DMA_CFG_RINGSZ: u32 = 0x0000_001e;
pub const DMA_CFG_RINGSZ_SHIFT: u32 = 1;
/// Largest encodable ring is 8192 descriptors.
pub const DMA_RING_ORDER_MAX: u32 = 8;

// Wake-on-LAN.
pub const WOL_MATCH0: Reg = Reg::at(0x3000);
pub const WOL_MATCH1: Reg = Reg::at(0x3004);
pub const WOL_MATCH2: Reg = Reg::at(0x3008);
pub const WOL_MCOUNT: Reg = Reg::at(0x300c);
pub const WOL_WAKECSR: Reg = Reg::at(0x3010);

// RX DMA.
pub const RXDMA_CFG: Reg = Reg::at(0x4000);
pub const RXDMA_DBLOW: Reg = Reg::at(0x4004);
pub const RXDMA_DBHI: Reg = Reg::at(0x4008);
pub const RXDMA_FWPTR: Reg = Reg::at(0x400c);
pub const RXDMA_FSWPTR: Reg = Reg::at(0x4010);
pub const RXDMA_FRPTR: Reg = Reg::at(0x4014);
pub const RXDMA_PCNT: Reg = Reg::at(0x4018);
pub const RXDMA_SMACHINE: Reg = Reg::at(0x401c);
pub const RXDMA_PTHRESH: Reg = Reg::at(0x4020);
pub const RXDMA_DPLOW: Reg = Reg::at(0x4024);
pub const RXDMA_DPHI: Reg = Reg::at(0x4028);
pub const RXDMA_KICK: Reg = Reg::at(0x4100);
pub const RXDMA_DONE: Reg = Reg::at(0x4104);
pub const RXDMA_BLANK: Reg = Reg::at(0x4108);
pub const RXDMA_FADDR: Reg = Reg::at(0x410c);
pub const RXDMA_FTAG: Reg = Reg::at(0x4110);
pub const RXDMA_FDLOW: Reg = Reg::at(0x4114);
pub const RXDMA_FDHI: Reg = Reg::at(0x4118);
pub const RXDMA_FSZ: Reg = Reg::at(0x4120);

pub const RXDMA_CFG_ENABLE: u32 = 0x0000_0001;
/// First-byte offset of received data within each buffer.
pub const RXDMA_CFG_FBOFF: u32 = 0x0000_1c00;
pub const RXDMA_CFG_FBOFF_SHIFT: u32 = 10;
/// Start of the receive checksum window.
pub const RXDMA_CFG_CSUMOFF: u32 = 0x000f_e000;
pub const RXDMA_CFG_CSUMOFF_SHIFT: u32 = 13;
pub const RXDMA_CFG_RESET: u32 = 0x0100_0010;
pub const RXDMA_FSZ_RESET: u32 = 0x140;
pub const RXDMA_PTHRESH_RESET: u32 = 0xf8;

// MAC.
pub const MAC_TXRST: Reg = Reg::at(0x6000);
pub const MAC_RXRST: Reg = Reg::at(0x6004);
pub const MAC_SNDPAUSE: Reg = Reg::at(0x6008);
pub const MAC_TXSTAT: Reg = Reg::at(0x6010);
pub const MAC_RXSTAT: Reg = Reg::at(0x6014);
pub const MAC_CSTAT: Reg = Reg::at(0x6018);
pub const MAC_TXMASK: Reg = Reg::at(0x6020);
pub const MAC_RXMASK: Reg = Reg::at(0x6024);
pub const MAC_MCMASK: Reg = Reg::at(0x6028);
pub const MAC_TXCFG: Reg = Reg::at(0x6030);
pub const MAC_RXCFG: Reg = Reg::at(0x6034);
pub const MAC_MCCFG: Reg = Reg::at(0x6038);
pub const MAC_XIFCFG: Reg = Reg::at(0x603c);
pub const MAC_IPG0: Reg = Reg::at(0x6040);
pub const MAC_IPG1: Reg = Reg::at(0x6044);
pub const MAC_IPG2: Reg = Reg::at(0x6048);
pub const MAC_STIME: Reg = Reg::at(0x604c);
pub const MAC_MINFSZ: Reg = Reg::at(0x6050);
pub const MAC_MAXFSZ: Reg = Reg::at(0x6054);
pub const MAC_PASIZE: Reg = Reg::at(0x6058);
pub const MAC_JAMSIZE: Reg = Reg::at(0x605c);
pub const MAC_ATTLIM: Reg = Reg::at(0x6060);
pub const MAC_MCTYPE: Reg = Reg::at(0x6064);
pub const MAC_ADDR0: Reg = Reg::at(0x6080);
pub const MAC_ADDR1: Reg = Reg::at(0x6084);
pub const MAC_ADDR2: Reg = Reg::at(0x6088);
pub const MAC_ADDR3: Reg = Reg::at(0x608c);
pub const MAC_ADDR4: Reg = Reg::at(0x6090);
pub const MAC_ADDR5: Reg = Reg::at(0x6094);
pub const MAC_ADDR6: Reg = Reg::at(0x6098);
pub const MAC_ADDR7: Reg = Reg::at(0x609c);
pub const MAC_ADDR8: Reg = Reg::at(0x60a0);
pub const MAC_AFILT0: Reg = Reg::at(0x60a4);
pub const MAC_AFILT1: Reg = Reg::at(0x60a8);
pub const MAC_AFILT2: Reg = Reg::at(0x60ac);
pub const MAC_AF21MSK: Reg = Reg::at(0x60b0);
pub const MAC_AF0MSK: Reg = Reg::at(0x60b4);
pub const MAC_NCOLL: Reg = Reg::at(0x6100);
pub const MAC_FASUCC: Reg = Reg::at(0x6104);
pub const MAC_ECOLL: Reg = Reg::at(0x6108);
pub const MAC_LCOLL: Reg = Reg::at(0x610c);
pub const MAC_DTIMER: Reg = Reg::at(0x6110);
pub const MAC_PATMPS: Reg = Reg::at(0x6114);
pub const MAC_RFCTR: Reg = Reg::at(0x6118);
pub const MAC_LERR: Reg = Reg::at(0x611c);
pub const MAC_AERR: Reg = Reg::at(0x6120);
pub const MAC_FCSERR: Reg = Reg::at(0x6124);
pub const MAC_RXCVERR: Reg = Reg::at(0x6128);
pub const MAC_RANDSEED: Reg = Reg::at(0x6130);
pub const MAC_SMACHINE: Reg = Reg::at(0x6134);

/// Multicast hash table, 16 x 16 bits. Entry 0 holds hash values 0..=15, most significant bit
/// first.
pub const MAC_HASH: [Reg; 16] = [
    Reg::at(0x60c0),
    Reg::at(0x60c4),
    Reg::at(0x60c8),
    Reg::at(0x60cc),
    Reg::at(0x60d0),
    Reg::at(0x60d4),
    Reg::at(0x60d8),
    Reg::at(0x60dc),
    Reg::at(0x60e0),
    Reg::at(0x60e4),
    Reg::at(0x60e8),
    Reg::at(0x60ec),
    Reg::at(0x60f0),
    Reg::at(0x60f4),
    Reg::at(0x60f8),
    Reg::at(0x60fc),
];

pub const MAC_CSTAT_PTR: u32 = 0xffff_0000;

pub const MAC_TXCFG_ENAB: u32 = 0x0000_0001;

pub const MAC_RXCFG_ENAB: u32 = 0x0000_0001;
/// Strip FCS: the reported length excludes the four CRC bytes.
pub const MAC_RXCFG_SFCS: u32 = 0x0000_0008;
pub const MAC_RXCFG_PROM: u32 = 0x0000_0010;
/// Accept every multicast frame.
pub const MAC_RXCFG_PGRP: u32 = 0x0000_0020;
/// Filter multicast frames through the hash table.
pub const MAC_RXCFG_HFE: u32 = 0x0000_0040;

pub const MAC_XIFCFG_LBCK: u32 = 0x0000_0002;

pub const MAC_MINFSZ_MASK: u32 = 0x3ff;
pub const MAC_MAXFSZ_MFS: u32 = 0x7fff;

// Management interface (MIF).
pub const MIF_BBCLK: Reg = Reg::at(0x6200);
pub const MIF_BBDATA: Reg = Reg::at(0x6204);
pub const MIF_BBOENAB: Reg = Reg::at(0x6208);
pub const MIF_FRAME: Reg = Reg::at(0x620c);
pub const MIF_CFG: Reg = Reg::at(0x6210);
pub const MIF_MASK: Reg = Reg::at(0x6214);
pub const MIF_STATUS: Reg = Reg::at(0x6218);
pub const MIF_SMACHINE: Reg = Reg::at(0x621c);

pub const MIF_CFG_MDI0: u32 = 0x0000_0100;
pub const MIF_CFG_MDI1: u32 = 0x0000_0200;

pub const MIF_FRAME_ST: u32 = 0xc000_0000;
pub const MIF_FRAME_ST_SHIFT: u32 = 30;
pub const MIF_FRAME_OP: u32 = 0x3000_0000;
pub const MIF_FRAME_OP_SHIFT: u32 = 28;
pub const MIF_FRAME_PHYAD: u32 = 0x0f80_0000;
pub const MIF_FRAME_PHYAD_SHIFT: u32 = 23;
pub const MIF_FRAME_REGAD: u32 = 0x007c_0000;
pub const MIF_FRAME_REGAD_SHIFT: u32 = 18;
pub const MIF_FRAME_TAMSB: u32 = 0x0002_0000;
/// Turnaround bit, set by the device once a frame completes.
pub const MIF_FRAME_TALSB: u32 = 0x0001_0000;
pub const MIF_FRAME_DATA: u32 = 0x0000_ffff;

// PCS / SERDES.
pub const PCS_MIICTRL: Reg = Reg::at(0x9000);
pub const PCS_MIISTAT: Reg = Reg::at(0x9004);
pub const PCS_MIIADV: Reg = Reg::at(0x9008);
pub const PCS_MIILP: Reg = Reg::at(0x900c);
pub const PCS_CFG: Reg = Reg::at(0x9010);
pub const PCS_SMACHINE: Reg = Reg::at(0x9014);
pub const PCS_ISTAT: Reg = Reg::at(0x9018);
pub const PCS_DMODE: Reg = Reg::at(0x9050);
pub const PCS_SCTRL: Reg = Reg::at(0x9054);
pub const PCS_SOS: Reg = Reg::at(0x9058);
pub const PCS_SSTATE: Reg = Reg::at(0x905c);

/// Registers whose bus writes are discarded.
pub fn is_read_only(reg: Reg) -> bool {
    matches!(
        reg,
        GREG_SEBSTATE
            | GREG_STAT
            | GREG_STAT2
            | GREG_PCIESTAT
            | TXDMA_TXDONE
            | TXDMA_PCNT
            | TXDMA_SMACHINE
            | TXDMA_DPLOW
            | TXDMA_DPHI
            | TXDMA_FSZ
            | TXDMA_FTAG
            | RXDMA_DONE
            | RXDMA_PCNT
            | RXDMA_SMACHINE
            | RXDMA_DPLOW
            | RXDMA_DPHI
            | RXDMA_FSZ
            | RXDMA_FTAG
            | MAC_TXRST
            | MAC_RXRST
            | MAC_TXSTAT
            | MAC_RXSTAT
            | MAC_CSTAT
            | MAC_PATMPS
            | MAC_SMACHINE
            | MIF_STATUS
            | MIF_SMACHINE
            | PCS_MIISTAT
            | PCS_ISTAT
            | PCS_SSTATE
    )
}

/// Apply the per-register write mask. `None` when the write is discarded.
pub fn write_filter(reg: Reg, value: u32) -> Option<u32> {
    if is_read_only(reg) {
        return None;
    }
    Some(match reg {
        GREG_PCIEMASK => value & GREG_PCIEMASK_MASK,
        MAC_MINFSZ => value & MAC_MINFSZ_MASK,
        MIF_CFG => (value & !MIF_CFG_MDI1) | MIF_CFG_MDI0,
        _ => value,
    })
}

/// Descriptor ring index mask for a DMA config value.
pub fn ring_mask(cfg: u32) -> u32 {
    let order = ((cfg & DMA_CFG_RINGSZ) >> DMA_CFG_RINGSZ_SHIFT).min(DMA_RING_ORDER_MAX);
    (32u32 << order) - 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ring_mask_clamps_order() {
        assert_eq!(ring_mask(0), 31);
        assert_eq!(ring_mask(3 << 1), 255);
        assert_eq!(ring_mask(TXDMA_CFG_RESET), 8191);
        assert_eq!(ring_mask(RXDMA_CFG_RESET), 8191);
        assert_eq!(ring_mask(DMA_CFG_RINGSZ), 8191);
    }

    #[test]
    fn write_filter_applies_masks() {
        assert_eq!(write_filter(GREG_PCIEMASK, u32::MAX), Some(0x7));
        assert_eq!(write_filter(MAC_MINFSZ, 0xffff), Some(0x3ff));
        assert_eq!(write_filter(MIF_CFG, MIF_CFG_MDI1), Some(MIF_CFG_MDI0));
        assert_eq!(write_filter(MAC_ADDR0, 0x1234), Some(0x1234));
        assert_eq!(write_filter(RXDMA_DONE, 5), None);
        assert_eq!(write_filter(PCS_SSTATE, 5), None);
    }

    #[test]
    fn hash_table_is_contiguous() {
        for (i, reg) in MAC_HASH.iter().enumerate() {
            assert_eq!(reg.offset(), 0x60c0 + 4 * i as u64);
        }
    }
}
