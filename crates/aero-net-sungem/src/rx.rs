use std::borrow::Cow;

use memory::MemoryBus;
use tracing::{debug, trace};

use crate::checksum::{address_crc, raw_checksum};
use crate::desc::{
    RxDesc, DESC_LEN, RXDCTRL_ALTMAC, RXDCTRL_BUFSZ, RXDCTRL_BUFSZ_SHIFT, RXDCTRL_HASHVAL,
    RXDCTRL_HASHVAL_SHIFT, RXDCTRL_HPASS,
};
use crate::irq::GlobalStatus;
use crate::regs::{
    MAC_ADDR0, MAC_ADDR1, MAC_ADDR2, MAC_ADDR3, MAC_ADDR4, MAC_ADDR5, MAC_HASH, MAC_MAXFSZ,
    MAC_MAXFSZ_MFS, MAC_RXCFG, MAC_RXCFG_ENAB, MAC_RXCFG_HFE, MAC_RXCFG_PGRP, MAC_RXCFG_PROM,
    MAC_RXCFG_SFCS, RXDMA_CFG, RXDMA_CFG_CSUMOFF, RXDMA_CFG_CSUMOFF_SHIFT, RXDMA_CFG_ENABLE,
    RXDMA_CFG_FBOFF, RXDMA_CFG_FBOFF_SHIFT, RXDMA_DBHI, RXDMA_DBLOW, RXDMA_DONE, RXDMA_KICK,
};
use crate::regfile::Reg;
use crate::{SunGemDevice, FCS_LEN, MIN_RX_FRAME_LEN, RX_PAD_LEN};

/// Outcome of the receive address filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressMatch {
    NoMatch,
    Promiscuous,
    Broadcast,
    /// Group address accepted by the all-multicast bit.
    AllMulticast,
    /// Group address accepted by the hash filter.
    HashMulticast,
    /// Primary station address.
    Station,
    /// Alternate station address.
    AltStation,
}

impl AddressMatch {
    pub fn accepted(self) -> bool {
        self != Self::NoMatch
    }
}

fn ring_full(kick: u32, done: u32, mask: u32) -> bool {
    kick & mask == done.wrapping_add(1) & mask
}

impl SunGemDevice {
    pub(crate) fn rx_enabled(&self) -> bool {
        self.regs[MAC_RXCFG] & MAC_RXCFG_ENAB != 0 && self.regs[RXDMA_CFG] & RXDMA_CFG_ENABLE != 0
    }

    /// Whether a frame handed to [`Self::receive`] now would be stored.
    pub fn can_receive(&self) -> bool {
        if !self.rx_enabled() {
            return false;
        }
        let full = ring_full(self.regs[RXDMA_KICK], self.regs[RXDMA_DONE], self.rx_mask);
        if full {
            trace!(
                kick = self.regs[RXDMA_KICK],
                done = self.regs[RXDMA_DONE],
                "rx ring full"
            );
        }
        !full
    }

    fn station_match(&self, dst: &[u8; 6], regs: [Reg; 3]) -> bool {
        regs.iter().enumerate().all(|(i, &reg)| {
            // Register 0 holds the last two bytes of the address.
            let pair = [dst[4 - 2 * i], dst[5 - 2 * i]];
            self.regs[reg] == u32::from(u16::from_be_bytes(pair))
        })
    }

    fn hash_match(&self, crc: u32) -> bool {
        let bucket = (crc >> 24) as usize;
        self.regs[MAC_HASH[bucket >> 4]] & (0x8000 >> (bucket & 0xf)) != 0
    }

    fn classify(&self, dst: &[u8; 6], crc: u32) -> AddressMatch {
        let rxcfg = self.regs[MAC_RXCFG];
        if rxcfg & MAC_RXCFG_PROM != 0 {
            return AddressMatch::Promiscuous;
        }
        if dst == &[0xff; 6] {
            return AddressMatch::Broadcast;
        }
        if dst[0] & 0x01 != 0 {
            if rxcfg & MAC_RXCFG_PGRP != 0 {
                return AddressMatch::AllMulticast;
            }
            if rxcfg & MAC_RXCFG_HFE != 0 && self.hash_match(crc) {
                return AddressMatch::HashMulticast;
            }
            return AddressMatch::NoMatch;
        }
        if self.station_match(dst, [MAC_ADDR0, MAC_ADDR1, MAC_ADDR2]) {
            return AddressMatch::Station;
        }
        if self.station_match(dst, [MAC_ADDR3, MAC_ADDR4, MAC_ADDR5]) {
            return AddressMatch::AltStation;
        }
        AddressMatch::NoMatch
    }

    /// Run the receive address filter against a destination address.
    pub fn address_match(&self, dst: &[u8; 6]) -> AddressMatch {
        self.classify(dst, address_crc(dst))
    }

    /// Deliver one frame into the guest's RX ring.
    ///
    /// Returns the number of bytes consumed: the frame length when the frame was stored or
    /// dropped, and 0 when the ring is full and the caller should retry later.
    pub fn receive(&mut self, mem: &mut dyn MemoryBus, frame: &[u8]) -> usize {
        let len = frame.len();
        if !self.rx_enabled() {
            debug!(len, "rx disabled, dropping frame");
            return len;
        }

        let max_len = (self.regs[MAC_MAXFSZ] & MAC_MAXFSZ_MFS) as usize;
        if len < MIN_RX_FRAME_LEN || len + FCS_LEN > max_len {
            debug!(len, max_len, "rx frame size out of range, dropping");
            return len;
        }

        let data: Cow<'_, [u8]> = if len < RX_PAD_LEN {
            let mut padded = frame.to_vec();
            padded.resize(RX_PAD_LEN, 0);
            Cow::Owned(padded)
        } else {
            Cow::Borrowed(frame)
        };

        let mut dst = [0u8; 6];
        dst.copy_from_slice(&data[..6]);
        let crc = address_crc(&dst);
        let matched = self.classify(&dst, crc);
        if !matched.accepted() {
            trace!(dst = ?dst, "rx frame rejected by address filter");
            return len;
        }

        let mask = self.rx_mask;
        let kick = self.regs[RXDMA_KICK] & mask;
        let done = self.regs[RXDMA_DONE] & mask;
        if ring_full(kick, done, mask) {
            trace!(kick, done, "rx ring full, deferring frame");
            return 0;
        }

        let base = self.regs.addr64(RXDMA_DBHI, RXDMA_DBLOW);
        let desc_addr = base.wrapping_add(u64::from(done) * DESC_LEN as u64);
        let mut raw = [0u8; DESC_LEN];
        mem.read_physical(desc_addr, &mut raw);
        let mut desc = RxDesc::from_bytes(raw);

        let cfg = self.regs[RXDMA_CFG];
        let first_byte = u64::from((cfg & RXDMA_CFG_FBOFF) >> RXDMA_CFG_FBOFF_SHIFT);
        let buf_addr = (desc.buffer & !7) | first_byte;
        mem.write_physical(buf_addr, &data);

        let csum_start = ((cfg & RXDMA_CFG_CSUMOFF) >> RXDMA_CFG_CSUMOFF_SHIFT) as usize;
        let csum = raw_checksum(data.get(csum_start..).unwrap_or(&[]));

        let fcs = if self.regs[MAC_RXCFG] & MAC_RXCFG_SFCS != 0 {
            0
        } else {
            FCS_LEN
        };
        let reported = (data.len() + fcs) as u64;
        desc.status = ((reported << RXDCTRL_BUFSZ_SHIFT) & RXDCTRL_BUFSZ)
            | ((u64::from(crc >> 16) << RXDCTRL_HASHVAL_SHIFT) & RXDCTRL_HASHVAL)
            | u64::from(csum);
        match matched {
            AddressMatch::HashMulticast => desc.status |= RXDCTRL_HPASS,
            AddressMatch::AltStation => desc.status |= RXDCTRL_ALTMAC,
            _ => {}
        }
        mem.write_physical(desc_addr, &desc.to_bytes());
        trace!(
            index = done,
            len,
            reported,
            ?matched,
            status = desc.status,
            "rx frame stored"
        );

        let done = (done + 1) & mask;
        self.regs[RXDMA_DONE] = done;

        let mut ints = GlobalStatus::RXDONE;
        if ring_full(kick, done, mask) {
            ints |= GlobalStatus::RXNOBUF;
        }
        self.update_status(ints, true);

        len
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device() -> SunGemDevice {
        let mut dev = SunGemDevice::new([0x02, 0x11, 0x22, 0x33, 0x44, 0x55]);
        dev.regs[MAC_RXCFG] = MAC_RXCFG_ENAB;
        dev
    }

    #[test]
    fn station_address_uses_reset_layout() {
        let dev = device();
        assert_eq!(
            dev.address_match(&[0x02, 0x11, 0x22, 0x33, 0x44, 0x55]),
            AddressMatch::Station
        );
        assert_eq!(
            dev.address_match(&[0x02, 0x11, 0x22, 0x33, 0x44, 0x56]),
            AddressMatch::NoMatch
        );
    }

    #[test]
    fn promiscuous_wins_over_everything() {
        let mut dev = device();
        dev.regs[MAC_RXCFG] |= MAC_RXCFG_PROM;
        assert_eq!(
            dev.address_match(&[0xff; 6]),
            AddressMatch::Promiscuous
        );
        assert_eq!(
            dev.address_match(&[0x0a, 0, 0, 0, 0, 1]),
            AddressMatch::Promiscuous
        );
    }

    #[test]
    fn hash_bucket_bit_order() {
        let mut dev = device();
        dev.regs[MAC_RXCFG] |= MAC_RXCFG_HFE;
        let dst = [0x01, 0x00, 0x5e, 0x00, 0x00, 0xfb];
        assert_eq!(dev.address_match(&dst), AddressMatch::NoMatch);

        let bucket = (address_crc(&dst) >> 24) as usize;
        dev.regs[MAC_HASH[bucket >> 4]] = 0x8000 >> (bucket & 0xf);
        assert_eq!(dev.address_match(&dst), AddressMatch::HashMulticast);

        dev.regs[MAC_RXCFG] |= MAC_RXCFG_PGRP;
        assert_eq!(dev.address_match(&dst), AddressMatch::AllMulticast);
    }

    #[test]
    fn ring_full_wraps() {
        assert!(ring_full(0, 31, 31));
        assert!(ring_full(5, 4, 31));
        assert!(!ring_full(4, 4, 31));
    }
}
