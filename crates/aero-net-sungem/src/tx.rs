use memory::MemoryBus;
use tracing::{debug, trace, warn};

use crate::checksum::raw_checksum;
use crate::desc::{TxDesc, DESC_LEN};
use crate::irq::GlobalStatus;
use crate::regs::{
    MAC_TXCFG, MAC_TXCFG_ENAB, MAC_XIFCFG, MAC_XIFCFG_LBCK, TXDMA_CFG, TXDMA_CFG_ENABLE,
    TXDMA_DBHI, TXDMA_DBLOW, TXDMA_KICK, TXDMA_TXDONE,
};
use crate::{SunGemDevice, MAX_PACKET_SIZE};

/// Frame being gathered across descriptors.
#[derive(Debug, Clone, Default)]
pub(crate) struct TxAccumulator {
    data: Vec<u8>,
    /// Control word of the SOF descriptor; it carries the checksum request for the frame.
    first: Option<TxDesc>,
}

impl TxAccumulator {
    pub fn reset(&mut self) {
        self.data.clear();
        self.first = None;
    }

    fn in_progress(&self) -> bool {
        self.first.is_some() || !self.data.is_empty()
    }

    /// Append a descriptor's buffer, never growing past [`MAX_PACKET_SIZE`].
    fn append(&mut self, mem: &mut dyn MemoryBus, desc: &TxDesc) {
        let mut len = desc.buf_len();
        let room = MAX_PACKET_SIZE - self.data.len();
        if len > room {
            warn!(len, room, "tx frame exceeds maximum packet size, truncating");
            len = room;
        }
        let start = self.data.len();
        self.data.resize(start + len, 0);
        mem.read_physical(desc.buffer, &mut self.data[start..]);
    }

    fn finish(&mut self) -> (Vec<u8>, Option<TxDesc>) {
        (std::mem::take(&mut self.data), self.first.take())
    }
}

/// Store the checksum of `frame[start..]` big-endian at `offset`.
fn insert_checksum(frame: &mut [u8], start: usize, offset: usize) {
    let len = frame.len();
    let Some(limit) = len.checked_sub(2) else {
        warn!(len, "tx frame too short for checksum offload");
        return;
    };
    if start > limit || offset > limit {
        warn!(start, offset, len, "tx checksum offsets out of range");
        return;
    }
    let csum = raw_checksum(&frame[start..]);
    trace!(start, offset, csum, "tx checksum offload");
    frame[offset..offset + 2].copy_from_slice(&csum.to_be_bytes());
}

impl SunGemDevice {
    fn tx_enabled(&self) -> bool {
        self.regs[TXDMA_CFG] & TXDMA_CFG_ENABLE != 0 && self.regs[MAC_TXCFG] & MAC_TXCFG_ENAB != 0
    }

    /// Process descriptors from the completion index up to the guest's kick index.
    pub(crate) fn tx_kick(&mut self, mem: &mut dyn MemoryBus) {
        if !self.tx_enabled() {
            trace!(
                dma_cfg = self.regs[TXDMA_CFG],
                mac_cfg = self.regs[MAC_TXCFG],
                "tx kick while disabled"
            );
            return;
        }

        let base = self.regs.addr64(TXDMA_DBHI, TXDMA_DBLOW);
        let mask = self.tx_mask;
        let kick = self.regs[TXDMA_KICK] & mask;
        let mut comp = self.regs[TXDMA_TXDONE] & mask;
        trace!(base, comp, kick, ring_size = mask + 1, "tx kick");

        while comp != kick {
            let addr = base.wrapping_add(u64::from(comp) * DESC_LEN as u64);
            let mut raw = [0u8; DESC_LEN];
            mem.read_physical(addr, &mut raw);
            let desc = TxDesc::from_bytes(raw);
            trace!(
                index = comp,
                control = desc.control,
                buffer = desc.buffer,
                "tx descriptor"
            );

            if desc.is_sof() {
                if self.tx.in_progress() {
                    warn!("tx start-of-frame while a previous frame is incomplete");
                }
                self.tx.reset();
                self.tx.first = Some(desc);
            }
            self.tx.append(mem, &desc);

            if desc.is_eof() {
                let (mut frame, first) = self.tx.finish();
                if let Some((start, offset)) = first.and_then(|d| d.checksum_request()) {
                    insert_checksum(&mut frame, start, offset);
                }
                self.send_frame(mem, frame);
            }

            let mut ints = GlobalStatus::TXDONE;
            if desc.int_me() {
                ints |= GlobalStatus::TXINTME;
            }
            self.update_status(ints, true);

            comp = (comp + 1) & mask;
            self.regs[TXDMA_TXDONE] = comp;
        }

        self.update_status(GlobalStatus::TXALL, true);
    }

    fn send_frame(&mut self, mem: &mut dyn MemoryBus, frame: Vec<u8>) {
        if frame.is_empty() {
            debug!("dropping empty tx frame");
            return;
        }
        trace!(len = frame.len(), "tx frame");

        if self.regs[MAC_XIFCFG] & MAC_XIFCFG_LBCK != 0 {
            trace!("tx loopback");
            if self.receive(mem, &frame) == 0 {
                self.enqueue_rx_frame(frame);
            }
            return;
        }
        self.push_tx_frame(frame);
    }
}
