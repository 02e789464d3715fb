use std::collections::VecDeque;

use memory::MemoryBus;
use tracing::{debug, trace};

use crate::config::{ConfigError, SunGemConfig};
use crate::irq::GlobalStatus;
use crate::mii::PhyStub;
use crate::regfile::{Reg, RegisterFile};
use crate::regs::*;
use crate::tx::TxAccumulator;
use crate::MAX_HOST_QUEUE;

/// Emulated Sun GEM Ethernet controller.
///
/// Guest accesses arrive through [`SunGemDevice::mmio_read_u32`] and
/// [`SunGemDevice::mmio_write_u32`]. Frames leave through [`SunGemDevice::pop_tx_frame`] and
/// enter through [`SunGemDevice::receive`] or the bounded queue behind
/// [`SunGemDevice::enqueue_rx_frame`].
#[derive(Debug, Clone)]
pub struct SunGemDevice {
    pub(crate) regs: RegisterFile,
    pub(crate) mac_addr: [u8; 6],
    pub(crate) phy: PhyStub,

    pub(crate) tx_mask: u32,
    pub(crate) rx_mask: u32,
    pub(crate) tx: TxAccumulator,

    pub(crate) irq_level: bool,

    pub(crate) tx_out: VecDeque<Vec<u8>>,
    pub(crate) rx_pending: VecDeque<Vec<u8>>,
}

impl SunGemDevice {
    /// Create a device with the given station address and the transceiver at MIF address 0.
    pub fn new(mac_addr: [u8; 6]) -> Self {
        Self::build(SunGemConfig {
            mac_addr,
            ..SunGemConfig::default()
        })
    }

    pub fn with_config(config: SunGemConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: SunGemConfig) -> Self {
        let mut dev = Self {
            regs: RegisterFile::new(),
            mac_addr: config.mac_addr,
            phy: PhyStub::new(config.phy_addr),
            tx_mask: 0,
            rx_mask: 0,
            tx: TxAccumulator::default(),
            irq_level: false,
            tx_out: VecDeque::new(),
            rx_pending: VecDeque::new(),
        };
        dev.reset_all(true);
        dev
    }

    pub fn mac_addr(&self) -> [u8; 6] {
        self.mac_addr
    }

    pub fn irq_level(&self) -> bool {
        self.irq_level
    }

    pub fn link_up(&self) -> bool {
        self.phy.link_up()
    }

    /// Reflect the backend's carrier state in the transceiver status register.
    pub fn set_link_up(&mut self, up: bool) {
        if up != self.phy.link_up() {
            debug!(up, "link state changed");
        }
        self.phy.set_link_up(up);
    }

    /// Direct register access, bypassing bus side effects.
    pub fn regs(&self) -> &RegisterFile {
        &self.regs
    }

    /// Bus-level device reset: every register returns to its power-on value, the station
    /// address is reloaded and host-side queues are emptied.
    pub fn reset(&mut self) {
        self.regs = RegisterFile::new();
        self.tx_out.clear();
        self.rx_pending.clear();
        self.reset_all(true);
    }

    pub fn mmio_read_u32(&mut self, offset: u64) -> u32 {
        let reg = match Reg::decode(offset) {
            Ok(reg) => reg,
            Err(err) => {
                debug!(%err, "read from unknown register");
                return u32::MAX;
            }
        };

        let val = self.regs[reg];
        trace!(offset, bank = reg.bank().name, val, "mmio read");

        match reg {
            GREG_STAT => {
                self.regs.clear_bits(GREG_STAT, GlobalStatus::LATCH.bits());
                self.eval_irq();
                self.compose_status(val)
            }
            GREG_STAT2 => self.compose_status(self.regs[GREG_STAT]),
            MAC_TXSTAT => {
                self.regs[MAC_TXSTAT] = 0;
                self.update_status(GlobalStatus::TXMAC, false);
                val
            }
            MAC_RXSTAT => {
                self.regs[MAC_RXSTAT] = 0;
                self.update_status(GlobalStatus::RXMAC, false);
                val
            }
            MAC_CSTAT => {
                self.regs[MAC_CSTAT] &= MAC_CSTAT_PTR;
                self.update_status(GlobalStatus::MAC, false);
                val
            }
            _ => val,
        }
    }

    pub fn mmio_write_u32(&mut self, offset: u64, value: u32, mem: &mut dyn MemoryBus) {
        let reg = match Reg::decode(offset) {
            Ok(reg) => reg,
            Err(err) => {
                debug!(%err, value, "write to unknown register dropped");
                return;
            }
        };
        trace!(offset, bank = reg.bank().name, value, "mmio write");

        if reg == GREG_IACK {
            let ack = value & GlobalStatus::LATCH.bits();
            self.regs.clear_bits(GREG_STAT, ack);
            self.eval_irq();
            return;
        }

        let Some(value) = write_filter(reg, value) else {
            debug!(offset, value, "write to read-only register dropped");
            return;
        };
        self.regs[reg] = value;

        match reg {
            GREG_IMASK => self.eval_irq(),
            GREG_SWRST => self.software_reset(value),
            TXDMA_KICK => self.tx_kick(mem),
            TXDMA_CFG => self.update_masks(),
            RXDMA_KICK => {
                trace!(kick = value, done = self.regs[RXDMA_DONE], "rx kick");
                self.flush_rx_pending(mem);
            }
            RXDMA_CFG | MAC_RXCFG => {
                self.update_masks();
                if self.rx_enabled() {
                    self.flush_rx_pending(mem);
                }
            }
            MAC_TXMASK | MAC_RXMASK | MAC_MCMASK => self.eval_cascade_irq(),
            MIF_FRAME => {
                let result = self.phy.frame_op(value);
                self.regs[MIF_FRAME] = result;
            }
            _ => {}
        }
    }

    /// Host-visible status: the stored causes with the TX completion index in the top bits.
    fn compose_status(&self, stat: u32) -> u32 {
        (stat & !GREG_STAT_TXNR) | (self.regs[TXDMA_TXDONE] << GREG_STAT_TXNR_SHIFT)
    }

    pub(crate) fn update_masks(&mut self) {
        self.tx_mask = ring_mask(self.regs[TXDMA_CFG]);
        self.rx_mask = ring_mask(self.regs[RXDMA_CFG]);
        trace!(tx_mask = self.tx_mask, rx_mask = self.rx_mask, "ring masks");
    }

    fn software_reset(&mut self, value: u32) {
        match value & (GREG_SWRST_TXRST | GREG_SWRST_RXRST) {
            GREG_SWRST_RXRST => {
                self.reset_rx();
                self.regs.clear_bits(GREG_SWRST, GREG_SWRST_RXRST);
            }
            GREG_SWRST_TXRST => {
                self.reset_tx();
                self.regs.clear_bits(GREG_SWRST, GREG_SWRST_TXRST);
            }
            0 => {}
            _ => self.reset_all(false),
        }
    }

    pub(crate) fn reset_rx(&mut self) {
        trace!("rx reset");
        self.regs[RXDMA_FSZ] = RXDMA_FSZ_RESET;
        self.regs[RXDMA_DONE] = 0;
        self.regs[RXDMA_KICK] = 0;
        self.regs[RXDMA_CFG] = RXDMA_CFG_RESET;
        self.regs[RXDMA_PTHRESH] = RXDMA_PTHRESH_RESET;
        self.regs[RXDMA_BLANK] = 0;
        self.update_masks();
    }

    pub(crate) fn reset_tx(&mut self) {
        trace!("tx reset");
        self.regs[TXDMA_FSZ] = TXDMA_FSZ_RESET;
        self.regs[TXDMA_TXDONE] = 0;
        self.regs[TXDMA_KICK] = 0;
        self.regs[TXDMA_CFG] = TXDMA_CFG_RESET;
        self.update_masks();
        self.tx.reset();
    }

    pub(crate) fn reset_all(&mut self, bus_reset: bool) {
        trace!(bus_reset, "full reset");
        self.reset_rx();
        self.reset_tx();

        self.regs[GREG_IMASK] = GREG_IMASK_RESET;
        self.regs[GREG_STAT] = 0;
        if bus_reset {
            let mac = self.mac_addr;
            self.regs[GREG_SWRST] = 0;
            self.regs[MAC_ADDR0] = u32::from(u16::from_be_bytes([mac[4], mac[5]]));
            self.regs[MAC_ADDR1] = u32::from(u16::from_be_bytes([mac[2], mac[3]]));
            self.regs[MAC_ADDR2] = u32::from(u16::from_be_bytes([mac[0], mac[1]]));
        } else {
            self.regs[GREG_SWRST] &= GREG_SWRST_RSTOUT;
        }
        self.regs[MIF_CFG] = MIF_CFG_MDI0;
        self.eval_irq();
    }

    /// Next frame the guest transmitted, oldest first.
    pub fn pop_tx_frame(&mut self) -> Option<Vec<u8>> {
        self.tx_out.pop_front()
    }

    pub fn pending_tx_frames(&self) -> usize {
        self.tx_out.len()
    }

    pub(crate) fn push_tx_frame(&mut self, frame: Vec<u8>) {
        if self.tx_out.len() >= MAX_HOST_QUEUE {
            debug!(len = frame.len(), "tx queue full, dropping oldest frame");
            self.tx_out.pop_front();
        }
        self.tx_out.push_back(frame);
    }

    /// Queue a frame from the host side. It is delivered to the guest by [`Self::poll`] or as soon
    /// as the guest posts buffers.
    pub fn enqueue_rx_frame(&mut self, frame: Vec<u8>) {
        if self.rx_pending.len() >= MAX_HOST_QUEUE {
            debug!(len = frame.len(), "rx queue full, dropping oldest frame");
            self.rx_pending.pop_front();
        }
        self.rx_pending.push_back(frame);
    }

    pub fn pending_rx_frames(&self) -> usize {
        self.rx_pending.len()
    }

    /// Deliver queued host frames while the guest has buffers posted.
    pub fn poll(&mut self, mem: &mut dyn MemoryBus) {
        self.flush_rx_pending(mem);
    }

    pub(crate) fn flush_rx_pending(&mut self, mem: &mut dyn MemoryBus) {
        while self.can_receive() {
            let Some(frame) = self.rx_pending.pop_front() else {
                break;
            };
            if self.receive(mem, &frame) == 0 {
                self.rx_pending.push_front(frame);
                break;
            }
        }
    }
}
