//! Per-tick glue between an emulated Sun GEM controller and a host network backend.
//!
//! Each tick runs in a fixed order:
//! 1. Mirror the backend's carrier state into the transceiver.
//! 2. Let the NIC flush host frames it already holds (`poll(mem)`).
//! 3. Drain guest TX frames into the backend, bounded by a budget.
//! 4. Pull backend RX frames into the NIC queue, bounded by a budget.
//! 5. Poll again so frames received in step 4 land in guest buffers within the same tick.
#![forbid(unsafe_code)]

use aero_net_backend::NetworkBackend;
use aero_net_sungem::SunGemDevice;
use memory::MemoryBus;
use tracing::trace;

/// Default frame budget for each direction per [`SunGemPump::poll`] call.
pub const DEFAULT_MAX_FRAMES_PER_POLL: usize = 256;

/// Frames moved in each direction during one tick.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PumpCounts {
    /// Guest to host, handed to [`NetworkBackend::transmit`].
    pub tx_frames: usize,
    /// Host to guest, taken from [`NetworkBackend::poll_receive`].
    pub rx_frames: usize,
}

/// Budgets for a pump whose NIC and backend are owned elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SunGemTickPump {
    pub max_tx_frames_per_tick: usize,
    pub max_rx_frames_per_tick: usize,
}

impl SunGemTickPump {
    pub fn new(max_tx_frames_per_tick: usize, max_rx_frames_per_tick: usize) -> Self {
        Self {
            max_tx_frames_per_tick,
            max_rx_frames_per_tick,
        }
    }

    pub fn tick_with_counts<B: NetworkBackend + ?Sized>(
        &mut self,
        nic: &mut SunGemDevice,
        mem: &mut dyn MemoryBus,
        backend: &mut B,
    ) -> PumpCounts {
        tick_sungem_with_counts(
            nic,
            mem,
            backend,
            self.max_tx_frames_per_tick,
            self.max_rx_frames_per_tick,
        )
    }
}

/// Pump frames between a borrowed [`SunGemDevice`] and a borrowed [`NetworkBackend`].
pub fn tick_sungem<B: NetworkBackend + ?Sized>(
    nic: &mut SunGemDevice,
    mem: &mut dyn MemoryBus,
    backend: &mut B,
    max_tx_frames_per_tick: usize,
    max_rx_frames_per_tick: usize,
) {
    let _ = tick_sungem_with_counts(
        nic,
        mem,
        backend,
        max_tx_frames_per_tick,
        max_rx_frames_per_tick,
    );
}

/// Like [`tick_sungem`], but reports how many frames moved in each direction.
pub fn tick_sungem_with_counts<B: NetworkBackend + ?Sized>(
    nic: &mut SunGemDevice,
    mem: &mut dyn MemoryBus,
    backend: &mut B,
    max_tx_frames_per_tick: usize,
    max_rx_frames_per_tick: usize,
) -> PumpCounts {
    let mut counts = PumpCounts::default();

    nic.set_link_up(backend.link_up());
    nic.poll(mem);

    for _ in 0..max_tx_frames_per_tick {
        let Some(frame) = nic.pop_tx_frame() else {
            break;
        };
        backend.transmit(frame);
        counts.tx_frames += 1;
    }

    for _ in 0..max_rx_frames_per_tick {
        let Some(frame) = backend.poll_receive() else {
            break;
        };
        nic.enqueue_rx_frame(frame);
        counts.rx_frames += 1;
    }

    nic.poll(mem);

    if counts != PumpCounts::default() {
        trace!(
            tx = counts.tx_frames,
            rx = counts.rx_frames,
            "sungem pump tick"
        );
    }
    counts
}

/// Owns a [`SunGemDevice`] and the backend it talks to.
#[derive(Debug)]
pub struct SunGemPump<B> {
    nic: SunGemDevice,
    backend: B,

    max_tx_frames_per_poll: usize,
    max_rx_frames_per_poll: usize,
}

impl<B: NetworkBackend> SunGemPump<B> {
    pub fn new(nic: SunGemDevice, backend: B) -> Self {
        Self::with_budgets(
            nic,
            backend,
            DEFAULT_MAX_FRAMES_PER_POLL,
            DEFAULT_MAX_FRAMES_PER_POLL,
        )
    }

    pub fn with_budgets(
        nic: SunGemDevice,
        backend: B,
        max_tx_frames_per_poll: usize,
        max_rx_frames_per_poll: usize,
    ) -> Self {
        Self {
            nic,
            backend,
            max_tx_frames_per_poll,
            max_rx_frames_per_poll,
        }
    }

    pub fn poll(&mut self, mem: &mut dyn MemoryBus) {
        let _ = self.poll_with_counts(mem);
    }

    pub fn poll_with_counts(&mut self, mem: &mut dyn MemoryBus) -> PumpCounts {
        tick_sungem_with_counts(
            &mut self.nic,
            mem,
            &mut self.backend,
            self.max_tx_frames_per_poll,
            self.max_rx_frames_per_poll,
        )
    }

    pub fn nic(&self) -> &SunGemDevice {
        &self.nic
    }

    pub fn nic_mut(&mut self) -> &mut SunGemDevice {
        &mut self.nic
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn into_parts(self) -> (SunGemDevice, B) {
        (self.nic, self.backend)
    }

    /// Change the per-poll frame budgets. A budget of 0 stalls that direction.
    pub fn set_budgets(&mut self, max_tx_frames_per_poll: usize, max_rx_frames_per_poll: usize) {
        self.max_tx_frames_per_poll = max_tx_frames_per_poll;
        self.max_rx_frames_per_poll = max_rx_frames_per_poll;
    }
}
