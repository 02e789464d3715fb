//! In-memory backend that records transmitted frames and replays queued inbound frames.

use std::collections::VecDeque;

use crate::NetworkBackend;

/// Backend that keeps both directions in host memory.
///
/// Useful for host glue that forwards frames elsewhere in batches, and for tests that want to
/// inspect exactly what the guest put on the wire.
#[derive(Debug, Clone)]
pub struct FrameQueueBackend {
    transmitted: Vec<Vec<u8>>,
    inbound: VecDeque<Vec<u8>>,
    link_up: bool,
}

impl Default for FrameQueueBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameQueueBackend {
    pub fn new() -> Self {
        Self {
            transmitted: Vec::new(),
            inbound: VecDeque::new(),
            link_up: true,
        }
    }

    /// Queue a host → guest frame for the next [`NetworkBackend::poll_receive`].
    pub fn push_rx_frame(&mut self, frame: Vec<u8>) {
        self.inbound.push_back(frame);
    }

    /// Take every guest → host frame transmitted so far, oldest first.
    pub fn drain_tx_frames(&mut self) -> Vec<Vec<u8>> {
        std::mem::take(&mut self.transmitted)
    }

    pub fn pending_rx_frames(&self) -> usize {
        self.inbound.len()
    }

    pub fn set_link_up(&mut self, up: bool) {
        self.link_up = up;
    }
}

impl NetworkBackend for FrameQueueBackend {
    fn transmit(&mut self, frame: Vec<u8>) {
        self.transmitted.push(frame);
    }

    fn poll_receive(&mut self) -> Option<Vec<u8>> {
        self.inbound.pop_front()
    }

    fn link_up(&self) -> bool {
        self.link_up
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_flow_in_fifo_order() {
        let mut backend = FrameQueueBackend::new();
        backend.push_rx_frame(vec![1]);
        backend.push_rx_frame(vec![2]);
        assert_eq!(backend.pending_rx_frames(), 2);

        assert_eq!(backend.poll_receive(), Some(vec![1]));
        assert_eq!(backend.poll_receive(), Some(vec![2]));
        assert_eq!(backend.poll_receive(), None);

        backend.transmit(vec![3]);
        backend.transmit(vec![4]);
        assert_eq!(backend.drain_tx_frames(), vec![vec![3], vec![4]]);
        assert!(backend.drain_tx_frames().is_empty());
    }

    #[test]
    fn link_state_is_host_controlled() {
        let mut backend = FrameQueueBackend::default();
        assert!(backend.link_up());
        backend.set_link_up(false);
        assert!(!backend.link_up());
    }
}
