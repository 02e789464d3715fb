use tracing::debug;

use crate::MemoryBus;

/// Value returned for bytes that do not decode to any RAM.
const OPEN_BUS: u8 = 0xFF;

/// Dense (contiguous) guest RAM starting at physical address 0.
///
/// Accesses that run past the end of RAM behave like an unclaimed bus cycle: reads float high
/// (`0xFF`) and writes are discarded. Partially covered accesses are split so the covered prefix
/// still reaches RAM.
#[derive(Debug, Clone)]
pub struct DenseMemory {
    data: Box<[u8]>,
}

impl DenseMemory {
    pub fn new(size: usize) -> Self {
        Self {
            data: vec![0u8; size].into_boxed_slice(),
        }
    }

    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Copy `len` bytes starting at `paddr` out of RAM (open-bus bytes past the end).
    pub fn read_vec(&self, paddr: u64, len: usize) -> Vec<u8> {
        let mut out = vec![OPEN_BUS; len];
        let covered = self.covered(paddr, len);
        if covered > 0 {
            let start = paddr as usize;
            out[..covered].copy_from_slice(&self.data[start..start + covered]);
        }
        out
    }

    /// Number of bytes of `[paddr, paddr + len)` that are backed by RAM, counted from `paddr`.
    fn covered(&self, paddr: u64, len: usize) -> usize {
        let size = self.size();
        if paddr >= size {
            return 0;
        }
        let available = size - paddr;
        usize::try_from(available).map_or(len, |available| available.min(len))
    }
}

impl MemoryBus for DenseMemory {
    fn read_physical(&mut self, paddr: u64, buf: &mut [u8]) {
        let covered = self.covered(paddr, buf.len());
        if covered < buf.len() {
            debug!(
                paddr,
                len = buf.len(),
                size = self.size(),
                "DMA read past end of guest RAM"
            );
            buf[covered..].fill(OPEN_BUS);
        }
        if covered > 0 {
            let start = paddr as usize;
            buf[..covered].copy_from_slice(&self.data[start..start + covered]);
        }
    }

    fn write_physical(&mut self, paddr: u64, buf: &[u8]) {
        let covered = self.covered(paddr, buf.len());
        if covered < buf.len() {
            debug!(
                paddr,
                len = buf.len(),
                size = self.size(),
                "DMA write past end of guest RAM dropped"
            );
        }
        if covered > 0 {
            let start = paddr as usize;
            self.data[start..start + covered].copy_from_slice(&buf[..covered]);
        }
    }
}
