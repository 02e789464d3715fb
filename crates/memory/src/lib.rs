//! Guest physical memory access for device DMA.
//!
//! Device models only see guest RAM through [`MemoryBus`]. Accesses are infallible; backends
//! decide what happens outside populated memory (see [`DenseMemory`] for open-bus behaviour).
#![forbid(unsafe_code)]

mod bus;
mod dense;

pub use bus::MemoryBus;
pub use dense::DenseMemory;

#[cfg(test)]
mod tests;
