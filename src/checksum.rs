//! Checksum digest
//!
//! The 8-bit XOR checksum used by printer firmwares to guard a line on the
//! wire. [`Digest`] is the incremental hash contract; [`Checksum`] is the
//! only implementation shipped.

use std::io;

/// Incremental hash with a reset/write/sum contract.
pub trait Digest {
    /// Back to the initial state.
    fn reset(&mut self);
    /// Fold `bytes` into the running state. Never fails.
    fn write(&mut self, bytes: &[u8]) -> usize;
    /// Current hash value, `size()` bytes long.
    fn sum(&self) -> Vec<u8>;
    fn size(&self) -> usize;
    fn block_size(&self) -> usize;
}

/// XOR of every byte written since the last reset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Checksum {
    running: u8,
}

impl Checksum {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> u8 {
        self.running
    }
}

impl Digest for Checksum {
    fn reset(&mut self) {
        self.running = 0;
    }

    fn write(&mut self, bytes: &[u8]) -> usize {
        self.running = bytes.iter().fold(self.running, |acc, b| acc ^ b);
        bytes.len()
    }

    fn sum(&self) -> Vec<u8> {
        vec![self.running]
    }

    fn size(&self) -> usize {
        1
    }

    fn block_size(&self) -> usize {
        1
    }
}

impl io::Write for Checksum {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(Digest::write(self, buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// One-shot checksum of `bytes`.
pub fn checksum(bytes: &[u8]) -> u8 {
    let mut digest = Checksum::new();
    Digest::write(&mut digest, bytes);
    digest.value()
}
