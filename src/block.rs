//! Data units produced by block-mode backends.

use bytes::{Buf, Bytes};

/// A block of media data with a read cursor.
///
/// Consuming bytes advances the cursor; the remaining bytes are what
/// [`Block::as_slice`] returns.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Block {
    data: Bytes,
}

impl Block {
    #[must_use]
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self { data: data.into() }
    }

    /// Remaining (unconsumed) length.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Move the cursor forward by `count` bytes (clamped to the remainder).
    pub fn consume(&mut self, count: usize) {
        self.data.advance(count.min(self.data.len()));
    }
}

impl From<Vec<u8>> for Block {
    fn from(data: Vec<u8>) -> Self {
        Self::new(data)
    }
}

impl From<&'static [u8]> for Block {
    fn from(data: &'static [u8]) -> Self {
        Self::new(Bytes::from_static(data))
    }
}

/// Single-slot holder for a partially consumed block.
///
/// Clearing goes through [`PendingBlock::clear`] from every path that
/// invalidates buffered data (seek, title/seekpoint change, teardown).
#[derive(Debug, Default)]
pub struct PendingBlock {
    slot: Option<Block>,
}

impl PendingBlock {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slot.is_none()
    }

    /// Remaining length of the held block, zero when empty.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.slot.as_ref().map_or(0, Block::len)
    }

    pub fn take(&mut self) -> Option<Block> {
        self.slot.take()
    }

    /// Keep `block` for the next read. Drained blocks are released instead.
    pub fn hold(&mut self, block: Block) {
        debug_assert!(self.slot.is_none(), "pending block overwritten");
        if !block.is_empty() {
            self.slot = Some(block);
        }
    }

    /// Release the held block, if any.
    pub fn clear(&mut self) {
        self.slot = None;
    }
}
