//! Access backend trait.
//!
//! An [`Access`] is one opened backend instance for one locator. It declares
//! its [`Capabilities`] once; the stream adapter picks its read strategy from
//! them at construction and never re-probes. Capability methods a backend
//! does not declare are never called, and their default bodies report the
//! capability as missing.

use crate::block::Block;
use crate::control::{Control, ControlReply};
use crate::error::{AccessError, Result};

/// How a backend produces data. At most one read style per backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadCapability {
    /// Discrete blocks via [`Access::block`].
    Block,
    /// Caller-buffer fills via [`Access::read`].
    Byte,
    /// No data reads (directory listings, pure control sources).
    None,
}

/// Capability set declared by a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub read: ReadCapability,
    /// [`Access::read_dir`] is implemented.
    pub directory: bool,
    /// [`Access::seek`] is implemented.
    pub seek: bool,
    /// [`Access::control`] is implemented. Required.
    pub control: bool,
}

impl Capabilities {
    /// Byte reads, seekable.
    #[must_use]
    pub const fn byte_stream() -> Self {
        Self {
            read: ReadCapability::Byte,
            directory: false,
            seek: true,
            control: true,
        }
    }

    /// Block reads, not seekable.
    #[must_use]
    pub const fn block_stream() -> Self {
        Self {
            read: ReadCapability::Block,
            directory: false,
            seek: false,
            control: true,
        }
    }

    /// Directory listing only.
    #[must_use]
    pub const fn directory() -> Self {
        Self {
            read: ReadCapability::None,
            directory: true,
            seek: false,
            control: true,
        }
    }

    #[must_use]
    pub const fn with_seek(mut self, seek: bool) -> Self {
        self.seek = seek;
        self
    }
}

/// Result of one byte-mode read attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadOutcome {
    /// `n > 0` bytes were written to the buffer.
    Data(usize),
    /// End of stream.
    Eof,
    /// Transient condition (no data yet, interrupted syscall); try again.
    Retry,
}

/// Kind of a directory entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    File,
    Directory,
    Unknown,
}

/// One entry produced by a directory backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputItem {
    /// Locator of the entry, openable on its own.
    pub uri: String,
    /// Display name.
    pub name: String,
    pub kind: ItemKind,
}

/// An opened access backend.
pub trait Access: Send {
    /// Capabilities of this instance. Read once, right after opening.
    fn capabilities(&self) -> Capabilities;

    /// Whether the backend has reached end of stream.
    fn eof(&self) -> bool;

    /// Fill `buf` with up to `buf.len()` bytes.
    fn read(&mut self, buf: &mut [u8]) -> ReadOutcome {
        let _ = buf;
        ReadOutcome::Eof
    }

    /// Fetch the next block. `None` means no data this time; the caller
    /// checks [`Access::eof`] to tell end of stream from a transient gap.
    fn block(&mut self) -> Option<Block> {
        None
    }

    /// Next directory entry, `None` once exhausted.
    fn read_dir(&mut self) -> Option<InputItem> {
        None
    }

    /// Reposition to absolute byte `offset`.
    fn seek(&mut self, offset: u64) -> Result<()> {
        let _ = offset;
        Err(AccessError::NotSeekable)
    }

    /// Answer a control command.
    fn control(&mut self, query: Control) -> Result<ControlReply> {
        Err(AccessError::Unsupported(query.tag()))
    }
}
