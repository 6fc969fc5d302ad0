//! Access-to-stream adapter.
//!
//! [`AccessStream`] puts one [`AccessHandle`] behind the [`Stream`]
//! contract. The read strategy is picked once from the backend's declared
//! capabilities:
//!
//! - **Block**: blocks are fetched one at a time and copied out; a partly
//!   consumed block is kept in a single pending slot for the next read.
//! - **Byte**: the backend fills the caller's buffer directly and owns any
//!   buffering; transient failures are retried in place.
//! - **None**: reads fail without touching the backend.
//!
//! Before every blocking backend call the adapter checks end of stream and
//! the cancellation token, so a cancelled read returns within one backend
//! call.

use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::block::PendingBlock;
use crate::control::{Control, ControlReply, ControlTag};
use crate::error::{AccessError, Result};

use super::access::AccessHandle;
use super::backend::{InputItem, ReadCapability, ReadOutcome};
use super::Stream;

/// Largest discard chunk handed to a byte-mode backend per skip call.
const SKIP_CHUNK: usize = 16 * 1024;

/// Read strategy installed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadStrategy {
    Block,
    Byte,
    None,
}

impl From<ReadCapability> for ReadStrategy {
    fn from(read: ReadCapability) -> Self {
        match read {
            ReadCapability::Block => Self::Block,
            ReadCapability::Byte => Self::Byte,
            ReadCapability::None => Self::None,
        }
    }
}

/// Directory strategy installed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirStrategy {
    /// Forward to the backend's directory reader.
    Present,
    /// Always report "no entry".
    Absent,
}

/// Destination of a read: a caller buffer, or `n` bytes to throw away.
enum Sink<'a> {
    Buffer(&'a mut [u8]),
    Discard(usize),
}

impl Sink<'_> {
    fn len(&self) -> usize {
        match self {
            Self::Buffer(buf) => buf.len(),
            Self::Discard(len) => *len,
        }
    }
}

/// Stream over an exclusively owned access.
pub struct AccessStream {
    // Declared before `access`: the pending block is released first.
    pending: PendingBlock,
    access: AccessHandle,
    url: String,
    read: ReadStrategy,
    dir: DirStrategy,
    cancel: CancellationToken,
    scratch: Vec<u8>,
}

impl AccessStream {
    /// Wrap `access`, installing read and directory strategies from its
    /// capabilities.
    #[must_use]
    pub fn new(url: &str, access: AccessHandle, cancel: CancellationToken) -> Self {
        let capabilities = access.capabilities();
        let read = ReadStrategy::from(capabilities.read);
        let dir = if capabilities.directory {
            DirStrategy::Present
        } else {
            DirStrategy::Absent
        };

        debug!(
            "stream over access '{}': read={read:?} dir={dir:?}",
            access.module()
        );

        Self {
            pending: PendingBlock::default(),
            access,
            url: url.to_string(),
            read,
            dir,
            cancel,
            scratch: Vec::new(),
        }
    }

    #[must_use]
    pub fn strategy(&self) -> ReadStrategy {
        self.read
    }

    #[must_use]
    pub fn dir_strategy(&self) -> DirStrategy {
        self.dir
    }

    #[must_use]
    pub fn access(&self) -> &AccessHandle {
        &self.access
    }

    /// Bytes held in the pending block.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.pending.remaining()
    }

    fn read_into(&mut self, sink: Sink<'_>) -> Result<usize> {
        match self.read {
            ReadStrategy::Block => self.read_block(sink),
            ReadStrategy::Byte => self.read_stream(sink),
            ReadStrategy::None => Err(AccessError::NoRead),
        }
    }

    fn read_block(&mut self, mut sink: Sink<'_>) -> Result<usize> {
        let mut block = match self.pending.take() {
            Some(block) => block,
            None => loop {
                if self.access.eof() {
                    return Ok(0);
                }
                if self.cancel.is_cancelled() {
                    return Err(AccessError::Cancelled);
                }
                match self.access.block() {
                    Some(block) if !block.is_empty() => break block,
                    Some(_) => trace!("skipping empty block"),
                    None => {}
                }
            },
        };

        let copy = block.len().min(sink.len());
        if let Sink::Buffer(buf) = &mut sink {
            buf[..copy].copy_from_slice(&block.as_slice()[..copy]);
        }
        block.consume(copy);
        self.pending.hold(block);
        if copy > 0 {
            self.record(copy);
        }

        Ok(copy)
    }

    fn read_stream(&mut self, mut sink: Sink<'_>) -> Result<usize> {
        loop {
            if self.access.eof() {
                return Ok(0);
            }
            if self.cancel.is_cancelled() {
                return Err(AccessError::Cancelled);
            }

            let outcome = match &mut sink {
                Sink::Buffer(buf) => self.access.read(buf),
                Sink::Discard(len) => {
                    let len = (*len).min(SKIP_CHUNK);
                    self.scratch.resize(len, 0);
                    self.access.read(&mut self.scratch[..len])
                }
            };

            match outcome {
                ReadOutcome::Retry => trace!("transient read failure, retrying"),
                ReadOutcome::Eof | ReadOutcome::Data(0) => return Ok(0),
                ReadOutcome::Data(n) => {
                    self.record(n);
                    return Ok(n);
                }
            }
        }
    }

    fn record(&self, bytes: usize) {
        if let Some(session) = self.access.session() {
            session.record_read(bytes);
        }
    }
}

impl Stream for AccessStream {
    fn url(&self) -> &str {
        &self.url
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        self.read_into(Sink::Buffer(buf))
    }

    fn skip(&mut self, len: usize) -> Result<usize> {
        self.read_into(Sink::Discard(len))
    }

    fn seek(&mut self, offset: u64) -> Result<()> {
        self.pending.clear();
        self.access.seek(offset)
    }

    fn control(&mut self, query: Control) -> Result<ControlReply> {
        match query {
            Control::SetTitle(_) | Control::SetSeekpoint(_) => {
                let reply = self.access.control(query)?;
                self.pending.clear();
                Ok(reply)
            }
            Control::GetPrivateBlock => {
                if self.read != ReadStrategy::Block {
                    return Err(AccessError::Unsupported(ControlTag::GetPrivateBlock));
                }
                let block = if self.access.eof() {
                    None
                } else {
                    self.access.block()
                };
                let eof = block.is_none() && self.access.eof();
                Ok(ControlReply::PrivateBlock { block, eof })
            }
            query => self.access.control(query),
        }
    }

    fn read_dir(&mut self) -> Option<InputItem> {
        match self.dir {
            DirStrategy::Present => self.access.read_dir(),
            DirStrategy::Absent => None,
        }
    }
}

impl Drop for AccessStream {
    fn drop(&mut self) {
        self.pending.clear();
        debug!("closing stream {}", self.url);
    }
}

impl std::fmt::Debug for AccessStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessStream")
            .field("url", &self.url)
            .field("read", &self.read)
            .field("dir", &self.dir)
            .field("pending", &self.pending.remaining())
            .field("access", &self.access)
            .finish_non_exhaustive()
    }
}
