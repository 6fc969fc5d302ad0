//! Stream layer: backend resolution, the access adapter and filter chains.
//!
//! ```rust,no_run
//! use media_access::stream::{Opener, Registry};
//!
//! # fn example() -> media_access::Result<()> {
//! let opener = Opener::new(Registry::with_builtin());
//! let mut stream = opener.open("file:///tmp/movie.ts")?;
//!
//! let mut buf = [0u8; 4096];
//! let n = stream.read(&mut buf)?;
//! println!("read {n} bytes from {}", stream.url());
//! # Ok(())
//! # }
//! ```

pub mod access;
pub mod adapter;
pub mod backend;
pub mod backends;
pub mod filter;
pub mod provider;
pub mod registry;

use std::io;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::config::AccessConfig;
use crate::control::{Control, ControlReply};
use crate::error::{AccessError, Result};
use crate::stats::Session;

pub use access::AccessHandle;
pub use adapter::{AccessStream, DirStrategy, ReadStrategy};
pub use backend::{Access, Capabilities, InputItem, ItemKind, ReadCapability, ReadOutcome};
pub use filter::{FilterChain, FilterRegistry, StreamFilter};
pub use provider::{AccessContext, AccessModule, OpenError};
pub use registry::{Registry, Resolved};

/// Uniform byte / directory stream consumed by demuxers.
///
/// Calls on one stream are sequential: a stream has a single logical reader.
pub trait Stream: Send {
    /// Locator this stream was opened for.
    fn url(&self) -> &str;

    /// Read up to `buf.len()` bytes. `Ok(0)` is end of stream.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize>;

    /// Discard up to `len` bytes. Returns how many were skipped; `Ok(0)` is
    /// end of stream.
    fn skip(&mut self, len: usize) -> Result<usize>;

    /// Reposition to absolute byte `offset`.
    fn seek(&mut self, offset: u64) -> Result<()>;

    fn control(&mut self, query: Control) -> Result<ControlReply>;

    /// Next directory entry, `None` when there is none.
    fn read_dir(&mut self) -> Option<InputItem>;
}

impl io::Read for dyn Stream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Stream::read(self, buf).map_err(|err| match err {
            AccessError::Io(err) => err,
            err => io::Error::other(err),
        })
    }
}

/// Opens streams: resolves the backend, installs the adapter and attaches
/// the filter recipe that matches its read strategy.
pub struct Opener {
    registry: Registry,
    filters: Box<dyn FilterChain>,
    config: AccessConfig,
    session: Option<Arc<Session>>,
    cancel: CancellationToken,
}

impl Opener {
    #[must_use]
    pub fn new(registry: Registry) -> Self {
        Self {
            registry,
            filters: Box::new(FilterRegistry::default()),
            config: AccessConfig::default(),
            session: None,
            cancel: CancellationToken::new(),
        }
    }

    #[must_use]
    pub fn with_filters(mut self, filters: Box<dyn FilterChain>) -> Self {
        self.filters = filters;
        self
    }

    #[must_use]
    pub fn with_config(mut self, config: AccessConfig) -> Self {
        self.config = config;
        self
    }

    /// Attach a playback session; its statistics receive every read.
    #[must_use]
    pub fn with_session(mut self, session: Arc<Session>) -> Self {
        self.session = Some(session);
        self
    }

    /// Use `cancel` as the interrupt for every stream opened from now on.
    #[must_use]
    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    #[must_use]
    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }

    #[must_use]
    pub fn config(&self) -> &AccessConfig {
        &self.config
    }

    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Open a bare access for `mrl`, without a stream on top.
    ///
    /// # Errors
    ///
    /// See [`AccessHandle::open`].
    pub fn open_access(&self, mrl: &str) -> Result<AccessHandle> {
        AccessHandle::open(&self.registry, &self.config, mrl, self.session.clone())
    }

    /// Open an undecorated adapter for `mrl`.
    ///
    /// # Errors
    ///
    /// See [`AccessHandle::open`].
    pub fn open_raw(&self, mrl: &str) -> Result<AccessStream> {
        let access = self.open_access(mrl)?;
        Ok(AccessStream::new(mrl, access, self.cancel.clone()))
    }

    /// Open a stream for `mrl`, decorated per its read strategy.
    ///
    /// # Errors
    ///
    /// See [`AccessHandle::open`].
    pub fn open(&self, mrl: &str) -> Result<Box<dyn Stream>> {
        let stream = self.open_raw(mrl)?;

        match self.config.recipe_for(stream.strategy()) {
            Some(recipe) => {
                debug!("attaching filter recipe '{recipe}' to {mrl}");
                Ok(self.filters.wrap(Box::new(stream), recipe))
            }
            None => Ok(Box::new(stream)),
        }
    }
}
