//! Access handle: a resolved backend bound to its locator.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, error};

use crate::block::Block;
use crate::config::AccessConfig;
use crate::control::{Control, ControlReply};
use crate::error::{AccessError, Result};
use crate::locator::Locator;
use crate::stats::Session;

use super::backend::{Access, Capabilities, InputItem, ReadOutcome};
use super::provider::AccessContext;
use super::registry::{Registry, Resolved};

/// An opened backend plus the locator it was opened for.
///
/// The backend is released before the locator strings: `backend` is the
/// first field and fields drop in declaration order.
pub struct AccessHandle {
    backend: Box<dyn Access>,
    module: &'static str,
    capabilities: Capabilities,
    locator: Locator,
    session: Option<Arc<Session>>,
}

impl AccessHandle {
    /// Parse `mrl`, resolve a backend for its scheme and bind it.
    ///
    /// # Errors
    ///
    /// - [`AccessError::MalformedLocator`] if `mrl` has no `://`; the
    ///   registry is not consulted.
    /// - [`AccessError::BackendNotFound`] if no module opens the scheme.
    /// - [`AccessError::BackendInvariant`] if the opened backend does not
    ///   declare a control capability.
    pub fn open(
        registry: &Registry,
        config: &AccessConfig,
        mrl: &str,
        session: Option<Arc<Session>>,
    ) -> Result<Self> {
        let locator = Locator::parse(mrl)?;

        debug!(
            "creating access '{}' location='{}', path='{}'",
            locator.scheme(),
            locator.location(),
            locator
                .path()
                .map_or_else(|| "(null)".into(), Path::to_string_lossy)
        );

        let Resolved { module, access } = registry.resolve(&AccessContext {
            locator: &locator,
            config,
        })?;

        let capabilities = access.capabilities();
        if !capabilities.control {
            error!("assertion failed: access module '{module}' opened without a control capability");
            return Err(AccessError::BackendInvariant {
                module: module.to_string(),
            });
        }

        Ok(Self {
            backend: access,
            module,
            capabilities,
            locator,
            session,
        })
    }

    /// Name of the module that opened this access.
    #[must_use]
    pub fn module(&self) -> &'static str {
        self.module
    }

    /// Capabilities declared by the backend at open time.
    #[must_use]
    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    #[must_use]
    pub fn locator(&self) -> &Locator {
        &self.locator
    }

    #[must_use]
    pub fn scheme(&self) -> &str {
        self.locator.scheme()
    }

    #[must_use]
    pub fn location(&self) -> &str {
        self.locator.location()
    }

    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.locator.path()
    }

    /// Parent playback session, if any.
    #[must_use]
    pub fn session(&self) -> Option<&Arc<Session>> {
        self.session.as_ref()
    }

    #[must_use]
    pub fn eof(&self) -> bool {
        self.backend.eof()
    }

    pub fn read(&mut self, buf: &mut [u8]) -> ReadOutcome {
        self.backend.read(buf)
    }

    pub fn block(&mut self) -> Option<Block> {
        self.backend.block()
    }

    pub fn read_dir(&mut self) -> Option<InputItem> {
        self.backend.read_dir()
    }

    /// Seek the backend.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::NotSeekable`] without calling the backend when
    /// it declared no seek capability; otherwise the backend's own result.
    pub fn seek(&mut self, offset: u64) -> Result<()> {
        if !self.capabilities.seek {
            return Err(AccessError::NotSeekable);
        }
        self.backend.seek(offset)
    }

    /// Forward a control command to the backend.
    ///
    /// # Errors
    ///
    /// Passes the backend's refusal through unchanged.
    pub fn control(&mut self, query: Control) -> Result<ControlReply> {
        self.backend.control(query)
    }

    /// Release the backend, then the handle.
    pub fn close(self) {
        drop(self);
    }
}

impl Drop for AccessHandle {
    fn drop(&mut self) {
        debug!("closing access '{}' ({})", self.module, self.locator);
    }
}

impl std::fmt::Debug for AccessHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessHandle")
            .field("module", &self.module)
            .field("capabilities", &self.capabilities)
            .field("locator", &self.locator)
            .finish_non_exhaustive()
    }
}
