//! Capability-based backend resolution.
//!
//! The [`Registry`] holds the known [`AccessModule`]s and resolves a scheme
//! to an opened [`Access`]: candidates serving the scheme are tried in
//! descending priority (registration order breaks ties) and the first one
//! that opens wins. Resolution is strict: modules that do not list the
//! scheme are never tried.

use tracing::{debug, warn};

use crate::error::{AccessError, Result};

use super::backend::Access;
use super::backends::{DirectoryModule, FileModule};
use super::provider::{AccessContext, AccessModule, OpenError};

/// A module match: the module's name and its opened backend.
pub struct Resolved {
    pub module: &'static str,
    pub access: Box<dyn Access>,
}

/// Registry of access modules.
#[derive(Default)]
pub struct Registry {
    modules: Vec<Box<dyn AccessModule>>,
}

impl Registry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the bundled `file` and `directory` modules.
    #[must_use]
    pub fn with_builtin() -> Self {
        Self::new()
            .with_module(Box::new(DirectoryModule))
            .with_module(Box::new(FileModule))
    }

    #[must_use]
    pub fn with_module(mut self, module: Box<dyn AccessModule>) -> Self {
        self.register(module);
        self
    }

    pub fn register(&mut self, module: Box<dyn AccessModule>) {
        debug!("Registered access module: {}", module.name());
        self.modules.push(module);
    }

    /// Registered modules in registration order.
    pub fn modules(&self) -> impl Iterator<Item = &dyn AccessModule> {
        self.modules.iter().map(|module| &**module)
    }

    /// Candidate modules for `ctx`, best first.
    fn candidates<'r>(&'r self, ctx: &AccessContext<'_>) -> Vec<(i32, &'r dyn AccessModule)> {
        let scheme = ctx.locator.scheme();
        let mut candidates: Vec<_> = self
            .modules()
            .filter(|module| module.matches(scheme))
            .filter(|module| !ctx.config.is_disabled(module.name()))
            .map(|module| {
                let priority = ctx
                    .config
                    .modules
                    .priority
                    .get(module.name())
                    .copied()
                    .unwrap_or_else(|| module.priority());
                (priority, module)
            })
            .collect();
        // Stable: equal priorities keep registration order.
        candidates.sort_by(|a, b| b.0.cmp(&a.0));
        candidates
    }

    /// Open a backend for `ctx.locator`.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::BackendNotFound`] if no module serves the
    /// scheme or every candidate declined or failed.
    pub fn resolve(&self, ctx: &AccessContext<'_>) -> Result<Resolved> {
        let scheme = ctx.locator.scheme();

        for (priority, module) in self.candidates(ctx) {
            debug!(
                "trying access module '{}' (priority {priority}) for '{scheme}'",
                module.name()
            );
            match module.open(ctx) {
                Ok(access) => {
                    debug!("using access module '{}'", module.name());
                    return Ok(Resolved {
                        module: module.name(),
                        access,
                    });
                }
                Err(OpenError::Declined) => {
                    debug!("access module '{}' declined", module.name());
                }
                Err(OpenError::Failed(reason)) => {
                    warn!(
                        "access module '{}' failed for {}: {}",
                        module.name(),
                        ctx.locator,
                        reason
                    );
                }
            }
        }

        Err(AccessError::BackendNotFound {
            scheme: scheme.to_string(),
        })
    }
}
