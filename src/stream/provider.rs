//! Access module trait.
//!
//! An [`AccessModule`] is a registered backend factory. It advertises the
//! schemes it serves (its shortcuts) and a priority; the
//! [`Registry`](super::registry::Registry) tries matching modules in
//! priority order until one opens.

use crate::config::AccessConfig;
use crate::locator::Locator;

use super::backend::Access;

/// What a module sees when asked to open a locator.
#[derive(Debug, Clone, Copy)]
pub struct AccessContext<'a> {
    pub locator: &'a Locator,
    pub config: &'a AccessConfig,
}

/// Why a module did not open.
#[derive(Debug, thiserror::Error)]
pub enum OpenError {
    /// Not this module's kind of target; try the next candidate quietly.
    #[error("declined")]
    Declined,
    /// The module applied but failed; the next candidate is still tried.
    #[error("{0}")]
    Failed(String),
}

impl From<std::io::Error> for OpenError {
    fn from(err: std::io::Error) -> Self {
        Self::Failed(err.to_string())
    }
}

/// Factory for one kind of access backend.
pub trait AccessModule: Send + Sync {
    /// Short lowercase module name (e.g., `"file"`).
    fn name(&self) -> &'static str;

    /// Schemes this module serves.
    fn shortcuts(&self) -> &[&'static str];

    /// Higher scores are tried first.
    fn priority(&self) -> i32;

    /// Open a backend for `ctx.locator`.
    fn open(&self, ctx: &AccessContext<'_>) -> Result<Box<dyn Access>, OpenError>;

    /// Returns `true` if this module serves `scheme`.
    fn matches(&self, scheme: &str) -> bool {
        self.shortcuts()
            .iter()
            .any(|shortcut| shortcut.eq_ignore_ascii_case(scheme))
    }
}
