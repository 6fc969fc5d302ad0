//! Error type shared by the access and stream layers.

use thiserror::Error;

use crate::control::ControlTag;

/// Access / stream errors
#[derive(Error, Debug)]
pub enum AccessError {
    /// The locator has no `scheme://` delimiter. Nothing was allocated.
    #[error("malformed locator (missing \"://\"): {0}")]
    MalformedLocator(String),

    /// No registered module serves this scheme, or every candidate declined.
    #[error("no access module for scheme '{scheme}'")]
    BackendNotFound { scheme: String },

    /// A module activated but does not answer control queries.
    #[error("access module '{module}' has no control capability")]
    BackendInvariant { module: String },

    /// The read was interrupted by a cancellation request.
    #[error("operation cancelled")]
    Cancelled,

    /// The backend exposes neither byte nor block reads.
    #[error("access has no read capability")]
    NoRead,

    /// The backend cannot seek.
    #[error("access is not seekable")]
    NotSeekable,

    /// The backend (or the stream) declined a control command.
    #[error("unsupported control command: {0:?}")]
    Unsupported(ControlTag),

    /// A control command got a reply of the wrong shape.
    #[error("unexpected reply to {0:?}")]
    UnexpectedReply(ControlTag),

    #[error("backend error: {0}")]
    Backend(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AccessError>;
