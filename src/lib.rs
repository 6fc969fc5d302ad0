//! `media-access` - Access backends behind one stream interface
//!
//! # Features
//!
//! - **Backend resolution**: scheme-based lookup over registered access modules, by priority
//! - **Dual-mode reads**: block-producing and byte-producing backends behind one `read`
//! - **Control forwarding**: one command vocabulary shared by streams and backends
//! - **Filter recipes**: block-cache or prefetch decoration chosen per backend
//!
//! # Example
//!
//! ```rust,no_run
//! use media_access::{Opener, Registry};
//! use media_access::control::{Control, ControlTag};
//!
//! fn main() -> media_access::Result<()> {
//!     let opener = Opener::new(Registry::with_builtin());
//!     let mut stream = opener.open("file:///var/media/clip.ts")?;
//!     let seekable = stream.control(Control::CanSeek)?.into_flag(ControlTag::CanSeek)?;
//!     println!("{} seekable: {seekable}", stream.url());
//!     Ok(())
//! }
//! ```

pub mod block;
pub mod config;
pub mod control;
pub mod error;
pub mod locator;
pub mod stats;
pub mod stream;

pub use block::Block;
pub use config::AccessConfig;
pub use control::{Control, ControlReply, ControlTag};
pub use error::{AccessError, Result};
pub use locator::Locator;
pub use stats::{InputCounters, Session, StatsSink};
pub use stream::{AccessHandle, AccessStream, Opener, Registry, Stream};

/// Version of media-access
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
