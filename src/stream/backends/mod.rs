//! Bundled access modules.

pub mod directory;
pub mod file;

pub use directory::DirectoryModule;
pub use file::FileModule;
