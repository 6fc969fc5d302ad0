//! Local directory listing
//!
//! Directory-only backend: no data reads, entries come out sorted by name,
//! hidden (dot) entries are left out.

use std::vec;

use tracing::debug;
use url::Url;

use crate::control::{directory_control, Control, ControlReply};
use crate::error::Result;
use crate::stream::backend::{Access, Capabilities, InputItem, ItemKind};
use crate::stream::provider::{AccessContext, AccessModule, OpenError};

/// Module listing local directories.
pub struct DirectoryModule;

impl AccessModule for DirectoryModule {
    fn name(&self) -> &'static str {
        "directory"
    }

    fn shortcuts(&self) -> &[&'static str] {
        &["file", "directory", "dir"]
    }

    fn priority(&self) -> i32 {
        40
    }

    fn open(&self, ctx: &AccessContext<'_>) -> std::result::Result<Box<dyn Access>, OpenError> {
        let path = ctx.locator.path().ok_or(OpenError::Declined)?;
        // Missing paths are reported by the file module.
        if !std::fs::metadata(path).is_ok_and(|meta| meta.is_dir()) {
            return Err(OpenError::Declined);
        }

        let base = Url::from_directory_path(path)
            .map_err(|()| OpenError::Failed(format!("not an absolute path: {}", path.display())))?;

        let mut entries = Vec::new();
        for entry in std::fs::read_dir(path)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') {
                continue;
            }
            let kind = match entry.file_type() {
                Ok(t) if t.is_dir() => ItemKind::Directory,
                Ok(t) if t.is_file() => ItemKind::File,
                _ => ItemKind::Unknown,
            };
            entries.push(InputItem {
                uri: format!("{base}{}", urlencoding::encode(&name)),
                name,
                kind,
            });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));

        debug!("listing {} entries in {}", entries.len(), path.display());

        Ok(Box::new(DirectoryAccess {
            entries: entries.into_iter(),
        }))
    }
}

struct DirectoryAccess {
    entries: vec::IntoIter<InputItem>,
}

impl Access for DirectoryAccess {
    fn capabilities(&self) -> Capabilities {
        Capabilities::directory()
    }

    fn eof(&self) -> bool {
        self.entries.len() == 0
    }

    fn read_dir(&mut self) -> Option<InputItem> {
        self.entries.next()
    }

    fn control(&mut self, query: Control) -> Result<ControlReply> {
        directory_control(&query)
    }
}
