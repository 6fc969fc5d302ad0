//! Local file access
//!
//! Byte-mode backend over a regular file. Directories are declined so the
//! directory module can take them.

use std::fs::File;
use std::io::{ErrorKind, Read, Seek, SeekFrom};
use std::path::PathBuf;
use std::time::Duration;

use tracing::{debug, warn};

use crate::control::{Control, ControlReply};
use crate::error::{AccessError, Result};
use crate::stream::backend::{Access, Capabilities, ReadOutcome};
use crate::stream::provider::{AccessContext, AccessModule, OpenError};

/// Module serving `file://` locators that name regular files.
pub struct FileModule;

impl AccessModule for FileModule {
    fn name(&self) -> &'static str {
        "file"
    }

    fn shortcuts(&self) -> &[&'static str] {
        &["file"]
    }

    fn priority(&self) -> i32 {
        50
    }

    fn open(&self, ctx: &AccessContext<'_>) -> std::result::Result<Box<dyn Access>, OpenError> {
        let path = ctx.locator.path().ok_or(OpenError::Declined)?;
        if std::fs::metadata(path)?.is_dir() {
            return Err(OpenError::Declined);
        }

        let file = File::open(path)?;
        debug!("opened file {}", path.display());

        Ok(Box::new(FileAccess {
            file,
            path: path.to_path_buf(),
            eof: false,
            pts_delay: ctx.config.pts_delay(),
        }))
    }
}

struct FileAccess {
    file: File,
    path: PathBuf,
    eof: bool,
    pts_delay: Duration,
}

impl Access for FileAccess {
    fn capabilities(&self) -> Capabilities {
        Capabilities::byte_stream()
    }

    fn eof(&self) -> bool {
        self.eof
    }

    fn read(&mut self, buf: &mut [u8]) -> ReadOutcome {
        match self.file.read(buf) {
            Ok(0) if !buf.is_empty() => {
                self.eof = true;
                ReadOutcome::Eof
            }
            Ok(n) => ReadOutcome::Data(n),
            Err(err) if err.kind() == ErrorKind::Interrupted => ReadOutcome::Retry,
            Err(err) => {
                warn!("read error on {}: {err}", self.path.display());
                self.eof = true;
                ReadOutcome::Eof
            }
        }
    }

    fn seek(&mut self, offset: u64) -> Result<()> {
        self.file.seek(SeekFrom::Start(offset))?;
        self.eof = false;
        Ok(())
    }

    fn control(&mut self, query: Control) -> Result<ControlReply> {
        match query {
            Control::CanSeek
            | Control::CanFastSeek
            | Control::CanPause
            | Control::CanControlPace => Ok(ControlReply::Flag(true)),
            Control::GetSize => Ok(ControlReply::Size(self.file.metadata()?.len())),
            Control::IsDirectory => Ok(ControlReply::Directory(false, false)),
            Control::GetPtsDelay => Ok(ControlReply::PtsDelay(self.pts_delay)),
            Control::SetPauseState(_) => Ok(ControlReply::Done),
            other => Err(AccessError::Unsupported(other.tag())),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::config::AccessConfig;
    use crate::locator::Locator;

    fn open(locator: &Locator) -> std::result::Result<Box<dyn Access>, OpenError> {
        FileModule.open(&AccessContext {
            locator,
            config: &AccessConfig::default(),
        })
    }

    #[test]
    fn reads_until_eof_and_seeks_back() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(b"hello").unwrap();
        let url = url::Url::from_file_path(tmp.path()).unwrap();
        let locator = Locator::parse(url.as_str()).unwrap();

        let mut access = open(&locator).unwrap();
        let mut buf = [0u8; 8];
        assert_eq!(access.read(&mut buf), ReadOutcome::Data(5));
        assert_eq!(&buf[..5], b"hello");
        assert_eq!(access.read(&mut buf), ReadOutcome::Eof);
        assert!(access.eof());

        access.seek(1).unwrap();
        assert!(!access.eof());
        assert_eq!(access.read(&mut buf), ReadOutcome::Data(4));
        assert_eq!(&buf[..4], b"ello");
    }

    #[test]
    fn answers_size_and_seek_queries() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(&[0u8; 1234]).unwrap();
        let url = url::Url::from_file_path(tmp.path()).unwrap();
        let locator = Locator::parse(url.as_str()).unwrap();

        let mut access = open(&locator).unwrap();
        assert_eq!(access.control(Control::GetSize).unwrap(), ControlReply::Size(1234));
        assert_eq!(access.control(Control::CanSeek).unwrap(), ControlReply::Flag(true));
        assert_eq!(
            access.control(Control::GetPtsDelay).unwrap(),
            ControlReply::PtsDelay(Duration::from_millis(300))
        );
        assert!(matches!(
            access.control(Control::GetTitle),
            Err(AccessError::Unsupported(_))
        ));
    }

    #[test]
    fn declines_directories_and_remote_locators() {
        let dir = tempfile::tempdir().unwrap();
        let url = url::Url::from_directory_path(dir.path()).unwrap();
        let locator = Locator::parse(url.as_str()).unwrap();
        assert!(matches!(open(&locator), Err(OpenError::Declined)));

        let remote = Locator::parse("file://server.example/share/a.ts").unwrap();
        assert!(matches!(open(&remote), Err(OpenError::Declined)));
    }

    #[test]
    fn missing_file_fails() {
        let locator = Locator::parse("file:///nonexistent/media-access/a.ts").unwrap();
        assert!(matches!(open(&locator), Err(OpenError::Failed(_))));
    }
}
