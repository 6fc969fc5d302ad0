//! Locator parsing: `scheme://location` split and best-effort local path.

use std::fmt;
use std::path::{Path, PathBuf};

use url::Url;

use crate::error::{AccessError, Result};

const DELIMITER: &str = "://";

/// A parsed media locator.
///
/// The scheme and location are views into the owned full locator string, so
/// one allocation backs all three.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator {
    url: String,
    scheme_end: usize,
    path: Option<PathBuf>,
}

impl Locator {
    /// Split `mrl` on its first `://`.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::MalformedLocator`] if the delimiter is absent.
    pub fn parse(mrl: &str) -> Result<Self> {
        let scheme_end = mrl
            .find(DELIMITER)
            .ok_or_else(|| AccessError::MalformedLocator(mrl.to_string()))?;
        let location = &mrl[scheme_end + DELIMITER.len()..];
        let path = local_path(location);

        Ok(Self {
            url: mrl.to_string(),
            scheme_end,
            path,
        })
    }

    /// Text before `://`.
    #[must_use]
    pub fn scheme(&self) -> &str {
        &self.url[..self.scheme_end]
    }

    /// The full locator as given.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Text after `://`.
    #[must_use]
    pub fn location(&self) -> &str {
        &self.url[self.scheme_end + DELIMITER.len()..]
    }

    /// Local filesystem path, when the location reads as one.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

/// Decode a location (scheme already stripped) to a file path.
///
/// Prepending `file://` avoids hard-coding which schemes carry paths: any
/// location that decodes as a local file URL yields one. Remote hosts and
/// unparsable locations yield `None`.
#[must_use]
pub fn local_path(location: &str) -> Option<PathBuf> {
    let url = Url::parse(&format!("file://{location}")).ok()?;
    url.to_file_path().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_scheme_and_location() {
        let loc = Locator::parse("http://example.com/video.ts").unwrap();
        assert_eq!(loc.scheme(), "http");
        assert_eq!(loc.location(), "example.com/video.ts");
        assert_eq!(loc.url(), "http://example.com/video.ts");
    }

    #[test]
    fn splits_on_first_delimiter_only() {
        let loc = Locator::parse("rtsp://host/redirect?to=http://other").unwrap();
        assert_eq!(loc.scheme(), "rtsp");
        assert_eq!(loc.location(), "host/redirect?to=http://other");
    }

    #[test]
    fn missing_delimiter_is_malformed() {
        let err = Locator::parse("/tmp/movie.mkv").unwrap_err();
        assert!(matches!(err, AccessError::MalformedLocator(ref s) if s == "/tmp/movie.mkv"));
    }

    #[test]
    fn empty_scheme_is_accepted() {
        let loc = Locator::parse("://nothing").unwrap();
        assert_eq!(loc.scheme(), "");
        assert_eq!(loc.location(), "nothing");
    }

    #[cfg(unix)]
    #[test]
    fn decodes_percent_escapes_into_path() {
        let loc = Locator::parse("file:///tmp/a%20b.mkv").unwrap();
        assert_eq!(loc.path(), Some(Path::new("/tmp/a b.mkv")));
    }

    #[cfg(unix)]
    #[test]
    fn localhost_host_maps_to_path() {
        let loc = Locator::parse("file://localhost/srv/media.ts").unwrap();
        assert_eq!(loc.path(), Some(Path::new("/srv/media.ts")));
    }

    #[test]
    fn remote_host_has_no_path() {
        let loc = Locator::parse("http://example.com/video.ts").unwrap();
        assert_eq!(loc.path(), None);
    }

    #[test]
    fn display_is_full_locator() {
        let loc = Locator::parse("dvd:///dev/sr0").unwrap();
        assert_eq!(loc.to_string(), "dvd:///dev/sr0");
    }
}
