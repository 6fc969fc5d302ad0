//! Control commands shared by the access and stream layers.
//!
//! Both layers speak the same vocabulary: a [`Control`] request carries its
//! arguments, a [`ControlReply`] carries its outputs, and both are keyed by
//! one [`ControlTag`] numbering. The stream layer forwards the tag to the
//! access layer unchanged, so the numbering is checked at compile time
//! rather than translated at runtime.

use std::collections::BTreeMap;
use std::time::Duration;

use bytes::Bytes;

use crate::block::Block;
use crate::error::{AccessError, Result};

/// Numeric tag of a control command.
///
/// Values are grouped: capability probes, getters, setters, then the
/// private (elementary-stream level) commands.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlTag {
    CanSeek = 0,
    CanFastSeek = 1,
    CanPause = 2,
    CanControlPace = 3,
    GetSize = 6,
    IsDirectory = 8,

    GetPtsDelay = 0x101,
    GetTitleInfo = 0x102,
    GetTitle = 0x103,
    GetSeekpoint = 0x104,
    GetMeta = 0x105,
    GetContentType = 0x106,
    GetSignal = 0x107,

    SetPauseState = 0x200,
    SetTitle = 0x201,
    SetSeekpoint = 0x202,

    SetPrivateIdState = 0x1000,
    SetPrivateIdCa = 0x1001,
    GetPrivateIdState = 0x1002,

    /// Stream-only: handled by the stream adapter, never sent to an access.
    GetPrivateBlock = 0x1003,
}

impl ControlTag {
    /// Tags an access backend may receive.
    pub const ACCESS: [ControlTag; 19] = [
        Self::CanSeek,
        Self::CanFastSeek,
        Self::CanPause,
        Self::CanControlPace,
        Self::GetSize,
        Self::IsDirectory,
        Self::GetPtsDelay,
        Self::GetTitleInfo,
        Self::GetTitle,
        Self::GetSeekpoint,
        Self::GetMeta,
        Self::GetContentType,
        Self::GetSignal,
        Self::SetPauseState,
        Self::SetTitle,
        Self::SetSeekpoint,
        Self::SetPrivateIdState,
        Self::SetPrivateIdCa,
        Self::GetPrivateIdState,
    ];

    /// Decode a raw tag.
    #[must_use]
    pub const fn from_raw(raw: u32) -> Option<Self> {
        Some(match raw {
            0 => Self::CanSeek,
            1 => Self::CanFastSeek,
            2 => Self::CanPause,
            3 => Self::CanControlPace,
            6 => Self::GetSize,
            8 => Self::IsDirectory,
            0x101 => Self::GetPtsDelay,
            0x102 => Self::GetTitleInfo,
            0x103 => Self::GetTitle,
            0x104 => Self::GetSeekpoint,
            0x105 => Self::GetMeta,
            0x106 => Self::GetContentType,
            0x107 => Self::GetSignal,
            0x200 => Self::SetPauseState,
            0x201 => Self::SetTitle,
            0x202 => Self::SetSeekpoint,
            0x1000 => Self::SetPrivateIdState,
            0x1001 => Self::SetPrivateIdCa,
            0x1002 => Self::GetPrivateIdState,
            0x1003 => Self::GetPrivateBlock,
            _ => return None,
        })
    }

    #[must_use]
    pub const fn raw(self) -> u32 {
        self as u32
    }

    /// Whether this tag belongs to the access vocabulary.
    #[must_use]
    pub const fn is_access_query(self) -> bool {
        !matches!(self, Self::GetPrivateBlock)
    }
}

// Every access tag must decode back to itself, and the stream-only tag must
// stay outside the access vocabulary.
const _: () = {
    let mut i = 0;
    while i < ControlTag::ACCESS.len() {
        let tag = ControlTag::ACCESS[i];
        match ControlTag::from_raw(tag.raw()) {
            Some(decoded) => assert!(decoded.raw() == tag.raw(), "control tag mismatch"),
            None => panic!("control tag does not decode"),
        }
        assert!(tag.is_access_query(), "stream-only tag in access vocabulary");
        i += 1;
    }
    assert!(!ControlTag::GetPrivateBlock.is_access_query());
};

/// A control request with its arguments.
#[derive(Debug, Clone, PartialEq)]
pub enum Control {
    CanSeek,
    CanFastSeek,
    CanPause,
    CanControlPace,
    GetSize,
    IsDirectory,
    GetPtsDelay,
    GetTitleInfo,
    GetTitle,
    GetSeekpoint,
    GetMeta,
    GetContentType,
    GetSignal,
    SetPauseState(bool),
    SetTitle(usize),
    SetSeekpoint(usize),
    SetPrivateIdState { id: i32, selected: bool },
    /// Opaque conditional-access descriptor, passed through to the backend.
    SetPrivateIdCa(Bytes),
    GetPrivateIdState(i32),
    GetPrivateBlock,
}

impl Control {
    #[must_use]
    pub const fn tag(&self) -> ControlTag {
        match self {
            Self::CanSeek => ControlTag::CanSeek,
            Self::CanFastSeek => ControlTag::CanFastSeek,
            Self::CanPause => ControlTag::CanPause,
            Self::CanControlPace => ControlTag::CanControlPace,
            Self::GetSize => ControlTag::GetSize,
            Self::IsDirectory => ControlTag::IsDirectory,
            Self::GetPtsDelay => ControlTag::GetPtsDelay,
            Self::GetTitleInfo => ControlTag::GetTitleInfo,
            Self::GetTitle => ControlTag::GetTitle,
            Self::GetSeekpoint => ControlTag::GetSeekpoint,
            Self::GetMeta => ControlTag::GetMeta,
            Self::GetContentType => ControlTag::GetContentType,
            Self::GetSignal => ControlTag::GetSignal,
            Self::SetPauseState(_) => ControlTag::SetPauseState,
            Self::SetTitle(_) => ControlTag::SetTitle,
            Self::SetSeekpoint(_) => ControlTag::SetSeekpoint,
            Self::SetPrivateIdState { .. } => ControlTag::SetPrivateIdState,
            Self::SetPrivateIdCa(_) => ControlTag::SetPrivateIdCa,
            Self::GetPrivateIdState(_) => ControlTag::GetPrivateIdState,
            Self::GetPrivateBlock => ControlTag::GetPrivateBlock,
        }
    }
}

/// A seekpoint (chapter) inside a title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seekpoint {
    pub time_offset: Duration,
    pub name: Option<String>,
}

/// A title (program) exposed by disc-like backends.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Title {
    pub name: Option<String>,
    pub length: Option<Duration>,
    pub seekpoints: Vec<Seekpoint>,
}

/// Reply to [`Control::GetTitleInfo`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TitleInfo {
    pub titles: Vec<Title>,
    pub title_offset: usize,
    pub seekpoint_offset: usize,
}

/// Reply to a control request.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlReply {
    /// Setter accepted.
    Done,
    /// Capability probes and private-id state.
    Flag(bool),
    Size(u64),
    /// Two output slots of the directory probe. Their finer meaning is
    /// backend specific; a plain non-directory source reports both false.
    Directory(bool, bool),
    PtsDelay(Duration),
    TitleInfo(TitleInfo),
    Title(usize),
    Seekpoint(usize),
    Meta(BTreeMap<String, String>),
    ContentType(Option<String>),
    Signal { quality: f64, strength: f64 },
    PrivateBlock { block: Option<Block>, eof: bool },
}

impl ControlReply {
    /// Unwrap a boolean reply.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::UnexpectedReply`] for any other shape.
    pub fn into_flag(self, tag: ControlTag) -> Result<bool> {
        match self {
            Self::Flag(value) => Ok(value),
            _ => Err(AccessError::UnexpectedReply(tag)),
        }
    }

    /// Unwrap a size reply.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::UnexpectedReply`] for any other shape.
    pub fn into_size(self, tag: ControlTag) -> Result<u64> {
        match self {
            Self::Size(value) => Ok(value),
            _ => Err(AccessError::UnexpectedReply(tag)),
        }
    }

    /// Unwrap a pts-delay reply.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::UnexpectedReply`] for any other shape.
    pub fn into_pts_delay(self, tag: ControlTag) -> Result<Duration> {
        match self {
            Self::PtsDelay(value) => Ok(value),
            _ => Err(AccessError::UnexpectedReply(tag)),
        }
    }
}

/// Fallback control responder for directory / listing backends.
///
/// Reports a source that cannot seek, pause or pace, has no pts delay and is
/// not a directory. Every other command is unsupported.
///
/// # Errors
///
/// Returns [`AccessError::Unsupported`] for commands outside the probe set.
pub fn directory_control(query: &Control) -> Result<ControlReply> {
    match query {
        Control::CanSeek | Control::CanFastSeek | Control::CanPause | Control::CanControlPace => {
            Ok(ControlReply::Flag(false))
        }
        Control::GetPtsDelay => Ok(ControlReply::PtsDelay(Duration::ZERO)),
        Control::IsDirectory => Ok(ControlReply::Directory(false, false)),
        other => Err(AccessError::Unsupported(other.tag())),
    }
}
