//! Core types used throughout the snippet engine.
//!
//! This module defines the media categories, the per-category records
//! produced by extraction, user-facing notices, and the engine error type.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::clipboard::ClipboardError;

/// Semantic category assigned to a DOM node before metadata extraction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaCategory {
    Image,
    Video,
    Audio,
    Link,
    Text,
    Unknown,
}

impl MediaCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaCategory::Image => "image",
            MediaCategory::Video => "video",
            MediaCategory::Audio => "audio",
            MediaCategory::Link => "link",
            MediaCategory::Text => "text",
            MediaCategory::Unknown => "unknown",
        }
    }
}

/// Category-specific metadata extracted from an element
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MediaRecord {
    Image {
        url: String,
        alt: String,
        width: u32,
        height: u32,
        format: String,
    },
    Video(VideoRecord),
    Audio {
        url: String,
        duration: AudioDuration,
        format: String,
    },
    Link {
        url: String,
        text: String,
        title: String,
    },
    Text {
        content: String,
    },
    Unknown,
}

impl MediaRecord {
    pub fn category(&self) -> MediaCategory {
        match self {
            MediaRecord::Image { .. } => MediaCategory::Image,
            MediaRecord::Video(_) => MediaCategory::Video,
            MediaRecord::Audio { .. } => MediaCategory::Audio,
            MediaRecord::Link { .. } => MediaCategory::Link,
            MediaRecord::Text { .. } => MediaCategory::Text,
            MediaRecord::Unknown => MediaCategory::Unknown,
        }
    }

    /// Image record used when a `<picture>` has no nested `<img>`
    pub fn empty_image() -> Self {
        MediaRecord::Image {
            url: String::new(),
            alt: String::new(),
            width: 0,
            height: 0,
            format: UNKNOWN_FORMAT.to_string(),
        }
    }
}

/// Token used wherever a format, platform or duration cannot be determined
pub const UNKNOWN_FORMAT: &str = "unknown";

/// The three shapes a video record can take
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "variant", rename_all = "lowercase")]
pub enum VideoRecord {
    /// A `<video>` element
    Native {
        url: String,
        poster: String,
        /// Seconds; 0 when unknown
        duration: f64,
        width: u32,
        height: u32,
        format: String,
    },
    /// An `<iframe>` pointing at a video provider
    Embed {
        url: String,
        platform: String,
        video_id: String,
        width: u32,
        height: u32,
    },
    /// An `<img>` recognized as a video platform thumbnail
    Thumbnail {
        url: String,
        thumbnail_url: String,
        platform: String,
        video_id: String,
        alt: String,
        width: u32,
        height: u32,
    },
}

impl VideoRecord {
    pub fn format(&self) -> &str {
        match self {
            VideoRecord::Native { format, .. } => format,
            VideoRecord::Embed { .. } => "embed",
            VideoRecord::Thumbnail { .. } => "thumbnail",
        }
    }

    pub fn url(&self) -> &str {
        match self {
            VideoRecord::Native { url, .. }
            | VideoRecord::Embed { url, .. }
            | VideoRecord::Thumbnail { url, .. } => url,
        }
    }
}

/// Audio duration; `Unknown` when the media element reported NaN
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AudioDuration {
    Seconds(f64),
    Unknown,
}

impl Serialize for AudioDuration {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            AudioDuration::Seconds(v) => serializer.serialize_f64(*v),
            AudioDuration::Unknown => serializer.serialize_str(UNKNOWN_FORMAT),
        }
    }
}

impl AudioDuration {
    pub fn from_live(value: Option<f64>) -> Self {
        match value {
            Some(v) if v.is_finite() => AudioDuration::Seconds(v),
            _ => AudioDuration::Unknown,
        }
    }

    pub fn seconds(&self) -> Option<f64> {
        match self {
            AudioDuration::Seconds(v) => Some(*v),
            AudioDuration::Unknown => None,
        }
    }
}

/// Severity of a transient user notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Success,
    Error,
}

/// Message shown to the user after an operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub message: String,
    pub severity: Severity,
}

impl Notice {
    pub fn new(message: impl Into<String>, severity: Severity) -> Self {
        Self {
            message: message.into(),
            severity,
        }
    }
}

/// Which resolver path produced a snippet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolveMode {
    Selection,
    Target,
}

/// Errors surfaced to the user
#[derive(Debug, Error)]
pub enum SnipError {
    /// Neither a text selection nor a target element could be found
    #[error("No element detected")]
    NoElementDetected,

    /// The request could not be decoded or referenced invalid selectors
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Both clipboard paths failed
    #[error("Clipboard error: {0}")]
    Clipboard(#[from] ClipboardError),

    /// Unexpected failure caught at the top level
    #[error("Internal error: {0}")]
    Internal(String),
}
