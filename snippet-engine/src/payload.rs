//! Snip request and response types

use serde::{Deserialize, Serialize};

use crate::dom::MediaState;
use crate::types::{Notice, Severity};

/// Snapshot of a page sent by the extension
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnipRequest {
    /// Page URL as reported by the browser
    pub page_url: String,

    /// Serialized document (`document.documentElement.outerHTML`)
    pub html: String,

    /// Active text selection, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selection: Option<SelectionSnapshot>,

    /// Best-guess element under the pointer, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<TargetSnapshot>,
}

/// Text selection captured in the page
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SelectionSnapshot {
    /// `selection.toString()`
    pub text: String,

    /// CSS selector of the range's common ancestor element
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor: Option<String>,
}

/// Target element captured in the page
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TargetSnapshot {
    /// CSS selector matching the target; the last match wins
    pub selector: String,

    /// Live media properties of the target
    #[serde(flatten)]
    pub state: MediaState,
}

/// Response sent back to the extension
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SnipResponse {
    pub status: ResponseStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<Notice>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Ok,
    Error,
    Disabled,
}

impl SnipResponse {
    pub fn ok(output: String, notice: Notice) -> Self {
        Self {
            status: ResponseStatus::Ok,
            output: Some(output),
            message: None,
            notice: Some(notice),
        }
    }

    pub fn error(message: &str, notice: Notice) -> Self {
        Self {
            status: ResponseStatus::Error,
            output: None,
            message: Some(message.to_string()),
            notice: Some(Notice::new(notice.message, Severity::Error)),
        }
    }

    pub fn disabled() -> Self {
        Self {
            status: ResponseStatus::Disabled,
            output: None,
            message: None,
            notice: None,
        }
    }
}
