//! Clipboard writers.
//!
//! The system clipboard is tried first. When it is unavailable (headless
//! sessions, SSH) the text is sent to the terminal as an OSC 52 escape,
//! which most modern terminal emulators forward to the local clipboard.

use std::io::Write;

use arboard::Clipboard;
use base64::Engine;
use thiserror::Error;
use tracing::{debug, warn};

use crate::types::SnipError;

/// Clipboard errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClipboardError {
    #[error("Clipboard unavailable: {0}")]
    Unavailable(String),

    #[error("Clipboard write failed: {0}")]
    WriteFailed(String),
}

/// Something that can receive text
pub trait ClipboardWriter {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// Which writer accepted the text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyPath {
    Primary,
    Fallback,
}

/// Write `text` with `primary`, retrying once with `fallback`
pub fn copy_with_fallback(
    primary: &mut dyn ClipboardWriter,
    fallback: &mut dyn ClipboardWriter,
    text: &str,
) -> Result<CopyPath, SnipError> {
    match primary.write_text(text) {
        Ok(()) => Ok(CopyPath::Primary),
        Err(e) => {
            warn!("Primary clipboard failed: {}, trying fallback", e);
            fallback.write_text(text)?;
            debug!("Copied {} bytes via fallback", text.len());
            Ok(CopyPath::Fallback)
        }
    }
}

/// Desktop clipboard via arboard
pub struct SystemClipboard {
    clipboard: Option<Clipboard>,
    open_error: Option<String>,
}

impl SystemClipboard {
    /// Open the system clipboard; failure is reported on first write
    pub fn new() -> Self {
        match Clipboard::new() {
            Ok(clipboard) => Self {
                clipboard: Some(clipboard),
                open_error: None,
            },
            Err(e) => {
                debug!("System clipboard unavailable: {}", e);
                Self {
                    clipboard: None,
                    open_error: Some(e.to_string()),
                }
            }
        }
    }
}

impl Default for SystemClipboard {
    fn default() -> Self {
        Self::new()
    }
}

impl ClipboardWriter for SystemClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        let Some(clipboard) = self.clipboard.as_mut() else {
            let reason = self.open_error.clone().unwrap_or_default();
            return Err(ClipboardError::Unavailable(reason));
        };
        clipboard
            .set_text(text)
            .map_err(|e| ClipboardError::WriteFailed(e.to_string()))
    }
}

/// OSC 52 clipboard escape written to a terminal stream
pub struct Osc52Clipboard<W: Write> {
    out: W,
}

impl<W: Write> Osc52Clipboard<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Build the `ESC ] 52 ; c ; <base64> BEL` sequence
pub fn osc52_sequence(text: &str) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(text.as_bytes());
    format!("\x1b]52;c;{}\x07", encoded)
}

impl<W: Write> ClipboardWriter for Osc52Clipboard<W> {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.out
            .write_all(osc52_sequence(text).as_bytes())
            .and_then(|_| self.out.flush())
            .map_err(|e| ClipboardError::WriteFailed(e.to_string()))
    }
}
