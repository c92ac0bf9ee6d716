//! WebSnip Snippet Engine
//!
//! Turns a page element or text selection into an AI-ready text snippet:
//! classification, metadata extraction, CSS path location and templated
//! rendering. Embedded by the `snip` CLI and the native messaging host.

pub mod classifier;
pub mod clipboard;
pub mod config;
pub mod dom;
pub mod extractor;
pub mod format;
pub mod formatter;
pub mod locator;
pub mod payload;
pub mod platforms;
pub mod resolver;
pub mod types;

pub use classifier::ElementClassifier;
pub use config::Config;
pub use dom::MediaState;
pub use extractor::{MediaInfoExtractor, PageContext};
pub use formatter::{AiFormatter, Locale};
pub use locator::{build_locator, locate};
pub use payload::{SnipRequest, SnipResponse};
pub use resolver::{SelectionResolver, Snippet};
pub use types::{MediaCategory, MediaRecord, Notice, Severity, SnipError, VideoRecord};
