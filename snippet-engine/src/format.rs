//! File-format inference from resource URLs.
//!
//! Formats are derived from a `data:` URI subtype or the URL's trailing
//! extension, and only whitelisted tokens for the media category are
//! reported. Anything else (version numbers, query junk) becomes `unknown`.

use lazy_static::lazy_static;
use regex::Regex;

use crate::types::{MediaCategory, UNKNOWN_FORMAT};

pub const IMAGE_FORMATS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "svg", "bmp", "ico"];
pub const VIDEO_FORMATS: &[&str] = &["mp4", "webm", "ogg", "ogv", "avi", "mov", "wmv", "flv", "mkv"];
pub const AUDIO_FORMATS: &[&str] = &["mp3", "wav", "ogg", "oga", "aac", "flac", "m4a", "wma"];

lazy_static! {
    // data:<type>/<subtype>
    static ref DATA_URI: Regex = Regex::new(r"^data:(\w+)/(\w+)").unwrap();

    // .<ext> right before a query, fragment or the end
    static ref EXTENSION: Regex = Regex::new(r"\.([^.?#]+)(?:\?|#|$)").unwrap();
}

/// Whitelisted format tokens for a media category
pub fn whitelist(category: MediaCategory) -> &'static [&'static str] {
    match category {
        MediaCategory::Image => IMAGE_FORMATS,
        MediaCategory::Video => VIDEO_FORMATS,
        MediaCategory::Audio => AUDIO_FORMATS,
        _ => &[],
    }
}

/// Infer a lowercase format token for `url`, or `unknown`
pub fn extract_format(url: &str, category: MediaCategory) -> String {
    if url.is_empty() {
        return UNKNOWN_FORMAT.to_string();
    }

    if url.starts_with("data:") {
        return DATA_URI
            .captures(url)
            .map(|caps| caps[2].to_lowercase())
            .unwrap_or_else(|| UNKNOWN_FORMAT.to_string());
    }

    let Some(caps) = EXTENSION.captures(url) else {
        return UNKNOWN_FORMAT.to_string();
    };

    let extension = caps[1].to_lowercase();
    if whitelist(category).contains(&extension.as_str()) {
        extension
    } else {
        UNKNOWN_FORMAT.to_string()
    }
}
