//! DOM helpers shared by classification and extraction.
//!
//! Elements come from a parsed HTML snapshot, so attribute values are raw
//! (relative URLs, `"560px"` widths). Live media properties that HTML cannot
//! carry travel separately in [`MediaState`].

use scraper::ElementRef;
use serde::{Deserialize, Serialize};
use url::Url;

/// Live properties of the target element captured in the page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaState {
    /// `currentSrc` of an image or media element
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_src: Option<String>,

    /// `duration` in seconds of a media element
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,

    /// `naturalWidth` or `videoWidth`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intrinsic_width: Option<u32>,

    /// `naturalHeight` or `videoHeight`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intrinsic_height: Option<u32>,
}

/// Lowercase tag name of an element
pub fn tag_of(element: ElementRef<'_>) -> String {
    element.value().name().to_ascii_lowercase()
}

/// Attribute value, or empty string
pub fn attr<'a>(element: ElementRef<'a>, name: &str) -> &'a str {
    element.value().attr(name).unwrap_or("")
}

/// Trimmed text content of an element
pub fn text_content(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Nearest ancestor (or the element itself) with the given tag
pub fn closest<'a>(element: ElementRef<'a>, tag: &str) -> Option<ElementRef<'a>> {
    std::iter::once(element)
        .chain(element.ancestors().filter_map(ElementRef::wrap))
        .find(|el| el.value().name().eq_ignore_ascii_case(tag))
}

/// Nearest ancestor whose tag is one of `tags`
pub fn closest_any<'a>(element: ElementRef<'a>, tags: &[&str]) -> Option<ElementRef<'a>> {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|el| tags.contains(&tag_of(*el).as_str()))
}

/// First descendant with the given tag
pub fn first_descendant<'a>(element: ElementRef<'a>, tag: &str) -> Option<ElementRef<'a>> {
    element
        .descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name().eq_ignore_ascii_case(tag))
}

/// Resolve a raw URL attribute against the page, as the browser's
/// reflected `src`/`href` properties do. Unresolvable values pass through.
pub fn resolve_url(base: Option<&Url>, raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return String::new();
    }
    match base {
        Some(base) => base
            .join(raw)
            .map(|u| u.to_string())
            .unwrap_or_else(|_| raw.to_string()),
        None => Url::parse(raw)
            .map(|u| u.to_string())
            .unwrap_or_else(|_| raw.to_string()),
    }
}

/// Leading-integer parse: `"560px"` → 560, junk or negatives → 0
pub fn parse_dimension(raw: &str) -> u32 {
    let digits: String = raw
        .trim_start()
        .trim_start_matches('+')
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().unwrap_or(0)
}

/// Pixel value of a declared image size: `"320"`, `"320px"`, `"320.5"`.
/// Percentages and other units are not pixels and give `None`.
pub fn parse_pixels(raw: &str) -> Option<u32> {
    let raw = raw.trim();
    let number = raw
        .strip_suffix("px")
        .or_else(|| raw.strip_suffix("PX"))
        .unwrap_or(raw)
        .trim_end();
    let whole = match number.split_once('.') {
        Some((whole, frac)) if frac.chars().all(|c| c.is_ascii_digit()) => whole,
        Some(_) => return None,
        None => number,
    };
    if whole.is_empty() || !whole.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    whole.parse().ok().filter(|px| *px > 0)
}
