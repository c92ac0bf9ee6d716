//! Structural locators for DOM elements.
//!
//! A locator is the ancestor tag path of an element, e.g.
//! `html > body > div:nth-of-type(2) > p`. It never uses ids or classes;
//! `:nth-of-type(k)` is added only where a same-tag sibling exists.

use ego_tree::NodeRef;
use scraper::{ElementRef, Node};

/// Returned when the input is not an element
pub const UNKNOWN_LOCATOR: &str = "unknown";

const SEPARATOR: &str = " > ";

/// Ordered path segments from the outermost ancestor down to the target
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LocatorPath {
    segments: Vec<String>,
}

impl LocatorPath {
    /// Walk from `element` up to (and including) the `html` root
    pub fn from_element(element: ElementRef<'_>) -> Self {
        let mut segments = Vec::new();
        let mut current = Some(element);
        let mut reached_html = false;

        while let Some(el) = current {
            if tag_name(el) == "html" {
                reached_html = true;
                break;
            }
            segments.push(segment_for(el));
            current = el.parent().and_then(ElementRef::wrap);
        }

        if reached_html {
            segments.push("html".to_string());
        }
        segments.reverse();

        Self { segments }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn render(&self) -> String {
        self.segments.join(SEPARATOR)
    }
}

/// Build the locator string for an arbitrary node
pub fn build_locator(node: Option<NodeRef<'_, Node>>) -> String {
    match node.and_then(ElementRef::wrap) {
        Some(element) => LocatorPath::from_element(element).render(),
        None => UNKNOWN_LOCATOR.to_string(),
    }
}

/// Locator for an element reference
pub fn locate(element: ElementRef<'_>) -> String {
    LocatorPath::from_element(element).render()
}

fn tag_name(element: ElementRef<'_>) -> String {
    element.value().name().to_ascii_lowercase()
}

fn segment_for(element: ElementRef<'_>) -> String {
    let tag = tag_name(element);

    let Some(parent) = element.parent() else {
        return tag;
    };
    if ElementRef::wrap(parent).is_none() {
        return tag;
    }

    let mut count = 0;
    let mut position = 0;
    for sibling in parent.children().filter_map(ElementRef::wrap) {
        if tag_name(sibling) == tag {
            count += 1;
            if sibling.id() == element.id() {
                position = count;
            }
        }
    }

    if count > 1 {
        format!("{}:nth-of-type({})", tag, position)
    } else {
        tag
    }
}
