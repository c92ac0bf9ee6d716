//! Request resolution.
//!
//! Decides between the selection path and the target path, runs the
//! classifier and extractor, and renders the final snippet.

use scraper::{ElementRef, Html, Selector};
use serde::Serialize;
use tracing::{debug, info, warn};
use url::Url;

use crate::classifier::ElementClassifier;
use crate::config::{Config, SelectionConfig};
use crate::dom::MediaState;
use crate::extractor::{MediaInfoExtractor, PageContext};
use crate::formatter::{AiFormatter, Labels};
use crate::locator::{locate, UNKNOWN_LOCATOR};
use crate::payload::SnipRequest;
use crate::platforms::PlatformRules;
use crate::types::{MediaRecord, Notice, ResolveMode, Severity, SnipError};

/// A rendered snippet plus the pieces it was built from
#[derive(Debug, Clone, Serialize)]
pub struct Snippet {
    pub output: String,
    pub record: MediaRecord,
    pub locator: String,
    /// URL shown in the page block
    pub page_url: String,
    pub mode: ResolveMode,
}

/// Entry point tying the pipeline together
#[derive(Debug, Clone)]
pub struct SelectionResolver {
    extractor: MediaInfoExtractor,
    formatter: AiFormatter,
    selection: SelectionConfig,
}

impl SelectionResolver {
    pub fn new(config: &Config) -> Self {
        let rules = PlatformRules::new(&config.platforms);
        let extractor = MediaInfoExtractor::new(ElementClassifier::new(rules));

        Self {
            extractor,
            formatter: AiFormatter::new(config.output.locale),
            selection: config.selection.clone(),
        }
    }

    fn classifier(&self) -> &ElementClassifier {
        self.extractor.classifier()
    }

    /// Resolve a request into a snippet
    pub fn resolve(&self, request: &SnipRequest) -> Result<Snippet, SnipError> {
        let document = Html::parse_document(&request.html);
        let base = Url::parse(&request.page_url).ok();
        if base.is_none() {
            debug!("Page URL {:?} is not absolute, attributes stay unresolved", request.page_url);
        }
        let page = PageContext::new(&request.page_url, base.as_ref());

        if let Some(selection) = &request.selection {
            let text = selection.text.trim();
            if !text.is_empty() {
                let anchor = match selection.anchor.as_deref() {
                    Some(selector) if !selector.trim().is_empty() => {
                        find_first(&document, selector).unwrap_or_else(|e| {
                            warn!("Ignoring selection anchor: {}", e);
                            None
                        })
                    }
                    _ => None,
                };
                return Ok(self.resolve_selection(text, anchor, page));
            }
        }

        if let Some(target) = &request.target {
            if !target.selector.trim().is_empty() {
                if let Some(element) = find_last(&document, &target.selector)? {
                    return Ok(self.resolve_target(element, &target.state, page));
                }
                warn!("Target selector {:?} matched nothing", target.selector);
            }
        }

        Err(SnipError::NoElementDetected)
    }

    fn resolve_selection(
        &self,
        text: &str,
        anchor: Option<ElementRef<'_>>,
        page: PageContext<'_>,
    ) -> Snippet {
        let link_href = anchor.and_then(|el| self.classifier().video_link_href(el, page.base));

        let limit = self.selection.truncate_on_video_sites
            && (link_href.is_some() || self.classifier().rules().is_video_site(page.page_url));

        let content = if limit {
            truncate_chars(text, self.selection.max_chars, self.formatter.labels())
        } else {
            text.to_string()
        };

        let locator = anchor.map(locate).unwrap_or_else(|| UNKNOWN_LOCATOR.to_string());
        let page_url = link_href.unwrap_or_else(|| page.page_url.to_string());
        let record = MediaRecord::Text { content };

        info!("Resolved selection ({} chars) at {}", text.chars().count(), locator);
        self.render(record, page_url, locator, ResolveMode::Selection)
    }

    fn resolve_target(
        &self,
        element: ElementRef<'_>,
        state: &MediaState,
        page: PageContext<'_>,
    ) -> Snippet {
        let record = self.extractor.media_info(Some(element), state, page);
        let locator = locate(element);
        let page_url = self
            .classifier()
            .video_link_href(element, page.base)
            .unwrap_or_else(|| page.page_url.to_string());

        info!("Resolved {} target at {}", record.category().as_str(), locator);
        self.render(record, page_url, locator, ResolveMode::Target)
    }

    fn render(&self, record: MediaRecord, page_url: String, locator: String, mode: ResolveMode) -> Snippet {
        let output = self.formatter.format(&record, &page_url, &locator);
        Snippet {
            output,
            record,
            locator,
            page_url,
            mode,
        }
    }

    /// Notice shown after a successful copy
    pub fn success_notice(&self) -> Notice {
        Notice::new(self.formatter.labels().copied, Severity::Success)
    }

    /// Localized notice for a failure
    pub fn error_notice(&self, error: &SnipError) -> Notice {
        let labels = self.formatter.labels();
        let message = match error {
            SnipError::NoElementDetected => labels.no_element,
            SnipError::Clipboard(_) => labels.copy_failed,
            SnipError::InvalidRequest(_) | SnipError::Internal(_) => labels.generic_error,
        };
        Notice::new(message, Severity::Error)
    }
}

/// Keep the first `max_chars` characters and append the truncation marker
pub fn truncate_chars(text: &str, max_chars: usize, labels: &Labels) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}{}", &text[..cut], labels.truncated),
        None => text.to_string(),
    }
}

fn parse_selector(selector: &str) -> Result<Selector, SnipError> {
    Selector::parse(selector)
        .map_err(|e| SnipError::InvalidRequest(format!("bad selector {:?}: {:?}", selector, e)))
}

fn find_first<'a>(document: &'a Html, selector: &str) -> Result<Option<ElementRef<'a>>, SnipError> {
    let selector = parse_selector(selector)?;
    Ok(document.select(&selector).next())
}

fn find_last<'a>(document: &'a Html, selector: &str) -> Result<Option<ElementRef<'a>>, SnipError> {
    let selector = parse_selector(selector)?;
    Ok(document.select(&selector).last())
}
