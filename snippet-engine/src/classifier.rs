//! Element classification.
//!
//! Assigns a [`MediaCategory`] to a DOM element from its tag plus two
//! content heuristics: iframe provider sniffing and video thumbnail
//! detection for images.

use scraper::ElementRef;
use tracing::trace;
use url::Url;

use crate::dom::{attr, closest, closest_any, resolve_url, tag_of, MediaState};
use crate::platforms::{PlatformRules, THUMBNAIL_MARKERS};
use crate::types::MediaCategory;

/// Classifies elements using a fixed set of platform rules
#[derive(Debug, Clone, Default)]
pub struct ElementClassifier {
    rules: PlatformRules,
}

impl ElementClassifier {
    pub fn new(rules: PlatformRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &PlatformRules {
        &self.rules
    }

    /// Classify an element; `None` is `Unknown`
    pub fn classify(
        &self,
        element: Option<ElementRef<'_>>,
        state: &MediaState,
        base: Option<&Url>,
    ) -> MediaCategory {
        let Some(element) = element else {
            return MediaCategory::Unknown;
        };

        let category = match tag_of(element).as_str() {
            "img" => {
                if self.is_video_thumbnail(element, state, base) {
                    MediaCategory::Video
                } else {
                    MediaCategory::Image
                }
            }
            "picture" => MediaCategory::Image,
            "video" => MediaCategory::Video,
            "audio" => MediaCategory::Audio,
            "a" => MediaCategory::Link,
            "iframe" => {
                let src = resolve_url(base, attr(element, "src"));
                if self.rules.is_embed_source(&src) {
                    MediaCategory::Video
                } else {
                    MediaCategory::Link
                }
            }
            _ => MediaCategory::Text,
        };

        trace!("Classified <{}> as {}", element.value().name(), category.as_str());
        category
    }

    /// Whether an `<img>` is a thumbnail for a video on a known platform
    pub fn is_video_thumbnail(
        &self,
        element: ElementRef<'_>,
        state: &MediaState,
        base: Option<&Url>,
    ) -> bool {
        if tag_of(element) != "img" {
            return false;
        }

        let src = image_source(element, state, base);
        if self.rules.is_thumbnail_url(&src) {
            return true;
        }

        let Some(link) = closest(element, "a") else {
            return false;
        };

        let href = resolve_url(base, attr(link, "href"));
        if self.rules.is_watch_url(&href) {
            return true;
        }

        closest_any(element, THUMBNAIL_MARKERS).is_some()
    }

    /// Href of the enclosing video watch link, if any
    pub fn video_link_href(&self, element: ElementRef<'_>, base: Option<&Url>) -> Option<String> {
        let link = closest(element, "a")?;
        let href = resolve_url(base, attr(link, "href"));
        self.rules.is_watch_url(&href).then_some(href)
    }
}

/// Effective image source: live `currentSrc` first, then the `src` attribute
pub(crate) fn image_source(element: ElementRef<'_>, state: &MediaState, base: Option<&Url>) -> String {
    match state.current_src.as_deref() {
        Some(current) if !current.is_empty() => resolve_url(base, current),
        _ => resolve_url(base, attr(element, "src")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    fn classify_first(html: &str, selector: &str) -> MediaCategory {
        let doc = Html::parse_document(html);
        let selector = Selector::parse(selector).unwrap();
        let element = doc.select(&selector).next();
        let base = Url::parse("https://ex.com/page").ok();
        ElementClassifier::default().classify(element, &MediaState::default(), base.as_ref())
    }

    #[test]
    fn test_none_is_unknown() {
        let classifier = ElementClassifier::default();
        assert_eq!(
            classifier.classify(None, &MediaState::default(), None),
            MediaCategory::Unknown
        );
    }

    #[test]
    fn test_tag_rules() {
        assert_eq!(classify_first("<img src='a.jpg'>", "img"), MediaCategory::Image);
        assert_eq!(
            classify_first("<picture><img src='a.jpg'></picture>", "picture"),
            MediaCategory::Image
        );
        assert_eq!(classify_first("<video src='v.mp4'></video>", "video"), MediaCategory::Video);
        assert_eq!(classify_first("<audio src='a.mp3'></audio>", "audio"), MediaCategory::Audio);
        assert_eq!(classify_first("<a href='/x'>x</a>", "a"), MediaCategory::Link);
        assert_eq!(classify_first("<p>hello</p>", "p"), MediaCategory::Text);
        assert_eq!(classify_first("<div><span>x</span></div>", "span"), MediaCategory::Text);
    }

    #[test]
    fn test_iframe_rules() {
        assert_eq!(
            classify_first("<iframe src='https://www.youtube.com/embed/abc'></iframe>", "iframe"),
            MediaCategory::Video
        );
        assert_eq!(
            classify_first("<iframe src='https://player.vimeo.com/video/1'></iframe>", "iframe"),
            MediaCategory::Video
        );
        assert_eq!(
            classify_first("<iframe src='https://maps.example.com/'></iframe>", "iframe"),
            MediaCategory::Link
        );
        assert_eq!(classify_first("<iframe></iframe>", "iframe"), MediaCategory::Link);
    }

    #[test]
    fn test_thumbnail_inside_watch_link_is_video() {
        let html = r#"<a href="https://www.youtube.com/watch?v=XYZ">
            <img src="https://i.ytimg.com/vi/XYZ/default.jpg"></a>"#;
        assert_eq!(classify_first(html, "img"), MediaCategory::Video);
    }

    #[test]
    fn test_thumbnail_cdn_alone_is_video() {
        let html = r#"<div><img src="https://i.ytimg.com/vi/XYZ/default.jpg"></div>"#;
        assert_eq!(classify_first(html, "img"), MediaCategory::Video);
    }

    #[test]
    fn test_image_in_watch_link_is_video() {
        let html = r#"<a href="https://www.nicovideo.jp/watch/sm9"><img src="/thumb.png"></a>"#;
        assert_eq!(classify_first(html, "img"), MediaCategory::Video);
    }

    #[test]
    fn test_structural_marker_requires_link() {
        let with_link = r#"<ytd-thumbnail><a href="/playlist?list=1"><img src="/x.png"></a></ytd-thumbnail>"#;
        assert_eq!(classify_first(with_link, "img"), MediaCategory::Video);

        let without_link = r#"<ytd-thumbnail><img src="/x.png"></ytd-thumbnail>"#;
        assert_eq!(classify_first(without_link, "img"), MediaCategory::Image);
    }

    #[test]
    fn test_video_link_detection() {
        let doc = Html::parse_document(
            r#"<a href="/watch?v=abc"><span>t</span></a><a href="/about"><b>x</b></a>"#,
        );
        let base = Url::parse("https://www.youtube.com/").ok();
        let classifier = ElementClassifier::default();

        let span = doc.select(&Selector::parse("span").unwrap()).next().unwrap();
        assert_eq!(
            classifier.video_link_href(span, base.as_ref()).as_deref(),
            Some("https://www.youtube.com/watch?v=abc")
        );

        let bold = doc.select(&Selector::parse("b").unwrap()).next().unwrap();
        assert_eq!(classifier.video_link_href(bold, base.as_ref()), None);
    }

    #[test]
    fn test_plain_image_in_regular_link() {
        let html = r#"<a href="https://ex.com/gallery"><img src="/a.png"></a>"#;
        assert_eq!(classify_first(html, "img"), MediaCategory::Image);
    }

    #[test]
    fn test_current_src_drives_thumbnail_detection() {
        let doc = Html::parse_document("<img src='/lazy.gif'>");
        let selector = Selector::parse("img").unwrap();
        let img = doc.select(&selector).next();
        let state = MediaState {
            current_src: Some("https://i.ytimg.com/vi/Q/hq.jpg".to_string()),
            ..Default::default()
        };
        assert_eq!(
            ElementClassifier::default().classify(img, &state, None),
            MediaCategory::Video
        );
    }
}
