//! Media metadata extraction.
//!
//! Turns a classified element into a [`MediaRecord`]. Extraction never
//! fails: missing or malformed attributes degrade to `0`, `""` or
//! `unknown`.

use scraper::ElementRef;
use tracing::debug;
use url::Url;

use crate::classifier::{image_source, ElementClassifier};
use crate::dom::{
    attr, closest, first_descendant, parse_dimension, parse_pixels, resolve_url, tag_of, text_content,
    MediaState,
};
use crate::format::extract_format;
use crate::platforms::{PlatformRules, VideoRef};
use crate::types::{AudioDuration, MediaCategory, MediaRecord, VideoRecord};

/// Everything extraction needs to know about the page
#[derive(Debug, Clone, Copy)]
pub struct PageContext<'a> {
    /// Page URL as reported by the browser
    pub page_url: &'a str,
    /// Parsed page URL used to resolve relative attributes
    pub base: Option<&'a Url>,
}

impl<'a> PageContext<'a> {
    pub fn new(page_url: &'a str, base: Option<&'a Url>) -> Self {
        Self { page_url, base }
    }
}

/// Extracts category-specific records
#[derive(Debug, Clone, Default)]
pub struct MediaInfoExtractor {
    classifier: ElementClassifier,
}

impl MediaInfoExtractor {
    pub fn new(classifier: ElementClassifier) -> Self {
        Self { classifier }
    }

    pub fn classifier(&self) -> &ElementClassifier {
        &self.classifier
    }

    fn rules(&self) -> &PlatformRules {
        self.classifier.rules()
    }

    /// Classify and extract in one step
    pub fn media_info(
        &self,
        element: Option<ElementRef<'_>>,
        state: &MediaState,
        page: PageContext<'_>,
    ) -> MediaRecord {
        let category = self.classifier.classify(element, state, page.base);
        match element {
            Some(element) => self.extract(element, category, state, page),
            None => MediaRecord::Unknown,
        }
    }

    /// Extract the record for an already-classified element
    pub fn extract(
        &self,
        element: ElementRef<'_>,
        category: MediaCategory,
        state: &MediaState,
        page: PageContext<'_>,
    ) -> MediaRecord {
        let record = match category {
            MediaCategory::Image => self.extract_image(element, state, page),
            MediaCategory::Video => MediaRecord::Video(self.extract_video(element, state, page)),
            MediaCategory::Audio => self.extract_audio(element, state, page),
            MediaCategory::Link => extract_link(element, page),
            MediaCategory::Text => MediaRecord::Text {
                content: text_content(element),
            },
            MediaCategory::Unknown => MediaRecord::Unknown,
        };

        debug!("Extracted {} record from <{}>", category.as_str(), tag_of(element));
        record
    }

    fn extract_image(&self, element: ElementRef<'_>, state: &MediaState, page: PageContext<'_>) -> MediaRecord {
        let img = if tag_of(element) == "picture" {
            match first_descendant(element, "img") {
                Some(img) => img,
                None => return MediaRecord::empty_image(),
            }
        } else {
            element
        };

        let url = image_source(img, state, page.base);
        let (width, height) = declared_then_intrinsic(img, state);

        MediaRecord::Image {
            format: extract_format(&url, MediaCategory::Image),
            url,
            alt: attr(img, "alt").to_string(),
            width,
            height,
        }
    }

    fn extract_video(&self, element: ElementRef<'_>, state: &MediaState, page: PageContext<'_>) -> VideoRecord {
        match tag_of(element).as_str() {
            "img" => self.extract_thumbnail(element, state, page),
            "iframe" => self.extract_embed(element, page),
            _ => extract_native_video(element, state, page),
        }
    }

    fn extract_embed(&self, iframe: ElementRef<'_>, page: PageContext<'_>) -> VideoRecord {
        let url = resolve_url(page.base, attr(iframe, "src"));
        let VideoRef { platform, video_id } = self.rules().parse_embed(&url);

        VideoRecord::Embed {
            url,
            platform,
            video_id,
            width: parse_dimension(attr(iframe, "width")),
            height: parse_dimension(attr(iframe, "height")),
        }
    }

    fn extract_thumbnail(&self, img: ElementRef<'_>, state: &MediaState, page: PageContext<'_>) -> VideoRecord {
        let thumbnail_url = image_source(img, state, page.base);
        let link_href = closest(img, "a")
            .map(|a| resolve_url(page.base, attr(a, "href")))
            .filter(|href| !href.is_empty());

        let mut video = VideoRef::unknown();
        let mut video_url = None;

        if let Some((inferred, url)) = self.rules().parse_thumbnail(&thumbnail_url) {
            video = inferred;
            video_url = url;
        }

        // A watch link on the anchor wins over inference from the image URL
        if let Some(href) = &link_href {
            if let Some(linked) = self.rules().parse_watch_link(href) {
                video = VideoRef {
                    platform: linked.platform,
                    video_id: if linked.video_id.is_empty() { video.video_id } else { linked.video_id },
                };
                video_url = Some(href.clone());
            }
        }

        let url = video_url
            .or(link_href)
            .unwrap_or_else(|| page.page_url.to_string());
        let (width, height) = declared_then_intrinsic(img, state);

        VideoRecord::Thumbnail {
            url,
            thumbnail_url,
            platform: video.platform,
            video_id: video.video_id,
            alt: attr(img, "alt").to_string(),
            width,
            height,
        }
    }

    fn extract_audio(&self, element: ElementRef<'_>, state: &MediaState, page: PageContext<'_>) -> MediaRecord {
        let url = media_source(element, state, page.base);

        MediaRecord::Audio {
            format: extract_format(&url, MediaCategory::Audio),
            url,
            duration: AudioDuration::from_live(state.duration),
        }
    }
}

fn extract_native_video(element: ElementRef<'_>, state: &MediaState, page: PageContext<'_>) -> VideoRecord {
    let url = media_source(element, state, page.base);
    let duration = state.duration.filter(|d| d.is_finite()).unwrap_or(0.0);

    let width = state
        .intrinsic_width
        .filter(|w| *w > 0)
        .unwrap_or_else(|| parse_dimension(attr(element, "width")));
    let height = state
        .intrinsic_height
        .filter(|h| *h > 0)
        .unwrap_or_else(|| parse_dimension(attr(element, "height")));

    VideoRecord::Native {
        format: extract_format(&url, MediaCategory::Video),
        url,
        poster: resolve_url(page.base, attr(element, "poster")),
        duration,
        width,
        height,
    }
}

fn extract_link(element: ElementRef<'_>, page: PageContext<'_>) -> MediaRecord {
    MediaRecord::Link {
        url: resolve_url(page.base, attr(element, "href")),
        text: text_content(element),
        title: attr(element, "title").to_string(),
    }
}

/// Media source: `currentSrc`, then `src`, then the first `<source src>`
fn media_source(element: ElementRef<'_>, state: &MediaState, base: Option<&Url>) -> String {
    if let Some(current) = state.current_src.as_deref().filter(|s| !s.is_empty()) {
        return resolve_url(base, current);
    }
    let src = attr(element, "src");
    if !src.is_empty() {
        return resolve_url(base, src);
    }
    first_descendant(element, "source")
        .map(|source| resolve_url(base, attr(source, "src")))
        .unwrap_or_default()
}

/// Image dimensions: declared pixel attributes, falling back to intrinsic size.
/// Non-pixel declarations such as `100%` count as absent.
fn declared_then_intrinsic(img: ElementRef<'_>, state: &MediaState) -> (u32, u32) {
    let width = parse_pixels(attr(img, "width")).or(state.intrinsic_width).unwrap_or(0);
    let height = parse_pixels(attr(img, "height")).or(state.intrinsic_height).unwrap_or(0);
    (width, height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    const PAGE: &str = "https://ex.com/page";

    fn info(html: &str, selector: &str, state: MediaState) -> MediaRecord {
        let doc = Html::parse_document(html);
        let selector = Selector::parse(selector).unwrap();
        let element = doc.select(&selector).next();
        let base = Url::parse(PAGE).ok();
        MediaInfoExtractor::default().media_info(element, &state, PageContext::new(PAGE, base.as_ref()))
    }

    #[test]
    fn test_none_is_unknown() {
        let extractor = MediaInfoExtractor::default();
        let record = extractor.media_info(None, &MediaState::default(), PageContext::new(PAGE, None));
        assert_eq!(record, MediaRecord::Unknown);
    }

    #[test]
    fn test_image_basic() {
        let record = info(
            r#"<img src="photo.JPG" alt="Beautiful landscape" width="1920" height="1080">"#,
            "img",
            MediaState::default(),
        );
        assert_eq!(
            record,
            MediaRecord::Image {
                url: "https://ex.com/photo.JPG".to_string(),
                alt: "Beautiful landscape".to_string(),
                width: 1920,
                height: 1080,
                format: "jpg".to_string(),
            }
        );
    }

    #[test]
    fn test_image_prefers_current_src_and_intrinsic_fallback() {
        let state = MediaState {
            current_src: Some("https://cdn.ex.com/large.webp".to_string()),
            intrinsic_width: Some(800),
            intrinsic_height: Some(600),
            ..Default::default()
        };
        let record = info(r#"<img src="small.png">"#, "img", state);
        let MediaRecord::Image { url, width, height, format, alt } = record else {
            panic!("expected image");
        };
        assert_eq!(url, "https://cdn.ex.com/large.webp");
        assert_eq!((width, height), (800, 600));
        assert_eq!(format, "webp");
        assert_eq!(alt, "");
    }

    #[test]
    fn test_percentage_size_falls_back_to_intrinsic() {
        let state = MediaState {
            intrinsic_width: Some(800),
            intrinsic_height: Some(600),
            ..Default::default()
        };
        let record = info(r#"<img src="a.png" width="100%">"#, "img", state.clone());
        let MediaRecord::Image { width, height, .. } = record else {
            panic!("expected image");
        };
        assert_eq!((width, height), (800, 600));

        let record = info(r#"<img src="a.png" width="320px" height="50%">"#, "img", state);
        let MediaRecord::Image { width, height, .. } = record else {
            panic!("expected image");
        };
        assert_eq!((width, height), (320, 600));
    }

    #[test]
    fn test_image_data_uri() {
        let record = info(r#"<img src="data:image/png;base64,AAAA">"#, "img", MediaState::default());
        let MediaRecord::Image { format, .. } = record else {
            panic!("expected image");
        };
        assert_eq!(format, "png");
    }

    #[test]
    fn test_picture_descends_to_img() {
        let record = info(
            r#"<picture><source srcset="a.webp"><img src="a.png" alt="A"></picture>"#,
            "picture",
            MediaState::default(),
        );
        let MediaRecord::Image { url, alt, format, .. } = record else {
            panic!("expected image");
        };
        assert_eq!(url, "https://ex.com/a.png");
        assert_eq!(alt, "A");
        assert_eq!(format, "png");
    }

    #[test]
    fn test_empty_picture() {
        let record = info(r#"<picture><source srcset="a.webp"></picture>"#, "picture", MediaState::default());
        assert_eq!(record, MediaRecord::empty_image());
    }

    #[test]
    fn test_youtube_iframe() {
        let record = info(
            r#"<iframe src="https://www.youtube.com/embed/dQw4w9WgXcQ" width="560" height="315px"></iframe>"#,
            "iframe",
            MediaState::default(),
        );
        assert_eq!(
            record,
            MediaRecord::Video(VideoRecord::Embed {
                url: "https://www.youtube.com/embed/dQw4w9WgXcQ".to_string(),
                platform: "youtube".to_string(),
                video_id: "dQw4w9WgXcQ".to_string(),
                width: 560,
                height: 315,
            })
        );
    }

    #[test]
    fn test_dailymotion_iframe_unknown_platform() {
        let record = info(
            r#"<iframe src="https://www.dailymotion.com/embed/video/x8" width="wide"></iframe>"#,
            "iframe",
            MediaState::default(),
        );
        let MediaRecord::Video(VideoRecord::Embed { platform, video_id, width, height, .. }) = record else {
            panic!("expected embed");
        };
        assert_eq!(platform, "unknown");
        assert_eq!(video_id, "");
        assert_eq!((width, height), (0, 0));
    }

    #[test]
    fn test_native_video() {
        let state = MediaState {
            duration: Some(125.0),
            intrinsic_width: Some(640),
            intrinsic_height: Some(360),
            ..Default::default()
        };
        let record = info(
            r#"<video src="v.mp4" poster="/poster.jpg" width="320" height="180"></video>"#,
            "video",
            state,
        );
        assert_eq!(
            record,
            MediaRecord::Video(VideoRecord::Native {
                url: "https://ex.com/v.mp4".to_string(),
                poster: "https://ex.com/poster.jpg".to_string(),
                duration: 125.0,
                width: 640,
                height: 360,
                format: "mp4".to_string(),
            })
        );
    }

    #[test]
    fn test_native_video_defaults() {
        let state = MediaState {
            duration: Some(f64::NAN),
            ..Default::default()
        };
        let record = info(
            r#"<video width="320"><source src="clip.webm" type="video/webm"></video>"#,
            "video",
            state,
        );
        let MediaRecord::Video(VideoRecord::Native { url, poster, duration, width, height, format }) = record else {
            panic!("expected native video");
        };
        assert_eq!(url, "https://ex.com/clip.webm");
        assert_eq!(poster, "");
        assert_eq!(duration, 0.0);
        assert_eq!((width, height), (320, 0));
        assert_eq!(format, "webm");
    }

    #[test]
    fn test_youtube_thumbnail() {
        let html = r#"<a href="https://www.youtube.com/watch?v=XYZ&t=3"><img
            src="https://i.ytimg.com/vi/XYZ/default.jpg" alt="Video title" width="168" height="94"></a>"#;
        let record = info(html, "img", MediaState::default());
        assert_eq!(
            record,
            MediaRecord::Video(VideoRecord::Thumbnail {
                url: "https://www.youtube.com/watch?v=XYZ&t=3".to_string(),
                thumbnail_url: "https://i.ytimg.com/vi/XYZ/default.jpg".to_string(),
                platform: "youtube".to_string(),
                video_id: "XYZ".to_string(),
                alt: "Video title".to_string(),
                width: 168,
                height: 94,
            })
        );
    }

    #[test]
    fn test_thumbnail_inferred_from_cdn_url() {
        let html = r#"<div><img src="https://i.ytimg.com/vi/ABC/hqdefault.jpg"></div>"#;
        let MediaRecord::Video(VideoRecord::Thumbnail { url, video_id, platform, .. }) =
            info(html, "img", MediaState::default())
        else {
            panic!("expected thumbnail");
        };
        assert_eq!(url, "https://www.youtube.com/watch?v=ABC");
        assert_eq!(video_id, "ABC");
        assert_eq!(platform, "youtube");
    }

    #[test]
    fn test_niconico_thumbnail_link() {
        let html = r#"<a href="https://www.nicovideo.jp/watch/sm9"><img src="https://nicovideo.cdn.nimg.jp/thumbnails/9/9"></a>"#;
        let MediaRecord::Video(VideoRecord::Thumbnail { url, video_id, platform, .. }) =
            info(html, "img", MediaState::default())
        else {
            panic!("expected thumbnail");
        };
        assert_eq!(url, "https://www.nicovideo.jp/watch/sm9");
        assert_eq!(platform, "nicovideo");
        assert_eq!(video_id, "sm9");
    }

    #[test]
    fn test_thumbnail_falls_back_to_page_url() {
        let html = r#"<ytd-thumbnail><a href=""><img src="https://i.vimeocdn.com/video/1_640.jpg"></a></ytd-thumbnail>"#;
        let MediaRecord::Video(VideoRecord::Thumbnail { url, platform, .. }) =
            info(html, "img", MediaState::default())
        else {
            panic!("expected thumbnail");
        };
        assert_eq!(url, "https://ex.com/page");
        assert_eq!(platform, "unknown");
    }

    #[test]
    fn test_audio() {
        let state = MediaState {
            duration: Some(180.0),
            ..Default::default()
        };
        let record = info(r#"<audio src="song.mp3"></audio>"#, "audio", state);
        assert_eq!(
            record,
            MediaRecord::Audio {
                url: "https://ex.com/song.mp3".to_string(),
                duration: AudioDuration::Seconds(180.0),
                format: "mp3".to_string(),
            }
        );
    }

    #[test]
    fn test_audio_without_duration() {
        let record = info(r#"<audio src="stream"></audio>"#, "audio", MediaState::default());
        let MediaRecord::Audio { duration, format, .. } = record else {
            panic!("expected audio");
        };
        assert_eq!(duration, AudioDuration::Unknown);
        assert_eq!(format, "unknown");
    }

    #[test]
    fn test_link() {
        let record = info(
            r#"<a href="/docs" title="Documentation">  Read the docs </a>"#,
            "a",
            MediaState::default(),
        );
        assert_eq!(
            record,
            MediaRecord::Link {
                url: "https://ex.com/docs".to_string(),
                text: "Read the docs".to_string(),
                title: "Documentation".to_string(),
            }
        );
    }

    #[test]
    fn test_link_without_attributes() {
        let record = info("<a></a>", "a", MediaState::default());
        assert_eq!(
            record,
            MediaRecord::Link {
                url: String::new(),
                text: String::new(),
                title: String::new(),
            }
        );
    }

    #[test]
    fn test_text() {
        let record = info("<p>  Some paragraph text </p>", "p", MediaState::default());
        assert_eq!(
            record,
            MediaRecord::Text {
                content: "Some paragraph text".to_string(),
            }
        );
    }
}
