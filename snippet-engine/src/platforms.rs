//! Video platform rules.
//!
//! Pattern tables for thumbnail CDNs, watch URLs, embeddable providers and
//! video sites. The tables are compiled once and handed to each
//! [`PlatformRules`] at construction; a rules value is never mutated after
//! it is built.
//!
//! These patterns track third-party markup and URL schemes. When a site
//! changes its CDN hosts or custom elements, detection silently stops
//! matching and the element is treated as a plain image or link.

use lazy_static::lazy_static;
use regex::Regex;
use url::Url;

use crate::config::PlatformsConfig;

/// Hosts whose iframes carry embeddable video players
pub const EMBED_HOSTS: &[&str] = &[
    "youtube.com",
    "youtube-nocookie.com",
    "youtu.be",
    "vimeo.com",
    "dailymotion.com",
    "nicovideo.jp",
];

/// Hosts of sites whose pages are mostly video
pub const VIDEO_SITE_DOMAINS: &[&str] = &[
    "youtube.com",
    "youtu.be",
    "nicovideo.jp",
    "abema.tv",
    "tver.jp",
    "gyao.yahoo.co.jp",
    "netflix.com",
    "primevideo.com",
    "amazon.com",
    "amazon.co.jp",
    "hulu.com",
    "hulu.jp",
    "disneyplus.com",
    "vimeo.com",
    "dailymotion.com",
    "tiktok.com",
    "twitch.tv",
    "bilibili.com",
];

/// Custom elements wrapping thumbnails on YouTube
pub const THUMBNAIL_MARKERS: &[&str] = &[
    "ytd-thumbnail",
    "ytd-rich-grid-media",
    "ytd-video-preview",
    "ytd-compact-video-renderer",
];

lazy_static! {
    static ref THUMBNAIL_CDN_PATTERNS: Vec<Regex> = [
        // YouTube
        r"i\.ytimg\.com/vi/",
        r"img\.youtube\.com/vi/",
        r"i\.ytimg\.com/vi_webp/",
        // NicoNico
        r"nicovideo\.cdn\.nimg\.jp/thumbnails/",
        // Vimeo
        r"i\.vimeocdn\.com/video/",
        // Bilibili
        r"i\d\.hdslb\.com/bfs/archive/",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect();

    static ref WATCH_URL_PATTERNS: Vec<Regex> = [
        r"youtube\.com/watch\?v=",
        r"youtu\.be/",
        r"youtube\.com/shorts/",
        r"nicovideo\.jp/watch/",
        r"abema\.tv/channels/",
        r"abema\.tv/video/",
        r"tver\.jp/episode/",
        r"gyao\.yahoo\.co\.jp/player/",
        r"netflix\.com/watch/",
        r"netflix\.com/title/",
        r"amazon\.(com|co\.jp)/gp/video/",
        r"primevideo\.com/",
        r"hulu\.(com|jp)/watch/",
        r"disneyplus\.com/video/",
        r"vimeo\.com/\d+",
        r"dailymotion\.com/video/",
        r"tiktok\.com/@[\w.]+/video/\d+",
        r"twitch\.tv/videos/",
        r"bilibili\.com/video/",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect();

    static ref YOUTUBE_EMBED_ID: Regex = Regex::new(r"(?:embed/|v=|youtu\.be/)([^&\n?#]+)").unwrap();
    static ref YOUTUBE_WATCH_ID: Regex = Regex::new(r"(?:watch\?v=|youtu\.be/)([^&\n?#]+)").unwrap();
    static ref YOUTUBE_THUMB_ID: Regex = Regex::new(r"/vi(?:_webp)?/([^/]+)/").unwrap();
    static ref VIMEO_EMBED_ID: Regex = Regex::new(r"vimeo\.com/(?:video/)?(\d+)").unwrap();
    static ref VIMEO_WATCH_ID: Regex = Regex::new(r"vimeo\.com/(\d+)").unwrap();
    static ref NICO_WATCH_ID: Regex = Regex::new(r"watch/([^?&#]+)").unwrap();
}

/// Provider code and video id parsed from a URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoRef {
    pub platform: String,
    pub video_id: String,
}

impl VideoRef {
    fn new(platform: &str, video_id: Option<String>) -> Self {
        Self {
            platform: platform.to_string(),
            video_id: video_id.unwrap_or_default(),
        }
    }

    pub fn unknown() -> Self {
        Self::new("unknown", None)
    }
}

/// Immutable platform detection tables
#[derive(Debug, Clone)]
pub struct PlatformRules {
    thumbnail_cdns: Vec<Regex>,
    watch_urls: Vec<Regex>,
    embed_hosts: Vec<String>,
    video_sites: Vec<String>,
}

impl PlatformRules {
    pub fn new(config: &PlatformsConfig) -> Self {
        let embed_hosts = EMBED_HOSTS
            .iter()
            .map(|s| s.to_string())
            .chain(config.extra_embed_hosts.iter().map(|s| s.to_lowercase()))
            .collect();
        let video_sites = VIDEO_SITE_DOMAINS
            .iter()
            .map(|s| s.to_string())
            .chain(config.extra_video_sites.iter().map(|s| s.to_lowercase()))
            .collect();

        Self {
            thumbnail_cdns: THUMBNAIL_CDN_PATTERNS.clone(),
            watch_urls: WATCH_URL_PATTERNS.clone(),
            embed_hosts,
            video_sites,
        }
    }

    /// Whether an image source points at a known thumbnail CDN
    pub fn is_thumbnail_url(&self, src: &str) -> bool {
        self.thumbnail_cdns.iter().any(|re| re.is_match(src))
    }

    /// Whether an href is a watch page on a known video platform
    pub fn is_watch_url(&self, href: &str) -> bool {
        !href.is_empty() && self.watch_urls.iter().any(|re| re.is_match(href))
    }

    /// Whether an iframe source is served by an embeddable video provider
    pub fn is_embed_source(&self, src: &str) -> bool {
        match host_of(src) {
            Some(host) => self.embed_hosts.iter().any(|h| host_matches(&host, h)),
            None => false,
        }
    }

    /// Whether a page URL belongs to a video site
    pub fn is_video_site(&self, page_url: &str) -> bool {
        match host_of(page_url) {
            Some(host) => self.video_sites.iter().any(|d| host.contains(d.as_str())),
            None => false,
        }
    }

    /// Provider and id for an embed iframe source
    pub fn parse_embed(&self, src: &str) -> VideoRef {
        if src.contains("youtube.com") || src.contains("youtube-nocookie.com") || src.contains("youtu.be") {
            VideoRef::new("youtube", capture(&YOUTUBE_EMBED_ID, src))
        } else if src.contains("vimeo.com") {
            VideoRef::new("vimeo", capture(&VIMEO_EMBED_ID, src))
        } else {
            VideoRef::unknown()
        }
    }

    /// Provider and id for an anchor href pointing at a watch page
    pub fn parse_watch_link(&self, href: &str) -> Option<VideoRef> {
        if href.contains("youtube.com/watch") || href.contains("youtu.be/") {
            Some(VideoRef::new("youtube", capture(&YOUTUBE_WATCH_ID, href)))
        } else if href.contains("nicovideo.jp") {
            Some(VideoRef::new("nicovideo", capture(&NICO_WATCH_ID, href)))
        } else if href.contains("vimeo.com") {
            Some(VideoRef::new("vimeo", capture(&VIMEO_WATCH_ID, href)))
        } else {
            None
        }
    }

    /// Provider, id and canonical watch URL inferred from a thumbnail source
    pub fn parse_thumbnail(&self, src: &str) -> Option<(VideoRef, Option<String>)> {
        if !src.contains("ytimg.com") && !src.contains("img.youtube.com") {
            return None;
        }
        let id = capture(&YOUTUBE_THUMB_ID, src);
        let watch_url = id
            .as_ref()
            .map(|id| format!("https://www.youtube.com/watch?v={}", id));
        Some((VideoRef::new("youtube", id), watch_url))
    }
}

impl Default for PlatformRules {
    fn default() -> Self {
        Self::new(&PlatformsConfig::default())
    }
}

fn capture(re: &Regex, haystack: &str) -> Option<String> {
    re.captures(haystack).map(|caps| caps[1].to_string())
}

fn host_of(url: &str) -> Option<String> {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_lowercase()))
}

fn host_matches(host: &str, domain: &str) -> bool {
    host == domain || host.ends_with(&format!(".{}", domain))
}
