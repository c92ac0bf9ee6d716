//! AI-ready text rendering.
//!
//! Each [`MediaRecord`] variant maps to one fixed template. The output is
//! consumed verbatim by downstream AI tools, so section order, labels and
//! blank lines must stay byte-for-byte stable. The trailing instruction
//! marker is left empty for the user (or an AI integration) to fill in.

use serde::{Deserialize, Serialize};

use crate::types::{MediaRecord, VideoRecord, UNKNOWN_FORMAT};

/// Output language
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Ja,
}

impl Locale {
    pub fn labels(&self) -> &'static Labels {
        match self {
            Locale::En => &EN,
            Locale::Ja => &JA,
        }
    }
}

/// Localized strings used by templates and notices
#[derive(Debug)]
pub struct Labels {
    pub element_type: &'static str,
    pub image: &'static str,
    pub video: &'static str,
    pub audio: &'static str,
    pub link: &'static str,
    pub unknown_type: &'static str,
    pub element_info: &'static str,
    pub selected_text: &'static str,
    pub page_url: &'static str,
    pub locator: &'static str,
    pub instruction: &'static str,
    pub url: &'static str,
    pub description: &'static str,
    pub size: &'static str,
    pub thumbnail_size: &'static str,
    pub format: &'static str,
    pub platform: &'static str,
    pub video_id: &'static str,
    pub thumbnail: &'static str,
    pub poster: &'static str,
    pub length: &'static str,
    pub text: &'static str,
    pub title: &'static str,
    pub none: &'static str,
    pub unknown: &'static str,
    pub thumbnail_image: &'static str,
    pub niconico: &'static str,
    pub hours: &'static str,
    pub minutes: &'static str,
    pub seconds: &'static str,
    pub truncated: &'static str,
    pub copied: &'static str,
    pub copy_failed: &'static str,
    pub no_element: &'static str,
    pub generic_error: &'static str,
}

pub static EN: Labels = Labels {
    element_type: "Element type",
    image: "Image",
    video: "Video",
    audio: "Audio",
    link: "Link",
    unknown_type: "Unknown",
    element_info: "Element info",
    selected_text: "Selected text",
    page_url: "Page URL",
    locator: "Structural position",
    instruction: "Instruction",
    url: "URL",
    description: "Description",
    size: "Size",
    thumbnail_size: "Thumbnail size",
    format: "Format",
    platform: "Platform",
    video_id: "Video ID",
    thumbnail: "Thumbnail",
    poster: "Poster",
    length: "Length",
    text: "Text",
    title: "Title",
    none: "(none)",
    unknown: "unknown",
    thumbnail_image: "thumbnail image",
    niconico: "NicoNico Video",
    hours: "h",
    minutes: "m",
    seconds: "s",
    truncated: "...(truncated)",
    copied: "Copied in AI format!",
    copy_failed: "Failed to copy to clipboard.",
    no_element: "No element detected. Select text or right-click an image, video, or link.",
    generic_error: "An error occurred.",
};

pub static JA: Labels = Labels {
    element_type: "要素タイプ",
    image: "画像",
    video: "動画",
    audio: "音声",
    link: "リンク",
    unknown_type: "不明",
    element_info: "要素情報",
    selected_text: "選択テキスト",
    page_url: "ページURL",
    locator: "構造的な位置",
    instruction: "指示",
    url: "URL",
    description: "説明",
    size: "サイズ",
    thumbnail_size: "サムネイルサイズ",
    format: "形式",
    platform: "プラットフォーム",
    video_id: "動画ID",
    thumbnail: "サムネイル",
    poster: "ポスター",
    length: "長さ",
    text: "テキスト",
    title: "タイトル",
    none: "(なし)",
    unknown: "不明",
    thumbnail_image: "サムネイル画像",
    niconico: "ニコニコ動画",
    hours: "時間",
    minutes: "分",
    seconds: "秒",
    truncated: "...（省略）",
    copied: "AI用フォーマットでコピーしました！",
    copy_failed: "クリップボードへのコピーに失敗しました。",
    no_element: "要素を検出できませんでした。テキストを選択するか、画像・動画・リンクを右クリックしてください。",
    generic_error: "エラーが発生しました。",
};

/// Render `seconds` as `HhMmSs` / `MmSs`; invalid input is the placeholder
pub fn format_duration(seconds: Option<f64>, labels: &Labels) -> String {
    let Some(value) = seconds.filter(|v| v.is_finite() && *v >= 0.0) else {
        return labels.unknown.to_string();
    };

    let total = value.floor() as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;

    if hours > 0 {
        format!(
            "{}{}{}{}{}{}",
            hours, labels.hours, minutes, labels.minutes, secs, labels.seconds
        )
    } else {
        format!("{}{}{}{}", minutes, labels.minutes, secs, labels.seconds)
    }
}

/// Render `WxH`, or the placeholder when either side is zero
pub fn format_size(width: u32, height: u32, labels: &Labels) -> String {
    if width == 0 || height == 0 {
        labels.unknown.to_string()
    } else {
        format!("{}x{}", width, height)
    }
}

/// Renders records into the AI snippet templates
#[derive(Debug, Clone, Copy, Default)]
pub struct AiFormatter {
    locale: Locale,
}

impl AiFormatter {
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }

    pub fn labels(&self) -> &'static Labels {
        self.locale.labels()
    }

    pub fn format(&self, record: &MediaRecord, page_url: &str, locator: &str) -> String {
        let l = self.labels();

        let head = match record {
            MediaRecord::Text { content } => format!("{}:\n{}", l.selected_text, content),
            MediaRecord::Unknown => type_line(l, l.unknown_type),
            MediaRecord::Image { .. } => info_block(l, l.image, &self.image_lines(record)),
            MediaRecord::Video(video) => info_block(l, l.video, &self.video_lines(video)),
            MediaRecord::Audio { .. } => info_block(l, l.audio, &self.audio_lines(record)),
            MediaRecord::Link { .. } => info_block(l, l.link, &self.link_lines(record)),
        };

        format!(
            "{}\n\n{}:\n{}\n\n{}:\n{}\n\n{}:",
            head, l.page_url, page_url, l.locator, locator, l.instruction
        )
    }

    fn image_lines(&self, record: &MediaRecord) -> Vec<String> {
        let l = self.labels();
        let MediaRecord::Image { url, alt, width, height, format } = record else {
            return Vec::new();
        };
        vec![
            field(l.url, url),
            field(l.description, or_none(alt, l)),
            field(l.size, &format_size(*width, *height, l)),
            field(l.format, display_format(format, l)),
        ]
    }

    fn video_lines(&self, video: &VideoRecord) -> Vec<String> {
        let l = self.labels();
        let mut lines = vec![field(l.url, video.url())];

        match video {
            VideoRecord::Native { poster, duration, width, height, format, .. } => {
                if !poster.is_empty() {
                    lines.push(field(l.poster, poster));
                }
                if *duration != 0.0 {
                    lines.push(field(l.length, &format_duration(Some(*duration), l)));
                }
                lines.push(field(l.size, &format_size(*width, *height, l)));
                lines.push(field(l.format, display_format(format, l)));
            }
            VideoRecord::Embed { platform, video_id, width, height, .. } => {
                lines.push(field(l.platform, platform_name(platform, l)));
                if !video_id.is_empty() {
                    lines.push(field(l.video_id, video_id));
                }
                lines.push(field(l.size, &format_size(*width, *height, l)));
                lines.push(field(l.format, video.format()));
            }
            VideoRecord::Thumbnail { thumbnail_url, platform, video_id, alt, width, height, .. } => {
                lines.push(field(l.platform, platform_name(platform, l)));
                if !video_id.is_empty() {
                    lines.push(field(l.video_id, video_id));
                }
                lines.push(field(l.thumbnail, thumbnail_url));
                if !alt.is_empty() {
                    lines.push(field(l.description, alt));
                }
                lines.push(field(l.thumbnail_size, &format_size(*width, *height, l)));
                lines.push(field(l.format, l.thumbnail_image));
            }
        }

        lines
    }

    fn audio_lines(&self, record: &MediaRecord) -> Vec<String> {
        let l = self.labels();
        let MediaRecord::Audio { url, duration, format } = record else {
            return Vec::new();
        };
        vec![
            field(l.url, url),
            field(l.length, &format_duration(duration.seconds(), l)),
            field(l.format, display_format(format, l)),
        ]
    }

    fn link_lines(&self, record: &MediaRecord) -> Vec<String> {
        let l = self.labels();
        let MediaRecord::Link { url, text, title } = record else {
            return Vec::new();
        };
        vec![
            field(l.url, url),
            field(l.text, or_none(text, l)),
            field(l.title, or_none(title, l)),
        ]
    }
}

fn type_line(l: &Labels, kind: &str) -> String {
    format!("{}: {}", l.element_type, kind)
}

fn info_block(l: &Labels, kind: &str, lines: &[String]) -> String {
    format!("{}\n\n{}:\n{}", type_line(l, kind), l.element_info, lines.join("\n"))
}

fn field(label: &str, value: &str) -> String {
    format!("- {}: {}", label, value)
}

fn or_none<'a>(value: &'a str, l: &'a Labels) -> &'a str {
    if value.is_empty() {
        l.none
    } else {
        value
    }
}

fn display_format<'a>(format: &'a str, l: &'a Labels) -> &'a str {
    if format.is_empty() || format == UNKNOWN_FORMAT {
        l.unknown
    } else {
        format
    }
}

/// Display name for a provider code; unrecognized codes pass through
pub fn platform_name<'a>(code: &'a str, l: &'a Labels) -> &'a str {
    match code {
        "youtube" => "YouTube",
        "vimeo" => "Vimeo",
        "nicovideo" => l.niconico,
        other => other,
    }
}
