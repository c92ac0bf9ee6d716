//! snip - render a WebSnip snippet from a saved page
//!
//! Runs the same pipeline as the browser integration against an HTML file,
//! printing the snippet and optionally copying it to the clipboard.

use std::io;
use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use snippet_engine::clipboard::{copy_with_fallback, CopyPath, Osc52Clipboard, SystemClipboard};
use snippet_engine::payload::{SelectionSnapshot, TargetSnapshot};
use snippet_engine::{Config, Locale, MediaState, SelectionResolver, SnipRequest};

/// Render an AI-ready snippet for an element or selection in an HTML page
#[derive(Parser)]
#[command(name = "snip")]
#[command(version)]
struct Cli {
    /// Saved HTML document
    #[arg(required_unless_present = "write_config")]
    html_file: Option<PathBuf>,

    /// URL the page was loaded from
    #[arg(long, required_unless_present = "write_config")]
    url: Option<String>,

    /// CSS selector of the target element (last match wins)
    #[arg(long)]
    target: Option<String>,

    /// Selected text
    #[arg(long)]
    selection: Option<String>,

    /// CSS selector of the element containing the selection
    #[arg(long, requires = "selection")]
    anchor: Option<String>,

    /// Live currentSrc of the target
    #[arg(long)]
    current_src: Option<String>,

    /// Media duration in seconds
    #[arg(long)]
    duration: Option<f64>,

    /// Intrinsic media size as WxH
    #[arg(long, value_parser = parse_size)]
    intrinsic_size: Option<(u32, u32)>,

    /// Output language (en, ja); overrides the config file
    #[arg(long, value_parser = parse_locale)]
    locale: Option<Locale>,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Copy the snippet to the clipboard
    #[arg(long)]
    copy: bool,

    /// Print the snippet and its record as JSON
    #[arg(long)]
    json: bool,

    /// Write the effective configuration to the config path and exit
    #[arg(long, conflicts_with_all = ["html_file", "copy", "json"])]
    write_config: bool,
}

fn parse_size(raw: &str) -> Result<(u32, u32), String> {
    let (w, h) = raw
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WxH, got {:?}", raw))?;
    let w = w.trim().parse().map_err(|_| format!("bad width in {:?}", raw))?;
    let h = h.trim().parse().map_err(|_| format!("bad height in {:?}", raw))?;
    Ok((w, h))
}

fn parse_locale(raw: &str) -> Result<Locale, String> {
    match raw.to_ascii_lowercase().as_str() {
        "en" => Ok(Locale::En),
        "ja" => Ok(Locale::Ja),
        other => Err(format!("unsupported locale {:?} (expected en or ja)", other)),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(Config::default_config_path);
    let mut config = Config::load_from_path(config_path.clone());
    if let Some(locale) = cli.locale {
        config.output.locale = locale;
    }

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(io::stderr).with_target(false))
        .init();

    if cli.write_config {
        config.save_to_path(&config_path)?;
        eprintln!("Wrote {}", config_path.display());
        return Ok(());
    }

    let (Some(html_file), Some(page_url)) = (cli.html_file, cli.url) else {
        return Err("an HTML file and --url are required".into());
    };
    let html = std::fs::read_to_string(&html_file)?;
    info!("Read {} bytes from {:?}", html.len(), html_file);

    let (intrinsic_width, intrinsic_height) = match cli.intrinsic_size {
        Some((w, h)) => (Some(w), Some(h)),
        None => (None, None),
    };

    let request = SnipRequest {
        page_url,
        html,
        selection: cli.selection.map(|text| SelectionSnapshot {
            text,
            anchor: cli.anchor,
        }),
        target: cli.target.map(|selector| TargetSnapshot {
            selector,
            state: MediaState {
                current_src: cli.current_src,
                duration: cli.duration,
                intrinsic_width,
                intrinsic_height,
            },
        }),
    };

    let resolver = SelectionResolver::new(&config);
    let snippet = match resolver.resolve(&request) {
        Ok(snippet) => snippet,
        Err(e) => {
            error!("{}", e);
            eprintln!("{}", resolver.error_notice(&e).message);
            std::process::exit(1);
        }
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&snippet)?);
    } else {
        println!("{}", snippet.output);
    }

    if cli.copy {
        let mut system = SystemClipboard::new();
        let mut terminal = Osc52Clipboard::new(io::stderr());
        match copy_with_fallback(&mut system, &mut terminal, &snippet.output) {
            Ok(path) => {
                if path == CopyPath::Fallback {
                    info!("Copied via terminal escape sequence");
                }
                eprintln!("{}", resolver.success_notice().message);
            }
            Err(e) => {
                error!("{}", e);
                eprintln!("{}", resolver.error_notice(&e).message);
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("640x360"), Ok((640, 360)));
        assert_eq!(parse_size("1920X1080"), Ok((1920, 1080)));
        assert!(parse_size("640").is_err());
        assert!(parse_size("axb").is_err());
    }

    #[test]
    fn test_parse_locale() {
        assert_eq!(parse_locale("JA"), Ok(Locale::Ja));
        assert!(parse_locale("fr").is_err());
    }

    #[test]
    fn test_page_required_without_write_config() {
        assert!(Cli::try_parse_from(["snip", "--url", "https://ex.com/"]).is_err());
        assert!(Cli::try_parse_from(["snip", "page.html"]).is_err());

        let cli = Cli::try_parse_from(["snip", "--write-config", "--locale", "ja"]).unwrap();
        assert!(cli.write_config);
        assert!(cli.html_file.is_none());
    }

    #[test]
    fn test_cli_parses() {
        let cli = Cli::try_parse_from([
            "snip",
            "page.html",
            "--url",
            "https://ex.com/",
            "--target",
            "video",
            "--duration",
            "125",
            "--intrinsic-size",
            "640x360",
        ])
        .unwrap();
        assert_eq!(cli.html_file, Some(PathBuf::from("page.html")));
        assert_eq!(cli.target.as_deref(), Some("video"));
        assert_eq!(cli.intrinsic_size, Some((640, 360)));
        assert!(!cli.copy);
    }
}
