//! Scene analyzer binary.
//!
//! Usage: `sentinel-analyzer <path>...`. Images (jpg, jpeg, png) and
//! recordings (mkv, mp4, avi) are analyzed in order and each result is
//! printed as one JSON line.

use std::path::Path;

use anyhow::Context;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use sentinel_worker::SceneAnalyzer;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];
const VIDEO_EXTENSIONS: &[&str] = &["mkv", "mp4", "avi"];

enum MediaKind {
    Image,
    Video,
}

fn media_kind(path: &Path) -> Option<MediaKind> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        Some(MediaKind::Image)
    } else if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
        Some(MediaKind::Video)
    } else {
        None
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Plain output for dev, JSON for production
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::from_default_env().add_directive("sentinel=info".parse()?);

    // Results go to stdout, logs to stderr
    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }

    let paths: Vec<String> = std::env::args().skip(1).collect();
    if paths.is_empty() {
        anyhow::bail!("usage: sentinel-analyzer <image-or-video>...");
    }

    let analyzer = SceneAnalyzer::from_env().context("Failed to create analyzer")?;
    info!("Analyzer config: {:?}", analyzer.config());

    let mut failures = 0usize;
    for raw in &paths {
        let path = Path::new(raw);
        let line = match media_kind(path) {
            Some(MediaKind::Image) => {
                let result = analyzer.analyze_image(path, None).await;
                failures += usize::from(!result.success);
                serde_json::to_string(&result)?
            }
            Some(MediaKind::Video) => {
                let result = analyzer.analyze_video(path).await;
                failures += usize::from(!result.success);
                serde_json::to_string(&result)?
            }
            None => {
                warn!("Skipping unsupported file: {}", path.display());
                failures += 1;
                continue;
            }
        };
        println!("{}", line);
    }

    if failures > 0 {
        error!("{} of {} inputs failed", failures, paths.len());
        std::process::exit(1);
    }

    Ok(())
}
