use sentinel_vlm::VisionClientConfig;
use sentinel_worker::AnalyzerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AnalyzerConfig::from_env();

    println!(
        "analyzer-selfcheck: starting with sample_rate={} max_concurrent_queries={}",
        config.timeline.sample_rate, config.max_concurrent_queries
    );
    ensure_media_tools()?;
    ensure_vision_client()?;

    println!("analyzer-selfcheck: ok");
    Ok(())
}

fn ensure_media_tools() -> anyhow::Result<()> {
    let ffmpeg = sentinel_media::check_ffmpeg()?;
    let ffprobe = sentinel_media::check_ffprobe()?;
    println!(
        "analyzer-selfcheck: ffmpeg={} ffprobe={}",
        ffmpeg.display(),
        ffprobe.display()
    );
    Ok(())
}

fn ensure_vision_client() -> anyhow::Result<()> {
    let config = VisionClientConfig::from_env();
    sentinel_vlm::HttpVisionClient::new(config.clone())
        .map_err(|e| anyhow::anyhow!("vision client misconfigured: {}", e))?;
    println!("analyzer-selfcheck: vision service at {}", config.base_url);
    Ok(())
}
