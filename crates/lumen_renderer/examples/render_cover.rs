//! Render the cover scene and save it as a PNG.
//!
//! Usage: `cargo run --release --example render_cover [config.json] [output.png]`
//!
//! Without a config file the built-in cover framing is used.

use anyhow::{Context, Result};
use lumen_renderer::{render, scenes, RandomSeries, RenderConfig};

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => RenderConfig::from_json_file(&path)
            .with_context(|| format!("Failed to load config {path}"))?,
        None => scenes::cover_config(),
    };
    let output_path = args.next().unwrap_or_else(|| "cover.png".to_string());

    let start = std::time::Instant::now();
    let world = scenes::cover_scene(&mut RandomSeries::new(config.seed))?;
    log::info!("Scene built in {:?} ({} spheres)", start.elapsed(), world.len());

    let output = render(&world, &config)?;

    let image = image::RgbaImage::from_raw(
        output.image.width,
        output.image.height,
        output.image.to_rgba8(),
    )
    .context("Image buffer size mismatch")?;
    image
        .save(&output_path)
        .with_context(|| format!("Failed to save {output_path}"))?;
    log::info!("Saved to {}", output_path);

    Ok(())
}
