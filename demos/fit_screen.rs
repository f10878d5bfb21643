//! Screen Fitting Demo
//!
//! Fits an image onto the iPhone 13 Pro screen texture and writes the result.
//!
//! Run with: cargo run --example fit_screen -- <input> [output] [config.json]
//!
//! Set LOG_LEVEL=debug to see pipeline details.

use mockup_core::{ImageFitter, SourceImage, TargetSpec};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut args = std::env::args().skip(1);
    let input = args
        .next()
        .ok_or("usage: fit_screen <input> [output] [config.json]")?;
    let output = args.next().unwrap_or_else(|| "output/screen.jpg".to_string());

    let spec = match args.next() {
        Some(path) => TargetSpec::from_json(&std::fs::read_to_string(path)?)?,
        None => TargetSpec::default(),
    };

    let source = SourceImage::open(&input)?;
    let fitted = ImageFitter::new(spec).fit(&source)?;

    if let Some(parent) = std::path::Path::new(&output).parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&output, fitted.bytes())?;

    let placement = fitted.placement();
    tracing::info!(
        draw_width = placement.draw_width,
        draw_height = placement.draw_height,
        offset_x = placement.offset_x,
        offset_y = placement.offset_y,
        "placed {}x{} source",
        source.width(),
        source.height()
    );
    println!(
        "Generated: {output} ({}x{}, {})",
        fitted.width(),
        fitted.height(),
        fitted.mime_type()
    );

    Ok(())
}
