//! App icon generation from a creature's artwork.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbaImage};

use crate::engine::data_client::CreatureApi;
use crate::worker::network::Network;
use crate::worker::request::AssetRequest;

pub const ICON_SIZES: [u32; 2] = [192, 512];

/// Scale `source` to fit a transparent `size`×`size` canvas, keeping its
/// aspect ratio, and center it.
pub fn fit_to_square(source: &DynamicImage, size: u32) -> RgbaImage {
    let (w, h) = (source.width().max(1), source.height().max(1));
    let ratio = (size as f32 / w as f32).min(size as f32 / h as f32);
    let new_w = ((w as f32 * ratio) as u32).clamp(1, size);
    let new_h = ((h as f32 * ratio) as u32).clamp(1, size);

    let resized = imageops::resize(&source.to_rgba8(), new_w, new_h, FilterType::Lanczos3);
    let mut canvas = RgbaImage::new(size, size);
    imageops::overlay(
        &mut canvas,
        &resized,
        ((size - new_w) / 2) as i64,
        ((size - new_h) / 2) as i64,
    );
    canvas
}

pub fn write_png(image: &RgbaImage, path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut encoder = png::Encoder::new(BufWriter::new(file), image.width(), image.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(image.as_raw())?;
    Ok(())
}

/// Write `icon-192.png` and `icon-512.png` into `dir`.
pub fn export_icons(source: &DynamicImage, dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;

    let mut written = Vec::new();
    for size in ICON_SIZES {
        let path = dir.join(format!("icon-{size}.png"));
        write_png(&fit_to_square(source, size), &path)?;
        tracing::info!(path = %path.display(), "Saved icon");
        written.push(path);
    }
    Ok(written)
}

pub fn icons_for_creature(
    api: &dyn CreatureApi,
    assets: &dyn Network,
    id: u32,
    dir: &Path,
) -> Result<Vec<PathBuf>> {
    let record = api.fetch_primary(id)?;
    let url = record
        .sprite_url
        .ok_or_else(|| anyhow!("No sprite available for creature {id}"))?;

    let response = assets.fetch(&AssetRequest::image(url.clone()))?;
    if !response.is_success() {
        bail!("Failed to download {url}: {}", response.status);
    }
    let image = image::load_from_memory(&response.body)?;
    export_icons(&image, dir)
}
