use anyhow::{bail, Result};

use crate::worker::network::Network;
use crate::worker::request::AssetRequest;

/// Decoded RGBA artwork, ready to upload as a texture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

pub fn decode_sprite(bytes: &[u8]) -> Result<SpriteImage> {
    let image = image::load_from_memory(bytes)?.to_rgba8();
    Ok(SpriteImage {
        width: image.width(),
        height: image.height(),
        rgba: image.into_raw(),
    })
}

/// Download an image through `assets` (normally the worker registration) and
/// decode it.
pub fn load_sprite(assets: &dyn Network, url: &str) -> Result<SpriteImage> {
    let response = assets.fetch(&AssetRequest::image(url))?;
    if !response.is_success() {
        bail!("image {url} answered {}", response.status);
    }
    decode_sprite(&response.body)
}
