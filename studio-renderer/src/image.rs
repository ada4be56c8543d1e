//! Source image loading for the image-based style variants.
//!
//! Sources can be raw encoded bytes, a `data:` URI, or a file path. Anything
//! the `image` crate can decode (PNG, JPEG, GIF, WebP, BMP) is accepted.

use std::path::Path;

use base64::Engine;
use image::imageops::FilterType;
use tracing::debug;

use crate::raster::Raster;
use crate::surface::Surface;
use crate::{RenderError, RenderResult};

/// Decode an encoded image into a [`Raster`].
///
/// # Errors
///
/// Returns [`RenderError::SourceImageLoad`] if the bytes cannot be decoded.
pub fn load_from_bytes(data: &[u8]) -> RenderResult<Raster> {
    let img = image::load_from_memory(data)
        .map_err(|e| RenderError::SourceImageLoad(format!("Failed to decode image: {e}")))?;
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    debug!(width, height, "Decoded source image");
    Raster::from_rgba(width, height, rgba.into_raw())
}

/// Decode a base64 `data:` URI, e.g. `data:image/png;base64,iVBORw0...`.
///
/// # Errors
///
/// Returns [`RenderError::SourceImageLoad`] if the URI is malformed, not
/// base64, or doesn't hold a decodable image.
pub fn load_from_data_uri(uri: &str) -> RenderResult<Raster> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| RenderError::SourceImageLoad("Not a data URI".to_string()))?;
    let (metadata, payload) = rest.split_once(',').ok_or_else(|| {
        RenderError::SourceImageLoad("Invalid data URI: missing comma".to_string())
    })?;
    if !metadata.ends_with(";base64") {
        return Err(RenderError::SourceImageLoad(
            "Only base64 data URIs are supported".to_string(),
        ));
    }
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|e| RenderError::SourceImageLoad(format!("Failed to decode base64: {e}")))?;
    load_from_bytes(&bytes)
}

/// Read and decode an image file.
///
/// # Errors
///
/// Returns [`RenderError::SourceImageLoad`] if the file can't be read or
/// decoded.
pub fn load_from_path(path: impl AsRef<Path>) -> RenderResult<Raster> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|e| {
        RenderError::SourceImageLoad(format!("Failed to read {}: {e}", path.display()))
    })?;
    load_from_bytes(&bytes)
}

/// Load from either a `data:` URI or a file path.
///
/// # Errors
///
/// See [`load_from_data_uri`] and [`load_from_path`].
pub fn load_source(spec: &str) -> RenderResult<Raster> {
    if spec.starts_with("data:") {
        load_from_data_uri(spec)
    } else {
        load_from_path(spec)
    }
}

/// Stretch a raster to exactly `width × height`.
#[must_use]
pub fn fit_to(source: &Raster, width: u32, height: u32) -> Raster {
    if source.width() == width && source.height() == height {
        return source.clone();
    }
    let Some(img) =
        image::RgbaImage::from_raw(source.width(), source.height(), source.data().to_vec())
    else {
        return Raster::new(width, height);
    };
    let resized = image::imageops::resize(&img, width, height, FilterType::Triangle);
    Raster::from_rgba(width, height, resized.into_raw())
        .unwrap_or_else(|_| Raster::new(width, height))
}
