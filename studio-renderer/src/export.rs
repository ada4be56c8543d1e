//! Artwork export: snapshots, metadata records and download bundles.
//!
//! Every export carries the same four deterministic attributes (style,
//! complexity, palette size, generator tag) plus one uniformly drawn rarity.

use std::path::{Path, PathBuf};

use base64::Engine;
use rand::Rng;
use studio_core::{
    current_timestamp_ms, format_iso8601, Artifact, Attribute, Complexity, MetadataRecord, Palette,
    Rarity, Style,
};
use tracing::info;

use crate::surface::Surface;
use crate::{RenderError, RenderResult};

/// Fixed generator tag recorded on every export.
pub const GENERATION_TAG: &str = "procedural-v1";

/// Collection name used when none is given.
pub const DEFAULT_COLLECTION: &str = "Procedural Studio";

/// Fallback slug for names with no usable characters.
const FALLBACK_SLUG: &str = "artwork";

/// Encode the surface as PNG.
///
/// # Errors
///
/// Returns [`RenderError::SurfaceUnavailable`] for an empty surface or
/// [`RenderError::Encode`] if encoding fails.
pub fn snapshot<S: Surface + ?Sized>(surface: &S) -> RenderResult<Vec<u8>> {
    surface.to_encoded_image()
}

/// Wrap PNG bytes in a `data:` URI.
#[must_use]
pub fn data_uri(png: &[u8]) -> String {
    format!(
        "data:image/png;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(png)
    )
}

/// One rarity tier, drawn uniformly.
pub fn draw_rarity<R: Rng + ?Sized>(rng: &mut R) -> Rarity {
    Rarity::from_index(rng.gen_range(0..Rarity::ALL.len()))
}

/// The export attributes: `Style`, `Complexity`, `Palette`, `Generator` and
/// one `Rarity`, in that order.
pub fn build_attributes<R: Rng + ?Sized>(
    style: Style,
    complexity: Complexity,
    palette: &Palette,
    rng: &mut R,
) -> Vec<Attribute> {
    vec![
        Attribute::text("Style", style.display_name()),
        Attribute::number("Complexity", u64::from(complexity.get())),
        Attribute::text("Palette", format!("{} colors", palette.len())),
        Attribute::text("Generator", GENERATION_TAG),
        Attribute::text("Rarity", draw_rarity(rng).as_str()),
    ]
}

/// Lowercase ASCII alphanumerics joined by single dashes.
#[must_use]
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug
    }
}

/// User-facing details of an artwork.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtworkInfo {
    /// Artwork name (also the file name stem after slugging).
    pub name: String,
    /// Description.
    pub description: String,
    /// Collection name.
    pub collection: String,
}

impl ArtworkInfo {
    /// Info with a name, an empty description and the default collection.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            collection: DEFAULT_COLLECTION.to_string(),
        }
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the collection.
    #[must_use]
    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }
}

impl Default for ArtworkInfo {
    fn default() -> Self {
        Self::named("Untitled")
    }
}

/// An image plus its metadata, ready to download.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportBundle {
    /// `<slug>.png`
    pub image_file: String,
    /// PNG bytes.
    pub image: Vec<u8>,
    /// `<slug>-metadata.json`
    pub metadata_file: String,
    /// Metadata record.
    pub metadata: MetadataRecord,
}

impl ExportBundle {
    /// Build a bundle from PNG bytes and attributes, stamped with the current
    /// time.
    #[must_use]
    pub fn new(info: &ArtworkInfo, image: Vec<u8>, attributes: Vec<Attribute>) -> Self {
        let slug = slugify(&info.name);
        let image_file = format!("{slug}.png");
        Self {
            metadata_file: format!("{slug}-metadata.json"),
            metadata: MetadataRecord {
                name: info.name.clone(),
                description: info.description.clone(),
                collection: info.collection.clone(),
                attributes,
                image: image_file.clone(),
                created_at: format_iso8601(current_timestamp_ms()),
            },
            image_file,
            image,
        }
    }

    /// Build a bundle from a saved artifact, keeping its timestamp.
    #[must_use]
    pub fn from_artifact(info: &ArtworkInfo, artifact: &Artifact) -> Self {
        let mut bundle = Self::new(info, artifact.raster.clone(), artifact.attributes.clone());
        bundle.metadata.created_at.clone_from(&artifact.created_at);
        bundle
    }

    /// Pretty-printed metadata JSON.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Encode`] if serialization fails.
    pub fn metadata_json(&self) -> RenderResult<String> {
        serde_json::to_string_pretty(&self.metadata)
            .map_err(|e| RenderError::Encode(format!("metadata serialization failed: {e}")))
    }

    /// Write both files into `dir`, creating it if needed. Returns the image
    /// and metadata paths.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or either file can't be written.
    pub fn write_to_dir(&self, dir: impl AsRef<Path>) -> RenderResult<(PathBuf, PathBuf)> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        let image_path = dir.join(&self.image_file);
        let metadata_path = dir.join(&self.metadata_file);
        std::fs::write(&image_path, &self.image)?;
        std::fs::write(&metadata_path, self.metadata_json()?)?;
        info!(
            image = %image_path.display(),
            metadata = %metadata_path.display(),
            "Exported artwork"
        );
        Ok((image_path, metadata_path))
    }
}
