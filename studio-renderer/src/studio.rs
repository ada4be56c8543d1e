//! Art studio tool: palette and style state, generation, gallery and export.
//!
//! This is the tool boundary. Every fallible action returns a [`Notice`]
//! instead of an error so the host can show it and carry on.

use rand::rngs::StdRng;
use rand::SeedableRng;
use studio_core::{
    Artifact, ArtifactId, Attribute, Color, Complexity, Gallery, Palette, Style, StudioError,
};
use tracing::{info, warn};

use crate::export::{build_attributes, snapshot, ArtworkInfo, ExportBundle};
use crate::image::load_source;
use crate::notice::Notice;
use crate::raster::Raster;
use crate::style::{GenerationRequest, StyleStats};
use crate::surface::Surface;

/// Default canvas side in pixels.
pub const DEFAULT_CANVAS_SIZE: u32 = 512;

/// Salt mixed into the seed for the metadata random source, so rarity draws
/// don't replay the first numbers the generator used.
const METADATA_SEED_SALT: u64 = 0x5eed_a77e;

/// A generated canvas and the settings that drew it.
#[derive(Debug)]
struct Generation {
    raster: Raster,
    style: Style,
    palette: Palette,
    complexity: Complexity,
    attributes: Vec<Attribute>,
    stats: StyleStats,
}

/// Interactive state of the art studio.
#[derive(Debug)]
pub struct ArtStudio {
    width: u32,
    height: u32,
    style: Style,
    palette: Palette,
    complexity: Complexity,
    seed: Option<u64>,
    source: Option<Raster>,
    last: Option<Generation>,
    gallery: Gallery,
}

impl ArtStudio {
    /// Create a studio drawing at `width × height` into the given gallery.
    #[must_use]
    pub fn new(width: u32, height: u32, gallery: Gallery) -> Self {
        Self {
            width,
            height,
            style: Style::default(),
            palette: Palette::default(),
            complexity: Complexity::default(),
            seed: None,
            source: None,
            last: None,
            gallery,
        }
    }

    /// Selected style.
    #[must_use]
    pub fn style(&self) -> Style {
        self.style
    }

    /// Select a style.
    pub fn set_style(&mut self, style: Style) {
        self.style = style;
    }

    /// Current palette.
    #[must_use]
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Replace the palette from a preset name or a comma-separated hex list.
    ///
    /// # Errors
    ///
    /// Returns an error notice if the palette is invalid; the old one stays.
    pub fn set_palette(&mut self, spec: &str) -> Result<(), Notice> {
        self.palette = Palette::resolve(spec).map_err(input_error)?;
        Ok(())
    }

    /// Append a color to the palette.
    ///
    /// # Errors
    ///
    /// Returns an error notice for a bad color, a duplicate, or a full
    /// palette.
    pub fn add_color(&mut self, hex: &str) -> Result<(), Notice> {
        let color = Color::from_hex(hex).map_err(input_error)?;
        self.palette.push(color).map_err(input_error)
    }

    /// Remove the color at `index`.
    ///
    /// # Errors
    ///
    /// Returns an error notice if the index is out of range or the palette
    /// would drop below its minimum size.
    pub fn remove_color(&mut self, index: usize) -> Result<Color, Notice> {
        self.palette.remove(index).map_err(input_error)
    }

    /// Current complexity.
    #[must_use]
    pub fn complexity(&self) -> Complexity {
        self.complexity
    }

    /// Set the complexity.
    ///
    /// # Errors
    ///
    /// Returns an error notice if `value` is outside 1 to 10.
    pub fn set_complexity(&mut self, value: i64) -> Result<(), Notice> {
        self.complexity = Complexity::new(value).map_err(input_error)?;
        Ok(())
    }

    /// Fix the random seed for reproducible output, or clear it.
    pub fn set_seed(&mut self, seed: Option<u64>) {
        self.seed = seed;
    }

    /// Load a source image from a `data:` URI or a path.
    ///
    /// On failure the studio keeps drawing procedurally and the returned
    /// notice is a warning.
    pub fn load_source(&mut self, spec: &str) -> Notice {
        match load_source(spec) {
            Ok(raster) => {
                let notice = Notice::info(format!(
                    "Loaded a {}x{} source image",
                    raster.width(),
                    raster.height()
                ));
                self.source = Some(raster);
                notice
            }
            Err(e) => {
                warn!("Source image rejected, falling back to procedural: {e}");
                self.source = None;
                Notice::from(e)
            }
        }
    }

    /// Drop the source image.
    pub fn clear_source(&mut self) {
        self.source = None;
    }

    /// Whether a source image is loaded.
    #[must_use]
    pub fn has_source(&self) -> bool {
        self.source.is_some()
    }

    /// Generate a fresh canvas with the current settings.
    ///
    /// The settings and attributes are captured with the canvas, so later
    /// setting changes don't leak into `save` or `export`.
    ///
    /// # Errors
    ///
    /// Returns an error notice if the canvas can't be drawn; the previous
    /// canvas is kept.
    pub fn generate(&mut self) -> Result<StyleStats, Notice> {
        let mut raster = Raster::new(self.width, self.height);
        let stats = GenerationRequest::new(self.style, &self.palette)
            .with_complexity(self.complexity)
            .with_source(self.source.as_ref())
            .with_seed(self.seed)
            .generate(&mut raster)?;
        self.last = Some(Generation {
            raster,
            style: self.style,
            palette: self.palette.clone(),
            complexity: self.complexity,
            attributes: self.attributes(),
            stats,
        });
        Ok(stats)
    }

    /// The last generated canvas.
    #[must_use]
    pub fn canvas(&self) -> Option<&Raster> {
        self.last.as_ref().map(|g| &g.raster)
    }

    /// Stats of the last generation.
    #[must_use]
    pub fn last_stats(&self) -> Option<StyleStats> {
        self.last.as_ref().map(|g| g.stats)
    }

    fn attributes(&self) -> Vec<Attribute> {
        match self.seed {
            Some(seed) => {
                let mut rng = StdRng::seed_from_u64(seed ^ METADATA_SEED_SALT);
                build_attributes(self.style, self.complexity, &self.palette, &mut rng)
            }
            None => build_attributes(
                self.style,
                self.complexity,
                &self.palette,
                &mut rand::thread_rng(),
            ),
        }
    }

    fn last_generation(&self) -> Result<(&Generation, Vec<u8>), Notice> {
        let last = self
            .last
            .as_ref()
            .ok_or_else(|| Notice::error("Generate an artwork first"))?;
        Ok((last, snapshot(&last.raster)?))
    }

    /// Save the last generated canvas to the gallery.
    ///
    /// # Errors
    ///
    /// Returns an error notice if nothing has been generated or encoding fails.
    pub fn save(&self) -> Result<ArtifactId, Notice> {
        let (last, png) = self.last_generation()?;
        let artifact = Artifact::new(
            png,
            last.style,
            last.palette.clone(),
            last.complexity,
            last.attributes.clone(),
        );
        let id = self.gallery.append(artifact);
        info!(%id, style = %last.style, "Saved artwork to gallery");
        Ok(id)
    }

    /// Build a download bundle for the last generated canvas.
    ///
    /// # Errors
    ///
    /// Returns an error notice if nothing has been generated or encoding fails.
    pub fn export(&self, info: &ArtworkInfo) -> Result<ExportBundle, Notice> {
        let (last, png) = self.last_generation()?;
        Ok(ExportBundle::new(info, png, last.attributes.clone()))
    }

    /// The gallery.
    #[must_use]
    pub fn gallery(&self) -> &Gallery {
        &self.gallery
    }

    /// Delete a saved artwork.
    ///
    /// # Errors
    ///
    /// Returns an error notice if the artwork doesn't exist or its file can't
    /// be removed.
    pub fn delete(&self, id: ArtifactId) -> Result<(), Notice> {
        self.gallery
            .remove(id)
            .map(|_| ())
            .map_err(|e| Notice::error(e.to_string()))
    }
}

fn input_error(err: StudioError) -> Notice {
    Notice::error(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notice::NoticeLevel;

    fn studio() -> ArtStudio {
        let mut studio = ArtStudio::new(64, 64, Gallery::new());
        studio.set_seed(Some(12));
        studio
    }

    #[test]
    fn test_save_requires_generation() {
        let studio = studio();
        let err = studio.save().expect_err("nothing generated");
        assert!(err.is_error());
    }

    #[test]
    fn test_generate_save_delete() {
        let mut studio = studio();
        studio.set_style(Style::Pixel);
        studio.generate().expect("generate");
        let id = studio.save().expect("save");
        assert_eq!(studio.gallery().len(), 1);

        let artifact = studio.gallery().get(id).expect("artifact");
        assert_eq!(artifact.style, Style::Pixel);
        assert_eq!(artifact.attributes.len(), 5);
        assert_eq!(&artifact.raster[1..4], b"PNG");

        studio.delete(id).expect("delete");
        assert!(studio.gallery().is_empty());
        assert!(studio.delete(id).is_err());
    }

    #[test]
    fn test_invalid_inputs_keep_state() {
        let mut studio = studio();
        assert!(studio.set_complexity(11).is_err());
        assert_eq!(studio.complexity(), Complexity::default());
        assert!(studio.set_palette("#fff").is_err());
        assert_eq!(studio.palette(), &Palette::default());
        assert!(studio.add_color("not-a-color").is_err());
    }

    #[test]
    fn test_bad_source_falls_back_with_warning() {
        let mut studio = studio();
        let notice = studio.load_source("data:image/png;base64,AAAA");
        assert_eq!(notice.level, NoticeLevel::Warning);
        assert!(!studio.has_source());
        studio.set_style(Style::Glitch);
        let stats = studio.generate().expect("procedural fallback");
        assert!(!stats.used_source);
    }

    #[test]
    fn test_zero_canvas_reports_error() {
        let mut studio = ArtStudio::new(0, 0, Gallery::new());
        let notice = studio.generate().expect_err("no canvas");
        assert!(notice.is_error());
        assert!(studio.canvas().is_none());
    }

    #[test]
    fn test_export_bundle_names_files_from_title() {
        let mut studio = studio();
        studio.set_style(Style::Geometric);
        studio.generate().expect("generate");
        let bundle = studio.export(&ArtworkInfo::named("Grid One")).expect("export");
        assert_eq!(bundle.image_file, "grid-one.png");
        assert_eq!(
            bundle.metadata.attribute("Style").map(ToString::to_string),
            Some("Geometric".to_string())
        );
        let canvas = studio.canvas().expect("canvas");
        assert_eq!((canvas.width(), canvas.height()), (64, 64));
    }

    #[test]
    fn test_later_setting_changes_do_not_rewrite_last_generation() {
        let mut studio = ArtStudio::new(32, 32, Gallery::new());
        studio.set_style(Style::Pixel);
        studio.set_complexity(3).expect("complexity");
        studio.set_palette("sunset").expect("palette");
        let generated_palette = studio.palette().clone();
        studio.generate().expect("generate");

        studio.set_style(Style::Glitch);
        studio.set_complexity(9).expect("complexity");
        studio.set_palette("#000000,#ffffff").expect("palette");

        let id = studio.save().expect("save");
        let artifact = studio.gallery().get(id).expect("artifact");
        assert_eq!(artifact.style, Style::Pixel);
        assert_eq!(artifact.complexity.get(), 3);
        assert_eq!(artifact.palette, generated_palette);

        let bundle = studio.export(&ArtworkInfo::named("Blocks")).expect("export");
        assert_eq!(bundle.metadata.attributes, artifact.attributes);
        assert_eq!(
            bundle.metadata.attribute("Style").map(ToString::to_string),
            Some("Pixel".to_string())
        );
        assert_eq!(
            bundle.metadata.attribute("Palette").map(ToString::to_string),
            Some(format!("{} colors", generated_palette.len()))
        );
    }

    #[test]
    fn test_unseeded_save_and_export_share_rarity() {
        let mut studio = ArtStudio::new(16, 16, Gallery::new());
        studio.generate().expect("generate");
        for _ in 0..20 {
            let id = studio.save().expect("save");
            let saved = studio.gallery().get(id).expect("artifact");
            let bundle = studio.export(&ArtworkInfo::default()).expect("export");
            assert_eq!(
                saved.attributes.iter().find(|a| a.trait_type == "Rarity"),
                bundle.metadata.attributes.iter().find(|a| a.trait_type == "Rarity")
            );
        }
    }
}
