//! # Studio CLI
//!
//! Command-line host for the procedural studio: generate artwork, render and
//! animate wireframes, and manage the saved gallery.
//!
//! ## Usage
//!
//! ```bash
//! studio generate --style fractal --complexity 8 --palette neon --out ./art
//! studio project torus --rotate-y 30 --out torus.png
//! STUDIO_GALLERY_DIR=~/.studio studio generate --save
//! studio --gallery-dir ~/.studio gallery list
//! ```
//!
//! ## Architecture
//!
//! - `CliArgs` - arguments parsed with clap, with environment fallbacks
//! - `StudioConfig` / `ViewerConfig` - plain configuration built from the args
//! - `commands` - runs one subcommand against the renderer's tool facades

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]

pub mod commands;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use studio_core::{Color, Style, Transform};
use studio_renderer::AnimationConfig;

/// Default canvas side in pixels.
pub const DEFAULT_SIZE: u32 = 512;

/// Default complexity.
pub const DEFAULT_COMPLEXITY: i64 = 5;

/// Default palette preset.
pub const DEFAULT_PALETTE: &str = "sunset";

/// Command-line arguments for the studio.
#[derive(Debug, Clone, Parser)]
#[command(name = "studio")]
#[command(about = "Procedural art studio and wireframe viewer")]
#[command(version)]
pub struct CliArgs {
    /// Directory holding saved artworks (one JSON file each)
    #[arg(long, env = "STUDIO_GALLERY_DIR", global = true)]
    pub gallery_dir: Option<PathBuf>,

    /// Seed for reproducible output
    #[arg(long, env = "STUDIO_SEED", global = true)]
    pub seed: Option<u64>,

    /// Canvas width in pixels
    #[arg(long, default_value_t = DEFAULT_SIZE, global = true)]
    pub width: u32,

    /// Canvas height in pixels
    #[arg(long, default_value_t = DEFAULT_SIZE, global = true)]
    pub height: u32,

    /// What to do
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Generate an artwork and export it as PNG plus metadata JSON
    Generate(GenerateArgs),
    /// Render a single wireframe frame to PNG
    Project(ViewerArgs),
    /// Auto-rotate a wireframe for a number of frames and save the last one
    Animate {
        /// View settings
        #[command(flatten)]
        view: ViewerArgs,
        /// Frames to run (one degree of rotation each)
        #[arg(long, default_value_t = 360)]
        frames: usize,
    },
    /// Manage saved artworks
    Gallery {
        /// Gallery action
        #[command(subcommand)]
        action: GalleryAction,
    },
    /// List styles, palette presets and primitives
    Catalog,
}

/// Options for `generate`.
#[derive(Debug, Clone, Args)]
pub struct GenerateArgs {
    /// Style: abstract, geometric, pixel, generative, fractal or glitch
    #[arg(long)]
    pub style: Option<Style>,

    /// Palette preset name or comma-separated hex colors
    #[arg(long)]
    pub palette: Option<String>,

    /// Complexity from 1 to 10
    #[arg(long, allow_negative_numbers = true)]
    pub complexity: Option<i64>,

    /// Source image path or data URI for the image-based variants
    #[arg(long)]
    pub source: Option<String>,

    /// Artwork name
    #[arg(long)]
    pub name: Option<String>,

    /// Artwork description
    #[arg(long, default_value = "")]
    pub description: String,

    /// Output directory for the PNG and metadata JSON
    #[arg(long, short, default_value = ".")]
    pub out: PathBuf,

    /// Also save the artwork to the gallery
    #[arg(long)]
    pub save: bool,
}

/// View options shared by `project` and `animate`.
#[derive(Debug, Clone, Args)]
pub struct ViewerArgs {
    /// Primitive: cube, pyramid, sphere, cylinder, torus or star
    #[arg(default_value = "cube")]
    pub primitive: String,

    /// Rotation around X in degrees
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub rotate_x: f32,

    /// Rotation around Y in degrees
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub rotate_y: f32,

    /// Zoom (0.5 to 3)
    #[arg(long, default_value_t = 1.0)]
    pub zoom: f32,

    /// Scale
    #[arg(long, default_value_t = 1.0)]
    pub scale: f32,

    /// Horizontal offset in pixels
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub pan_x: f32,

    /// Vertical offset in pixels
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub pan_y: f32,

    /// Background color as hex (default: dark slate)
    #[arg(long)]
    pub background: Option<Color>,

    /// Output PNG path
    #[arg(long, short, default_value = "wireframe.png")]
    pub out: PathBuf,
}

/// Gallery subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum GalleryAction {
    /// List saved artworks, newest first
    List,
    /// Delete a saved artwork
    Remove {
        /// Artwork id
        id: String,
    },
    /// Write a saved artwork's PNG and metadata JSON
    Export {
        /// Artwork id
        id: String,
        /// Artwork name used for file names
        #[arg(long)]
        name: Option<String>,
        /// Output directory
        #[arg(long, short, default_value = ".")]
        out: PathBuf,
    },
}

/// Art studio configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct StudioConfig {
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Style to generate.
    pub style: Style,
    /// Palette preset or hex list.
    pub palette: String,
    /// Complexity, validated when applied.
    pub complexity: i64,
    /// Seed for reproducible output.
    pub seed: Option<u64>,
    /// Gallery directory.
    pub gallery_dir: Option<PathBuf>,
    /// Source image path or data URI.
    pub source: Option<String>,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl StudioConfig {
    /// Configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            width: DEFAULT_SIZE,
            height: DEFAULT_SIZE,
            style: Style::default(),
            palette: DEFAULT_PALETTE.to_string(),
            complexity: DEFAULT_COMPLEXITY,
            seed: None,
            gallery_dir: None,
            source: None,
        }
    }

    /// Apply `generate` options over this configuration.
    #[must_use]
    pub fn with_generate_args(mut self, args: &GenerateArgs) -> Self {
        if let Some(style) = args.style {
            self.style = style;
        }
        if let Some(palette) = &args.palette {
            self.palette.clone_from(palette);
        }
        if let Some(complexity) = args.complexity {
            self.complexity = complexity;
        }
        self.source.clone_from(&args.source);
        self
    }
}

impl From<&CliArgs> for StudioConfig {
    fn from(args: &CliArgs) -> Self {
        let config = Self {
            width: args.width,
            height: args.height,
            seed: args.seed,
            gallery_dir: args.gallery_dir.clone(),
            ..Self::new()
        };
        match &args.command {
            Command::Generate(generate) => config.with_generate_args(generate),
            _ => config,
        }
    }
}

/// Model viewer configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerConfig {
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Primitive id.
    pub primitive: String,
    /// Rotation around X and Y in degrees.
    pub rotation: (f32, f32),
    /// Zoom.
    pub zoom: f32,
    /// Scale.
    pub scale: f32,
    /// Translation in pixels.
    pub pan: (f32, f32),
    /// Per-frame drawing options.
    pub animation: AnimationConfig,
}

impl ViewerConfig {
    /// Configuration with default values for a canvas size.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            primitive: "cube".to_string(),
            rotation: (0.0, 0.0),
            zoom: 1.0,
            scale: 1.0,
            pan: (0.0, 0.0),
            animation: AnimationConfig::default(),
        }
    }

    /// Build from the global args and the view options.
    #[must_use]
    pub fn from_args(args: &CliArgs, view: &ViewerArgs) -> Self {
        let mut config = Self {
            primitive: view.primitive.to_lowercase(),
            rotation: (view.rotate_x, view.rotate_y),
            zoom: view.zoom,
            scale: view.scale,
            pan: (view.pan_x, view.pan_y),
            ..Self::new(args.width, args.height)
        };
        if let Some(background) = view.background {
            config.animation.background = background;
        }
        config
    }

    /// The transform described by this configuration.
    #[must_use]
    pub fn transform(&self) -> Transform {
        Transform::new()
            .with_scale(self.scale)
            .with_zoom(self.zoom)
            .with_rotation(self.rotation.0, self.rotation.1, 0.0)
            .with_translation(self.pan.0, self.pan.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_args_override_defaults() {
        let args = CliArgs::try_parse_from([
            "studio",
            "--seed",
            "7",
            "generate",
            "--style",
            "fractal",
            "--complexity",
            "9",
            "--palette",
            "neon",
        ])
        .expect("parse");
        let config = StudioConfig::from(&args);
        assert_eq!(config.style, Style::Fractal);
        assert_eq!(config.complexity, 9);
        assert_eq!(config.palette, "neon");
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.width, DEFAULT_SIZE);
    }

    #[test]
    fn test_defaults() {
        let args = CliArgs::try_parse_from(["studio", "generate"]).expect("parse");
        let config = StudioConfig::from(&args);
        assert_eq!(config.style, Style::Abstract);
        assert_eq!(config.palette, DEFAULT_PALETTE);
        assert_eq!(config.complexity, DEFAULT_COMPLEXITY);
        assert_eq!((config.width, config.height), (512, 512));
    }

    #[test]
    fn test_unknown_style_rejected_by_parser() {
        let result = CliArgs::try_parse_from(["studio", "generate", "--style", "cubism"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_viewer_config_from_args() {
        let args = CliArgs::try_parse_from([
            "studio",
            "--width",
            "300",
            "project",
            "Torus",
            "--rotate-y",
            "-45",
            "--zoom",
            "2",
            "--background",
            "#ffffff",
        ])
        .expect("parse");
        let Command::Project(view) = &args.command else {
            panic!("expected project");
        };
        let config = ViewerConfig::from_args(&args, view);
        assert_eq!(config.primitive, "torus");
        assert_eq!(config.width, 300);
        assert!((config.rotation.1 + 45.0).abs() < f32::EPSILON);
        assert!((config.zoom - 2.0).abs() < f32::EPSILON);
        assert_eq!(config.animation.background, Color::WHITE);
        assert!((config.transform().rotation().y - 315.0).abs() < 1e-4);
    }

    #[test]
    fn test_gallery_subcommands_parse() {
        let args = CliArgs::try_parse_from(["studio", "gallery", "remove", "abc"]).expect("parse");
        assert!(matches!(
            args.command,
            Command::Gallery {
                action: GalleryAction::Remove { .. }
            }
        ));
    }
}
