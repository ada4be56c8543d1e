//! # Studio Renderer
//!
//! Software rasteriser, wireframe projector and procedural art generators.
//!
//! ## Pipeline
//!
//! ```text
//! ┌──────────────┐    ┌──────────────┐
//! │  Projector   │    │ Style Engine │
//! │ (primitives) │    │  (6 styles)  │
//! └──────┬───────┘    └──────┬───────┘
//!        │     Surface trait │
//!        └────────┬──────────┘
//!                 ▼
//!          ┌─────────────┐     ┌──────────────────┐
//!          │   Raster    │ ──► │ Export / Gallery │
//!          └─────────────┘     └──────────────────┘
//! ```
//!
//! [`ModelViewer`] and [`ArtStudio`] are the tool boundaries: they turn
//! errors into [`Notice`]s for the UI.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod animation;
pub mod error;
pub mod export;
pub mod image;
pub mod notice;
pub mod projector;
pub mod raster;
pub mod studio;
pub mod style;
pub mod surface;
pub mod viewer;

pub use animation::{
    AnimationConfig, AnimationLoop, FrameHandle, FrameOutcome, FrameScheduler, ManualScheduler,
    PlaybackState,
};
pub use error::{RenderError, RenderResult};
pub use export::{ArtworkInfo, ExportBundle, GENERATION_TAG};
pub use notice::{Notice, NoticeLevel};
pub use projector::{project, Segment};
pub use raster::Raster;
pub use studio::ArtStudio;
pub use style::{GenerationRequest, StyleStats};
pub use surface::{LinearGradient, Paint, PixelBlock, Point, Rect, Surface};
pub use viewer::ModelViewer;
