//! # Studio Core
//!
//! Data model for the procedural visual-content engine shared by the model
//! viewer and the art studio.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                 studio-core                 │
//! ├─────────────────────────────────────────────┤
//! │  Viewer model    │  Generation model        │
//! │  - Primitive     │  - Style                 │
//! │  - Transform     │  - Palette / Color       │
//! │                  │  - Complexity            │
//! ├─────────────────────────────────────────────┤
//! │  Artifacts       │  Gallery                 │
//! │  - Metadata      │  - append/list/remove    │
//! │  - Attributes    │  - JSON persistence      │
//! └─────────────────────────────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod artifact;
pub mod color;
pub mod error;
pub mod gallery;
pub mod palette;
pub mod primitive;
pub mod style;
pub mod transform;

pub use artifact::{
    current_timestamp_ms, format_iso8601, Artifact, ArtifactId, Attribute, AttributeValue,
    MetadataRecord, Rarity,
};
pub use color::Color;
pub use error::{StudioError, StudioResult};
pub use gallery::{Gallery, StoreError};
pub use palette::Palette;
pub use primitive::{ParametricShape, Primitive, PrimitiveKind, Vec3, BUILTIN_PRIMITIVES};
pub use style::{Complexity, Style};
pub use transform::{Rotation, Transform};

/// Studio core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
