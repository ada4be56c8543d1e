//! Generation parameters: the closed set of styles and the complexity knob.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{StudioError, StudioResult};

/// One of the six procedural raster-generation algorithms.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    /// Gradient background with translucent organic blobs.
    #[default]
    Abstract,
    /// Grid of circles, squares and triangles on black.
    Geometric,
    /// Diagonally banded 10px blocks with noise.
    Pixel,
    /// Particle system with distance-faded connections.
    Generative,
    /// Recursive circle packing.
    Fractal,
    /// Gradient with displaced strips and pixel noise.
    Glitch,
}

impl Style {
    /// Every style, in menu order.
    pub const ALL: [Self; 6] = [
        Self::Abstract,
        Self::Geometric,
        Self::Pixel,
        Self::Generative,
        Self::Fractal,
        Self::Glitch,
    ];

    /// Lowercase identifier used on the command line and in JSON.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Abstract => "abstract",
            Self::Geometric => "geometric",
            Self::Pixel => "pixel",
            Self::Generative => "generative",
            Self::Fractal => "fractal",
            Self::Glitch => "glitch",
        }
    }

    /// Human-readable name used in artifact attributes.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Abstract => "Abstract",
            Self::Geometric => "Geometric",
            Self::Pixel => "Pixel",
            Self::Generative => "Generative",
            Self::Fractal => "Fractal",
            Self::Glitch => "Glitch",
        }
    }

    /// Whether the style has a variant that transforms a source image.
    #[must_use]
    pub const fn supports_source_image(self) -> bool {
        matches!(self, Self::Abstract | Self::Glitch)
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Style {
    type Err = StudioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|style| style.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| StudioError::UnknownStyle(s.to_string()))
    }
}

/// Integer knob (1-10) scaling iteration, recursion and particle counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Complexity(u8);

impl Complexity {
    /// Lowest complexity.
    pub const MIN: u8 = 1;
    /// Highest complexity.
    pub const MAX: u8 = 10;

    /// Create a complexity value.
    ///
    /// # Errors
    ///
    /// Returns [`StudioError::InvalidComplexity`] outside `1..=10`.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn new(value: i64) -> StudioResult<Self> {
        if (i64::from(Self::MIN)..=i64::from(Self::MAX)).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(StudioError::InvalidComplexity {
                value,
                min: Self::MIN,
                max: Self::MAX,
            })
        }
    }

    /// Create a complexity value, clamping into range.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn saturating(value: i64) -> Self {
        Self(value.clamp(i64::from(Self::MIN), i64::from(Self::MAX)) as u8)
    }

    /// The raw value.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// The value as a `usize` multiplier.
    #[must_use]
    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl Default for Complexity {
    fn default() -> Self {
        Self(5)
    }
}

impl fmt::Display for Complexity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u8> for Complexity {
    type Error = StudioError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(i64::from(value))
    }
}

impl From<Complexity> for u8 {
    fn from(value: Complexity) -> Self {
        value.0
    }
}
