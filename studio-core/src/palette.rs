//! Palettes - the sole color source for a generation.

use serde::{Deserialize, Serialize};

use crate::{Color, StudioError, StudioResult};

/// Minimum number of colors in a palette.
pub const MIN_COLORS: usize = 2;

/// Maximum number of colors in a palette.
pub const MAX_COLORS: usize = 8;

/// Named palettes offered to users as starting points.
const PRESETS: &[(&str, &[&str])] = &[
    ("sunset", &["#ff6b6b", "#feca57", "#ff9ff3", "#54a0ff", "#5f27cd"]),
    ("ocean", &["#0a3d62", "#3c6382", "#60a3bc", "#82ccdd"]),
    ("neon", &["#f72585", "#7209b7", "#3a0ca3", "#4361ee", "#4cc9f0"]),
    ("forest", &["#1b4332", "#2d6a4f", "#40916c", "#74c69d", "#d8f3dc"]),
    ("mono", &["#111111", "#555555", "#999999", "#eeeeee"]),
];

/// An ordered list of 2-8 distinct colors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Color>", into = "Vec<Color>")]
pub struct Palette {
    colors: Vec<Color>,
}

impl Palette {
    /// Create a palette, validating size and uniqueness.
    ///
    /// # Errors
    ///
    /// Returns [`StudioError::InvalidPalette`] if there are fewer than
    /// [`MIN_COLORS`] or more than [`MAX_COLORS`] colors, or duplicates.
    pub fn new(colors: Vec<Color>) -> StudioResult<Self> {
        validate(&colors)?;
        Ok(Self { colors })
    }

    /// Parse a comma-separated list of hex colors, e.g. `"#ff0000,#00ff00"`.
    ///
    /// # Errors
    ///
    /// Returns an error if any color fails to parse or the list is invalid.
    pub fn parse(list: &str) -> StudioResult<Self> {
        let colors = list
            .split(',')
            .filter(|s| !s.trim().is_empty())
            .map(Color::from_hex)
            .collect::<StudioResult<Vec<_>>>()?;
        Self::new(colors)
    }

    /// Look up a named preset.
    #[must_use]
    pub fn preset(name: &str) -> Option<Self> {
        let (_, hexes) = PRESETS
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))?;
        let colors = hexes
            .iter()
            .filter_map(|h| Color::from_hex(h).ok())
            .collect();
        Self::new(colors).ok()
    }

    /// Names of all presets.
    #[must_use]
    pub fn preset_names() -> Vec<&'static str> {
        PRESETS.iter().map(|(n, _)| *n).collect()
    }

    /// Resolve either a preset name or a hex list.
    ///
    /// # Errors
    ///
    /// Returns an error if `spec` is neither a preset nor a valid hex list.
    pub fn resolve(spec: &str) -> StudioResult<Self> {
        match Self::preset(spec) {
            Some(palette) => Ok(palette),
            None => Self::parse(spec),
        }
    }

    /// The colors in order.
    #[must_use]
    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    /// Number of colors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Always false for a valid palette; provided for API symmetry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Color at `index`, wrapping around the palette length.
    #[must_use]
    pub fn get_wrapped(&self, index: usize) -> Color {
        self.colors[index % self.colors.len()]
    }

    /// Append a color.
    ///
    /// # Errors
    ///
    /// Fails if the palette is full or already contains the color.
    pub fn push(&mut self, color: Color) -> StudioResult<()> {
        let mut next = self.colors.clone();
        next.push(color);
        validate(&next)?;
        self.colors = next;
        Ok(())
    }

    /// Remove the color at `index`.
    ///
    /// # Errors
    ///
    /// Fails if the index is out of range or the palette would drop below
    /// [`MIN_COLORS`].
    pub fn remove(&mut self, index: usize) -> StudioResult<Color> {
        if index >= self.colors.len() {
            return Err(StudioError::InvalidPalette(format!(
                "index {index} out of range for {} colors",
                self.colors.len()
            )));
        }
        let mut next = self.colors.clone();
        let removed = next.remove(index);
        validate(&next)?;
        self.colors = next;
        Ok(removed)
    }

    /// Replace the color at `index`.
    ///
    /// # Errors
    ///
    /// Fails if the index is out of range or the new color is a duplicate.
    pub fn replace(&mut self, index: usize, color: Color) -> StudioResult<Color> {
        if index >= self.colors.len() {
            return Err(StudioError::InvalidPalette(format!(
                "index {index} out of range for {} colors",
                self.colors.len()
            )));
        }
        let mut next = self.colors.clone();
        let old = std::mem::replace(&mut next[index], color);
        validate(&next)?;
        self.colors = next;
        Ok(old)
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colors: vec![
                Color::rgb(0xff, 0x6b, 0x6b),
                Color::rgb(0xfe, 0xca, 0x57),
                Color::rgb(0xff, 0x9f, 0xf3),
                Color::rgb(0x54, 0xa0, 0xff),
                Color::rgb(0x5f, 0x27, 0xcd),
            ],
        }
    }
}

impl TryFrom<Vec<Color>> for Palette {
    type Error = StudioError;

    fn try_from(colors: Vec<Color>) -> Result<Self, Self::Error> {
        Self::new(colors)
    }
}

impl From<Palette> for Vec<Color> {
    fn from(palette: Palette) -> Self {
        palette.colors
    }
}

fn validate(colors: &[Color]) -> StudioResult<()> {
    if colors.len() < MIN_COLORS || colors.len() > MAX_COLORS {
        return Err(StudioError::InvalidPalette(format!(
            "expected {MIN_COLORS}-{MAX_COLORS} colors, got {}",
            colors.len()
        )));
    }
    for (i, color) in colors.iter().enumerate() {
        if colors[..i].contains(color) {
            return Err(StudioError::InvalidPalette(format!(
                "duplicate color {color}"
            )));
        }
    }
    Ok(())
}
