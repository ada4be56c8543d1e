//! Artifacts - persisted generation results with their metadata.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Complexity, Palette, Style, StudioResult};

/// Unique identifier for an artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArtifactId(Uuid);

impl ArtifactId {
    /// Create a new unique artifact ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create from an existing UUID.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Parse from the hyphenated string form.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Uuid::parse_str(s.trim()).ok().map(Self)
    }
}

impl Default for ArtifactId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Rarity tiers, in ascending order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rarity {
    /// Most frequent tier.
    Common,
    /// Second tier.
    Uncommon,
    /// Third tier.
    Rare,
    /// Fourth tier.
    Epic,
    /// Top tier.
    Legendary,
}

impl Rarity {
    /// All tiers in order.
    pub const ALL: [Self; 5] = [
        Self::Common,
        Self::Uncommon,
        Self::Rare,
        Self::Epic,
        Self::Legendary,
    ];

    /// Tier name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Common => "Common",
            Self::Uncommon => "Uncommon",
            Self::Rare => "Rare",
            Self::Epic => "Epic",
            Self::Legendary => "Legendary",
        }
    }

    /// Tier at `index` modulo the number of tiers.
    #[must_use]
    pub const fn from_index(index: usize) -> Self {
        Self::ALL[index % Self::ALL.len()]
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value of a metadata attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    /// Numeric value.
    Number(u64),
    /// Text value.
    Text(String),
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// A `{trait_type, value}` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    /// Attribute name.
    pub trait_type: String,
    /// Attribute value.
    pub value: AttributeValue,
}

impl Attribute {
    /// Text attribute.
    #[must_use]
    pub fn text(trait_type: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            trait_type: trait_type.into(),
            value: AttributeValue::Text(value.into()),
        }
    }

    /// Numeric attribute.
    #[must_use]
    pub fn number(trait_type: impl Into<String>, value: u64) -> Self {
        Self {
            trait_type: trait_type.into(),
            value: AttributeValue::Number(value),
        }
    }
}

/// Metadata record written next to an exported image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataRecord {
    /// Artwork name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Collection name.
    pub collection: String,
    /// Attributes.
    pub attributes: Vec<Attribute>,
    /// Image file name or data URI.
    pub image: String,
    /// ISO-8601 creation time.
    pub created_at: String,
}

impl MetadataRecord {
    /// Value of the first attribute named `trait_type`.
    #[must_use]
    pub fn attribute(&self, trait_type: &str) -> Option<&AttributeValue> {
        self.attributes
            .iter()
            .find(|a| a.trait_type == trait_type)
            .map(|a| &a.value)
    }
}

/// A saved generation result. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artifact {
    /// Unique identifier.
    pub id: ArtifactId,
    /// Encoded image bytes (PNG), base64 in JSON.
    #[serde(with = "base64_bytes")]
    pub raster: Vec<u8>,
    /// Style used.
    pub style: Style,
    /// Palette snapshot.
    pub palette: Palette,
    /// Complexity used.
    pub complexity: Complexity,
    /// Metadata attributes.
    pub attributes: Vec<Attribute>,
    /// ISO-8601 creation time.
    pub created_at: String,
}

impl Artifact {
    /// Create an artifact stamped with a fresh id and the current time.
    #[must_use]
    pub fn new(
        raster: Vec<u8>,
        style: Style,
        palette: Palette,
        complexity: Complexity,
        attributes: Vec<Attribute>,
    ) -> Self {
        Self {
            id: ArtifactId::new(),
            raster,
            style,
            palette,
            complexity,
            attributes,
            created_at: format_iso8601(current_timestamp_ms()),
        }
    }

    /// Pretty-printed JSON, the on-disk gallery format.
    ///
    /// # Errors
    ///
    /// Returns [`crate::StudioError::Serialization`] if encoding fails.
    pub fn to_json(&self) -> StudioResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse an artifact from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`crate::StudioError::Serialization`] for malformed JSON or
    /// fields that fail validation (e.g. an invalid palette).
    pub fn from_json(json: &str) -> StudioResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

mod base64_bytes {
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&base64::engine::general_purpose::STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        base64::engine::general_purpose::STANDARD
            .decode(s)
            .map_err(serde::de::Error::custom)
    }
}

/// Get the current Unix timestamp in milliseconds.
#[must_use]
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map_or(0, |d| {
        // Timestamp will not exceed u64 max for millennia
        #[allow(clippy::cast_possible_truncation)]
        {
            d.as_millis() as u64
        }
    })
}

/// Format a Unix timestamp in milliseconds as ISO-8601 UTC,
/// e.g. `2026-10-16T09:30:00.000Z`.
#[must_use]
#[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
pub fn format_iso8601(timestamp_ms: u64) -> String {
    let millis = timestamp_ms % 1000;
    let secs = timestamp_ms / 1000;
    let days = (secs / 86_400) as i64;
    let rem = secs % 86_400;
    let (hour, minute, second) = (rem / 3600, (rem % 3600) / 60, rem % 60);

    // Civil-from-days over 400-year eras.
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = doy - (153 * mp + 2) / 5 + 1;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = yoe + era * 400 + i64::from(month <= 2);

    format!("{year:04}-{month:02}-{day:02}T{hour:02}:{minute:02}:{second:02}.{millis:03}Z")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_iso8601_epoch() {
        assert_eq!(format_iso8601(0), "1970-01-01T00:00:00.000Z");
    }

    #[test]
    fn test_format_iso8601_known_dates() {
        // 2000-02-29T12:34:56.789Z
        assert_eq!(format_iso8601(951_827_696_789), "2000-02-29T12:34:56.789Z");
        // 2024-12-31T23:59:59.000Z
        assert_eq!(format_iso8601(1_735_689_599_000), "2024-12-31T23:59:59.000Z");
    }

    #[test]
    fn test_artifact_json_roundtrip_keeps_bytes() {
        let artifact = Artifact::new(
            vec![0x89, b'P', b'N', b'G', 0, 255],
            Style::Pixel,
            Palette::default(),
            Complexity::default(),
            vec![Attribute::text("Style", "Pixel"), Attribute::number("Complexity", 5)],
        );
        let json = serde_json::to_string(&artifact).expect("serialize");
        assert!(json.contains("\"style\":\"pixel\""));
        let back = Artifact::from_json(&json).expect("deserialize");
        assert_eq!(back, artifact);
    }

    #[test]
    fn test_from_json_reports_serialization_error() {
        let err = Artifact::from_json("{\"id\": 3}").expect_err("malformed");
        assert!(matches!(err, crate::StudioError::Serialization(_)));
        assert!(err.to_string().starts_with("Serialization error"));
    }

    #[test]
    fn test_attribute_value_untagged() {
        let json = serde_json::to_string(&Attribute::number("Complexity", 7)).expect("ser");
        assert_eq!(json, r#"{"trait_type":"Complexity","value":7}"#);
        let json = serde_json::to_string(&Attribute::text("Rarity", "Epic")).expect("ser");
        assert_eq!(json, r#"{"trait_type":"Rarity","value":"Epic"}"#);
    }

    #[test]
    fn test_rarity_order() {
        assert_eq!(Rarity::from_index(0), Rarity::Common);
        assert_eq!(Rarity::from_index(4), Rarity::Legendary);
        assert_eq!(Rarity::from_index(5), Rarity::Common);
        assert!(Rarity::Epic > Rarity::Rare);
    }

    #[test]
    fn test_artifact_id_parse() {
        let id = ArtifactId::new();
        assert_eq!(ArtifactId::parse(&id.to_string()), Some(id));
        assert_eq!(ArtifactId::parse("not-a-uuid"), None);
    }
}
