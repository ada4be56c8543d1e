//! Primitives - named 3D shape definitions for the model viewer.
//!
//! Mesh shapes (cube, pyramid) carry vertices in local `[-1, 1]^3` space and
//! edge index pairs; they are truly rotated and projected. Curved shapes
//! (sphere, cylinder, torus, star) carry only a parametric rule and are
//! approximated directly in screen space by the projector.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Color, StudioError, StudioResult};

/// A 3D vector in local primitive space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    /// X component.
    pub x: f32,
    /// Y component.
    pub y: f32,
    /// Z component.
    pub z: f32,
}

impl Vec3 {
    /// Create a new vector.
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Zero vector.
    #[must_use]
    pub const fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// Scale vector by a scalar.
    #[must_use]
    pub fn scale(&self, s: f32) -> Self {
        Self::new(self.x * s, self.y * s, self.z * s)
    }
}

impl Default for Vec3 {
    fn default() -> Self {
        Self::zero()
    }
}

/// Curved shapes drawn as 2D approximations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParametricShape {
    /// Outline circle with stacked latitude ellipses and meridians.
    Sphere,
    /// Two elliptical caps joined by straight sides.
    Cylinder,
    /// Concentric ellipses with tube cross-sections.
    Torus,
    /// Five-pointed polar star polygon.
    Star,
}

/// The geometry of a primitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PrimitiveKind {
    /// Vertex list plus edges referencing it.
    Mesh {
        /// Vertices in local `[-1, 1]^3` space.
        vertices: Vec<Vec3>,
        /// Pairs of vertex indices.
        edges: Vec<(usize, usize)>,
    },
    /// A parametric draw rule.
    Parametric {
        /// Which rule.
        shape: ParametricShape,
    },
}

/// A named 3D shape definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Primitive {
    /// Stable identifier (lowercase name).
    pub id: String,
    /// Display name.
    pub name: String,
    /// Stroke color for the wireframe.
    pub color: Color,
    /// Geometry.
    pub kind: PrimitiveKind,
}

/// Identifiers of the built-in catalogue, in menu order.
pub const BUILTIN_PRIMITIVES: [&str; 6] = ["cube", "pyramid", "sphere", "cylinder", "torus", "star"];

impl Primitive {
    /// Create a mesh primitive. Call [`Primitive::validate`] before use if the
    /// data comes from outside.
    #[must_use]
    pub fn mesh(
        id: impl Into<String>,
        name: impl Into<String>,
        color: Color,
        vertices: Vec<Vec3>,
        edges: Vec<(usize, usize)>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color,
            kind: PrimitiveKind::Mesh { vertices, edges },
        }
    }

    /// Create a parametric primitive.
    #[must_use]
    pub fn parametric(
        id: impl Into<String>,
        name: impl Into<String>,
        color: Color,
        shape: ParametricShape,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color,
            kind: PrimitiveKind::Parametric { shape },
        }
    }

    /// Unit cube: 8 vertices, 12 edges.
    #[must_use]
    pub fn cube() -> Self {
        let vertices = vec![
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(1.0, -1.0, -1.0),
            Vec3::new(1.0, 1.0, -1.0),
            Vec3::new(-1.0, 1.0, -1.0),
            Vec3::new(-1.0, -1.0, 1.0),
            Vec3::new(1.0, -1.0, 1.0),
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(-1.0, 1.0, 1.0),
        ];
        let edges = vec![
            (0, 1), (1, 2), (2, 3), (3, 0),
            (4, 5), (5, 6), (6, 7), (7, 4),
            (0, 4), (1, 5), (2, 6), (3, 7),
        ];
        Self::mesh("cube", "Cube", Color::rgb(0x4c, 0xc9, 0xf0), vertices, edges)
    }

    /// Square pyramid: 5 vertices, 8 edges, apex up.
    #[must_use]
    pub fn pyramid() -> Self {
        let vertices = vec![
            Vec3::new(-1.0, 1.0, -1.0),
            Vec3::new(1.0, 1.0, -1.0),
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(-1.0, 1.0, 1.0),
            Vec3::new(0.0, -1.0, 0.0),
        ];
        let edges = vec![
            (0, 1), (1, 2), (2, 3), (3, 0),
            (0, 4), (1, 4), (2, 4), (3, 4),
        ];
        Self::mesh("pyramid", "Pyramid", Color::rgb(0xfe, 0xca, 0x57), vertices, edges)
    }

    /// Look up a built-in primitive by id (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns [`StudioError::UnknownPrimitive`] if the id is not in the
    /// catalogue.
    pub fn builtin(id: &str) -> StudioResult<Self> {
        let primitive = match id.trim().to_ascii_lowercase().as_str() {
            "cube" => Self::cube(),
            "pyramid" => Self::pyramid(),
            "sphere" => Self::parametric("sphere", "Sphere", Color::rgb(0xff, 0x6b, 0x6b), ParametricShape::Sphere),
            "cylinder" => Self::parametric("cylinder", "Cylinder", Color::rgb(0x74, 0xc6, 0x9d), ParametricShape::Cylinder),
            "torus" => Self::parametric("torus", "Torus", Color::rgb(0xff, 0x9f, 0xf3), ParametricShape::Torus),
            "star" => Self::parametric("star", "Star", Color::rgb(0xf7, 0x25, 0x85), ParametricShape::Star),
            _ => return Err(StudioError::UnknownPrimitive(id.to_string())),
        };
        Ok(primitive)
    }

    /// The full built-in catalogue.
    #[must_use]
    pub fn catalog() -> Vec<Self> {
        BUILTIN_PRIMITIVES
            .iter()
            .filter_map(|id| Self::builtin(id).ok())
            .collect()
    }

    /// Whether this primitive is truly projected (as opposed to approximated).
    #[must_use]
    pub fn is_mesh(&self) -> bool {
        matches!(self.kind, PrimitiveKind::Mesh { .. })
    }

    /// Check that the mesh has geometry and every edge references an
    /// existing vertex.
    ///
    /// # Errors
    ///
    /// Returns [`StudioError::MalformedPrimitive`] describing the first
    /// problem found.
    pub fn validate(&self) -> StudioResult<()> {
        let PrimitiveKind::Mesh { vertices, edges } = &self.kind else {
            return Ok(());
        };
        let malformed = |reason: String| StudioError::MalformedPrimitive {
            name: self.name.clone(),
            reason,
        };
        if vertices.is_empty() {
            return Err(malformed("no vertices".to_string()));
        }
        if edges.is_empty() {
            return Err(malformed("no edges".to_string()));
        }
        if let Some((a, b)) = edges
            .iter()
            .find(|(a, b)| *a >= vertices.len() || *b >= vertices.len())
        {
            return Err(malformed(format!(
                "edge ({a}, {b}) references a missing vertex (have {})",
                vertices.len()
            )));
        }
        if vertices
            .iter()
            .any(|v| !(v.x.is_finite() && v.y.is_finite() && v.z.is_finite()))
        {
            return Err(malformed("non-finite vertex".to_string()));
        }
        Ok(())
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_is_complete_and_valid() {
        let catalog = Primitive::catalog();
        assert_eq!(catalog.len(), BUILTIN_PRIMITIVES.len());
        for primitive in &catalog {
            primitive.validate().expect("built-ins are valid");
        }
        assert_eq!(catalog.iter().filter(|p| p.is_mesh()).count(), 2);
    }

    #[test]
    fn test_cube_shape() {
        let PrimitiveKind::Mesh { vertices, edges } = Primitive::cube().kind else {
            panic!("cube is a mesh");
        };
        assert_eq!(vertices.len(), 8);
        assert_eq!(edges.len(), 12);
    }

    #[test]
    fn test_dangling_edge_is_malformed() {
        let primitive = Primitive::mesh(
            "bad",
            "Bad",
            Color::WHITE,
            vec![Vec3::zero(), Vec3::new(1.0, 0.0, 0.0)],
            vec![(0, 1), (1, 2)],
        );
        assert!(matches!(
            primitive.validate(),
            Err(StudioError::MalformedPrimitive { .. })
        ));
    }

    #[test]
    fn test_empty_mesh_is_malformed() {
        let primitive = Primitive::mesh("empty", "Empty", Color::WHITE, vec![], vec![]);
        assert!(primitive.validate().is_err());
    }

    #[test]
    fn test_unknown_builtin() {
        assert!(matches!(
            Primitive::builtin("dodecahedron"),
            Err(StudioError::UnknownPrimitive(_))
        ));
        assert_eq!(Primitive::builtin("Torus").expect("torus").id, "torus");
    }
}
