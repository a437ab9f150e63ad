//! Anchors reported by the tracker

use crate::foundation::math::{Mat4, Vec3};
use std::fmt;

/// Stable identity of an anchor across add/update/remove events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnchorId(pub u64);

impl fmt::Display for AnchorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "anchor#{}", self.0)
    }
}

/// A detected flat surface
#[derive(Debug, Clone, PartialEq)]
pub struct PlaneAnchor {
    /// Identity
    pub id: AnchorId,
    /// Anchor to world transform
    pub transform: Mat4,
    /// Center of the plane in anchor space
    pub center: Vec3,
    /// Size of the plane in anchor space; y is always zero
    pub extent: Vec3,
}

/// Tracked face mesh in anchor space
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FaceGeometry {
    /// Vertex positions
    pub vertices: Vec<Vec3>,
    /// Triangle list
    pub triangle_indices: Vec<u32>,
}

/// A tracked face
#[derive(Debug, Clone, PartialEq)]
pub struct FaceAnchor {
    /// Identity
    pub id: AnchorId,
    /// Anchor to world transform
    pub transform: Mat4,
    /// Current face mesh
    pub geometry: FaceGeometry,
}

/// Any anchor the tracker can report
#[derive(Debug, Clone, PartialEq)]
pub enum Anchor {
    /// Face anchor
    Face(FaceAnchor),
    /// Plane anchor
    Plane(PlaneAnchor),
    /// Anything else; only its node is maintained
    Other {
        /// Identity
        id: AnchorId,
        /// Anchor to world transform
        transform: Mat4,
    },
}

impl Anchor {
    /// Identity of the anchor
    pub fn id(&self) -> AnchorId {
        match self {
            Self::Face(face) => face.id,
            Self::Plane(plane) => plane.id,
            Self::Other { id, .. } => *id,
        }
    }

    /// Anchor to world transform
    pub fn transform(&self) -> &Mat4 {
        match self {
            Self::Face(face) => &face.transform,
            Self::Plane(plane) => &plane.transform,
            Self::Other { transform, .. } => transform,
        }
    }
}
