//! Scene node

use super::{Geometry, NodeId, AABB};
use crate::foundation::math::{Mat4, Quat, Transform, Vec3};
use crate::render::Light;

/// A node in the retained scene graph
///
/// Nodes are owned by [`SceneGraph`](super::SceneGraph); hierarchy links are
/// maintained by the graph and are read-only from the outside.
#[derive(Debug, Clone)]
pub struct SceneNode {
    /// Optional lookup name
    pub name: Option<String>,
    /// Local transform relative to the parent
    pub transform: Transform,
    /// Local pivot applied before the transform
    pub pivot: Mat4,
    /// Renderable geometry
    pub geometry: Option<Geometry>,
    /// Attached light
    pub light: Option<Light>,
    /// Category bits used for light masking
    pub category_mask: u32,
    pub(super) parent: Option<NodeId>,
    pub(super) children: Vec<NodeId>,
}

impl Default for SceneNode {
    fn default() -> Self {
        Self {
            name: None,
            transform: Transform::identity(),
            pivot: Mat4::identity(),
            geometry: None,
            light: None,
            category_mask: 1,
            parent: None,
            children: Vec::new(),
        }
    }
}

impl SceneNode {
    /// Empty node
    pub fn new() -> Self {
        Self::default()
    }

    /// Node with a name
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Node carrying a geometry
    pub fn with_geometry(geometry: Geometry) -> Self {
        Self {
            geometry: Some(geometry),
            ..Self::default()
        }
    }

    /// Node carrying a light
    pub fn with_light(light: Light) -> Self {
        Self {
            light: Some(light),
            ..Self::default()
        }
    }

    /// Local position
    pub fn position(&self) -> Vec3 {
        self.transform.position
    }

    /// Set the local position
    pub fn set_position(&mut self, position: Vec3) {
        self.transform.position = position;
    }

    /// Local orientation
    pub fn orientation(&self) -> Quat {
        self.transform.rotation
    }

    /// Set the local orientation
    pub fn set_orientation(&mut self, rotation: Quat) {
        self.transform.rotation = rotation;
    }

    /// Replace the whole local transform from a matrix
    pub fn set_transform_matrix(&mut self, matrix: &Mat4) {
        self.transform = Transform::from_matrix(matrix);
    }

    /// Set a uniform scale
    pub fn set_uniform_scale(&mut self, scale: f32) {
        self.transform.scale = Vec3::new(scale, scale, scale);
    }

    /// Matrix mapping node-local coordinates to parent coordinates
    pub fn local_matrix(&self) -> Mat4 {
        // Pivot is applied inverted so that the pivot point lands on the origin
        let pivot_inverse = self.pivot.try_inverse().unwrap_or_else(Mat4::identity);
        self.transform.to_matrix() * pivot_inverse
    }

    /// Bounding box of this node's own geometry
    pub fn bounding_box(&self) -> Option<AABB> {
        self.geometry.as_ref().and_then(Geometry::bounding_box)
    }

    /// Parent node
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Direct children
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}
