//! Procedural geometry attached to scene nodes

use super::AABB;
use crate::foundation::math::Vec3;
use crate::render::Material;

/// Shape of a geometry
#[derive(Debug, Clone, PartialEq)]
pub enum GeometryKind {
    /// Rectangle in the node's XY plane, centered on the origin
    Plane {
        /// Extent along X
        width: f32,
        /// Extent along Y
        height: f32,
    },
    /// Single line segment
    Line {
        /// First endpoint
        start: Vec3,
        /// Second endpoint
        end: Vec3,
    },
    /// Indexed triangle mesh
    Mesh {
        /// Vertex positions
        positions: Vec<Vec3>,
        /// Triangle list indices into `positions`
        indices: Vec<u32>,
    },
}

/// Geometry plus its materials
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    /// Shape
    pub kind: GeometryKind,
    /// Materials, indexed by geometry element
    pub materials: Vec<Material>,
}

impl Geometry {
    /// Flat rectangle of the given size
    pub fn plane(width: f32, height: f32) -> Self {
        Self {
            kind: GeometryKind::Plane { width, height },
            materials: Vec::new(),
        }
    }

    /// Line segment between two points
    pub fn line(start: Vec3, end: Vec3) -> Self {
        Self {
            kind: GeometryKind::Line { start, end },
            materials: Vec::new(),
        }
    }

    /// Triangle mesh
    pub fn mesh(positions: Vec<Vec3>, indices: Vec<u32>) -> Self {
        Self {
            kind: GeometryKind::Mesh { positions, indices },
            materials: Vec::new(),
        }
    }

    /// Replace the material list
    pub fn with_materials(mut self, materials: Vec<Material>) -> Self {
        self.materials = materials;
        self
    }

    /// First material, if any
    pub fn first_material(&self) -> Option<&Material> {
        self.materials.first()
    }

    /// First material, if any
    pub fn first_material_mut(&mut self) -> Option<&mut Material> {
        self.materials.first_mut()
    }

    /// `(width, height)` when this is a plane
    pub fn plane_size(&self) -> Option<(f32, f32)> {
        match self.kind {
            GeometryKind::Plane { width, height } => Some((width, height)),
            _ => None,
        }
    }

    /// Resize a plane; no effect on other shapes
    pub fn set_plane_size(&mut self, new_width: f32, new_height: f32) {
        if let GeometryKind::Plane { width, height } = &mut self.kind {
            *width = new_width;
            *height = new_height;
        }
    }

    /// Local bounding box, `None` for an empty mesh
    pub fn bounding_box(&self) -> Option<AABB> {
        match &self.kind {
            GeometryKind::Plane { width, height } => {
                let half = Vec3::new(width * 0.5, height * 0.5, 0.0);
                Some(AABB::new(-half, half))
            }
            GeometryKind::Line { start, end } => Some(AABB::new(start.inf(end), start.sup(end))),
            GeometryKind::Mesh { positions, .. } => AABB::enclosing(positions.iter().copied()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plane_bounds_are_centered() {
        let bounds = Geometry::plane(2.0, 1.5).bounding_box().unwrap();
        assert_eq!(bounds.min, Vec3::new(-1.0, -0.75, 0.0));
        assert_eq!(bounds.max, Vec3::new(1.0, 0.75, 0.0));
    }

    #[test]
    fn line_bounds_are_order_independent() {
        let bounds = Geometry::line(Vec3::new(1.0, -1.0, 0.0), Vec3::zeros())
            .bounding_box()
            .unwrap();
        assert_eq!(bounds.min, Vec3::new(0.0, -1.0, 0.0));
        assert_eq!(bounds.max, Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn resizing_ignores_non_planes() {
        let mut line = Geometry::line(Vec3::zeros(), Vec3::x());
        line.set_plane_size(3.0, 3.0);
        assert!(line.plane_size().is_none());

        let mut plane = Geometry::plane(1.0, 1.0);
        plane.set_plane_size(3.0, 1.5);
        assert_eq!(plane.plane_size(), Some((3.0, 1.5)));
    }

    #[test]
    fn empty_mesh_has_no_bounds() {
        assert!(Geometry::mesh(Vec::new(), Vec::new()).bounding_box().is_none());
    }
}
