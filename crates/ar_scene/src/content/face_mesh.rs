use super::VirtualContentController;
use crate::render::{Color, FillMode, LightingModel, Material};
use crate::scene::{Geometry, GeometryKind, NodeId, SceneError, SceneGraph, SceneNode};
use crate::session::FaceAnchor;

/// Texture applied by the textured style
pub const FACE_TEXTURE: &str = "wireframeTexture";

/// How the face mesh is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaceMeshStyle {
    /// Solid mesh with a texture
    Textured,
    /// Triangle edges only
    Wireframe,
}

impl FaceMeshStyle {
    fn material(self) -> Material {
        match self {
            Self::Textured => {
                let mut material = Material::with_texture(FACE_TEXTURE).named("face-texture");
                material.lighting_model = LightingModel::PhysicallyBased;
                material
            }
            Self::Wireframe => {
                let mut material = Material::with_color(Color::WHITE).named("face-wireframe");
                material.fill_mode = FillMode::Lines;
                material.lighting_model = LightingModel::Constant;
                material
            }
        }
    }
}

/// Draws the tracked face mesh and follows its deformation
#[derive(Debug)]
pub struct FaceMeshController {
    style: FaceMeshStyle,
    content: Option<NodeId>,
}

impl FaceMeshController {
    /// Controller drawing in `style`
    pub fn new(style: FaceMeshStyle) -> Self {
        Self {
            style,
            content: None,
        }
    }
}

impl VirtualContentController for FaceMeshController {
    fn create_content(
        &mut self,
        scene: &mut SceneGraph,
        anchor_node: NodeId,
        anchor: &FaceAnchor,
    ) -> Result<NodeId, SceneError> {
        let geometry = Geometry::mesh(
            anchor.geometry.vertices.clone(),
            anchor.geometry.triangle_indices.clone(),
        )
        .with_materials(vec![self.style.material()]);
        let mut node = SceneNode::with_geometry(geometry);
        node.name = Some("face-mesh".to_string());

        let id = scene.add_child(anchor_node, node)?;
        self.content = Some(id);
        Ok(id)
    }

    fn update_content(&mut self, scene: &mut SceneGraph, anchor: &FaceAnchor) {
        let Some(geometry) = self
            .content
            .and_then(|id| scene.get_mut(id))
            .and_then(|node| node.geometry.as_mut())
        else {
            return;
        };
        if let GeometryKind::Mesh { positions, indices } = &mut geometry.kind {
            positions.clone_from(&anchor.geometry.vertices);
            if indices.len() != anchor.geometry.triangle_indices.len() {
                indices.clone_from(&anchor.geometry.triangle_indices);
            }
        }
    }

    fn content_node(&self) -> Option<NodeId> {
        self.content
    }

    fn forget_content(&mut self) -> Option<NodeId> {
        self.content.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{Mat4, Vec3};
    use crate::session::{AnchorId, FaceGeometry};

    fn face(offset: f32) -> FaceAnchor {
        FaceAnchor {
            id: AnchorId(5),
            transform: Mat4::identity(),
            geometry: FaceGeometry {
                vertices: vec![
                    Vec3::new(0.0, 0.0, offset),
                    Vec3::new(0.1, 0.0, offset),
                    Vec3::new(0.0, 0.1, offset),
                ],
                triangle_indices: vec![0, 1, 2],
            },
        }
    }

    #[test]
    fn mesh_follows_face_updates() {
        let mut scene = SceneGraph::new();
        let anchor_node = scene.add_to_root(SceneNode::new());
        let mut controller = FaceMeshController::new(FaceMeshStyle::Wireframe);
        let id = controller.create_content(&mut scene, anchor_node, &face(0.0)).unwrap();

        controller.update_content(&mut scene, &face(0.02));

        let geometry = scene.get(id).unwrap().geometry.clone().unwrap();
        match geometry.kind {
            GeometryKind::Mesh { positions, .. } => {
                assert!((positions[0].z - 0.02).abs() < f32::EPSILON);
            }
            other => panic!("expected mesh, got {other:?}"),
        }
        assert_eq!(geometry.materials[0].fill_mode, FillMode::Lines);
    }

    #[test]
    fn textured_style_binds_face_texture() {
        let mut scene = SceneGraph::new();
        let anchor_node = scene.add_to_root(SceneNode::new());
        let mut controller = FaceMeshController::new(FaceMeshStyle::Textured);
        let id = controller.create_content(&mut scene, anchor_node, &face(0.0)).unwrap();

        let material = scene.get(id).unwrap().geometry.as_ref().unwrap().materials[0].clone();
        assert_eq!(
            material.diffuse.contents,
            crate::render::MaterialContents::Texture(FACE_TEXTURE.to_string())
        );
    }
}
