use super::VirtualContentController;
use crate::foundation::math::Vec3;
use crate::render::{Color, LightingModel, Material};
use crate::scene::{Geometry, NodeId, SceneError, SceneGraph, SceneNode};
use crate::session::FaceAnchor;

/// Length of each axis line, in meters
const AXIS_LENGTH: f32 = 0.1;

/// Shows the face anchor's coordinate axes as red, green and blue lines
#[derive(Debug, Default)]
pub struct TransformsController {
    content: Option<NodeId>,
}

fn axis_node(name: &str, direction: Vec3, color: Color) -> SceneNode {
    let mut material = Material::with_color(color).named(name);
    material.lighting_model = LightingModel::Constant;
    let mut node = SceneNode::with_geometry(
        Geometry::line(Vec3::zeros(), direction * AXIS_LENGTH).with_materials(vec![material]),
    );
    node.name = Some(name.to_string());
    node
}

impl VirtualContentController for TransformsController {
    fn create_content(
        &mut self,
        scene: &mut SceneGraph,
        anchor_node: NodeId,
        _anchor: &FaceAnchor,
    ) -> Result<NodeId, SceneError> {
        let origin = scene.add_child(anchor_node, SceneNode::named("face-axes"))?;
        scene.add_child(origin, axis_node("x-axis", Vec3::x(), Color::rgba(1.0, 0.0, 0.0, 1.0)))?;
        scene.add_child(origin, axis_node("y-axis", Vec3::y(), Color::rgba(0.0, 1.0, 0.0, 1.0)))?;
        scene.add_child(origin, axis_node("z-axis", Vec3::z(), Color::rgba(0.0, 0.0, 1.0, 1.0)))?;
        self.content = Some(origin);
        Ok(origin)
    }

    fn update_content(&mut self, _scene: &mut SceneGraph, _anchor: &FaceAnchor) {
        // Axes ride on the anchor node's transform
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
    use crate::foundation::math::Mat4;
    use crate::session::{AnchorId, FaceGeometry};

    #[test]
    fn axes_hang_below_anchor_node() {
        let mut scene = SceneGraph::new();
        let anchor_node = scene.add_to_root(SceneNode::new());
        let anchor = FaceAnchor {
            id: AnchorId(1),
            transform: Mat4::identity(),
            geometry: FaceGeometry::default(),
        };
        let mut controller = TransformsController::default();

        let content = controller.create_content(&mut scene, anchor_node, &anchor).unwrap();

        assert_eq!(controller.content_node(), Some(content));
        assert_eq!(scene.get(content).unwrap().children().len(), 3);
        assert!(scene.find_descendant(anchor_node, "z-axis").is_some());

        controller.remove_content(&mut scene);
        assert!(controller.content_node().is_none());
        assert!(scene.get(anchor_node).unwrap().children().is_empty());
    }
}
