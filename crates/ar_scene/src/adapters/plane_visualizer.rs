//! Translucent quads over detected planes
//!
//! One [`PlaneVisual`] per plane anchor, kept in step with the anchor's
//! extent and center as the tracker refines it.

use crate::config::PlaneConfig;
use crate::foundation::math::{constants, Quat, Vec3};
use crate::render::{Color, Material};
use crate::scene::{Geometry, NodeId, SceneError, SceneGraph, SceneNode};
use crate::session::{AnchorId, PlaneAnchor};
use std::collections::HashMap;

/// Handle to the quad shown for one plane anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaneVisual {
    /// Node holding the plane geometry
    pub node: NodeId,
}

impl PlaneVisual {
    /// Current `(width, height)` of the quad
    pub fn size(&self, scene: &SceneGraph) -> Option<(f32, f32)> {
        scene
            .get(self.node)?
            .geometry
            .as_ref()
            .and_then(Geometry::plane_size)
    }

    /// Current position relative to the anchor
    pub fn position(&self, scene: &SceneGraph) -> Option<Vec3> {
        scene.get(self.node).map(|node| node.position())
    }
}

/// Anchor space position of a plane's quad
fn plane_position(anchor: &PlaneAnchor) -> Vec3 {
    Vec3::new(anchor.center.x, 0.0, anchor.center.z)
}

/// Maintains plane anchor → visual mappings
#[derive(Debug)]
pub struct PlaneAnchorVisualizer {
    color: Color,
    visuals: HashMap<AnchorId, PlaneVisual>,
}

impl Default for PlaneAnchorVisualizer {
    fn default() -> Self {
        Self::new(&PlaneConfig::default())
    }
}

impl PlaneAnchorVisualizer {
    /// Visualizer drawing quads in the configured color
    pub fn new(config: &PlaneConfig) -> Self {
        Self {
            color: Color::from_array(config.color),
            visuals: HashMap::new(),
        }
    }

    /// Number of live visuals
    pub fn len(&self) -> usize {
        self.visuals.len()
    }

    /// True when no plane is shown
    pub fn is_empty(&self) -> bool {
        self.visuals.is_empty()
    }

    /// Visual for an anchor
    pub fn visual(&self, id: AnchorId) -> Option<PlaneVisual> {
        self.visuals.get(&id).copied()
    }

    /// Create the quad for a new anchor under the anchor's node
    pub fn on_anchor_added(
        &mut self,
        scene: &mut SceneGraph,
        anchor_node: NodeId,
        anchor: &PlaneAnchor,
    ) -> Result<PlaneVisual, SceneError> {
        if let Some(existing) = self.visuals.get(&anchor.id).copied() {
            log::debug!("{} added twice; refreshing its visual", anchor.id);
            self.on_anchor_updated(scene, anchor);
            return Ok(existing);
        }

        let width = anchor.extent.x;
        let height = anchor.extent.z;
        let mut material = Material::with_color(self.color).named("plane");
        material.double_sided = true;
        material.tile_to(width, height);

        let mut node = SceneNode::with_geometry(Geometry::plane(width, height).with_materials(vec![material]));
        node.name = Some(format!("plane-{}", anchor.id.0));
        node.set_position(plane_position(anchor));
        // Quads are built in XY; lay them flat on XZ
        node.set_orientation(Quat::from_axis_angle(&Vec3::x_axis(), -constants::HALF_PI));

        let visual = PlaneVisual {
            node: scene.add_child(anchor_node, node)?,
        };
        self.visuals.insert(anchor.id, visual);
        log::debug!("Showing plane {} ({width:.2} x {height:.2})", anchor.id);
        Ok(visual)
    }

    /// Resize and move the quad of a known anchor; unknown anchors are ignored
    pub fn on_anchor_updated(&mut self, scene: &mut SceneGraph, anchor: &PlaneAnchor) {
        let Some(visual) = self.visuals.get(&anchor.id).copied() else {
            log::debug!("Update for untracked plane {}", anchor.id);
            return;
        };
        let Some(node) = scene.get_mut(visual.node) else {
            log::warn!("Visual node of {} vanished; forgetting it", anchor.id);
            self.visuals.remove(&anchor.id);
            return;
        };

        let width = anchor.extent.x;
        let height = anchor.extent.z;
        node.set_position(plane_position(anchor));
        if let Some(geometry) = node.geometry.as_mut() {
            geometry.set_plane_size(width, height);
            if let Some(material) = geometry.first_material_mut() {
                material.tile_to(width, height);
            }
        }
    }

    /// Drop the quad of a removed anchor
    pub fn on_anchor_removed(&mut self, scene: &mut SceneGraph, id: AnchorId) {
        if let Some(visual) = self.visuals.remove(&id) {
            // The anchor node may already have taken the quad with it
            if scene.contains(visual.node) {
                if let Err(err) = scene.remove(visual.node) {
                    log::warn!("Failed to remove visual of {id}: {err}");
                }
            }
        }
    }

    /// Forget every visual; their nodes are expected to be gone already
    pub fn clear(&mut self) {
        self.visuals.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::MaterialContents;
    use crate::test_support::plane_anchor;
    use approx::assert_relative_eq;

    fn setup() -> (SceneGraph, NodeId, PlaneAnchorVisualizer) {
        let mut scene = SceneGraph::new();
        let anchor_node = scene.add_to_root(SceneNode::named("anchor"));
        (scene, anchor_node, PlaneAnchorVisualizer::default())
    }

    #[test]
    fn added_anchor_gets_sized_positioned_quad() {
        let (mut scene, anchor_node, mut visualizer) = setup();
        let anchor = plane_anchor(7, Vec3::new(1.0, 0.0, 3.0), Vec3::new(2.0, 0.0, 1.5));

        let visual = visualizer.on_anchor_added(&mut scene, anchor_node, &anchor).unwrap();

        assert_eq!(visual.size(&scene), Some((2.0, 1.5)));
        assert_relative_eq!(visual.position(&scene).unwrap(), Vec3::new(1.0, 0.0, 3.0));
        let node = scene.get(visual.node).unwrap();
        assert_eq!(node.parent(), Some(anchor_node));
        // Flat: the quad's normal (+Z) ends up pointing up
        assert_relative_eq!(node.orientation() * Vec3::z(), Vec3::y(), epsilon = 1e-6);

        let material = node.geometry.as_ref().unwrap().first_material().unwrap();
        assert_eq!(
            material.diffuse.contents,
            MaterialContents::Color(Color::rgba(0.53, 0.81, 0.98, 0.3))
        );
        assert_relative_eq!(material.diffuse.contents_transform.m11, 2.0);
        assert_relative_eq!(material.diffuse.contents_transform.m22, 1.5);
    }

    #[test]
    fn update_resizes_existing_visual() {
        let (mut scene, anchor_node, mut visualizer) = setup();
        let anchor = plane_anchor(7, Vec3::new(1.0, 0.0, 3.0), Vec3::new(2.0, 0.0, 1.5));
        let visual = visualizer.on_anchor_added(&mut scene, anchor_node, &anchor).unwrap();
        let nodes_before = scene.len();

        let grown = plane_anchor(7, Vec3::new(1.5, 0.0, 3.0), Vec3::new(3.0, 0.0, 1.5));
        visualizer.on_anchor_updated(&mut scene, &grown);

        assert_eq!(visualizer.len(), 1);
        assert_eq!(scene.len(), nodes_before);
        assert_eq!(visualizer.visual(AnchorId(7)), Some(visual));
        assert_eq!(visual.size(&scene), Some((3.0, 1.5)));
        assert_relative_eq!(visual.position(&scene).unwrap(), Vec3::new(1.5, 0.0, 3.0));
        let material = scene.get(visual.node).unwrap().geometry.as_ref().unwrap().materials[0].clone();
        assert_relative_eq!(material.diffuse.contents_transform.m11, 3.0);
    }

    #[test]
    fn update_for_unknown_anchor_is_a_no_op() {
        let (mut scene, _, mut visualizer) = setup();
        let nodes_before = scene.len();
        visualizer.on_anchor_updated(&mut scene, &plane_anchor(99, Vec3::zeros(), Vec3::new(1.0, 0.0, 1.0)));
        assert!(visualizer.is_empty());
        assert_eq!(scene.len(), nodes_before);
    }

    #[test]
    fn duplicate_add_keeps_one_visual() {
        let (mut scene, anchor_node, mut visualizer) = setup();
        let anchor = plane_anchor(1, Vec3::zeros(), Vec3::new(1.0, 0.0, 1.0));
        let first = visualizer.on_anchor_added(&mut scene, anchor_node, &anchor).unwrap();
        let second = visualizer.on_anchor_added(&mut scene, anchor_node, &anchor).unwrap();
        assert_eq!(first, second);
        assert_eq!(visualizer.len(), 1);
        assert_eq!(scene.get(anchor_node).unwrap().children().len(), 1);
    }

    #[test]
    fn removal_detaches_visual() {
        let (mut scene, anchor_node, mut visualizer) = setup();
        let anchor = plane_anchor(3, Vec3::zeros(), Vec3::new(1.0, 0.0, 1.0));
        let visual = visualizer.on_anchor_added(&mut scene, anchor_node, &anchor).unwrap();

        visualizer.on_anchor_removed(&mut scene, AnchorId(3));
        assert!(visualizer.is_empty());
        assert!(!scene.contains(visual.node));

        // Removing again, or after the anchor node took it along, is harmless
        visualizer.on_anchor_removed(&mut scene, AnchorId(3));
    }
}
