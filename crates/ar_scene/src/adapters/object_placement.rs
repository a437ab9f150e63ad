//! Tap-to-place
//!
//! Drops a model onto the first detected plane under a tap, standing on its
//! base and facing the camera's heading.

use crate::assets::{AssetError, ModelLibrary};
use crate::config::PlacementConfig;
use crate::foundation::math::{utils, Mat4, Vec3};
use crate::render::LightingModel;
use crate::scene::{NodeId, SceneGraph, AABB};
use crate::session::{ArSession, HitTestResult, HitTestTypes, ScreenPoint};
use thiserror::Error;

/// Number of leading materials switched to physically based shading
const PBR_MATERIAL_SLOTS: usize = 2;

/// Placement failures
#[derive(Error, Debug)]
pub enum PlacementError {
    /// The model could not be loaded or lacks the expected node
    #[error("asset load failed: {0}")]
    Asset(#[from] AssetError),

    /// No camera pose to orient the model with
    #[error("no current camera frame")]
    NoCameraFrame,
}

/// Pivot that puts a model's horizontal center and lowest point on the origin
pub fn base_pivot(bounds: &AABB) -> Mat4 {
    let (min, max) = (bounds.min, bounds.max);
    Mat4::new_translation(&Vec3::new(
        min.x + (max.x - min.x) / 2.0,
        min.y,
        min.z + (max.z - min.z) / 2.0,
    ))
}

/// Places the configured model on tapped planes
pub struct ObjectPlacer {
    config: PlacementConfig,
    library: Box<dyn ModelLibrary + Send>,
}

impl std::fmt::Debug for ObjectPlacer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectPlacer")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ObjectPlacer {
    /// Placer loading models from `library`
    pub fn new(config: PlacementConfig, library: Box<dyn ModelLibrary + Send>) -> Self {
        Self { config, library }
    }

    /// Hit-test `point` and place the model on the first plane hit
    ///
    /// Returns `Ok(None)` when nothing was hit.
    pub fn place(
        &self,
        scene: &mut SceneGraph,
        session: &dyn ArSession,
        point: ScreenPoint,
    ) -> Result<Option<NodeId>, PlacementError> {
        let hits = session.hit_test(point, HitTestTypes::EXISTING_PLANE_USING_GEOMETRY);
        let Some(hit) = hits.first() else {
            log::info!("No planes hit at ({:.1}, {:.1})", point.x, point.y);
            return Ok(None);
        };

        let yaw = session
            .current_camera()
            .ok_or(PlacementError::NoCameraFrame)?
            .yaw();
        self.place_at(scene, hit, yaw).map(Some)
    }

    /// Load the model and put it at `hit`, rotated by `yaw` about world Y
    pub fn place_at(
        &self,
        scene: &mut SceneGraph,
        hit: &HitTestResult,
        yaw: f32,
    ) -> Result<NodeId, PlacementError> {
        let asset = self.library.load_scene(&self.config.model_name)?;
        let template = asset
            .find_node(&self.config.child_node)
            .ok_or_else(|| AssetError::MissingNode {
                asset: self.config.model_name.clone(),
                node: self.config.child_node.clone(),
            })?;

        let root = scene.root();
        let id = template.instantiate(scene, root)?;
        let bounds = scene.subtree_bounds(id);

        let Some(node) = scene.get_mut(id) else {
            return Err(AssetError::Scene(crate::scene::SceneError::MissingNode(id)).into());
        };
        if let Some(bounds) = bounds {
            node.pivot = base_pivot(&bounds);
        }
        node.set_transform_matrix(&(hit.world_transform * utils::yaw_matrix(yaw)));
        node.set_position(hit.world_position());
        if let Some(geometry) = node.geometry.as_mut() {
            for material in geometry.materials.iter_mut().take(PBR_MATERIAL_SLOTS) {
                material.lighting_model = LightingModel::PhysicallyBased;
            }
        }
        node.category_mask = self.config.category_mask;
        node.set_uniform_scale(self.config.scale);

        log::info!(
            "Placed {} at {:?}",
            self.config.child_node,
            hit.world_position().as_slice()
        );
        Ok(id)
    }
}
