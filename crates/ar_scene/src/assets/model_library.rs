//! Scene assets and the libraries that load them
//!
//! A scene asset is a small node hierarchy described in RON:
//!
//! ```ron
//! (
//!     root: (
//!         name: Some("zeus-2_1"),
//!         children: [
//!             (
//!                 name: Some("zeus-2_zeus-2"),
//!                 geometry: Some((
//!                     positions: [(-1.0, 0.0, -1.0), (1.0, 0.0, -1.0), (0.0, 2.0, 1.0)],
//!                     indices: [0, 1, 2],
//!                     materials: [(name: Some("body"), color: Some((0.9, 0.9, 0.9, 1.0)))],
//!                 )),
//!             ),
//!         ],
//!     ),
//! )
//! ```

use super::AssetError;
use crate::foundation::math::{utils, Quat, Transform, Vec3};
use crate::render::{Color, Material};
use crate::scene::{Geometry, NodeId, SceneGraph, SceneNode};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Material description inside an asset
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetMaterial {
    /// Debug name
    pub name: Option<String>,
    /// Constant diffuse color
    pub color: Option<(f32, f32, f32, f32)>,
    /// Diffuse texture resource, takes precedence over `color`
    pub texture: Option<String>,
}

impl AssetMaterial {
    fn to_material(&self) -> Material {
        let material = match (&self.texture, self.color) {
            (Some(texture), _) => Material::with_texture(texture.clone()),
            (None, Some((r, g, b, a))) => Material::with_color(Color::rgba(r, g, b, a)),
            (None, None) => Material::with_color(Color::WHITE),
        };
        match &self.name {
            Some(name) => material.named(name.clone()),
            None => material,
        }
    }
}

/// Triangle mesh description inside an asset
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetGeometry {
    /// Vertex positions
    pub positions: Vec<(f32, f32, f32)>,
    /// Triangle list
    pub indices: Vec<u32>,
    /// One material per element
    pub materials: Vec<AssetMaterial>,
}

impl AssetGeometry {
    fn to_geometry(&self) -> Geometry {
        let positions = self
            .positions
            .iter()
            .map(|&(x, y, z)| Vec3::new(x, y, z))
            .collect();
        Geometry::mesh(positions, self.indices.clone())
            .with_materials(self.materials.iter().map(AssetMaterial::to_material).collect())
    }
}

/// Node description inside an asset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetNode {
    /// Lookup name
    pub name: Option<String>,
    /// Local position
    pub position: (f32, f32, f32),
    /// Local rotation as Euler angles in degrees (roll, pitch, yaw)
    pub rotation_degrees: (f32, f32, f32),
    /// Local scale
    pub scale: (f32, f32, f32),
    /// Optional mesh
    pub geometry: Option<AssetGeometry>,
    /// Child nodes
    pub children: Vec<AssetNode>,
}

impl Default for AssetNode {
    fn default() -> Self {
        Self {
            name: None,
            position: (0.0, 0.0, 0.0),
            rotation_degrees: (0.0, 0.0, 0.0),
            scale: (1.0, 1.0, 1.0),
            geometry: None,
            children: Vec::new(),
        }
    }
}

impl AssetNode {
    /// Depth-first search for a node named `name`, this node included
    pub fn find(&self, name: &str) -> Option<&Self> {
        if self.name.as_deref() == Some(name) {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(name))
    }

    fn to_scene_node(&self) -> SceneNode {
        let (rx, ry, rz) = self.rotation_degrees;
        let (px, py, pz) = self.position;
        let (sx, sy, sz) = self.scale;
        let mut node = SceneNode::new();
        node.name.clone_from(&self.name);
        node.transform = Transform {
            position: Vec3::new(px, py, pz),
            rotation: Quat::from_euler_angles(
                utils::deg_to_rad(rx),
                utils::deg_to_rad(ry),
                utils::deg_to_rad(rz),
            ),
            scale: Vec3::new(sx, sy, sz),
        };
        node.geometry = self.geometry.as_ref().map(AssetGeometry::to_geometry);
        node
    }

    /// Copy this node and its subtree into `graph` under `parent`
    pub fn instantiate(&self, graph: &mut SceneGraph, parent: NodeId) -> Result<NodeId, AssetError> {
        let id = graph.add_child(parent, self.to_scene_node())?;
        for child in &self.children {
            child.instantiate(graph, id)?;
        }
        Ok(id)
    }
}

/// A loaded scene asset
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SceneAsset {
    /// Root of the asset hierarchy
    pub root: AssetNode,
}

impl SceneAsset {
    /// Parse an asset from RON text
    pub fn from_ron(source: &str) -> Result<Self, AssetError> {
        ron::from_str(source).map_err(|e| AssetError::Parse(e.to_string()))
    }

    /// Find a named node anywhere in the asset
    pub fn find_node(&self, name: &str) -> Option<&AssetNode> {
        self.root.find(name)
    }
}

/// Source of named scene assets
pub trait ModelLibrary {
    /// Load the asset called `name`
    fn load_scene(&self, name: &str) -> Result<SceneAsset, AssetError>;
}

/// Reads `<directory>/<name>.ron`
#[derive(Debug, Clone)]
pub struct RonModelLibrary {
    directory: PathBuf,
}

impl RonModelLibrary {
    /// Library rooted at `directory`
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }
}

impl ModelLibrary for RonModelLibrary {
    fn load_scene(&self, name: &str) -> Result<SceneAsset, AssetError> {
        let path = self.directory.join(format!("{name}.ron"));
        if !path.is_file() {
            return Err(AssetError::NotFound(name.to_string()));
        }
        log::debug!("Loading scene asset {}", path.display());
        let source = std::fs::read_to_string(&path)?;
        SceneAsset::from_ron(&source)
    }
}

/// Assets registered in memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryModelLibrary {
    scenes: HashMap<String, SceneAsset>,
}

impl InMemoryModelLibrary {
    /// Empty library
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an asset under `name`
    pub fn insert(&mut self, name: impl Into<String>, asset: SceneAsset) {
        self.scenes.insert(name.into(), asset);
    }

    /// Builder form of [`insert`](Self::insert)
    pub fn with_scene(mut self, name: impl Into<String>, asset: SceneAsset) -> Self {
        self.insert(name, asset);
        self
    }
}

impl ModelLibrary for InMemoryModelLibrary {
    fn load_scene(&self, name: &str) -> Result<SceneAsset, AssetError> {
        self.scenes
            .get(name)
            .cloned()
            .ok_or_else(|| AssetError::NotFound(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const STATUE: &str = r#"(
        root: (
            name: Some("zeus-2_1"),
            children: [
                (
                    name: Some("zeus-2_zeus-2"),
                    position: (0.0, 1.0, 0.0),
                    geometry: Some((
                        positions: [(-1.0, 0.0, -1.0), (1.0, 0.0, -1.0), (0.0, 2.0, 1.0)],
                        indices: [0, 1, 2],
                        materials: [
                            (name: Some("body"), color: Some((0.9, 0.9, 0.9, 1.0))),
                            (name: Some("base"), texture: Some("marble")),
                        ],
                    )),
                ),
            ],
        ),
    )"#;

    #[test]
    fn parses_nested_nodes_with_defaults() {
        let asset = SceneAsset::from_ron(STATUE).unwrap();
        let node = asset.find_node("zeus-2_zeus-2").unwrap();
        assert_eq!(node.position, (0.0, 1.0, 0.0));
        assert_eq!(node.scale, (1.0, 1.0, 1.0));
        assert_eq!(node.geometry.as_ref().unwrap().materials.len(), 2);
        assert!(asset.find_node("missing").is_none());
    }

    #[test]
    fn instantiate_copies_subtree() {
        let asset = SceneAsset::from_ron(STATUE).unwrap();
        let mut graph = SceneGraph::new();
        let root = graph.root();
        let id = asset.root.instantiate(&mut graph, root).unwrap();

        assert_eq!(graph.len(), 3);
        let child = graph.find_descendant(id, "zeus-2_zeus-2").unwrap();
        let materials = &graph.get(child).unwrap().geometry.as_ref().unwrap().materials;
        assert_eq!(materials[0].name.as_deref(), Some("body"));
        assert_eq!(
            materials[1].diffuse.contents,
            crate::render::MaterialContents::Texture("marble".to_string())
        );
    }

    #[test]
    fn instantiated_node_keeps_transform_and_links() {
        let asset = AssetNode {
            name: Some("pedestal".to_string()),
            position: (0.5, 0.0, -2.0),
            rotation_degrees: (0.0, 90.0, 0.0),
            scale: (2.0, 2.0, 2.0),
            ..AssetNode::default()
        };
        let mut graph = SceneGraph::new();
        let root = graph.root();
        let id = asset.instantiate(&mut graph, root).unwrap();

        let node = graph.get(id).unwrap();
        assert_eq!(node.name.as_deref(), Some("pedestal"));
        assert_eq!(node.parent(), Some(root));
        assert!(node.geometry.is_none());
        assert_relative_eq!(node.position(), Vec3::new(0.5, 0.0, -2.0));
        assert_relative_eq!(node.transform.scale, Vec3::new(2.0, 2.0, 2.0));
        assert_relative_eq!(node.orientation() * Vec3::z(), Vec3::x(), epsilon = 1e-5);
        assert_eq!(graph.get(root).unwrap().children(), &[id]);
    }

    #[test]
    fn malformed_ron_is_a_parse_error() {
        assert!(matches!(SceneAsset::from_ron("(root: ("), Err(AssetError::Parse(_))));
    }

    #[test]
    fn ron_library_reports_missing_file() {
        let library = RonModelLibrary::new(std::env::temp_dir().join("ar_scene_no_such_dir"));
        assert!(matches!(library.load_scene("zeus-2_1"), Err(AssetError::NotFound(_))));
    }

    #[test]
    fn ron_library_reads_file() {
        let dir = std::env::temp_dir().join(format!("ar_scene_models_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("statue.ron"), STATUE).unwrap();

        let asset = RonModelLibrary::new(&dir).load_scene("statue");
        std::fs::remove_dir_all(&dir).ok();
        assert!(asset.unwrap().find_node("zeus-2_zeus-2").is_some());
    }
}
