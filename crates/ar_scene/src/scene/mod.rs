//! Scene management
//!
//! The retained scene graph the adapters mutate: a node hierarchy carrying
//! transforms, geometry, materials and lights. The host renderer draws it.

mod geometry;
mod node;
mod scene_graph;

pub use geometry::{Geometry, GeometryKind};
pub use node::SceneNode;
pub use scene_graph::{NodeId, SceneError, SceneGraph, AABB};
