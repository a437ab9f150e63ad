//! Asset loading
//!
//! Scene assets (model hierarchies) are loaded by name through a
//! [`ModelLibrary`] and copied into the live scene graph on demand.

mod model_library;

pub use model_library::{
    AssetGeometry, AssetMaterial, AssetNode, InMemoryModelLibrary, ModelLibrary, RonModelLibrary,
    SceneAsset,
};

use crate::scene::SceneError;
use thiserror::Error;

/// Asset loading errors
#[derive(Error, Debug)]
pub enum AssetError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed asset description
    #[error("Parse error: {0}")]
    Parse(String),

    /// No asset with that name
    #[error("Asset not found: {0}")]
    NotFound(String),

    /// The asset lacks a node the caller relies on
    #[error("Asset {asset} has no node named {node}")]
    MissingNode {
        /// Asset that was searched
        asset: String,
        /// Node that was expected
        node: String,
    },

    /// Copying into the scene failed
    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),
}
