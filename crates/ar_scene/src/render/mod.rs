//! Rendering-side data attached to scene nodes
//!
//! Lights, materials and the lighting environment. Rasterisation itself is
//! done by the host renderer.

pub mod lighting;
pub mod material;

pub use lighting::{Cubemap, Light, LightKind, LightingEnvironment, LightingError};
pub use material::{Color, FillMode, LightingModel, Material, MaterialContents, MaterialProperty};
