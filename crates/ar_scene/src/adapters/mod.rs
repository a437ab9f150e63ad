//! Adapters turning tracker callbacks into scene graph mutations
//!
//! - [`light_estimator`]: light estimates → ambient and directional lights
//! - [`plane_visualizer`]: plane anchors → translucent quads
//! - [`object_placement`]: taps → placed models

pub mod light_estimator;
pub mod object_placement;
pub mod plane_visualizer;

pub use light_estimator::{
    AccumulatedEstimate, FrameOutcome, InstalledLights, LightEstimatorAdapter,
    LightEstimatorSettings,
};
pub use object_placement::{ObjectPlacer, PlacementError};
pub use plane_visualizer::{PlaneAnchorVisualizer, PlaneVisual};
