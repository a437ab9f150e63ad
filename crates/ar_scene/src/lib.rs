//! # AR Scene
//!
//! Scene-side logic of an augmented reality face lighting experience.
//!
//! ## Features
//!
//! - **Light Estimation**: Calibrates ambient and directional lighting from
//!   face tracking, then switches to world tracking with lights taken from
//!   the last estimate
//! - **Plane Visualization**: Translucent quads following detected planes
//! - **Tap-to-Place**: Drops a model onto a tapped plane, facing the camera
//! - **Face Content**: Axes, textured or wireframe face mesh on the tracked face
//!
//! The tracker and the asset store sit behind the [`session::ArSession`] and
//! [`assets::ModelLibrary`] traits; everything the experience shows lives in a
//! retained [`scene::SceneGraph`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ar_scene::prelude::*;
//! use std::sync::mpsc;
//!
//! fn start<S: ArSession>(session: S) -> Result<(), ControllerError> {
//!     let config = ExperienceConfig::default();
//!     let library = RonModelLibrary::new(&config.placement.models_dir);
//!     let (ui, _alerts) = mpsc::channel();
//!     let mut controller = ArViewController::new(&config, session, Box::new(library), ui)?;
//!     controller.view_did_appear();
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod foundation;
pub mod config;
pub mod scene;
pub mod render;
pub mod session;
pub mod assets;
pub mod adapters;
pub mod content;

mod controller;

#[cfg(test)]
mod test_support;

pub use controller::{
    Alert, AlertAction, ArViewController, ControllerError, UiCommand, SESSION_FAILED_TITLE,
};

/// Common imports for users of the crate
pub mod prelude {
    pub use crate::{
        Alert, AlertAction, ArViewController, ControllerError, UiCommand,
        adapters::{FrameOutcome, LightEstimatorAdapter, ObjectPlacer, PlaneAnchorVisualizer},
        assets::{ModelLibrary, RonModelLibrary},
        config::{Config, ExperienceConfig},
        content::VirtualContentType,
        foundation::math::{Mat4, Quat, Transform, Vec3},
        scene::{NodeId, SceneGraph, SceneNode},
        session::{
            Anchor, AnchorId, ArSession, Camera, Frame, HitTestResult, HitTestTypes, LightEstimate,
            RunOptions, ScreenPoint, SessionError, TrackingConfiguration,
        },
    };
}
