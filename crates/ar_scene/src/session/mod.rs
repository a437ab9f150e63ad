//! Tracking session abstraction
//!
//! The tracker (camera pose, face mesh, plane detection, light estimation,
//! hit testing) is provided by the host platform. This module defines the
//! data it delivers and the [`ArSession`] trait the controller drives it
//! through.

mod anchor;
mod configuration;
mod error;
mod frame;
mod hit_test;

pub use anchor::{Anchor, AnchorId, FaceAnchor, FaceGeometry, PlaneAnchor};
pub use configuration::{PlaneDetection, RunOptions, TrackingConfiguration};
pub use error::{ErrorDomain, SessionError};
pub use frame::{
    Camera, DirectionalLightEstimate, Frame, LightEstimate, SPHERICAL_HARMONICS_COEFFICIENTS,
};
pub use hit_test::{HitTestResult, HitTestTypes, ScreenPoint};

/// Requests the controller can make of the tracker
///
/// Callbacks flow the other way: the host calls the controller's
/// `session_did_*` / `did_*_anchor` methods on its delivery thread.
pub trait ArSession {
    /// (Re)start tracking with a configuration
    fn run(&mut self, configuration: TrackingConfiguration, options: RunOptions);

    /// Whether the device can track faces
    fn is_face_tracking_supported(&self) -> bool;

    /// Camera of the most recent frame
    fn current_camera(&self) -> Option<Camera>;

    /// Intersect a screen point with tracked geometry, nearest first
    fn hit_test(&self, point: ScreenPoint, types: HitTestTypes) -> Vec<HitTestResult>;
}
