//! Test doubles shared by the unit tests

use crate::foundation::math::{Mat4, Vec3};
use crate::session::{
    AnchorId, ArSession, Camera, DirectionalLightEstimate, Frame, HitTestResult, HitTestTypes,
    LightEstimate, PlaneAnchor, RunOptions, ScreenPoint, TrackingConfiguration,
    SPHERICAL_HARMONICS_COEFFICIENTS,
};
use std::cell::RefCell;

/// Session that records requests and answers hit tests from a fixed list
pub struct RecordingSession {
    pub runs: Vec<(TrackingConfiguration, RunOptions)>,
    pub face_tracking_supported: bool,
    pub camera: Option<Camera>,
    pub hits: Vec<HitTestResult>,
    pub hit_queries: RefCell<Vec<(ScreenPoint, HitTestTypes)>>,
}

impl Default for RecordingSession {
    fn default() -> Self {
        Self {
            runs: Vec::new(),
            face_tracking_supported: true,
            camera: Some(Camera {
                transform: Mat4::identity(),
                euler_angles: Vec3::zeros(),
            }),
            hits: Vec::new(),
            hit_queries: RefCell::new(Vec::new()),
        }
    }
}

impl RecordingSession {
    pub fn world_tracking_runs(&self) -> usize {
        self.runs
            .iter()
            .filter(|(configuration, _)| !configuration.is_face_tracking())
            .count()
    }
}

impl ArSession for RecordingSession {
    fn run(&mut self, configuration: TrackingConfiguration, options: RunOptions) {
        self.runs.push((configuration, options));
    }

    fn is_face_tracking_supported(&self) -> bool {
        self.face_tracking_supported
    }

    fn current_camera(&self) -> Option<Camera> {
        self.camera.clone()
    }

    fn hit_test(&self, point: ScreenPoint, types: HitTestTypes) -> Vec<HitTestResult> {
        self.hit_queries.borrow_mut().push((point, types));
        self.hits.clone()
    }
}

/// Frame with ambient data and an optional directional estimate
pub fn lit_frame(ambient: f32, temperature: f32, direction: Option<Vec3>) -> Frame {
    Frame {
        timestamp: 0.0,
        light_estimate: Some(LightEstimate {
            ambient_intensity: ambient,
            ambient_color_temperature: temperature,
            directional: direction.map(|primary_light_direction| DirectionalLightEstimate {
                primary_light_direction,
                primary_light_intensity: ambient * 1.5,
                spherical_harmonics: [0.1; SPHERICAL_HARMONICS_COEFFICIENTS],
            }),
        }),
        camera: None,
    }
}

/// Frame without any light estimate
pub fn dark_frame() -> Frame {
    Frame::default()
}

/// Plane anchor at the identity transform
pub fn plane_anchor(id: u64, center: Vec3, extent: Vec3) -> PlaneAnchor {
    PlaneAnchor {
        id: AnchorId(id),
        transform: Mat4::identity(),
        center,
        extent,
    }
}
