//! Per-frame data delivered by the tracker

use crate::foundation::math::{Mat4, Vec3};

/// Number of second order spherical harmonics coefficients (9 per RGB channel)
pub const SPHERICAL_HARMONICS_COEFFICIENTS: usize = 27;

/// Directional part of a light estimate
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionalLightEstimate {
    /// Unit vector of the strongest light, in the tracker's coordinate convention
    pub primary_light_direction: Vec3,
    /// Intensity of the strongest light, in lumens
    pub primary_light_intensity: f32,
    /// Environment lighting as spherical harmonics
    pub spherical_harmonics: [f32; SPHERICAL_HARMONICS_COEFFICIENTS],
}

/// One frame's lighting measurement
#[derive(Debug, Clone, PartialEq)]
pub struct LightEstimate {
    /// Ambient intensity in lumens (1000 is neutral)
    pub ambient_intensity: f32,
    /// Ambient color temperature in kelvin
    pub ambient_color_temperature: f32,
    /// Present only when the configuration supports directional estimation
    pub directional: Option<DirectionalLightEstimate>,
}

/// Camera pose for a frame
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Camera to world transform
    pub transform: Mat4,
    /// Pitch, yaw and roll in radians
    pub euler_angles: Vec3,
}

impl Camera {
    /// Heading around the world Y axis
    pub fn yaw(&self) -> f32 {
        self.euler_angles.y
    }
}

/// A tracked frame
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Frame {
    /// Capture time in seconds
    pub timestamp: f64,
    /// Light estimate, when enabled and available
    pub light_estimate: Option<LightEstimate>,
    /// Camera pose, when tracking is available
    pub camera: Option<Camera>,
}
