//! Light estimation driven virtual lighting
//!
//! Collects the tracker's per-frame light estimates while the session runs
//! face tracking. Once `calibration_frames` frames have been seen the session
//! is switched to world tracking and two lights derived from the last
//! estimate are added to the scene root:
//!
//! - an ambient light whose intensity and temperature keep following the
//!   live estimate for the rest of the session
//! - a directional light oriented along the estimated primary light
//!   direction, fixed after creation
//!
//! The tracker reports directions in a convention whose depth axis is
//! mirrored relative to the scene graph, so the Z component is flipped on
//! the way in.

use crate::config::LightingConfig;
use crate::foundation::math::{utils, Quat, Vec3};
use crate::render::{Light, LightingEnvironment};
use crate::scene::{Geometry, GeometryKind, NodeId, SceneGraph, SceneNode};
use crate::session::{
    ArSession, Frame, LightEstimate, RunOptions, TrackingConfiguration,
    SPHERICAL_HARMONICS_COEFFICIENTS,
};

/// Name of the ambient light node
pub const AMBIENT_LIGHT_NODE: &str = "estimated-ambient-light";
/// Name of the directional light node
pub const DIRECTIONAL_LIGHT_NODE: &str = "estimated-directional-light";
/// Name of the light direction debug line
pub const LIGHT_DIRECTION_NODE: &str = "estimated-light-direction";

/// Axis a directional light shines along before any rotation
///
/// Matches the flipped estimate convention: a tracker direction of
/// `(0, 0, -1)` lands on this axis.
pub fn light_forward() -> Vec3 {
    Vec3::new(0.0, 0.0, 1.0)
}

/// Orientation turning [`light_forward`] onto `direction`
pub fn orientation_towards(direction: &Vec3) -> Quat {
    utils::rotation_aligning(&light_forward(), direction)
}

/// Latest ambient sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientSample {
    /// Intensity in lumens
    pub intensity: f32,
    /// Color temperature in kelvin
    pub temperature: f32,
}

/// Latest directional sample, already in scene coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionalSample {
    /// Unit direction with the depth axis flipped
    pub direction: Vec3,
    /// Intensity in lumens
    pub intensity: f32,
    /// Spherical harmonics as delivered
    pub spherical_harmonics: [f32; SPHERICAL_HARMONICS_COEFFICIENTS],
}

/// Most recent estimate seen, retained across frames
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccumulatedEstimate {
    /// Last ambient sample
    pub ambient: Option<AmbientSample>,
    /// Last directional sample
    pub directional: Option<DirectionalSample>,
}

impl AccumulatedEstimate {
    /// Overwrite with whatever `estimate` carries
    ///
    /// Returns `false` when the directional part was rejected for having no
    /// usable direction.
    fn record(&mut self, estimate: &LightEstimate) -> bool {
        self.ambient = Some(AmbientSample {
            intensity: estimate.ambient_intensity,
            temperature: estimate.ambient_color_temperature,
        });

        let Some(directional) = &estimate.directional else {
            return true;
        };
        let flipped = utils::flip_z(&directional.primary_light_direction);
        match utils::normalized(&flipped) {
            Some(direction) => {
                self.directional = Some(DirectionalSample {
                    direction,
                    intensity: directional.primary_light_intensity,
                    spherical_harmonics: directional.spherical_harmonics,
                });
                true
            }
            None => false,
        }
    }
}

/// Nodes created at the threshold crossing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstalledLights {
    /// Ambient light, absent when image based lighting is used
    pub ambient: Option<NodeId>,
    /// Directional light
    pub directional: NodeId,
}

/// What a frame did to the adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Still collecting estimates
    Calibrating {
        /// Frames counted so far
        frames_seen: u32,
    },
    /// Threshold reached but no complete estimate yet; retried next frame
    Deferred,
    /// World tracking requested and lights installed on this frame
    Transitioned(InstalledLights),
    /// Lights already installed; ambient kept live
    Live,
}

/// Tunables of the adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LightEstimatorSettings {
    /// Frames counted before switching to world tracking
    pub calibration_frames: u32,
    /// Category mask given to both lights
    pub category_mask: u32,
    /// Maintain a line node along the estimated direction
    pub show_light_direction: bool,
    /// Create the ambient light (off when a cubemap lights the scene)
    pub create_ambient: bool,
}

impl Default for LightEstimatorSettings {
    fn default() -> Self {
        Self::from_config(&LightingConfig::default(), &LightingEnvironment::manual())
    }
}

impl LightEstimatorSettings {
    /// Settings for a lighting configuration and environment
    pub fn from_config(config: &LightingConfig, environment: &LightingEnvironment) -> Self {
        Self {
            calibration_frames: config.calibration_frames,
            category_mask: config.category_mask,
            show_light_direction: config.show_light_direction,
            create_ambient: !environment.uses_cubemap(),
        }
    }
}

/// Per-session light estimation state
#[derive(Debug)]
pub struct LightEstimatorAdapter {
    settings: LightEstimatorSettings,
    frame_count: u32,
    estimate: AccumulatedEstimate,
    lights: Option<InstalledLights>,
    direction_line: Option<NodeId>,
    deferral_reported: bool,
}

impl LightEstimatorAdapter {
    /// Fresh adapter
    pub fn new(settings: LightEstimatorSettings) -> Self {
        Self {
            settings,
            frame_count: 0,
            estimate: AccumulatedEstimate::default(),
            lights: None,
            direction_line: None,
            deferral_reported: false,
        }
    }

    /// Frames counted, never above the threshold
    pub fn frame_count(&self) -> u32 {
        self.frame_count
    }

    /// Estimate retained so far
    pub fn estimate(&self) -> &AccumulatedEstimate {
        &self.estimate
    }

    /// Lights, once installed
    pub fn lights(&self) -> Option<InstalledLights> {
        self.lights
    }

    /// Debug line node, when enabled and a direction has been seen
    pub fn direction_line(&self) -> Option<NodeId> {
        self.direction_line
    }

    /// Settings in use
    pub fn settings(&self) -> &LightEstimatorSettings {
        &self.settings
    }

    /// Handle one frame from the tracker
    pub fn on_frame(
        &mut self,
        frame: &Frame,
        session: &mut dyn ArSession,
        scene: &mut SceneGraph,
    ) -> FrameOutcome {
        match &frame.light_estimate {
            Some(estimate) => self.absorb(estimate, scene),
            None => log::trace!("Frame at {:.3}s carries no light estimate", frame.timestamp),
        }

        if self.lights.is_some() {
            return FrameOutcome::Live;
        }

        if self.frame_count < self.settings.calibration_frames {
            self.frame_count += 1;
        }
        if self.frame_count < self.settings.calibration_frames {
            return FrameOutcome::Calibrating {
                frames_seen: self.frame_count,
            };
        }

        match self.install_lights(scene) {
            Some(lights) => {
                session.run(
                    TrackingConfiguration::world_with_horizontal_planes(),
                    RunOptions::FRESH_START,
                );
                log::info!(
                    "Light calibration finished after {} frames; switched to world tracking",
                    self.frame_count
                );
                self.lights = Some(lights);
                FrameOutcome::Transitioned(lights)
            }
            None => {
                if !self.deferral_reported {
                    log::warn!(
                        "Reached {} frames without a complete light estimate; deferring world tracking",
                        self.frame_count
                    );
                    self.deferral_reported = true;
                }
                FrameOutcome::Deferred
            }
        }
    }

    /// Remove installed nodes and start calibrating again
    pub fn reset(&mut self, scene: &mut SceneGraph) {
        let nodes = self
            .lights
            .take()
            .map(|lights| [lights.ambient, Some(lights.directional)])
            .into_iter()
            .flatten()
            .chain([self.direction_line.take()])
            .flatten();
        for node in nodes {
            if let Err(err) = scene.remove(node) {
                log::debug!("Light node already gone during reset: {err}");
            }
        }
        *self = Self::new(self.settings);
    }

    fn absorb(&mut self, estimate: &LightEstimate, scene: &mut SceneGraph) {
        if !self.estimate.record(estimate) {
            log::warn!("Ignoring directional estimate with a zero-length direction");
        }

        if let Some(ambient) = self.lights.and_then(|lights| lights.ambient) {
            if let Some(light) = scene.get_mut(ambient).and_then(|node| node.light.as_mut()) {
                light.intensity = estimate.ambient_intensity;
                light.temperature = estimate.ambient_color_temperature;
            }
        }

        if self.settings.show_light_direction {
            if let Some(sample) = &self.estimate.directional {
                self.update_direction_line(sample.direction, scene);
            }
        }
    }

    fn update_direction_line(&mut self, direction: Vec3, scene: &mut SceneGraph) {
        let existing = self
            .direction_line
            .and_then(|id| scene.get_mut(id))
            .and_then(|node| node.geometry.as_mut());
        match existing {
            Some(geometry) => {
                geometry.kind = GeometryKind::Line {
                    start: Vec3::zeros(),
                    end: direction,
                };
            }
            None => {
                let mut node = SceneNode::with_geometry(Geometry::line(Vec3::zeros(), direction));
                node.name = Some(LIGHT_DIRECTION_NODE.to_string());
                self.direction_line = Some(scene.add_to_root(node));
            }
        }
    }

    fn install_lights(&self, scene: &mut SceneGraph) -> Option<InstalledLights> {
        let ambient = self.estimate.ambient?;
        let directional = self.estimate.directional.as_ref()?;
        let mask = self.settings.category_mask;

        let ambient_node = self.settings.create_ambient.then(|| {
            let mut node = SceneNode::with_light(
                Light::ambient(ambient.intensity, ambient.temperature).with_category_mask(mask),
            );
            node.name = Some(AMBIENT_LIGHT_NODE.to_string());
            scene.add_to_root(node)
        });

        let mut node = SceneNode::with_light(
            Light::directional(directional.intensity, ambient.temperature).with_category_mask(mask),
        );
        node.name = Some(DIRECTIONAL_LIGHT_NODE.to_string());
        node.set_orientation(orientation_towards(&directional.direction));
        let directional_node = scene.add_to_root(node);

        Some(InstalledLights {
            ambient: ambient_node,
            directional: directional_node,
        })
    }
}

impl Default for LightEstimatorAdapter {
    fn default() -> Self {
        Self::new(LightEstimatorSettings::default())
    }
}
