//! Face lighting demo application
//!
//! Drives the AR view controller with a simulated tracker: a calibration
//! phase on a tracked face, the switch to world tracking, detected planes,
//! a few taps and one tracking failure that the UI thread answers with a
//! restart.

use ar_scene::assets::{AssetGeometry, AssetMaterial, AssetNode, InMemoryModelLibrary, SceneAsset};
use ar_scene::config::ConfigError;
use ar_scene::foundation::logging;
use ar_scene::foundation::math::translation_of;
use ar_scene::prelude::*;
use ar_scene::session::{
    DirectionalLightEstimate, FaceAnchor, FaceGeometry, PlaneAnchor, SPHERICAL_HARMONICS_COEFFICIENTS,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::Path;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use thiserror::Error;

/// Frames delivered by the simulated tracker
const TOTAL_FRAMES: u32 = 600;
/// Frame at which the tracker reports a failure
const FAILURE_FRAME: u32 = 420;
const FACE_ANCHOR: AnchorId = AnchorId(1);

#[derive(Error, Debug)]
enum DemoError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Controller error: {0}")]
    Controller(#[from] ControllerError),

    #[error("Failed to start the delivery thread: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("Delivery thread panicked")]
    DeliveryPanicked,
}

/// Tracker stand-in answering the controller's requests
struct SimulatedSession {
    configuration: Option<TrackingConfiguration>,
    camera: Camera,
    runs: u32,
}

impl SimulatedSession {
    fn new(yaw: f32) -> Self {
        Self {
            configuration: None,
            camera: Camera {
                transform: Mat4::identity(),
                euler_angles: Vec3::new(0.0, yaw, 0.0),
            },
            runs: 0,
        }
    }

    fn is_world_tracking(&self) -> bool {
        self.configuration.is_some_and(|c| !c.is_face_tracking())
    }
}

impl ArSession for SimulatedSession {
    fn run(&mut self, configuration: TrackingConfiguration, options: RunOptions) {
        self.runs += 1;
        log::info!("Tracker run #{}: {:?} ({:?})", self.runs, configuration, options);
        self.configuration = Some(configuration);
    }

    fn is_face_tracking_supported(&self) -> bool {
        true
    }

    fn current_camera(&self) -> Option<Camera> {
        Some(self.camera.clone())
    }

    fn hit_test(&self, point: ScreenPoint, _types: HitTestTypes) -> Vec<HitTestResult> {
        if !self.is_world_tracking() {
            return Vec::new();
        }
        // Floor one meter below the camera, screen mapped onto a 2m x 2m patch
        let position = Vec3::new(point.x / 375.0 * 2.0 - 1.0, -1.0, -0.5 - point.y / 667.0 * 2.0);
        vec![HitTestResult {
            distance: position.norm(),
            world_transform: Mat4::new_translation(&position),
            anchor: Some(AnchorId(10)),
        }]
    }
}

/// Produces jittered light estimates and face geometry
struct TrackerSimulation {
    rng: StdRng,
    light_direction: Vec3,
}

impl TrackerSimulation {
    fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            light_direction: Vec3::new(0.3, -0.8, -0.5),
        }
    }

    fn frame(&mut self, index: u32, face_tracking: bool) -> Frame {
        let ambient_intensity = 1000.0 + self.rng.gen_range(-80.0..80.0);
        let ambient_color_temperature = 6500.0 + self.rng.gen_range(-300.0..300.0);
        // Directional estimates only come from face tracking, and drop out now and then
        let directional = (face_tracking && !self.rng.gen_bool(0.05)).then(|| {
            let jitter = Vec3::new(
                self.rng.gen_range(-0.05..0.05),
                self.rng.gen_range(-0.05..0.05),
                self.rng.gen_range(-0.05..0.05),
            );
            DirectionalLightEstimate {
                primary_light_direction: (self.light_direction + jitter).normalize(),
                primary_light_intensity: ambient_intensity * 1.2,
                spherical_harmonics: [0.0; SPHERICAL_HARMONICS_COEFFICIENTS]
                    .map(|_| self.rng.gen_range(0.0..0.3)),
            }
        });

        Frame {
            timestamp: f64::from(index) / 60.0,
            light_estimate: Some(LightEstimate {
                ambient_intensity,
                ambient_color_temperature,
                directional,
            }),
            camera: None,
        }
    }

    fn face(&mut self) -> Anchor {
        let mut vertices = Vec::new();
        for row in 0..4 {
            for column in 0..4 {
                vertices.push(Vec3::new(
                    column as f32 * 0.04 - 0.06,
                    row as f32 * 0.05 - 0.075,
                    self.rng.gen_range(-0.005..0.005),
                ));
            }
        }
        let mut triangle_indices = Vec::new();
        for row in 0..3 {
            for column in 0..3 {
                let i = row * 4 + column;
                triangle_indices.extend_from_slice(&[i, i + 1, i + 4, i + 1, i + 5, i + 4]);
            }
        }
        Anchor::Face(FaceAnchor {
            id: FACE_ANCHOR,
            transform: Mat4::new_translation(&Vec3::new(0.0, 0.0, -0.4)),
            geometry: FaceGeometry {
                vertices,
                triangle_indices,
            },
        })
    }

    fn plane(&mut self, id: u64, growth: f32) -> Anchor {
        Anchor::Plane(PlaneAnchor {
            id: AnchorId(id),
            transform: Mat4::new_translation(&Vec3::new(id as f32 - 10.0, -1.0, -1.5)),
            center: Vec3::new(self.rng.gen_range(-0.1..0.1), 0.0, self.rng.gen_range(-0.1..0.1)),
            extent: Vec3::new(0.5 + growth, 0.0, 0.4 + growth * 0.5),
        })
    }
}

/// Built-in statue used when no model directory is present
fn builtin_library(config: &ExperienceConfig) -> InMemoryModelLibrary {
    let body = AssetNode {
        name: Some(config.placement.child_node.clone()),
        geometry: Some(AssetGeometry {
            positions: vec![
                (-0.5, 0.0, -0.5),
                (0.5, 0.0, -0.5),
                (0.5, 0.0, 0.5),
                (-0.5, 0.0, 0.5),
                (0.0, 2.5, 0.0),
            ],
            indices: vec![0, 1, 4, 1, 2, 4, 2, 3, 4, 3, 0, 4],
            materials: vec![AssetMaterial::default(), AssetMaterial::default()],
        }),
        ..AssetNode::default()
    };
    InMemoryModelLibrary::new().with_scene(
        &config.placement.model_name,
        SceneAsset {
            root: AssetNode {
                name: Some(config.placement.model_name.clone()),
                children: vec![body],
                ..AssetNode::default()
            },
        },
    )
}

fn model_library(config: &ExperienceConfig) -> Box<dyn ModelLibrary + Send> {
    if Path::new(&config.placement.models_dir).is_dir() {
        log::info!("Loading models from {}", config.placement.models_dir.display());
        Box::new(RonModelLibrary::new(&config.placement.models_dir))
    } else {
        log::info!("No model directory found, using the built-in statue");
        Box::new(builtin_library(config))
    }
}

/// Tracker delivery thread: feeds callbacks to the controller
fn deliver(
    config: &ExperienceConfig,
    ui: Sender<UiCommand>,
    actions: &Receiver<AlertAction>,
) -> Result<(), ControllerError> {
    let mut simulation = TrackerSimulation::new(7);
    let session = SimulatedSession::new(simulation.rng.gen_range(-0.5..0.5));
    let mut controller = ArViewController::new(config, session, model_library(config), ui)?;
    controller.view_did_load();
    controller.view_did_appear();

    let mut planes_detected = false;
    for index in 0..TOTAL_FRAMES {
        while let Ok(action) = actions.try_recv() {
            log::info!("User chose '{}'", action.title());
            controller.handle_alert_action(action);
            planes_detected = false;
        }

        let face_tracking = controller
            .session()
            .configuration
            .is_some_and(|c| c.is_face_tracking());

        if face_tracking {
            let face = simulation.face();
            if controller.current_face_anchor().is_none() {
                controller.did_add_anchor(&face)?;
            } else if index % 5 == 0 {
                controller.did_update_anchor(&face);
            }
            match index {
                60 => controller.select_content(VirtualContentType::Texture)?,
                120 => controller.select_content(VirtualContentType::Geometry)?,
                _ => {}
            }
        }

        let frame = simulation.frame(index, face_tracking);
        match controller.session_did_update(&frame) {
            FrameOutcome::Transitioned(lights) => {
                log::info!("Calibrated lights installed: {lights:?}");
            }
            FrameOutcome::Deferred => log::debug!("Frame {index}: waiting for a complete estimate"),
            FrameOutcome::Calibrating { .. } | FrameOutcome::Live => {}
        }

        if controller.session().is_world_tracking() {
            if !planes_detected {
                controller.did_add_anchor(&simulation.plane(10, 0.0))?;
                controller.did_add_anchor(&simulation.plane(11, 0.0))?;
                planes_detected = true;
            } else if index % 20 == 0 {
                let growth = simulation.rng.gen_range(0.0..0.5);
                controller.did_update_anchor(&simulation.plane(10, growth));
            }
            if index % 50 == 0 {
                let point = ScreenPoint::new(
                    simulation.rng.gen_range(0.0..375.0),
                    simulation.rng.gen_range(0.0..667.0),
                );
                if let Ok(Some(node)) = controller.handle_tap(point) {
                    let position = controller.world_transform(node).map(|m| translation_of(&m));
                    log::info!("Model placed at {position:?}");
                }
            }
            if index == 300 {
                controller.did_remove_anchor(AnchorId(11));
            }
        }

        if index == FAILURE_FRAME {
            let mut error = SessionError::tracking("Tracking was interrupted");
            error.failure_reason = Some("The camera feed stopped".to_string());
            error.recovery_suggestion = Some("Restart the session".to_string());
            controller.session_did_fail(&error);
        }
    }

    log::info!(
        "Delivery finished: {} nodes in scene, {} planes, {controller:?}",
        controller.scene().len(),
        controller.planes().len()
    );
    Ok(())
}

fn main() -> Result<(), DemoError> {
    logging::init();
    log::info!("Starting face lighting demo");

    let config = match std::env::args().nth(1) {
        Some(path) => {
            log::info!("Loading configuration from {path}");
            ExperienceConfig::load_from_file(path)?
        }
        None => ExperienceConfig::default(),
    };
    config.validate()?;

    let (ui_tx, ui_rx) = mpsc::channel();
    let (action_tx, action_rx) = mpsc::channel();

    let delivery = thread::Builder::new()
        .name("tracker-delivery".to_string())
        .spawn(move || deliver(&config, ui_tx, &action_rx))?;

    // UI thread: present alerts until the controller goes away
    for command in ui_rx {
        match command {
            UiCommand::ShowAlert(alert) => {
                log::warn!("ALERT {}: {}", alert.title, alert.message.replace('\n', " / "));
                if let Some(action) = alert.actions.first() {
                    if action_tx.send(*action).is_err() {
                        log::warn!("Delivery thread stopped before the alert was answered");
                    }
                }
            }
        }
    }

    delivery.join().map_err(|_| DemoError::DeliveryPanicked)??;
    log::info!("Face lighting demo finished successfully");
    Ok(())
}
