//! View controller
//!
//! Receives every callback of the AR experience (session frames, anchor
//! events, failures, taps, content selection) and routes it to the
//! adapters. All methods are meant to be called from the tracker's single
//! delivery thread; anything user facing is posted to the UI thread as a
//! [`UiCommand`].

use crate::adapters::{
    FrameOutcome, LightEstimatorAdapter, LightEstimatorSettings, ObjectPlacer, PlacementError,
    PlaneAnchorVisualizer,
};
use crate::assets::ModelLibrary;
use crate::config::{ConfigError, ExperienceConfig};
use crate::content::{ContentError, VirtualContentController, VirtualContentType};
use crate::foundation::math::Mat4;
use crate::render::{LightingEnvironment, LightingError};
use crate::scene::{NodeId, SceneError, SceneGraph, SceneNode};
use crate::session::{
    Anchor, AnchorId, ArSession, ErrorDomain, FaceAnchor, Frame, RunOptions, ScreenPoint,
    SessionError, TrackingConfiguration,
};
use std::collections::HashMap;
use std::sync::mpsc::Sender;
use thiserror::Error;

/// Title of the alert shown when the session fails
pub const SESSION_FAILED_TITLE: &str = "The AR session failed.";

/// Controller construction and callback errors
#[derive(Error, Debug)]
pub enum ControllerError {
    /// Invalid configuration
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Lighting environment could not be prepared
    #[error("Lighting error: {0}")]
    Lighting(#[from] LightingError),

    /// Invalid content selection
    #[error("Content error: {0}")]
    Content(#[from] ContentError),

    /// Scene graph mutation failed
    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),
}

/// Button offered by an alert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertAction {
    /// Run the initial configuration again
    RestartSession,
}

impl AlertAction {
    /// Button title
    pub const fn title(self) -> &'static str {
        match self {
            Self::RestartSession => "Restart Session",
        }
    }
}

/// Modal alert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    /// Headline
    pub title: String,
    /// Body text
    pub message: String,
    /// Buttons, in display order
    pub actions: Vec<AlertAction>,
}

/// Work for the UI thread
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiCommand {
    /// Present an alert
    ShowAlert(Alert),
}

fn controller_for(
    controllers: &mut HashMap<VirtualContentType, Box<dyn VirtualContentController>>,
    kind: VirtualContentType,
) -> &mut dyn VirtualContentController {
    controllers
        .entry(kind)
        .or_insert_with(|| kind.make_controller())
        .as_mut()
}

/// Routes tracker, gesture and UI callbacks to the scene adapters
pub struct ArViewController<S: ArSession> {
    session: S,
    scene: SceneGraph,
    environment: LightingEnvironment,
    light_estimator: LightEstimatorAdapter,
    planes: PlaneAnchorVisualizer,
    placer: ObjectPlacer,
    content_controllers: HashMap<VirtualContentType, Box<dyn VirtualContentController>>,
    selected_content: VirtualContentType,
    current_face_anchor: Option<FaceAnchor>,
    anchor_nodes: HashMap<AnchorId, NodeId>,
    ui: Sender<UiCommand>,
}

impl<S: ArSession> ArViewController<S> {
    /// Build the controller; fails on invalid configuration
    pub fn new(
        config: &ExperienceConfig,
        session: S,
        library: Box<dyn ModelLibrary + Send>,
        ui: Sender<UiCommand>,
    ) -> Result<Self, ControllerError> {
        config.validate()?;
        let selected_content = VirtualContentType::try_from(config.content.initial_tag)?;
        let environment = LightingEnvironment::from_config(config.lighting.cubemap.as_ref())?;
        let settings = LightEstimatorSettings::from_config(&config.lighting, &environment);

        log::info!(
            "View controller ready: content {:?}, calibration over {} frames",
            selected_content,
            settings.calibration_frames
        );

        Ok(Self {
            session,
            scene: SceneGraph::new(),
            environment,
            light_estimator: LightEstimatorAdapter::new(settings),
            planes: PlaneAnchorVisualizer::new(&config.plane),
            placer: ObjectPlacer::new(config.placement.clone(), library),
            content_controllers: HashMap::new(),
            selected_content,
            current_face_anchor: None,
            anchor_nodes: HashMap::new(),
            ui,
        })
    }

    /// Scene graph being maintained
    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    /// Session handle
    pub fn session(&self) -> &S {
        &self.session
    }

    /// Lighting environment
    pub fn environment(&self) -> &LightingEnvironment {
        &self.environment
    }

    /// Light estimation state
    pub fn light_estimator(&self) -> &LightEstimatorAdapter {
        &self.light_estimator
    }

    /// Plane visuals
    pub fn planes(&self) -> &PlaneAnchorVisualizer {
        &self.planes
    }

    /// Content type currently selected
    pub fn selected_content(&self) -> VirtualContentType {
        self.selected_content
    }

    /// Face anchor content is attached to
    pub fn current_face_anchor(&self) -> Option<&FaceAnchor> {
        self.current_face_anchor.as_ref()
    }

    /// Node maintained for an anchor
    pub fn anchor_node(&self, id: AnchorId) -> Option<NodeId> {
        self.anchor_nodes.get(&id).copied()
    }

    /// The view finished loading: lighting comes only from estimated lights
    /// and the optional cubemap
    pub fn view_did_load(&mut self) {
        self.environment.automatically_updates_lighting = false;
        log::info!(
            "Scene view loaded ({} lighting)",
            if self.environment.uses_cubemap() { "cubemap" } else { "estimated" }
        );
    }

    /// The view became visible: start tracking
    pub fn view_did_appear(&mut self) {
        self.reset_tracking();
    }

    /// (Re)start face tracking from scratch
    pub fn reset_tracking(&mut self) {
        if !self.session.is_face_tracking_supported() {
            log::warn!("Face tracking is not supported on this device");
            return;
        }
        self.session
            .run(TrackingConfiguration::face_with_light_estimation(), RunOptions::FRESH_START);
        self.discard_anchors();
        self.light_estimator.reset(&mut self.scene);
        log::info!("Face tracking started");
    }

    /// Frame callback
    pub fn session_did_update(&mut self, frame: &Frame) -> FrameOutcome {
        let outcome = self
            .light_estimator
            .on_frame(frame, &mut self.session, &mut self.scene);
        if let FrameOutcome::Transitioned(_) = outcome {
            // World tracking was started with REMOVE_EXISTING_ANCHORS
            self.discard_anchors();
        }
        outcome
    }

    /// Failure callback; tracking failures are surfaced as an alert
    pub fn session_did_fail(&self, error: &SessionError) {
        if error.domain != ErrorDomain::Tracking {
            log::debug!("Ignoring non-tracking session error: {}", error.description);
            return;
        }
        log::error!("AR session failed: {}", error.description);

        let alert = Alert {
            title: SESSION_FAILED_TITLE.to_string(),
            message: error.message(),
            actions: vec![AlertAction::RestartSession],
        };
        if self.ui.send(UiCommand::ShowAlert(alert)).is_err() {
            log::warn!("UI thread is gone; session failure not shown");
        }
    }

    /// The user picked an alert button
    pub fn handle_alert_action(&mut self, action: AlertAction) {
        match action {
            AlertAction::RestartSession => self.reset_tracking(),
        }
    }

    /// Anchor added callback
    pub fn did_add_anchor(&mut self, anchor: &Anchor) -> Result<(), ControllerError> {
        let node = match self.anchor_nodes.get(&anchor.id()) {
            Some(node) => *node,
            None => {
                let mut node = SceneNode::named(anchor.id().to_string());
                node.set_transform_matrix(anchor.transform());
                let node = self.scene.add_to_root(node);
                self.anchor_nodes.insert(anchor.id(), node);
                node
            }
        };

        match anchor {
            Anchor::Face(face) => {
                self.current_face_anchor = Some(face.clone());
                let has_content = self
                    .scene
                    .get(node)
                    .is_some_and(|n| !n.children().is_empty());
                if !has_content {
                    controller_for(&mut self.content_controllers, self.selected_content)
                        .create_content(&mut self.scene, node, face)?;
                }
            }
            Anchor::Plane(plane) => {
                self.planes.on_anchor_added(&mut self.scene, node, plane)?;
            }
            Anchor::Other { .. } => {}
        }
        Ok(())
    }

    /// Anchor updated callback
    pub fn did_update_anchor(&mut self, anchor: &Anchor) {
        let Some(node) = self.anchor_nodes.get(&anchor.id()).copied() else {
            log::debug!("Update for unknown {}", anchor.id());
            return;
        };
        if let Some(anchor_node) = self.scene.get_mut(node) {
            anchor_node.set_transform_matrix(anchor.transform());
        }

        match anchor {
            Anchor::Face(face) => {
                if self.current_face_anchor.as_ref().map(|a| a.id) != Some(face.id) {
                    return;
                }
                self.current_face_anchor = Some(face.clone());
                let controller = controller_for(&mut self.content_controllers, self.selected_content);
                let attached = controller
                    .content_node()
                    .and_then(|content| self.scene.get(content))
                    .is_some_and(|content| content.parent() == Some(node));
                if attached {
                    controller.update_content(&mut self.scene, face);
                }
            }
            Anchor::Plane(plane) => self.planes.on_anchor_updated(&mut self.scene, plane),
            Anchor::Other { .. } => {}
        }
    }

    /// Anchor removed callback
    pub fn did_remove_anchor(&mut self, id: AnchorId) {
        self.planes.on_anchor_removed(&mut self.scene, id);
        if self.current_face_anchor.as_ref().map(|a| a.id) == Some(id) {
            self.current_face_anchor = None;
        }
        if let Some(node) = self.anchor_nodes.remove(&id) {
            if let Err(err) = self.scene.remove(node) {
                log::warn!("Failed to remove node of {id}: {err}");
            }
        }
        self.forget_orphaned_content();
    }

    /// Content selection by tag, as delivered by the tab bar
    pub fn select_content_tag(&mut self, tag: i32) -> Result<(), ControllerError> {
        let kind = VirtualContentType::try_from(tag)?;
        self.select_content(kind)
    }

    /// Switch face content, moving it onto the current face if there is one
    pub fn select_content(&mut self, kind: VirtualContentType) -> Result<(), ControllerError> {
        if kind == self.selected_content {
            return Ok(());
        }
        if let Some(previous) = self.content_controllers.get_mut(&self.selected_content) {
            previous.remove_content(&mut self.scene);
        }
        self.selected_content = kind;
        log::info!("Selected face content {kind:?}");

        let target = self
            .current_face_anchor
            .as_ref()
            .and_then(|face| self.anchor_nodes.get(&face.id).map(|node| (*node, face)));
        if let Some((node, face)) = target {
            controller_for(&mut self.content_controllers, kind)
                .create_content(&mut self.scene, node, face)?;
        }
        Ok(())
    }

    /// Tap gesture: place the model on the plane under `point`
    pub fn handle_tap(&mut self, point: ScreenPoint) -> Result<Option<NodeId>, PlacementError> {
        self.placer
            .place(&mut self.scene, &self.session, point)
            .inspect_err(|err| log::warn!("Placement failed: {err}"))
    }

    /// World transform of a node, for hosts mirroring the graph
    pub fn world_transform(&self, node: NodeId) -> Option<Mat4> {
        self.scene.world_matrix(node)
    }

    fn discard_anchors(&mut self) {
        for (id, node) in self.anchor_nodes.drain() {
            if let Err(err) = self.scene.remove(node) {
                log::debug!("Node of {id} already removed: {err}");
            }
        }
        self.planes.clear();
        self.current_face_anchor = None;
        self.forget_orphaned_content();
    }

    fn forget_orphaned_content(&mut self) {
        for controller in self.content_controllers.values_mut() {
            if let Some(content) = controller.content_node() {
                if !self.scene.contains(content) {
                    controller.forget_content();
                }
            }
        }
    }
}

impl<S: ArSession> std::fmt::Debug for ArViewController<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArViewController")
            .field("selected_content", &self.selected_content)
            .field("anchors", &self.anchor_nodes.len())
            .field("nodes", &self.scene.len())
            .finish_non_exhaustive()
    }
}
