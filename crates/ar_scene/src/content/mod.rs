//! Virtual content shown on a tracked face
//!
//! Each [`VirtualContentType`] has a controller that builds content for a
//! face anchor's node and keeps it in sync with the anchor.

mod face_mesh;
mod transforms;

pub use face_mesh::{FaceMeshController, FaceMeshStyle};
pub use transforms::TransformsController;

use crate::scene::{NodeId, SceneError, SceneGraph};
use crate::session::FaceAnchor;
use thiserror::Error;

/// Content selection errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContentError {
    /// A selection tag outside the known content types
    #[error("unexpected virtual content tag {0}")]
    UnknownTag(i32),
}

/// Kinds of face content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VirtualContentType {
    /// Coordinate axes at the face origin
    Transforms = 0,
    /// Textured face mesh
    Texture = 1,
    /// Wireframe face mesh
    Geometry = 2,
}

impl VirtualContentType {
    /// Every content type, in tag order
    pub const ALL: [Self; 3] = [Self::Transforms, Self::Texture, Self::Geometry];

    /// Selection tag
    pub const fn tag(self) -> i32 {
        self as i32
    }

    /// New controller for this content type
    pub fn make_controller(self) -> Box<dyn VirtualContentController> {
        match self {
            Self::Transforms => Box::new(TransformsController::default()),
            Self::Texture => Box::new(FaceMeshController::new(FaceMeshStyle::Textured)),
            Self::Geometry => Box::new(FaceMeshController::new(FaceMeshStyle::Wireframe)),
        }
    }
}

impl TryFrom<i32> for VirtualContentType {
    type Error = ContentError;

    fn try_from(tag: i32) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.tag() == tag)
            .ok_or(ContentError::UnknownTag(tag))
    }
}

/// Builds and updates the content for one content type
pub trait VirtualContentController: Send {
    /// Create content for `anchor` as a child of `anchor_node`
    fn create_content(
        &mut self,
        scene: &mut SceneGraph,
        anchor_node: NodeId,
        anchor: &FaceAnchor,
    ) -> Result<NodeId, SceneError>;

    /// Bring existing content in line with `anchor`
    fn update_content(&mut self, scene: &mut SceneGraph, anchor: &FaceAnchor);

    /// Node of the current content, if any
    fn content_node(&self) -> Option<NodeId>;

    /// Drop the reference to the current content without touching the scene
    fn forget_content(&mut self) -> Option<NodeId>;

    /// Remove the current content from the scene
    fn remove_content(&mut self, scene: &mut SceneGraph) {
        if let Some(node) = self.forget_content() {
            if scene.contains(node) {
                if let Err(err) = scene.remove(node) {
                    log::warn!("Failed to remove face content: {err}");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_round_trip() {
        for kind in VirtualContentType::ALL {
            assert_eq!(VirtualContentType::try_from(kind.tag()), Ok(kind));
        }
    }

    #[test]
    fn unknown_tag_is_rejected() {
        assert_eq!(VirtualContentType::try_from(7), Err(ContentError::UnknownTag(7)));
        assert_eq!(VirtualContentType::try_from(-1), Err(ContentError::UnknownTag(-1)));
    }
}
