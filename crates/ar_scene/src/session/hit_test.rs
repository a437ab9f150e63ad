//! Screen-space hit testing types

use super::AnchorId;
use crate::foundation::math::{translation_of, Mat4, Vec3};
use bitflags::bitflags;

bitflags! {
    /// What a hit test may intersect
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct HitTestTypes: u32 {
        /// Detected planes, within their infinite extension
        const EXISTING_PLANE = 1 << 0;
        /// Detected planes, within their estimated geometry
        const EXISTING_PLANE_USING_GEOMETRY = 1 << 1;
        /// Raw feature points
        const FEATURE_POINT = 1 << 2;
    }
}

/// Point in view coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    /// Horizontal coordinate
    pub x: f32,
    /// Vertical coordinate
    pub y: f32,
}

impl ScreenPoint {
    /// Create a point
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// One intersection, nearest first in a result list
#[derive(Debug, Clone, PartialEq)]
pub struct HitTestResult {
    /// Distance from the camera
    pub distance: f32,
    /// Hit to world transform
    pub world_transform: Mat4,
    /// Anchor that was hit, if any
    pub anchor: Option<AnchorId>,
}

impl HitTestResult {
    /// World-space position of the hit
    pub fn world_position(&self) -> Vec3 {
        translation_of(&self.world_transform)
    }
}
