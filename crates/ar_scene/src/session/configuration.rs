//! Tracking configurations and run options

use bitflags::bitflags;

bitflags! {
    /// Surface orientations the tracker looks for
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PlaneDetection: u32 {
        /// Floors, tables
        const HORIZONTAL = 1 << 0;
        /// Walls
        const VERTICAL = 1 << 1;
    }
}

bitflags! {
    /// Options applied when (re)starting a session
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct RunOptions: u32 {
        /// Restart tracking from a fresh world origin
        const RESET_TRACKING = 1 << 0;
        /// Drop every anchor of the previous run
        const REMOVE_EXISTING_ANCHORS = 1 << 1;
    }
}

impl RunOptions {
    /// Start over from scratch
    pub const FRESH_START: Self = Self::RESET_TRACKING.union(Self::REMOVE_EXISTING_ANCHORS);
}

/// What the tracker should track
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackingConfiguration {
    /// Front camera face tracking
    FaceTracking {
        /// Produce per-frame light estimates
        light_estimation: bool,
    },
    /// Back camera six degrees of freedom world tracking
    WorldTracking {
        /// Plane kinds to detect
        plane_detection: PlaneDetection,
        /// Produce per-frame light estimates
        light_estimation: bool,
    },
}

impl TrackingConfiguration {
    /// Face tracking with light estimation, the initial configuration
    pub const fn face_with_light_estimation() -> Self {
        Self::FaceTracking {
            light_estimation: true,
        }
    }

    /// World tracking detecting horizontal planes
    pub const fn world_with_horizontal_planes() -> Self {
        Self::WorldTracking {
            plane_detection: PlaneDetection::HORIZONTAL,
            light_estimation: true,
        }
    }

    /// True for face tracking
    pub const fn is_face_tracking(&self) -> bool {
        matches!(self, Self::FaceTracking { .. })
    }
}
