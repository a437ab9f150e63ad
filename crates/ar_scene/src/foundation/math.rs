//! Math utilities and types
//!
//! Thin aliases over `nalgebra` plus the handful of vector helpers the
//! adapters need (cross product, normalization, axis alignment).

pub use nalgebra::{Matrix3, Matrix4, Unit, Vector3};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 3x3 matrix type
pub type Mat3 = Matrix3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Quaternion type for rotations
pub type Quat = nalgebra::UnitQuaternion<f32>;

/// Transform representing position, rotation, and scale
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// Position in parent space
    pub position: Vec3,

    /// Rotation quaternion
    pub rotation: Quat,

    /// Scale factors
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    /// Create a new identity transform
    pub fn identity() -> Self {
        Self::default()
    }

    /// Convert to a transformation matrix
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::new_translation(&self.position)
            * self.rotation.to_homogeneous()
            * Mat4::new_nonuniform_scaling(&self.scale)
    }

    /// Decompose an affine transformation matrix (no shear)
    pub fn from_matrix(matrix: &Mat4) -> Self {
        let position = translation_of(matrix);

        let scale_x = Vec3::new(matrix.m11, matrix.m21, matrix.m31).magnitude();
        let scale_y = Vec3::new(matrix.m12, matrix.m22, matrix.m32).magnitude();
        let scale_z = Vec3::new(matrix.m13, matrix.m23, matrix.m33).magnitude();
        let scale = Vec3::new(scale_x, scale_y, scale_z);

        if scale_x <= f32::EPSILON || scale_y <= f32::EPSILON || scale_z <= f32::EPSILON {
            return Self {
                position,
                rotation: Quat::identity(),
                scale,
            };
        }

        #[rustfmt::skip]
        let rotation_matrix = Mat3::new(
            matrix.m11 / scale_x, matrix.m12 / scale_y, matrix.m13 / scale_z,
            matrix.m21 / scale_x, matrix.m22 / scale_y, matrix.m23 / scale_z,
            matrix.m31 / scale_x, matrix.m32 / scale_y, matrix.m33 / scale_z,
        );
        let rotation = Quat::from_matrix(&rotation_matrix);

        Self {
            position,
            rotation,
            scale,
        }
    }

    /// Apply this transform to a point
    pub fn transform_point(&self, point: &Point3) -> Point3 {
        self.to_matrix().transform_point(point)
    }
}

/// Translation column of an affine matrix
pub fn translation_of(matrix: &Mat4) -> Vec3 {
    Vec3::new(matrix.m14, matrix.m24, matrix.m34)
}

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// Pi / 2
    pub const HALF_PI: f32 = PI * 0.5;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;
}

/// Vector helpers
pub mod utils {
    use super::{constants, Mat4, Quat, Unit, Vec3};

    /// Tolerance below which a vector is treated as zero length
    pub const DEGENERATE_LENGTH: f32 = 1.0e-6;

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }

    /// Right-handed cross product `a × b`
    pub fn cross(a: &Vec3, b: &Vec3) -> Vec3 {
        Vec3::new(
            a.y * b.z - a.z * b.y,
            a.z * b.x - a.x * b.z,
            a.x * b.y - a.y * b.x,
        )
    }

    /// Normalize a vector, returning `None` for (near) zero length input
    pub fn normalized(v: &Vec3) -> Option<Vec3> {
        let length = v.magnitude();
        if length <= DEGENERATE_LENGTH {
            None
        } else {
            Some(v / length)
        }
    }

    /// Flip the depth axis, converting between left- and right-handed conventions
    pub fn flip_z(v: &Vec3) -> Vec3 {
        Vec3::new(v.x, v.y, -v.z)
    }

    /// Rotation that turns `from` onto `to` (both expected unit length)
    ///
    /// Angle is `acos(from · to)`, axis is `normalize(from × to)`. Parallel
    /// vectors give identity; opposite vectors give a half turn about any
    /// axis perpendicular to `from`.
    pub fn rotation_aligning(from: &Vec3, to: &Vec3) -> Quat {
        let dot = from.dot(to).clamp(-1.0, 1.0);
        let angle = dot.acos();

        match normalized(&cross(from, to)) {
            Some(axis) => Quat::from_axis_angle(&Unit::new_unchecked(axis), angle),
            None if dot > 0.0 => Quat::identity(),
            None => {
                let fallback = if from.y.abs() < 0.9 {
                    Vec3::y()
                } else {
                    Vec3::x()
                };
                // Component of the fallback perpendicular to `from`
                let unit_from = normalized(from).unwrap_or_else(Vec3::z);
                let axis = normalized(&(fallback - unit_from * unit_from.dot(&fallback)))
                    .unwrap_or_else(Vec3::y);
                Quat::from_axis_angle(&Unit::new_unchecked(axis), constants::PI)
            }
        }
    }

    /// Rotation of `angle` radians about the world Y axis, as a matrix
    pub fn yaw_matrix(angle: f32) -> Mat4 {
        Mat4::new_rotation(Vec3::new(0.0, angle, 0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::utils::*;
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn cross_follows_right_hand_rule() {
        let x = Vec3::x();
        let y = Vec3::y();
        assert_relative_eq!(cross(&x, &y), Vec3::z());
        assert_relative_eq!(cross(&x, &y), x.cross(&y));
    }

    #[test]
    fn normalizing_zero_vector_is_rejected() {
        assert!(normalized(&Vec3::zeros()).is_none());
        let n = normalized(&Vec3::new(3.0, 0.0, 4.0)).unwrap();
        assert_relative_eq!(n.magnitude(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn rotation_aligning_maps_from_onto_to() {
        let from = Vec3::new(0.0, 0.0, -1.0);
        let to = Vec3::new(0.6, -0.8, 0.0);
        let q = rotation_aligning(&from, &to);
        assert_relative_eq!(q * from, to, epsilon = 1e-5);
    }

    #[test]
    fn rotation_aligning_handles_opposite_vectors() {
        let from = Vec3::new(0.0, 0.0, -1.0);
        let to = Vec3::new(0.0, 0.0, 1.0);
        let q = rotation_aligning(&from, &to);
        assert_relative_eq!(q.angle(), constants::PI, epsilon = 1e-5);
        assert_relative_eq!(q * from, to, epsilon = 1e-5);
        let axis = q.axis().map_or_else(Vec3::zeros, Unit::into_inner);
        assert_relative_eq!(axis.y.abs(), 1.0, epsilon = 1e-5);
    }

    #[test]
    fn rotation_aligning_opposite_vertical_vectors_turns_about_x() {
        for from in [Vec3::y(), -Vec3::y()] {
            let to = -from;
            let q = rotation_aligning(&from, &to);
            assert_relative_eq!(q.angle(), constants::PI, epsilon = 1e-5);
            assert_relative_eq!(q * from, to, epsilon = 1e-5);
            let axis = q.axis().map_or_else(Vec3::zeros, Unit::into_inner);
            assert_relative_eq!(axis.x.abs(), 1.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn transform_matrix_round_trip_keeps_components() {
        let transform = Transform {
            position: Vec3::new(1.0, 2.0, 3.0),
            rotation: Quat::from_axis_angle(&Vec3::y_axis(), 0.5),
            scale: Vec3::new(0.09, 0.09, 0.09),
        };
        let decomposed = Transform::from_matrix(&transform.to_matrix());
        assert_relative_eq!(decomposed.position, transform.position, epsilon = 1e-5);
        assert_relative_eq!(decomposed.scale, transform.scale, epsilon = 1e-5);
        assert_relative_eq!(decomposed.rotation.angle(), 0.5, epsilon = 1e-4);
    }
}
