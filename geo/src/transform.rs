use crate::mat3::Mat3;
use crate::vec3::Vec3;

/// A world-space position plus an Euler rotation (pitch, yaw, roll, in
/// degrees), compiled into an orthonormal 3x3 rotation matrix on demand.
///
/// The full 4x4 world matrix described by the data model is represented here
/// as the pair `(rotation, position)` rather than a dense 4x4 array: nothing
/// in this crate ever needs scale or shear, so carrying the extra thirteen
/// zeroes and ones would only obscure the one multiply-and-add that actually
/// happens at every call site.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub pitch: f64,
    pub yaw: f64,
    pub roll: f64,
}

impl Transform {
    pub fn identity() -> Self {
        Transform {
            position: Vec3::zero(),
            pitch: 0.0,
            yaw: 0.0,
            roll: 0.0,
        }
    }

    pub fn at(position: Vec3) -> Self {
        Transform {
            position,
            ..Transform::identity()
        }
    }

    pub fn new(position: Vec3, pitch: f64, yaw: f64, roll: f64) -> Self {
        Transform {
            position,
            pitch,
            yaw,
            roll,
        }
    }

    /// The orthonormal rotation matrix for this transform.
    pub fn rotation(&self) -> Mat3 {
        Mat3::from_euler_deg(self.pitch, self.yaw, self.roll)
    }

    /// World-space forward axis (local `-Z`).
    pub fn forward(&self) -> Vec3 {
        self.rotation().mul_vec(Vec3::new(0.0, 0.0, -1.0))
    }

    /// World-space up axis (local `+Y`).
    pub fn up(&self) -> Vec3 {
        self.rotation().mul_vec(Vec3::new(0.0, 1.0, 0.0))
    }

    /// World-space right axis (local `+X`).
    pub fn right(&self) -> Vec3 {
        self.rotation().mul_vec(Vec3::new(1.0, 0.0, 0.0))
    }

    /// Map a point from local to world space: rotate, then translate.
    pub fn point_to_world(&self, local: Vec3) -> Vec3 {
        self.rotation().mul_vec(local) + self.position
    }

    /// Map a direction (no translation) from local to world space.
    pub fn vector_to_world(&self, local: Vec3) -> Vec3 {
        self.rotation().mul_vec(local)
    }

    /// A transform at `position` whose forward axis points at `target`, with
    /// zero roll. Inverts `Mat3::from_euler_deg`'s pitch/yaw composition to
    /// recover the two angles from a direction vector.
    pub fn looking_at(position: Vec3, target: Vec3) -> Self {
        let dir = (target - position).normalized();

        let pitch = dir.y.clamp(-1.0, 1.0).asin();
        let yaw = (-dir.x).atan2(-dir.z);

        Transform::new(position, pitch.to_degrees(), yaw.to_degrees(), 0.0)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Transform::identity()
    }
}
