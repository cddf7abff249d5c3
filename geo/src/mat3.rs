use crate::vec3::Vec3;

/// A row-major 3x3 matrix, used as the rotation part of a `Transform`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat3 {
    pub rows: [Vec3; 3],
}

impl Mat3 {
    pub fn identity() -> Self {
        Mat3 {
            rows: [
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
                Vec3::new(0.0, 0.0, 1.0),
            ],
        }
    }

    /// Build the rotation matrix for intrinsic Euler angles given in degrees,
    /// applied in pitch (X), then yaw (Y), then roll (Z) order: `R = Rz * Ry
    /// * Rx`.
    pub fn from_euler_deg(pitch: f64, yaw: f64, roll: f64) -> Self {
        let (sx, cx) = pitch.to_radians().sin_cos();
        let (sy, cy) = yaw.to_radians().sin_cos();
        let (sz, cz) = roll.to_radians().sin_cos();

        let rx = Mat3 {
            rows: [
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(0.0, cx, -sx),
                Vec3::new(0.0, sx, cx),
            ],
        };
        let ry = Mat3 {
            rows: [
                Vec3::new(cy, 0.0, sy),
                Vec3::new(0.0, 1.0, 0.0),
                Vec3::new(-sy, 0.0, cy),
            ],
        };
        let rz = Mat3 {
            rows: [
                Vec3::new(cz, -sz, 0.0),
                Vec3::new(sz, cz, 0.0),
                Vec3::new(0.0, 0.0, 1.0),
            ],
        };

        rz.mul_mat(&ry).mul_mat(&rx)
    }

    /// Multiply this matrix by a column vector.
    pub fn mul_vec(&self, v: Vec3) -> Vec3 {
        Vec3::new(self.rows[0].dot(&v), self.rows[1].dot(&v), self.rows[2].dot(&v))
    }

    /// Matrix product `self * other`.
    pub fn mul_mat(&self, other: &Mat3) -> Mat3 {
        let cols = other.transpose();

        Mat3 {
            rows: [
                Vec3::new(
                    self.rows[0].dot(&cols.rows[0]),
                    self.rows[0].dot(&cols.rows[1]),
                    self.rows[0].dot(&cols.rows[2]),
                ),
                Vec3::new(
                    self.rows[1].dot(&cols.rows[0]),
                    self.rows[1].dot(&cols.rows[1]),
                    self.rows[1].dot(&cols.rows[2]),
                ),
                Vec3::new(
                    self.rows[2].dot(&cols.rows[0]),
                    self.rows[2].dot(&cols.rows[1]),
                    self.rows[2].dot(&cols.rows[2]),
                ),
            ],
        }
    }

    /// Transpose of this matrix. Since every rotation matrix built by this
    /// crate is orthonormal, this also equals its inverse.
    pub fn transpose(&self) -> Mat3 {
        Mat3 {
            rows: [
                Vec3::new(self.rows[0].x, self.rows[1].x, self.rows[2].x),
                Vec3::new(self.rows[0].y, self.rows[1].y, self.rows[2].y),
                Vec3::new(self.rows[0].z, self.rows[1].z, self.rows[2].z),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(Mat3::identity().mul_vec(v), v);
    }

    #[test]
    fn test_yaw_90_rotates_forward_axis() {
        let r = Mat3::from_euler_deg(0.0, 90.0, 0.0);
        let forward = Vec3::new(0.0, 0.0, -1.0);
        let rotated = r.mul_vec(forward);

        assert!((rotated.x - (-1.0)).abs() < 1e-9, "{:?}", rotated);
        assert!(rotated.y.abs() < 1e-9);
        assert!(rotated.z.abs() < 1e-9);
    }

    #[test]
    fn test_orthonormal_rows() {
        let r = Mat3::from_euler_deg(17.0, -44.0, 83.0);

        for row in &r.rows {
            assert!((row.norm() - 1.0).abs() < 1e-9);
        }

        assert!(r.rows[0].dot(&r.rows[1]).abs() < 1e-9);
        assert!(r.rows[1].dot(&r.rows[2]).abs() < 1e-9);
        assert!(r.rows[0].dot(&r.rows[2]).abs() < 1e-9);
    }
}
