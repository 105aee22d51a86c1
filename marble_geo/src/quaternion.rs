//! Planetary conventions on top of [`glam::DQuat`].
//!
//! A point on the unit sphere is a pure quaternion with `x = cos(lat)·sin(lon)`,
//! `y = sin(lat)` and `z = cos(lat)·cos(lon)`, so that (0°, 0°) looks straight at the viewer
//! along +z, north is +y and east is +x.

use glam::DQuat;

/// Below this squared distance from the polar axis the longitude is undefined and reported as 0.
const POLAR_AXIS_EPSILON: f64 = 0.00005;

pub trait QuaternionExt: Sized {
    /// Pure quaternion of the point at the given spherical coordinates (radians).
    fn from_spherical(lon: f64, lat: f64) -> Self;

    /// Longitude and latitude (radians) of the point this pure quaternion represents.
    fn spherical(&self) -> (f64, f64);

    /// Rotation composed of `pitch` around x, `yaw` around y and `roll` around z.
    fn from_pitch_yaw_roll(pitch: f64, yaw: f64, roll: f64) -> Self;

    fn pitch(&self) -> f64;
    fn yaw(&self) -> f64;
    fn roll(&self) -> f64;

    /// Normalized conjugate.
    fn planetary_inverse(&self) -> Self;

    /// Rotate this point by the unit quaternion `axis`: `axis · self · axis⁻¹`.
    fn rotate_around_axis(&self, axis: Self) -> Self;

    /// Spherical linear interpolation which never flips to the shorter 4D arc, so that two
    /// points on the sphere interpolate along their great circle.
    fn slerp_arc(&self, other: Self, t: f64) -> Self;

    fn logarithm(&self) -> Self;
    fn exponential(&self) -> Self;
}

impl QuaternionExt for DQuat {
    fn from_spherical(lon: f64, lat: f64) -> Self {
        DQuat::from_xyzw(lat.cos() * lon.sin(), lat.sin(), lat.cos() * lon.cos(), 0.0)
    }

    fn spherical(&self) -> (f64, f64) {
        let lat = self.y.clamp(-1.0, 1.0).asin();
        let lon = if self.x * self.x + self.z * self.z > POLAR_AXIS_EPSILON {
            self.x.atan2(self.z)
        } else {
            0.0
        };
        (lon, lat)
    }

    fn from_pitch_yaw_roll(pitch: f64, yaw: f64, roll: f64) -> Self {
        let (s_phi, c_phi) = (0.5 * pitch).sin_cos();
        let (s_theta, c_theta) = (0.5 * yaw).sin_cos();
        let (s_psi, c_psi) = (0.5 * roll).sin_cos();

        let w = c_phi * c_theta * c_psi + s_phi * s_theta * s_psi;
        let x = s_phi * c_theta * c_psi - c_phi * s_theta * s_psi;
        let y = c_phi * s_theta * c_psi + s_phi * c_theta * s_psi;
        let z = c_phi * c_theta * s_psi - s_phi * s_theta * c_psi;

        DQuat::from_xyzw(x, y, z, w)
    }

    fn pitch(&self) -> f64 {
        (2.0 * (self.x * self.w - self.y * self.z))
            .atan2(1.0 - 2.0 * (self.x * self.x + self.z * self.z))
    }

    fn yaw(&self) -> f64 {
        (2.0 * (self.y * self.w - self.x * self.z))
            .atan2(1.0 - 2.0 * (self.y * self.y + self.z * self.z))
    }

    fn roll(&self) -> f64 {
        (2.0 * (self.x * self.y + self.z * self.w)).clamp(-1.0, 1.0).asin()
    }

    fn planetary_inverse(&self) -> Self {
        self.conjugate() * (1.0 / self.length())
    }

    fn rotate_around_axis(&self, axis: Self) -> Self {
        axis * *self * axis.planetary_inverse()
    }

    fn slerp_arc(&self, other: Self, t: f64) -> Self {
        let cos_alpha = self.dot(other).clamp(-1.0, 1.0);
        let alpha = cos_alpha.acos();
        let sin_alpha = alpha.sin();

        let (p1, p2) = if sin_alpha > 0.0 {
            (
                ((1.0 - t) * alpha).sin() / sin_alpha,
                (t * alpha).sin() / sin_alpha,
            )
        } else {
            // Both quaternions are equal (or opposite, where no arc is defined).
            (1.0, 0.0)
        };

        *self * p1 + other * p2
    }

    fn logarithm(&self) -> Self {
        let q_len = self.length();
        let v_len = (self.x * self.x + self.y * self.y + self.z * self.z).sqrt();
        if v_len == 0.0 {
            return DQuat::from_xyzw(0.0, 0.0, 0.0, q_len.ln());
        }
        let a = (self.w / q_len).clamp(-1.0, 1.0).acos() / v_len;
        DQuat::from_xyzw(self.x * a, self.y * a, self.z * a, q_len.ln())
    }

    fn exponential(&self) -> Self {
        let v_len = (self.x * self.x + self.y * self.y + self.z * self.z).sqrt();
        let s = self.w.exp();
        if v_len == 0.0 {
            return DQuat::from_xyzw(0.0, 0.0, 0.0, s);
        }
        let a = s * v_len.sin() / v_len;
        DQuat::from_xyzw(self.x * a, self.y * a, self.z * a, s * v_len.cos())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn assert_quat_eq(a: DQuat, b: DQuat) {
        assert_relative_eq!(a.x, b.x, epsilon = 1e-12);
        assert_relative_eq!(a.y, b.y, epsilon = 1e-12);
        assert_relative_eq!(a.z, b.z, epsilon = 1e-12);
        assert_relative_eq!(a.w, b.w, epsilon = 1e-12);
    }

    #[test]
    fn spherical_there_and_back() {
        for (lon, lat) in [(0.3, 0.5), (2.0, -0.7), (-2.9, 1.2), (PI - 0.01, -0.2)] {
            let (lon2, lat2) = DQuat::from_spherical(lon, lat).spherical();
            assert_relative_eq!(lon, lon2, epsilon = 1e-12);
            assert_relative_eq!(lat, lat2, epsilon = 1e-12);
        }
    }

    #[test]
    fn longitude_at_the_pole_is_zero() {
        let (lon, lat) = DQuat::from_spherical(1.0, FRAC_PI_2).spherical();
        assert_eq!(lon, 0.0);
        assert_relative_eq!(lat, FRAC_PI_2);
    }

    #[test]
    fn euler_angles_are_recovered() {
        let q = DQuat::from_pitch_yaw_roll(-0.5, 0.3, 0.0);
        assert_relative_eq!(q.pitch(), -0.5, epsilon = 1e-12);
        assert_relative_eq!(q.yaw(), 0.3, epsilon = 1e-12);
        assert_relative_eq!(q.roll(), 0.0, epsilon = 1e-12);

        let q = DQuat::from_pitch_yaw_roll(0.0, 0.0, 0.4);
        assert_relative_eq!(q.roll(), 0.4, epsilon = 1e-12);
    }

    #[test]
    fn rotating_the_view_direction_gives_the_center() {
        // The rotation built from (-lat, lon) moves (0°, 0°) onto (lon, lat).
        let (lon, lat) = (2.0, -0.7);
        let axis = DQuat::from_pitch_yaw_roll(-lat, lon, 0.0);
        let center = DQuat::from_spherical(0.0, 0.0).rotate_around_axis(axis);
        let (lon2, lat2) = center.spherical();
        assert_relative_eq!(lon, lon2, epsilon = 1e-12);
        assert_relative_eq!(lat, lat2, epsilon = 1e-12);
    }

    #[test]
    fn slerp_follows_the_great_circle() {
        let a = DQuat::from_spherical(0.0, 0.0);
        let b = DQuat::from_spherical(FRAC_PI_2 + 0.5, 0.0);

        // More than 90° apart, a flipping slerp would head the other way round.
        let (lon, lat) = a.slerp_arc(b, 0.5).spherical();
        assert_relative_eq!(lon, (FRAC_PI_2 + 0.5) / 2.0, epsilon = 1e-12);
        assert_relative_eq!(lat, 0.0, epsilon = 1e-12);

        assert_quat_eq(a.slerp_arc(b, 0.0), a);
        assert_quat_eq(a.slerp_arc(b, 1.0), b);
        assert_quat_eq(a.slerp_arc(a, 0.3), a);
    }

    #[test]
    fn exponential_inverts_logarithm() {
        let q = DQuat::from_pitch_yaw_roll(0.2, -0.4, 0.9);
        assert_quat_eq(q.logarithm().exponential(), q);

        let pure = DQuat::from_spherical(0.7, 0.1);
        assert_quat_eq(pure.logarithm().exponential(), pure);
    }

    #[test]
    fn logarithm_of_unit_rotation_is_half_axis_angle() {
        let q = DQuat::from_pitch_yaw_roll(0.0, 0.0, 0.8);
        let log = q.logarithm();
        assert_relative_eq!(log.w, 0.0, epsilon = 1e-12);
        assert_relative_eq!(log.z, 0.4, epsilon = 1e-12);
    }
}
