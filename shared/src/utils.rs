use crate::{
    collision::{Quat, Vec3},
    constants::{DIST_EPS, MAX_TICK_DT},
};

/// Horizontal (yaw-only) forward direction of a camera rotation.
///
/// The camera looks down its local -Z. Pitch is discarded by zeroing Y. Returns
/// `None` when looking straight up or down, where yaw is undefined.
pub fn planar_forward(rotation: &Quat) -> Option<Vec3> {
    planar(rotation * Vec3::new(0.0, 0.0, -1.0))
}

/// Horizontal right direction of a camera rotation (local +X with Y zeroed).
pub fn planar_right(rotation: &Quat) -> Option<Vec3> {
    planar(rotation * Vec3::new(1.0, 0.0, 0.0))
}

fn planar(v: Vec3) -> Option<Vec3> {
    let flat = Vec3::new(v.x, 0.0, v.z);
    let len = flat.norm();
    (len > DIST_EPS).then(|| flat / len)
}

/// Decompose a rotation into XYZ-order Euler angles (radians), i.e. `R = Rx * Ry * Rz`.
///
/// This is the convention remote clients apply the outbound rotation with.
pub fn euler_xyz(rotation: &Quat) -> Vec3 {
    let m = rotation.to_rotation_matrix();
    let m = m.matrix();

    let y = m[(0, 2)].clamp(-1.0, 1.0).asin();
    let (x, z) = if m[(0, 2)].abs() < 0.999_999_9 {
        ((-m[(1, 2)]).atan2(m[(2, 2)]), (-m[(0, 1)]).atan2(m[(0, 0)]))
    } else {
        (m[(2, 1)].atan2(m[(1, 1)]), 0.0)
    };

    Vec3::new(x, y, z)
}

/// Fraction of the remaining distance covered by single-pole smoothing this tick.
///
/// `rate` is in 1/s. The result is frame-rate independent: two ticks of `dt`
/// close the same gap as one tick of `2*dt`.
#[inline]
pub fn smoothing_factor(rate: f32, dt: f32) -> f32 {
    if !(rate > 0.0) || !(dt > 0.0) {
        return 0.0;
    }
    (1.0 - (-rate * dt).exp()).clamp(0.0, 1.0)
}

#[inline]
pub fn smooth_toward(current: f32, target: f32, rate: f32, dt: f32) -> f32 {
    current + (target - current) * smoothing_factor(rate, dt)
}

#[inline]
pub fn smooth_toward_vec(current: Vec3, target: Vec3, rate: f32, dt: f32) -> Vec3 {
    current + (target - current) * smoothing_factor(rate, dt)
}

/// Clamp a frame delta into `[0, MAX_TICK_DT]`; NaN and negatives become zero.
#[inline]
pub fn sanitize_dt(dt: f32) -> f32 {
    if dt.is_nan() || dt <= 0.0 {
        0.0
    } else {
        dt.min(MAX_TICK_DT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn planar_forward_ignores_pitch() {
        let yaw = Quat::from_axis_angle(&Vec3::y_axis(), FRAC_PI_2);
        let pitch = Quat::from_axis_angle(&Vec3::x_axis(), 0.6);
        let f = planar_forward(&(yaw * pitch)).unwrap();
        assert!((f - Vec3::new(-1.0, 0.0, 0.0)).norm() < 1.0e-5);
    }

    #[test]
    fn looking_straight_down_has_no_facing() {
        let down = Quat::from_axis_angle(&Vec3::x_axis(), -FRAC_PI_2);
        assert!(planar_forward(&down).is_none());
    }

    #[test]
    fn euler_xyz_recovers_single_axis_rotations() {
        let e = euler_xyz(&Quat::from_axis_angle(&Vec3::y_axis(), 0.7));
        assert!((e - Vec3::new(0.0, 0.7, 0.0)).norm() < 1.0e-5);
        let e = euler_xyz(&Quat::from_axis_angle(&Vec3::x_axis(), -0.3));
        assert!((e - Vec3::new(-0.3, 0.0, 0.0)).norm() < 1.0e-5);
    }

    #[test]
    fn smoothing_is_frame_rate_independent() {
        let one = smooth_toward(0.0, 1.0, 10.0, 0.02);
        let two = smooth_toward(smooth_toward(0.0, 1.0, 10.0, 0.01), 1.0, 10.0, 0.01);
        assert!((one - two).abs() < 1.0e-5);
        assert_eq!(smooth_toward(0.3, 1.0, 10.0, 0.0), 0.3);
        assert_eq!(smooth_toward(0.3, 1.0, 10.0, -1.0), 0.3);
    }

    #[test]
    fn dt_is_sanitized() {
        assert_eq!(sanitize_dt(-0.1), 0.0);
        assert_eq!(sanitize_dt(f32::NAN), 0.0);
        assert_eq!(sanitize_dt(1.0), MAX_TICK_DT);
        assert_eq!(sanitize_dt(0.016), 0.016);
    }
}
