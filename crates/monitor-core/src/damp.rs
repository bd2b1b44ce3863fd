//! Frame-rate independent exponential smoothing.
//!
//! Every smoothed value in the monitor (power, shutter, streak, cover opacity
//! and the camera rig) relaxes toward its target with the same critically
//! damped update, so trajectories never overshoot regardless of frame timing.

use glam::Vec3;

/// Move `current` toward `target` by `1 - e^(-lambda * dt)` of the remaining gap.
#[inline]
pub fn damp(current: f32, target: f32, lambda: f32, dt_sec: f32) -> f32 {
    current + (target - current) * damp_factor(lambda, dt_sec)
}

#[inline]
pub fn damp_vec3(current: Vec3, target: Vec3, lambda: f32, dt_sec: f32) -> Vec3 {
    current + (target - current) * damp_factor(lambda, dt_sec)
}

/// Blend factor in `[0, 1)`; a non-positive step leaves values untouched.
#[inline]
pub fn damp_factor(lambda: f32, dt_sec: f32) -> f32 {
    if dt_sec <= 0.0 || lambda <= 0.0 {
        return 0.0;
    }
    1.0 - (-lambda * dt_sec).exp()
}

/// Quadratic ease-out used by the roll and degauss animations.
#[inline]
pub fn ease_out_quad(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t) * (1.0 - t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn damp_never_crosses_target() {
        let mut v = 0.0;
        for _ in 0..500 {
            let next = damp(v, 1.0, 6.5, 1.0 / 30.0);
            assert!(next >= v && next <= 1.0);
            v = next;
        }
        assert!((1.0 - v).abs() < 1e-3);
    }

    #[test]
    fn zero_dt_is_identity() {
        assert_eq!(damp(0.25, 1.0, 4.0, 0.0), 0.25);
        assert_eq!(damp_factor(4.0, -0.1), 0.0);
    }

    #[test]
    fn ease_out_endpoints() {
        assert_eq!(ease_out_quad(0.0), 0.0);
        assert_eq!(ease_out_quad(1.0), 1.0);
        assert!(ease_out_quad(0.5) > 0.5);
    }
}
