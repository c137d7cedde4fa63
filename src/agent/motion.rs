//! Scalar kinematics shared by the locomotion pipeline.

/// Threshold below which vertical velocity and offset count as zero.
pub const GROUND_EPSILON: f32 = 1e-4;

/// Per-frame decay factor `(1 - damping)^dt`.
///
/// Frame-rate independent: two half steps decay exactly as much as one full
/// step. `damping` is expected in `[0, 1)`; config validation enforces it.
pub fn damping_factor(damping: f32, dt: f32) -> f32 {
    (1.0 - damping).powf(dt)
}

pub fn damp(value: f32, damping: f32, dt: f32) -> f32 {
    value * damping_factor(damping, dt)
}

/// Applies gravity and clamps the result to `[-|fall_speed|, jump_speed]`.
pub fn integrate_gravity(
    vertical_velocity: f32,
    gravity: f32,
    dt: f32,
    fall_speed: f32,
    jump_speed: f32,
) -> f32 {
    let mut velocity = vertical_velocity - gravity * dt;
    if velocity > 0.0 && velocity > jump_speed {
        velocity = jump_speed;
    }
    if velocity < 0.0 && velocity.abs() > fall_speed.abs() {
        velocity = -fall_speed.abs();
    }
    velocity
}

pub fn is_grounded(vertical_velocity: f32, vertical_offset: f32) -> bool {
    vertical_velocity.abs() < GROUND_EPSILON && vertical_offset.abs() < GROUND_EPSILON
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn damping_shrinks_without_flipping_sign() {
        for &start in &[12.0f32, -7.5, 0.25] {
            let mut v = start;
            for &dt in &[0.016f32, 0.05, 0.5, 1.0, 3.0] {
                let next = damp(v, 0.2, dt);
                assert!(next.abs() <= v.abs());
                assert!(next == 0.0 || next.signum() == start.signum());
                v = next;
            }
        }
    }

    #[test]
    fn damping_is_frame_rate_independent() {
        let whole = damp(10.0, 0.3, 1.0);
        let halves = damp(damp(10.0, 0.3, 0.5), 0.3, 0.5);
        assert!((whole - halves).abs() < 1e-5);
    }

    #[test]
    fn gravity_clamps_to_fall_speed() {
        let v = integrate_gravity(-40.0, 9.8, 1.0, 20.0, 10.0);
        assert_eq!(v, -20.0);

        // sign of fall_speed does not matter
        let v = integrate_gravity(-40.0, 9.8, 1.0, -20.0, 10.0);
        assert_eq!(v, -20.0);
    }

    #[test]
    fn gravity_clamps_to_jump_speed() {
        let v = integrate_gravity(100.0, 9.8, 0.1, 55.0, 10.0);
        assert_eq!(v, 10.0);
    }

    #[test]
    fn gravity_result_always_within_bounds() {
        let fall_speed = 55.0;
        let jump_speed = 10.0;
        for &start in &[-500.0f32, -55.0, -1.0, 0.0, 3.0, 10.0, 500.0] {
            for &dt in &[0.0f32, 0.016, 0.05, 1.0, 10.0] {
                let v = integrate_gravity(start, 9.8, dt, fall_speed, jump_speed);
                assert!(v >= -fall_speed && v <= jump_speed, "{start} {dt} -> {v}");
            }
        }
    }

    #[test]
    fn grounded_requires_both_velocity_and_offset_near_zero() {
        assert!(is_grounded(0.0, 0.0));
        assert!(!is_grounded(0.0, 0.1));
        assert!(!is_grounded(-0.1, 0.0));
    }
}
