use glam::{Mat4, Quat, Vec3};

/// Local pose of a scene node.
///
/// `orbit` rotates the node about its parent's origin and `joint` shifts the
/// node's own geometry so it rotates about a pivot instead of its centre.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub orientation: Quat,
    pub scale: Vec3,
    pub joint: Vec3,
    pub orbit: Quat,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        orientation: Quat::IDENTITY,
        scale: Vec3::ONE,
        joint: Vec3::ZERO,
        orbit: Quat::IDENTITY,
    };

    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }

    pub fn from_trs(t: Vec3, r: Quat, s: Vec3) -> Self {
        Self {
            position: t,
            orientation: r,
            scale: s,
            ..Self::IDENTITY
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    pub fn orientation(&self) -> Quat {
        self.orientation
    }

    pub fn set_orientation(&mut self, orientation: Quat) {
        self.orientation = orientation.normalize();
    }

    /// Rotates about the node's local right axis.
    pub fn pitch(&mut self, angle: f32) {
        self.rotate_local(Quat::from_rotation_x(angle));
    }

    /// Rotates about the node's local up axis.
    pub fn yaw(&mut self, angle: f32) {
        self.rotate_local(Quat::from_rotation_y(angle));
    }

    /// Rotates about the node's local forward axis.
    pub fn roll(&mut self, angle: f32) {
        self.rotate_local(Quat::from_rotation_z(angle));
    }

    fn rotate_local(&mut self, rotation: Quat) {
        self.orientation = (self.orientation * rotation).normalize();
    }

    /// Rotates a local-space direction into the node's frame.
    pub fn rotate_direction(&self, direction: Vec3) -> Vec3 {
        self.orientation.normalize() * direction
    }

    pub fn forward(&self) -> Vec3 {
        self.rotate_direction(Vec3::NEG_Z)
    }

    pub fn up(&self) -> Vec3 {
        self.rotate_direction(Vec3::Y)
    }

    pub fn right(&self) -> Vec3 {
        self.rotate_direction(Vec3::X)
    }

    /// Rigid part of the local pose: orbit, then translation, then rotation.
    /// This is what children inherit.
    pub fn pose_matrix(&self) -> Mat4 {
        Mat4::from_quat(self.orbit.normalize())
            * Mat4::from_rotation_translation(self.orientation.normalize(), self.position)
    }

    /// Full local matrix used for the node's own geometry.
    pub fn matrix(&self) -> Mat4 {
        self.pose_matrix() * Mat4::from_scale(self.scale) * Mat4::from_translation(self.joint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn default_is_identity() {
        let m = Transform::default().matrix();
        assert!(m.abs_diff_eq(Mat4::IDENTITY, 1e-6));
    }

    #[test]
    fn translate_then_scale_ok() {
        let tr = Transform::from_trs(Vec3::new(1.0, 2.0, 3.0), Quat::IDENTITY, Vec3::splat(2.0));
        let p = tr.matrix().transform_point3(Vec3::new(1.0, 0.0, 0.0));
        // (1,0,0) -> (2,0,0) -> (3,2,3)
        assert!(p.abs_diff_eq(Vec3::new(3.0, 2.0, 3.0), 1e-6));
    }

    #[test]
    fn pitch_then_yaw_differs_from_yaw_then_pitch() {
        let mut a = Transform::default();
        a.pitch(0.5);
        a.yaw(0.7);

        let mut b = Transform::default();
        b.yaw(0.7);
        b.pitch(0.5);

        assert!(!a.forward().abs_diff_eq(b.forward(), 1e-4));
    }

    #[test]
    fn yaw_turns_forward_about_up() {
        let mut t = Transform::default();
        t.yaw(FRAC_PI_2);
        assert!(t.forward().abs_diff_eq(Vec3::NEG_X, 1e-5));
        assert!(t.up().abs_diff_eq(Vec3::Y, 1e-5));
    }

    #[test]
    fn joint_offsets_geometry_before_scale() {
        let mut t = Transform::from_trs(Vec3::new(0.0, 4.0, 0.0), Quat::IDENTITY, Vec3::new(1.0, 2.0, 1.0));
        t.joint = Vec3::new(0.0, 1.0, 0.0);
        // The pivot (local origin of the mesh shifted by the joint) lands at the node position.
        let base = t.matrix().transform_point3(Vec3::new(0.0, -1.0, 0.0));
        assert!(base.abs_diff_eq(Vec3::new(0.0, 4.0, 0.0), 1e-5));
    }

    #[test]
    fn orbit_rotates_about_parent_origin() {
        let mut t = Transform::from_position(Vec3::new(0.0, 2.0, 0.0));
        t.orbit = Quat::from_rotation_z(-FRAC_PI_2);
        let p = t.pose_matrix().transform_point3(Vec3::ZERO);
        assert!(p.abs_diff_eq(Vec3::new(2.0, 0.0, 0.0), 1e-5));
    }

    #[test]
    fn set_orientation_normalizes() {
        let mut t = Transform::default();
        t.set_orientation(Quat::from_xyzw(0.0, 2.0, 0.0, 2.0));
        assert!((t.orientation().length() - 1.0).abs() < 1e-6);
    }
}
