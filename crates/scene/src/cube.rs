use glam::{Mat4, Vec3};
use spincube_common::Transformable;

/// Spin rate used when none is given, in degrees per second.
pub const DEFAULT_ANGULAR_VELOCITY: Vec3 = Vec3::new(0.0, 10.0, 0.0);

/// A cube that rotates on its own at a fixed per-axis rate.
///
/// Nothing outside `update` touches its orientation after construction.
#[derive(Debug, Clone)]
pub struct Cube {
    transform: Transformable,
    angular_velocity: Vec3,
}

impl Cube {
    pub fn new(position: Vec3, scale: Vec3) -> Self {
        Self {
            transform: Transformable::new(position, Vec3::ZERO, scale),
            angular_velocity: DEFAULT_ANGULAR_VELOCITY,
        }
    }

    pub fn with_angular_velocity(mut self, degrees_per_second: Vec3) -> Self {
        self.angular_velocity = degrees_per_second;
        self
    }

    pub fn transform(&self) -> &Transformable {
        &self.transform
    }

    /// Advance the spin by `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        self.transform.rotate_by(self.angular_velocity * dt);
    }

    /// Local-to-world transform: translate, then rotate Z, Y, X, then scale.
    ///
    /// The Z-Y-X rotation order is what the cube's visible tumble depends on.
    pub fn model_transform(&self) -> Mat4 {
        let t = &self.transform;
        let o = t.orientation();
        Mat4::from_translation(t.position)
            * Mat4::from_rotation_z(o.z.to_radians())
            * Mat4::from_rotation_y(o.y.to_radians())
            * Mat4::from_rotation_x(o.x.to_radians())
            * Mat4::from_scale(t.scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demo_cube() -> Cube {
        Cube::new(Vec3::new(3.0, 0.0, 0.25), Vec3::splat(0.25))
            .with_angular_velocity(Vec3::new(0.0, 10.0, 0.0))
    }

    #[test]
    fn one_second_of_frames_spins_ten_degrees() {
        let mut cube = demo_cube();
        for _ in 0..60 {
            cube.update(1.0 / 60.0);
        }
        let o = cube.transform().orientation();
        assert!((o.y - 10.0).abs() < 1e-3, "{o:?}");
        assert_eq!(o.x, 0.0);
        assert_eq!(o.z, 0.0);
    }

    #[test]
    fn update_is_mod_360() {
        let mut cube = Cube::new(Vec3::ZERO, Vec3::ONE)
            .with_angular_velocity(Vec3::new(100.0, -50.0, 370.0));
        cube.update(4.0);
        let o = cube.transform().orientation();
        assert!((o.x - 40.0).abs() < 1e-3);
        assert!((o.y - 160.0).abs() < 1e-3);
        assert!((o.z - 40.0).abs() < 1e-3);
    }

    #[test]
    fn zero_dt_changes_nothing() {
        let mut cube = demo_cube();
        let before = *cube.transform();
        cube.update(0.0);
        assert_eq!(*cube.transform(), before);
    }

    #[test]
    fn update_leaves_position_and_scale() {
        let mut cube = demo_cube();
        cube.update(0.5);
        assert_eq!(cube.transform().position, Vec3::new(3.0, 0.0, 0.25));
        assert_eq!(cube.transform().scale, Vec3::splat(0.25));
    }

    #[test]
    fn model_at_rest_is_translate_scale() {
        let cube = demo_cube();
        let expected = Mat4::from_translation(Vec3::new(3.0, 0.0, 0.25))
            * Mat4::from_scale(Vec3::splat(0.25));
        assert!(cube.model_transform().abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn model_rotation_order_is_z_then_y_then_x() {
        let mut cube = Cube::new(Vec3::ZERO, Vec3::ONE)
            .with_angular_velocity(Vec3::new(90.0, 90.0, 0.0));
        cube.update(1.0);
        // Rx(90) sends +Y to +Z, then Ry(90) sends +Z to +X.
        let p = cube.model_transform().transform_point3(Vec3::Y);
        assert!((p - Vec3::X).length() < 1e-5, "{p:?}");
    }
}
