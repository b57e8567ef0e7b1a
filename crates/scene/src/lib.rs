//! Scene state for the spincube demo: one self-spinning cube and a
//! first-person camera, stepped once per frame.
//!
//! # Invariants
//! - The cube is only mutated by its own `update`.
//! - The camera is only mutated by `move_by` and `spin`.
//! - Orientations stay in `[0, 360)` degrees.
//! - Nothing here touches the GPU.

pub mod camera;
pub mod clock;
pub mod config;
pub mod cube;
pub mod mesh;

pub use camera::{Camera, Projection};
pub use clock::{FrameClock, FrameTiming};
pub use config::{CameraConfig, ConfigError, CubeConfig, SceneConfig};
pub use cube::Cube;
pub use mesh::{CUBE_VERTEX_COUNT, MeshVertex};

use glam::Vec3;
use serde::Serialize;
use spincube_common::Transformable;

/// Everything the frame loop updates and draws.
#[derive(Debug, Clone)]
pub struct Scene {
    pub cube: Cube,
    pub camera: Camera,
}

/// Point-in-time view of the scene, for logs and tooling output.
#[derive(Debug, Clone, Serialize)]
pub struct SceneSnapshot {
    pub frame: u64,
    pub cube: Transformable,
    pub camera_position: Vec3,
    pub camera_orientation: Vec3,
    pub camera_forward: Vec3,
}

impl Scene {
    /// Cube at (3, 0, 0.25) with scale 0.25, camera at (0, 0, 1).
    pub fn demo() -> Self {
        Self::from_config(&SceneConfig::default())
    }

    pub fn from_config(config: &SceneConfig) -> Self {
        let cube = Cube::new(config.cube.position, config.cube.scale)
            .with_angular_velocity(config.cube.angular_velocity);
        let camera = Camera::new(config.camera.position)
            .with_move_step(config.camera.move_step)
            .with_projection(config.camera.projection);
        Self { cube, camera }
    }

    /// One frame of simulation: move, then spin the camera, then step the cube.
    pub fn advance(&mut self, movement: Vec3, spin: Vec3, dt: f32) {
        self.camera.move_by(movement);
        self.camera.spin(spin);
        self.cube.update(dt);
    }

    pub fn snapshot(&self, frame: u64) -> SceneSnapshot {
        SceneSnapshot {
            frame,
            cube: *self.cube.transform(),
            camera_position: self.camera.position(),
            camera_orientation: self.camera.orientation(),
            camera_forward: self.camera.forward(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_scene_layout() {
        let scene = Scene::demo();
        assert_eq!(scene.cube.transform().position, Vec3::new(3.0, 0.0, 0.25));
        assert_eq!(scene.cube.transform().scale, Vec3::splat(0.25));
        assert_eq!(scene.camera.position(), Vec3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn advance_updates_both_entities() {
        let mut scene = Scene::demo();
        scene.advance(Vec3::X, Vec3::new(0.0, 0.0, 90.0), 1.0);
        assert!((scene.camera.position().x - camera::DEFAULT_MOVE_STEP).abs() < 1e-6);
        assert!((scene.camera.forward() - Vec3::Y).length() < 1e-5);
        assert!((scene.cube.transform().orientation().y - 10.0).abs() < 1e-4);
    }

    #[test]
    fn snapshot_serializes() {
        let scene = Scene::demo();
        let json = serde_json::to_string(&scene.snapshot(7)).unwrap();
        assert!(json.contains("\"frame\":7"));
        assert!(json.contains("camera_forward"));
    }
}
