use glam::{Mat4, Vec2, Vec3};
use serde::{Deserialize, Serialize};
use spincube_common::Transformable;

/// World up axis. The scene is Z-up.
pub const WORLD_UP: Vec3 = Vec3::Z;

/// Movement intents at or below this length are ignored.
pub const MOVE_DEADZONE: f32 = 0.1;

/// Distance covered by one full-strength `move_by` call.
pub const DEFAULT_MOVE_STEP: f32 = 0.1;

/// Perspective projection parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Projection {
    pub fov_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            fov_degrees: 45.0,
            aspect: 640.0 / 480.0,
            near: 0.1,
            far: 10.0,
        }
    }
}

impl Projection {
    pub fn matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_degrees.to_radians(), self.aspect, self.near, self.far)
    }

    /// Update the aspect ratio from a framebuffer size. Zero heights are clamped.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.aspect = width.max(1) as f32 / height.max(1) as f32;
    }
}

/// First-person camera driven by relative move and spin commands.
///
/// Axis convention: `orientation.x` is roll (unused), `orientation.y` is pitch
/// and `orientation.z` is yaw, all in degrees. Yaw 0 / pitch 0 looks down +X.
#[derive(Debug, Clone)]
pub struct Camera {
    transform: Transformable,
    forward: Vec3,
    right: Vec3,
    pub move_step: f32,
    pub projection: Projection,
}

impl Camera {
    pub fn new(position: Vec3) -> Self {
        let transform = Transformable::at(position);
        let (forward, right) = basis(transform.orientation());
        Self {
            transform,
            forward,
            right,
            move_step: DEFAULT_MOVE_STEP,
            projection: Projection::default(),
        }
    }

    pub fn with_move_step(mut self, step: f32) -> Self {
        self.move_step = step;
        self
    }

    pub fn with_projection(mut self, projection: Projection) -> Self {
        self.projection = projection;
        self
    }

    pub fn position(&self) -> Vec3 {
        self.transform.position
    }

    pub fn orientation(&self) -> Vec3 {
        self.transform.orientation()
    }

    pub fn forward(&self) -> Vec3 {
        self.forward
    }

    pub fn right(&self) -> Vec3 {
        self.right
    }

    /// Camera-local up, perpendicular to both `forward` and `right`.
    pub fn up(&self) -> Vec3 {
        self.right.cross(self.forward)
    }

    /// Translate along forward (`intent.x`) and right (`intent.y`).
    ///
    /// `intent.z` is ignored. Intents inside the deadzone leave the camera in
    /// place; anything larger is normalized so only direction matters.
    pub fn move_by(&mut self, intent: Vec3) {
        let planar = Vec2::new(intent.x, intent.y);
        if planar.length() <= MOVE_DEADZONE {
            return;
        }
        let dir = planar.normalize();
        self.transform.position += self.move_step * (dir.x * self.forward + dir.y * self.right);
    }

    /// Add `delta` degrees to the orientation, then recompute forward/right.
    pub fn spin(&mut self, delta: Vec3) {
        self.transform.rotate_by(delta);
        let (forward, right) = basis(self.transform.orientation());
        self.forward = forward;
        self.right = right;
    }

    /// World-to-camera transform.
    ///
    /// Same matrix as looking at `position + forward` with +Z up, but uses the
    /// camera-local up so it stays defined when pitch is exactly +-90 degrees.
    pub fn view_transform(&self) -> Mat4 {
        let eye = self.transform.position;
        Mat4::look_at_rh(eye, eye + self.forward, self.up())
    }

    pub fn projection_transform(&self) -> Mat4 {
        self.projection.matrix()
    }
}

fn basis(orientation: Vec3) -> (Vec3, Vec3) {
    let pitch = orientation.y.to_radians();
    let yaw = orientation.z.to_radians();
    let forward = Vec3::new(
        yaw.cos() * pitch.cos(),
        yaw.sin() * pitch.cos(),
        pitch.sin(),
    );
    let right = forward
        .cross(WORLD_UP)
        .try_normalize()
        .unwrap_or_else(|| Vec3::new(yaw.sin(), -yaw.cos(), 0.0));
    (forward, right)
}
