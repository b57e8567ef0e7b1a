use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Wrap an angle in degrees into `[0, 360)`.
///
/// `rem_euclid` can round a tiny negative input up to exactly `360.0`, so that
/// case is folded back to zero.
pub fn wrap_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Wrap every component of an euler triple into `[0, 360)`.
pub fn wrap_euler(angles: Vec3) -> Vec3 {
    Vec3::new(
        wrap_degrees(angles.x),
        wrap_degrees(angles.y),
        wrap_degrees(angles.z),
    )
}

/// Spatial state shared by the cube and the camera: position, euler
/// orientation (degrees, one angle per axis) and scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transformable {
    pub position: Vec3,
    #[serde(deserialize_with = "deserialize_wrapped")]
    orientation: Vec3,
    pub scale: Vec3,
}

fn deserialize_wrapped<'de, D>(deserializer: D) -> Result<Vec3, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Vec3::deserialize(deserializer).map(wrap_euler)
}

impl Default for Transformable {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            orientation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl Transformable {
    pub fn new(position: Vec3, orientation: Vec3, scale: Vec3) -> Self {
        Self {
            position,
            orientation: wrap_euler(orientation),
            scale,
        }
    }

    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Current orientation in degrees, each component in `[0, 360)`.
    pub fn orientation(&self) -> Vec3 {
        self.orientation
    }

    /// Add `delta` degrees to the orientation and re-wrap.
    pub fn rotate_by(&mut self, delta: Vec3) {
        self.orientation = wrap_euler(self.orientation + delta);
    }
}
