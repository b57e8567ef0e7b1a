//! Input mapping: held keys and cursor travel turned into per-frame camera
//! intents.
//!
//! # Invariants
//! - This crate never touches the camera; it only produces intent vectors.
//! - Look travel is consumed exactly once per frame.

pub mod action;

pub use action::{Action, Key};
use glam::{Vec2, Vec3};

/// What the camera should do this frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameIntent {
    /// `x` is forward intent, `y` is strafe intent (positive = right), `z` unused.
    pub movement: Vec3,
    /// Euler delta in degrees: `y` is pitch, `z` is yaw.
    pub spin: Vec3,
}

/// Snapshot of the movement keys plus cursor travel accumulated since the
/// last frame.
#[derive(Debug, Default)]
pub struct InputState {
    forward: bool,
    back: bool,
    left: bool,
    right: bool,
    look: Vec2,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key transition. Returns the discrete action for fresh presses.
    pub fn set_key(&mut self, key: Key, pressed: bool) -> Option<Action> {
        match key {
            Key::Forward => self.forward = pressed,
            Key::Back => self.back = pressed,
            Key::Left => self.left = pressed,
            Key::Right => self.right = pressed,
            Key::ToggleLook | Key::Quit => {}
        }
        if pressed { Action::on_press(key) } else { None }
    }

    pub fn is_held(&self, key: Key) -> bool {
        match key {
            Key::Forward => self.forward,
            Key::Back => self.back,
            Key::Left => self.left,
            Key::Right => self.right,
            Key::ToggleLook | Key::Quit => false,
        }
    }

    /// Absolute cursor reading. The caller warps the cursor back to `center`
    /// afterwards so the next reading is again relative to it.
    pub fn record_cursor(&mut self, absolute: Vec2, center: Vec2) {
        self.look += absolute - center;
    }

    /// Raw relative motion, for platforms that cannot warp the cursor.
    pub fn record_motion(&mut self, delta: Vec2) {
        self.look += delta;
    }

    /// Pending cursor travel in pixels.
    pub fn pending_look(&self) -> Vec2 {
        self.look
    }

    /// Movement intent from the held keys: W/S along x, A/D along y.
    pub fn movement_intent(&self) -> Vec3 {
        let mut intent = Vec3::ZERO;
        if self.forward {
            intent.x += 1.0;
        }
        if self.left {
            intent.y -= 1.0;
        }
        if self.back {
            intent.x -= 1.0;
        }
        if self.right {
            intent.y += 1.0;
        }
        intent
    }

    /// Build this frame's intent and reset the look accumulator.
    ///
    /// Cursor travel right/down turns the camera right/down, `sensitivity`
    /// degrees per pixel.
    pub fn take_frame_intent(&mut self, sensitivity: f32) -> FrameIntent {
        let look = std::mem::take(&mut self.look);
        let spin = Vec3::new(0.0, -sensitivity * look.y, -sensitivity * look.x);
        if look != Vec2::ZERO {
            tracing::trace!(dx = look.x, dy = look.y, "look input");
        }
        FrameIntent {
            movement: self.movement_intent(),
            spin,
        }
    }

    /// Drop all held keys and pending look travel, e.g. on focus loss.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_input_is_zero() {
        let mut input = InputState::new();
        assert_eq!(input.take_frame_intent(0.1), FrameIntent::default());
    }

    #[test]
    fn wasd_mapping() {
        let mut input = InputState::new();
        input.set_key(Key::Forward, true);
        assert_eq!(input.movement_intent(), Vec3::new(1.0, 0.0, 0.0));
        input.set_key(Key::Right, true);
        assert_eq!(input.movement_intent(), Vec3::new(1.0, 1.0, 0.0));
        input.set_key(Key::Forward, false);
        input.set_key(Key::Left, true);
        assert_eq!(input.movement_intent(), Vec3::ZERO);
        input.set_key(Key::Back, true);
        assert_eq!(input.movement_intent(), Vec3::new(-1.0, 0.0, 0.0));
    }

    #[test]
    fn opposite_keys_cancel() {
        let mut input = InputState::new();
        input.set_key(Key::Forward, true);
        input.set_key(Key::Back, true);
        assert_eq!(input.movement_intent(), Vec3::ZERO);
        assert!(input.is_held(Key::Forward));
    }

    #[test]
    fn cursor_offsets_become_spin() {
        let mut input = InputState::new();
        let center = Vec2::new(320.0, 240.0);
        input.record_cursor(Vec2::new(330.0, 235.0), center);
        let intent = input.take_frame_intent(0.5);
        assert_eq!(intent.spin, Vec3::new(0.0, 2.5, -5.0));
    }

    #[test]
    fn look_is_consumed_once() {
        let mut input = InputState::new();
        input.record_motion(Vec2::new(4.0, 0.0));
        input.record_motion(Vec2::new(6.0, 0.0));
        assert_eq!(input.pending_look(), Vec2::new(10.0, 0.0));
        let first = input.take_frame_intent(1.0);
        assert_eq!(first.spin.z, -10.0);
        let second = input.take_frame_intent(1.0);
        assert_eq!(second.spin, Vec3::ZERO);
    }

    #[test]
    fn presses_report_actions_releases_do_not() {
        let mut input = InputState::new();
        assert_eq!(input.set_key(Key::Quit, true), Some(Action::Quit));
        assert_eq!(input.set_key(Key::Quit, false), None);
        assert_eq!(input.set_key(Key::Forward, true), None);
    }

    #[test]
    fn clear_releases_everything() {
        let mut input = InputState::new();
        input.set_key(Key::Forward, true);
        input.record_motion(Vec2::ONE);
        input.clear();
        assert_eq!(input.take_frame_intent(1.0), FrameIntent::default());
    }
}
