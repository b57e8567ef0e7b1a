/// Logical keys the demo reacts to. The host maps physical keys onto these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Forward,
    Back,
    Left,
    Right,
    ToggleLook,
    Quit,
}

/// Discrete requests produced by key presses, as opposed to the continuous
/// movement and look intents sampled every frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Grab or release the cursor for mouse look.
    ToggleLook,
    /// Close the window and end the frame loop.
    Quit,
}

impl Action {
    /// The action a key triggers when pressed, if any.
    pub fn on_press(key: Key) -> Option<Self> {
        match key {
            Key::ToggleLook => Some(Self::ToggleLook),
            Key::Quit => Some(Self::Quit),
            Key::Forward | Key::Back | Key::Left | Key::Right => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movement_keys_have_no_action() {
        for key in [Key::Forward, Key::Back, Key::Left, Key::Right] {
            assert_eq!(Action::on_press(key), None);
        }
    }

    #[test]
    fn discrete_keys_map_to_actions() {
        assert_eq!(Action::on_press(Key::Quit), Some(Action::Quit));
        assert_eq!(Action::on_press(Key::ToggleLook), Some(Action::ToggleLook));
    }
}
