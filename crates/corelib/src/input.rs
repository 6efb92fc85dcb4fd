//! Windowing-agnostic input vocabulary and key bindings.
//!
//! The platform layer converts native key events into [`Key`] + [`KeyState`]
//! and asks [`KeyBindings`] which [`ViewerAction`] (if any) they trigger.

use std::collections::HashMap;

use crate::camera::CameraMove;
use crate::transform::Axis;

/// Keys the viewer understands. Keypad and main-row digits map to the same key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Digit(u8),
    Enter,
    Escape,
    Left,
    Right,
    Up,
    Down,
    I,
    K,
    W,
    A,
    S,
    D,
    X,
    Y,
    Z,
    P,
    /// Keypad `+`.
    Plus,
    /// Keypad `-`.
    Minus,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyState {
    Pressed,
    /// OS auto-repeat while the key is held.
    Repeated,
    Released,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Sign {
    Positive,
    Negative,
}

impl Sign {
    #[inline]
    pub const fn value(self) -> f32 {
        match self {
            Sign::Positive => 1.0,
            Sign::Negative => -1.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ViewerAction {
    Quit,
    Select(u32),
    Deselect,
    SetRotation(Axis),
    ToggleCurve,
    Scale(Sign),
    Translate(Axis, Sign),
    MoveCamera(CameraMove),
}

impl ViewerAction {
    /// Continuous actions keep firing while the key auto-repeats.
    #[inline]
    pub const fn fires_on_repeat(self) -> bool {
        matches!(self, ViewerAction::Translate(..) | ViewerAction::MoveCamera(_))
    }
}

#[derive(Clone, Debug)]
pub struct KeyBindings {
    map: HashMap<Key, ViewerAction>,
}

impl KeyBindings {
    /// No bindings at all.
    pub fn empty() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    pub fn bind(&mut self, key: Key, action: ViewerAction) -> Option<ViewerAction> {
        self.map.insert(key, action)
    }

    pub fn unbind(&mut self, key: Key) -> Option<ViewerAction> {
        self.map.remove(&key)
    }

    pub fn get(&self, key: Key) -> Option<ViewerAction> {
        self.map.get(&key).copied()
    }

    /// Action triggered by `key` in `state`, if any.
    pub fn resolve(&self, key: Key, state: KeyState) -> Option<ViewerAction> {
        let action = self.get(key)?;
        match state {
            KeyState::Pressed => Some(action),
            KeyState::Repeated if action.fires_on_repeat() => Some(action),
            KeyState::Repeated | KeyState::Released => None,
        }
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        use Sign::{Negative, Positive};

        let mut b = Self::empty();
        for d in 0..=9u8 {
            b.bind(Key::Digit(d), ViewerAction::Select(d as u32));
        }
        b.bind(Key::Enter, ViewerAction::Deselect);
        b.bind(Key::Escape, ViewerAction::Quit);

        b.bind(Key::X, ViewerAction::SetRotation(Axis::X));
        b.bind(Key::Y, ViewerAction::SetRotation(Axis::Y));
        b.bind(Key::Z, ViewerAction::SetRotation(Axis::Z));
        b.bind(Key::P, ViewerAction::ToggleCurve);

        b.bind(Key::Plus, ViewerAction::Scale(Positive));
        b.bind(Key::Minus, ViewerAction::Scale(Negative));

        b.bind(Key::Right, ViewerAction::Translate(Axis::X, Positive));
        b.bind(Key::Left, ViewerAction::Translate(Axis::X, Negative));
        b.bind(Key::Up, ViewerAction::Translate(Axis::Y, Positive));
        b.bind(Key::Down, ViewerAction::Translate(Axis::Y, Negative));
        b.bind(Key::I, ViewerAction::Translate(Axis::Z, Positive));
        b.bind(Key::K, ViewerAction::Translate(Axis::Z, Negative));

        b.bind(Key::W, ViewerAction::MoveCamera(CameraMove::Forward));
        b.bind(Key::S, ViewerAction::MoveCamera(CameraMove::Backward));
        b.bind(Key::A, ViewerAction::MoveCamera(CameraMove::Left));
        b.bind(Key::D, ViewerAction::MoveCamera(CameraMove::Right));
        b
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout() {
        let b = KeyBindings::default();
        assert_eq!(b.get(Key::Digit(7)), Some(ViewerAction::Select(7)));
        assert_eq!(
            b.get(Key::K),
            Some(ViewerAction::Translate(Axis::Z, Sign::Negative))
        );
        assert_eq!(
            b.get(Key::A),
            Some(ViewerAction::MoveCamera(CameraMove::Left))
        );
    }

    #[test]
    fn one_shot_actions_ignore_repeat() {
        let b = KeyBindings::default();
        assert_eq!(b.resolve(Key::P, KeyState::Pressed), Some(ViewerAction::ToggleCurve));
        assert_eq!(b.resolve(Key::P, KeyState::Repeated), None);
        assert_eq!(b.resolve(Key::Plus, KeyState::Repeated), None);
    }

    #[test]
    fn continuous_actions_fire_on_repeat_but_not_release() {
        let b = KeyBindings::default();
        let right = Some(ViewerAction::Translate(Axis::X, Sign::Positive));
        assert_eq!(b.resolve(Key::Right, KeyState::Pressed), right);
        assert_eq!(b.resolve(Key::Right, KeyState::Repeated), right);
        assert_eq!(b.resolve(Key::Right, KeyState::Released), None);
    }

    #[test]
    fn rebinding_replaces_action() {
        let mut b = KeyBindings::default();
        let old = b.bind(Key::P, ViewerAction::Quit);
        assert_eq!(old, Some(ViewerAction::ToggleCurve));
        assert_eq!(b.unbind(Key::P), Some(ViewerAction::Quit));
        assert_eq!(b.resolve(Key::P, KeyState::Pressed), None);
    }
}
