//! Discrete input intents.
//!
//! The controller never looks at keys or buttons. It reads an [`InputSource`]: a
//! level-sensitive "is this action held" query, an edge-sensitive "was this action
//! pressed this frame" query, and a focus flag. [`ActionTracker`] is the reference
//! implementation fed by raw down/up events.

use crate::bitmask_flags::BitmaskFlags;

crate::define_bitmask_flags!(
    /// Every action the player controller understands.
    InputAction, u16, {
        MoveForward,
        MoveBackward,
        MoveLeft,
        MoveRight,
        LeanLeft,
        LeanRight,
        Vault,
        ToggleLeanMode,
        Sprint,
        Walk,
        Aim,
        Shoot,
    }
);

impl InputAction {
    /// Parse the wire/binding name of an action. Unknown names yield `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "moveForward" => Self::MoveForward,
            "moveBackward" => Self::MoveBackward,
            "moveLeft" => Self::MoveLeft,
            "moveRight" => Self::MoveRight,
            "leanLeft" => Self::LeanLeft,
            "leanRight" => Self::LeanRight,
            "vault" => Self::Vault,
            "toggleLeanMode" => Self::ToggleLeanMode,
            "sprint" => Self::Sprint,
            "walk" => Self::Walk,
            "aim" => Self::Aim,
            "shoot" => Self::Shoot,
            _ => return None,
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::MoveForward => "moveForward",
            Self::MoveBackward => "moveBackward",
            Self::MoveLeft => "moveLeft",
            Self::MoveRight => "moveRight",
            Self::LeanLeft => "leanLeft",
            Self::LeanRight => "leanRight",
            Self::Vault => "vault",
            Self::ToggleLeanMode => "toggleLeanMode",
            Self::Sprint => "sprint",
            Self::Walk => "walk",
            Self::Aim => "aim",
            Self::Shoot => "shoot",
        }
    }
}

pub type ActionFlags = BitmaskFlags<u16>;

/// Read-only view of one frame's input.
pub trait InputSource {
    /// Level-sensitive: true for as long as the action is held.
    fn is_active(&self, action: InputAction) -> bool;

    /// Edge-sensitive: true only on the frame the action went down.
    fn is_pressed(&self, action: InputAction) -> bool;

    /// Whether the game window currently owns input (pointer lock).
    fn is_focused(&self) -> bool;

    /// Name-based lookup. Unrecognized names are never active.
    fn is_action_active(&self, name: &str) -> bool {
        InputAction::from_name(name).is_some_and(|a| self.is_active(a))
    }

    /// Name-based lookup. Unrecognized names are never pressed.
    fn is_action_pressed(&self, name: &str) -> bool {
        InputAction::from_name(name).is_some_and(|a| self.is_pressed(a))
    }
}

/// Wraps a source so that nothing reads as held or pressed while it is unfocused.
#[derive(Clone, Copy, Debug)]
pub struct FocusGate<'a, I: ?Sized>(pub &'a I);

impl<I: InputSource + ?Sized> InputSource for FocusGate<'_, I> {
    fn is_active(&self, action: InputAction) -> bool {
        self.0.is_focused() && self.0.is_active(action)
    }

    fn is_pressed(&self, action: InputAction) -> bool {
        self.0.is_focused() && self.0.is_pressed(action)
    }

    fn is_focused(&self) -> bool {
        self.0.is_focused()
    }
}

/// An immutable copy of the input state for one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    pub active: ActionFlags,
    pub pressed: ActionFlags,
    pub focused: bool,
}

impl InputSnapshot {
    /// A focused snapshot with nothing held.
    pub fn focused() -> Self {
        Self {
            focused: true,
            ..Self::default()
        }
    }

    /// Mark `action` as held.
    pub fn holding(mut self, action: InputAction) -> Self {
        self.active.add(action);
        self
    }

    /// Mark `action` as pressed this frame (and therefore held).
    pub fn pressing(mut self, action: InputAction) -> Self {
        self.active.add(action);
        self.pressed.add(action);
        self
    }
}

impl InputSource for InputSnapshot {
    fn is_active(&self, action: InputAction) -> bool {
        self.active.has(action)
    }

    fn is_pressed(&self, action: InputAction) -> bool {
        self.pressed.has(action)
    }

    fn is_focused(&self) -> bool {
        self.focused
    }
}

/// Turns raw down/up events into level and edge state.
///
/// - A repeated `press` of an action that is already held does not fire another edge.
/// - Edges live until [`ActionTracker::end_frame`].
/// - Events are ignored while unfocused, and losing focus clears everything so no key
///   stays stuck down.
#[derive(Clone, Debug, Default)]
pub struct ActionTracker {
    active: ActionFlags,
    pressed: ActionFlags,
    focused: bool,
}

impl ActionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, action: InputAction) {
        if !self.focused || self.active.has(action) {
            return;
        }
        self.active.add(action);
        self.pressed.add(action);
    }

    pub fn release(&mut self, action: InputAction) {
        if !self.active.has(action) {
            return;
        }
        self.active.remove(action);
    }

    /// Name-based variant of [`ActionTracker::press`]; unknown names are ignored.
    pub fn press_named(&mut self, name: &str) {
        if let Some(action) = InputAction::from_name(name) {
            self.press(action);
        }
    }

    /// Name-based variant of [`ActionTracker::release`]; unknown names are ignored.
    pub fn release_named(&mut self, name: &str) {
        if let Some(action) = InputAction::from_name(name) {
            self.release(action);
        }
    }

    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
        if !focused {
            self.active.clear();
            self.pressed.clear();
        }
    }

    pub fn snapshot(&self) -> InputSnapshot {
        InputSnapshot {
            active: self.active,
            pressed: self.pressed,
            focused: self.focused,
        }
    }

    /// Consume this frame's edges. Call once per tick after the controller ran.
    pub fn end_frame(&mut self) {
        self.pressed.clear();
    }
}

impl InputSource for ActionTracker {
    fn is_active(&self, action: InputAction) -> bool {
        self.active.has(action)
    }

    fn is_pressed(&self, action: InputAction) -> bool {
        self.pressed.has(action)
    }

    fn is_focused(&self) -> bool {
        self.focused
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_for_every_action() {
        for &action in InputAction::ALL {
            assert_eq!(InputAction::from_name(action.name()), Some(action));
        }
        assert_eq!(InputAction::from_name("jump"), None);
    }

    #[test]
    fn unknown_names_are_noops() {
        let mut t = ActionTracker::new();
        t.set_focused(true);
        t.press_named("crouch");
        assert!(t.snapshot().active.is_empty());
        assert!(!t.is_action_active("crouch"));
        assert!(!t.is_action_pressed("crouch"));
    }

    #[test]
    fn press_fires_one_edge_until_released() {
        let mut t = ActionTracker::new();
        t.set_focused(true);

        t.press(InputAction::Vault);
        assert!(t.is_action_pressed("vault"));
        assert!(t.is_action_active("vault"));
        t.end_frame();

        // Key repeat while still held.
        t.press(InputAction::Vault);
        assert!(!t.is_pressed(InputAction::Vault));
        assert!(t.is_active(InputAction::Vault));

        t.release(InputAction::Vault);
        assert!(!t.is_active(InputAction::Vault));
        t.end_frame();

        t.press(InputAction::Vault);
        assert!(t.is_pressed(InputAction::Vault));
    }

    #[test]
    fn losing_focus_clears_held_actions() {
        let mut t = ActionTracker::new();
        t.set_focused(true);
        t.press(InputAction::MoveForward);
        t.set_focused(false);
        assert!(!t.is_active(InputAction::MoveForward));

        // Ignored while unfocused.
        t.press(InputAction::MoveForward);
        assert!(!t.is_active(InputAction::MoveForward));
        assert!(!t.snapshot().focused);
    }

    #[test]
    fn focus_gate_hides_input_while_unfocused() {
        let mut s = InputSnapshot::focused().pressing(InputAction::Shoot);
        assert!(FocusGate(&s).is_pressed(InputAction::Shoot));
        s.focused = false;
        assert!(!FocusGate(&s).is_pressed(InputAction::Shoot));
        assert!(!FocusGate(&s).is_active(InputAction::Shoot));
    }

    #[test]
    fn snapshot_builder_marks_pressed_as_active() {
        let s = InputSnapshot::focused().pressing(InputAction::LeanLeft);
        assert!(s.is_active(InputAction::LeanLeft));
        assert!(s.is_pressed(InputAction::LeanLeft));
        assert!(!s.is_pressed(InputAction::LeanRight));
    }
}
