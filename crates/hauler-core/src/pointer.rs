#![forbid(unsafe_code)]

//! Raw pointer input.
//!
//! The host feeds native pointer-down/move/up events to the engine as
//! [`PointerEvent`]s. Button state is a bitset rather than a single button so
//! the engine can detect "primary button no longer held" mid-gesture, which
//! is how grabs that never received a release event get aborted.

use bitflags::bitflags;

use crate::geometry::Point;

bitflags! {
    /// Buttons currently held during a pointer event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PointerButtons: u8 {
        /// No buttons held.
        const NONE      = 0b000;
        /// Primary (usually left) button.
        const PRIMARY   = 0b001;
        /// Secondary (usually right) button.
        const SECONDARY = 0b010;
        /// Auxiliary (usually middle) button.
        const AUXILIARY = 0b100;
    }
}

impl Default for PointerButtons {
    fn default() -> Self {
        Self::NONE
    }
}

bitflags! {
    /// Modifier keys held during a pointer event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// No modifiers.
        const NONE  = 0b0000;
        /// Shift key.
        const SHIFT = 0b0001;
        /// Alt/Option key.
        const ALT   = 0b0010;
        /// Control key.
        const CTRL  = 0b0100;
        /// Super/Meta/Command key.
        const META  = 0b1000;
    }
}

impl Default for Modifiers {
    fn default() -> Self {
        Self::NONE
    }
}

/// A native pointer event in the engine's coordinate space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// Pointer position.
    pub pos: Point,
    /// Buttons held at the time of the event.
    pub buttons: PointerButtons,
    /// Modifier keys held at the time of the event.
    pub modifiers: Modifiers,
}

impl PointerEvent {
    /// Create a pointer event with the primary button held and no modifiers.
    #[must_use]
    pub const fn new(pos: Point) -> Self {
        Self {
            pos,
            buttons: PointerButtons::PRIMARY,
            modifiers: Modifiers::NONE,
        }
    }

    /// Create a pointer event with no buttons held (a release).
    #[must_use]
    pub const fn released(pos: Point) -> Self {
        Self {
            pos,
            buttons: PointerButtons::NONE,
            modifiers: Modifiers::NONE,
        }
    }

    /// Replace the button set.
    #[must_use]
    pub const fn with_buttons(mut self, buttons: PointerButtons) -> Self {
        self.buttons = buttons;
        self
    }

    /// Replace the modifier set.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Whether this event can start a grab: primary button held, no
    /// Ctrl/Meta modifier.
    #[must_use]
    pub fn is_primary(&self) -> bool {
        self.buttons.contains(PointerButtons::PRIMARY)
            && !self.modifiers.intersects(Modifiers::CTRL | Modifiers::META)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_requires_primary_button() {
        let ev = PointerEvent::new(Point::new(1.0, 2.0));
        assert!(ev.is_primary());

        let ev = ev.with_buttons(PointerButtons::SECONDARY);
        assert!(!ev.is_primary());

        let ev = PointerEvent::released(Point::ZERO);
        assert!(!ev.is_primary());
    }

    #[test]
    fn ctrl_and_meta_veto_primary() {
        let ev = PointerEvent::new(Point::ZERO).with_modifiers(Modifiers::CTRL);
        assert!(!ev.is_primary());

        let ev = PointerEvent::new(Point::ZERO).with_modifiers(Modifiers::META);
        assert!(!ev.is_primary());

        // Shift and Alt do not.
        let ev = PointerEvent::new(Point::ZERO).with_modifiers(Modifiers::SHIFT | Modifiers::ALT);
        assert!(ev.is_primary());
    }

    #[test]
    fn defaults_are_empty() {
        assert_eq!(PointerButtons::default(), PointerButtons::NONE);
        assert_eq!(Modifiers::default(), Modifiers::NONE);
    }
}
