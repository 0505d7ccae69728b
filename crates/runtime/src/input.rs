use foundation::math::Vec2;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ScrollDirection {
    Up,
    Down,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Home,
    PageUp,
    PageDown,
    Escape,
}

/// Pointer and keyboard input, already in view coordinates.
///
/// Points are pixels with the origin at the bottom-left of the viewport; the
/// host flips the vertical axis before dispatch.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum InputEvent {
    /// Primary button pressed.
    Press(Vec2),
    /// Pointer moved with the primary button held.
    Drag(Vec2),
    Release,
    /// Pointer moved with no button held.
    Hover(Vec2),
    Scroll(ScrollDirection),
    Key(Key),
    /// The view lost focus (window deactivated, another element took input).
    Defocus,
    /// The pointer left the view.
    Dehover,
}

impl InputEvent {
    pub fn point(&self) -> Option<Vec2> {
        match *self {
            InputEvent::Press(p) | InputEvent::Drag(p) | InputEvent::Hover(p) => Some(p),
            _ => None,
        }
    }
}
