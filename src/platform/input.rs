//! Keyboard mapping

/// Discrete player intent for one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Jump,
    /// Only acted on while the game is over
    Restart,
    Quit,
}

impl InputEvent {
    /// Map a DOM `KeyboardEvent.key` value; unknown keys are ignored
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            " " | "Spacebar" | "ArrowUp" | "w" | "W" => Some(InputEvent::Jump),
            "r" | "R" => Some(InputEvent::Restart),
            "Escape" => Some(InputEvent::Quit),
            _ => None,
        }
    }
}
