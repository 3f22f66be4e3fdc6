// Keyboard input - steering intent and action keys
use protocol::{ClientMessage, Direction};

/// What a key means to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Held steering key.
    Turn(Direction),
    /// Create a lobby (lobby list).
    NewLobby,
    /// Join the n-th lobby of the ordered list, zero based (lobby list).
    JoinSlot(usize),
    /// Toggle ready (lobby).
    Ready,
}

impl KeyAction {
    /// Map a `KeyboardEvent.key` value.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" => Some(KeyAction::Turn(Direction::Left)),
            "ArrowRight" => Some(KeyAction::Turn(Direction::Right)),
            "n" | "N" => Some(KeyAction::NewLobby),
            " " | "r" | "R" => Some(KeyAction::Ready),
            _ => match key.parse::<usize>() {
                Ok(n @ 1..=9) if key.len() == 1 => Some(KeyAction::JoinSlot(n - 1)),
                _ => None,
            },
        }
    }
}

/// Continuous steering intent built from key edges.
///
/// A press sets the intent; a release clears it only when it matches the
/// current intent, so press-left, press-right, release-left keeps `Right`.
#[derive(Debug, Default)]
pub struct InputController {
    intent: Direction,
}

impl InputController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, direction: Direction) {
        if direction != Direction::None {
            self.intent = direction;
        }
    }

    pub fn release(&mut self, direction: Direction) {
        if self.intent == direction {
            self.intent = Direction::None;
        }
    }

    pub fn intent(&self) -> Direction {
        self.intent
    }

    /// Command sent on every input tick. Sampling does not consume the intent.
    pub fn command(&self) -> ClientMessage {
        ClientMessage::PlayerInput {
            direction: self.intent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_and_matching_release() {
        let mut input = InputController::new();
        assert_eq!(input.intent(), Direction::None);
        input.press(Direction::Left);
        assert_eq!(input.intent(), Direction::Left);
        input.release(Direction::Left);
        assert_eq!(input.intent(), Direction::None);
    }

    #[test]
    fn test_stale_release_keeps_newer_press() {
        let mut input = InputController::new();
        input.press(Direction::Left);
        input.press(Direction::Right);
        input.release(Direction::Left);
        assert_eq!(input.intent(), Direction::Right);
        input.release(Direction::Right);
        assert_eq!(input.intent(), Direction::None);
    }

    #[test]
    fn test_sampling_does_not_consume() {
        let mut input = InputController::new();
        input.press(Direction::Right);
        let expected = ClientMessage::PlayerInput { direction: Direction::Right };
        assert_eq!(input.command(), expected);
        assert_eq!(input.command(), expected);
    }

    #[test]
    fn test_key_mapping() {
        assert_eq!(KeyAction::from_key("ArrowLeft"), Some(KeyAction::Turn(Direction::Left)));
        assert_eq!(KeyAction::from_key("ArrowRight"), Some(KeyAction::Turn(Direction::Right)));
        assert_eq!(KeyAction::from_key("N"), Some(KeyAction::NewLobby));
        assert_eq!(KeyAction::from_key(" "), Some(KeyAction::Ready));
        assert_eq!(KeyAction::from_key("1"), Some(KeyAction::JoinSlot(0)));
        assert_eq!(KeyAction::from_key("9"), Some(KeyAction::JoinSlot(8)));
        assert_eq!(KeyAction::from_key("0"), None);
        assert_eq!(KeyAction::from_key("+1"), None);
        assert_eq!(KeyAction::from_key("ArrowUp"), None);
    }
}
