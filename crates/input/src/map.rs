//! Key mapping from terminal events to board actions.

use crate::types::{BoardAction, Direction};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Map keyboard input to board actions.
///
/// Key-release events (reported by some terminals) are ignored.
pub fn handle_key_event(key: KeyEvent) -> Option<BoardAction> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    match key.code {
        // Cursor
        KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('H') => {
            Some(BoardAction::Move(Direction::Left))
        }
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('L') => {
            Some(BoardAction::Move(Direction::Right))
        }
        KeyCode::Up | KeyCode::Char('k') | KeyCode::Char('K') => {
            Some(BoardAction::Move(Direction::Up))
        }
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('J') => {
            Some(BoardAction::Move(Direction::Down))
        }

        // Pick / swap
        KeyCode::Char(' ') | KeyCode::Enter => Some(BoardAction::Select),
        KeyCode::Esc | KeyCode::Backspace => Some(BoardAction::Cancel),

        // Session
        KeyCode::Char('r') | KeyCode::Char('R') => Some(BoardAction::Restart),
        KeyCode::Char('n') | KeyCode::Char('N') => Some(BoardAction::NextLevel),

        _ => None,
    }
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q'))
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyEventState, KeyModifiers};

    fn key(code: KeyCode) -> Option<BoardAction> {
        handle_key_event(KeyEvent::from(code))
    }

    #[test]
    fn test_cursor_keys() {
        assert_eq!(key(KeyCode::Left), Some(BoardAction::Move(Direction::Left)));
        assert_eq!(key(KeyCode::Right), Some(BoardAction::Move(Direction::Right)));
        assert_eq!(key(KeyCode::Up), Some(BoardAction::Move(Direction::Up)));
        assert_eq!(key(KeyCode::Down), Some(BoardAction::Move(Direction::Down)));

        assert_eq!(key(KeyCode::Char('h')), Some(BoardAction::Move(Direction::Left)));
        assert_eq!(key(KeyCode::Char('L')), Some(BoardAction::Move(Direction::Right)));
        assert_eq!(key(KeyCode::Char('k')), Some(BoardAction::Move(Direction::Up)));
        assert_eq!(key(KeyCode::Char('J')), Some(BoardAction::Move(Direction::Down)));
    }

    #[test]
    fn test_action_keys() {
        assert_eq!(key(KeyCode::Char(' ')), Some(BoardAction::Select));
        assert_eq!(key(KeyCode::Enter), Some(BoardAction::Select));
        assert_eq!(key(KeyCode::Esc), Some(BoardAction::Cancel));
        assert_eq!(key(KeyCode::Char('r')), Some(BoardAction::Restart));
        assert_eq!(key(KeyCode::Char('n')), Some(BoardAction::NextLevel));
        assert_eq!(key(KeyCode::Char('x')), None);
    }

    #[test]
    fn test_release_is_ignored() {
        let release = KeyEvent {
            code: KeyCode::Enter,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        assert_eq!(handle_key_event(release), None);
    }

    #[test]
    fn test_quit_keys() {
        assert!(should_quit(KeyEvent::from(KeyCode::Char('q'))));
        assert!(should_quit(KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL
        )));
        assert!(!should_quit(KeyEvent::from(KeyCode::Char('x'))));
    }
}
