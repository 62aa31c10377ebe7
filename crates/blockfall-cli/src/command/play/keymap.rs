use blockfall_engine::Input;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// What a key does on the play screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Command {
    /// Forwarded to the session on the next tick.
    Game(Input),
    TogglePause,
    Restart,
}

/// Maps a key event to a play-screen command.
///
/// Key releases are ignored so that terminals reporting them do not double moves.
pub(super) fn command_for(key: KeyEvent) -> Option<Command> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    let command = match key.code {
        KeyCode::Left => Command::Game(Input::MoveLeft),
        KeyCode::Right => Command::Game(Input::MoveRight),
        KeyCode::Down => Command::Game(Input::SoftDrop),
        KeyCode::Up | KeyCode::Char('x') => Command::Game(Input::Rotate),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Command::Game(Input::Quit)
        }
        KeyCode::Char('q') | KeyCode::Esc => Command::Game(Input::Quit),
        KeyCode::Char('p') => Command::TogglePause,
        KeyCode::Char('r') => Command::Restart,
        _ => return None,
    };
    Some(command)
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyEventState;

    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_movement_keys() {
        assert_eq!(
            command_for(press(KeyCode::Left)),
            Some(Command::Game(Input::MoveLeft))
        );
        assert_eq!(
            command_for(press(KeyCode::Right)),
            Some(Command::Game(Input::MoveRight))
        );
        assert_eq!(
            command_for(press(KeyCode::Down)),
            Some(Command::Game(Input::SoftDrop))
        );
        assert_eq!(
            command_for(press(KeyCode::Up)),
            Some(Command::Game(Input::Rotate))
        );
        assert_eq!(
            command_for(press(KeyCode::Char('x'))),
            Some(Command::Game(Input::Rotate))
        );
    }

    #[test]
    fn test_quit_keys() {
        for key in [
            press(KeyCode::Char('q')),
            press(KeyCode::Esc),
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        ] {
            assert_eq!(command_for(key), Some(Command::Game(Input::Quit)), "{key:?}");
        }
        assert_eq!(command_for(press(KeyCode::Char('c'))), None);
    }

    #[test]
    fn test_session_keys() {
        assert_eq!(
            command_for(press(KeyCode::Char('p'))),
            Some(Command::TogglePause)
        );
        assert_eq!(command_for(press(KeyCode::Char('r'))), Some(Command::Restart));
        assert_eq!(command_for(press(KeyCode::Char('z'))), None);
        assert_eq!(command_for(press(KeyCode::Char(' '))), None);
    }

    #[test]
    fn test_release_is_ignored_and_repeat_is_not() {
        let release = KeyEvent::new_with_kind_and_state(
            KeyCode::Left,
            KeyModifiers::NONE,
            KeyEventKind::Release,
            KeyEventState::NONE,
        );
        assert_eq!(command_for(release), None);

        let repeat = KeyEvent::new_with_kind(KeyCode::Left, KeyModifiers::NONE, KeyEventKind::Repeat);
        assert_eq!(
            command_for(repeat),
            Some(Command::Game(Input::MoveLeft))
        );
    }
}
