use blockfall_engine::{Command, SessionState};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

/// What a key press asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Action {
    Game(Command),
    Quit,
}

/// Maps a key press to an action, given the session state.
///
/// Play keys only work while a piece is falling and restart keys only once the game
/// is over, so the session never sees a command its state rejects. Unmapped keys
/// return `None`.
pub(crate) fn action_for_key(state: SessionState, key: &KeyEvent) -> Option<Action> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    let action = match (state, key.code) {
        (_, KeyCode::Char('q') | KeyCode::Esc) => Action::Quit,
        (SessionState::Active, KeyCode::Left | KeyCode::Char('h')) => {
            Action::Game(Command::MoveLeft)
        }
        (SessionState::Active, KeyCode::Right | KeyCode::Char('l')) => {
            Action::Game(Command::MoveRight)
        }
        (SessionState::Active, KeyCode::Down | KeyCode::Char('j')) => {
            Action::Game(Command::MoveDown)
        }
        (SessionState::Active, KeyCode::Up | KeyCode::Char('k')) => Action::Game(Command::Rotate),
        (SessionState::GameOver, KeyCode::Char('r') | KeyCode::Enter) => {
            Action::Game(Command::Restart)
        }
        _ => return None,
    };
    Some(action)
}
