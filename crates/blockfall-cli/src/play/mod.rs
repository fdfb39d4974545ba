use std::time::Duration;

use blockfall_engine::{Command, CommandOutcome, GameSession, SessionState};
use crossterm::event::Event;
use ratatui::{
    Frame,
    layout::{Constraint, Flex, Layout},
    widgets::Block as BlockWidget,
};

use crate::{
    tui::{App, Runtime},
    view::widgets::{BoardDisplay, GameOverDisplay, KeyBinding, KeyBindingDisplay, ScoreDisplay},
};

use self::input::Action;

mod input;

const ACTIVE_BINDINGS: &[KeyBinding] = &[
    (&["←", "h"], "Left"),
    (&["→", "l"], "Right"),
    (&["↓", "j"], "Down"),
    (&["↑", "k"], "Rotate"),
    (&["q", "Esc"], "Quit"),
];

const GAME_OVER_BINDINGS: &[KeyBinding] = &[(&["r", "Enter"], "Restart"), (&["q", "Esc"], "Quit")];

/// Interactive game: one session, gravity from the runtime, keys from the terminal.
#[derive(Debug)]
pub(crate) struct PlayApp {
    session: GameSession,
    gravity_interval: Duration,
    is_exiting: bool,
}

impl PlayApp {
    pub(crate) fn new(session: GameSession) -> Self {
        let gravity_interval = session.config().gravity_interval();
        Self {
            session,
            gravity_interval,
            is_exiting: false,
        }
    }

    fn sync_gravity(&self, runtime: &mut Runtime) {
        let interval = self
            .session
            .state()
            .is_active()
            .then_some(self.gravity_interval);
        runtime.set_gravity_interval(interval);
    }

    fn apply(&mut self, runtime: &mut Runtime, command: Command) {
        match self.session.apply(command) {
            CommandOutcome::GameOver { final_score, .. } => {
                log::info!("game over, final score {final_score}");
                self.sync_gravity(runtime);
            }
            CommandOutcome::Restarted => self.sync_gravity(runtime),
            CommandOutcome::Moved | CommandOutcome::Blocked | CommandOutcome::Locked(_) => {}
        }
        runtime.request_render();
    }
}

impl App for PlayApp {
    fn init(&mut self, runtime: &mut Runtime) {
        self.sync_gravity(runtime);
    }

    fn should_exit(&self) -> bool {
        self.is_exiting
    }

    fn handle_event(&mut self, runtime: &mut Runtime, event: &Event) {
        let Some(key) = event.as_key_event() else {
            return;
        };
        match input::action_for_key(self.session.state(), &key) {
            Some(Action::Game(command)) => self.apply(runtime, command),
            Some(Action::Quit) => self.is_exiting = true,
            None => {}
        }
    }

    fn gravity(&mut self, runtime: &mut Runtime) {
        if self.session.state().is_active() {
            self.apply(runtime, Command::MoveDown);
        }
    }

    fn draw(&self, frame: &mut Frame) {
        let board_display = BoardDisplay::new(self.session.board())
            .falling_piece(self.session.active_piece())
            .block(BlockWidget::bordered().title(" blockfall "));
        let score_display = ScoreDisplay::new(self.session.stats()).block(BlockWidget::bordered());

        let bindings = match self.session.state() {
            SessionState::Active => ACTIVE_BINDINGS,
            SessionState::GameOver => GAME_OVER_BINDINGS,
        };

        let [main_area, help_area] =
            Layout::vertical([Constraint::Length(board_display.height()), Constraint::Length(1)])
                .areas(frame.area());
        let [board_area, score_area] = Layout::horizontal([
            Constraint::Length(board_display.width()),
            Constraint::Length(score_display.width()),
        ])
        .flex(Flex::Center)
        .spacing(1)
        .areas(main_area);
        let [score_area, _] = Layout::vertical([
            Constraint::Length(score_display.height()),
            Constraint::Fill(1),
        ])
        .areas(score_area);

        frame.render_widget(board_display, board_area);
        frame.render_widget(score_display, score_area);
        frame.render_widget(KeyBindingDisplay::new(bindings), help_area);

        if self.session.state().is_game_over() {
            frame.render_widget(
                GameOverDisplay::new(self.session.score()),
                GameOverDisplay::area(board_area),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use blockfall_engine::{GameConfig, PieceSeed};
    use crossterm::event::{KeyCode, KeyEvent};
    use ratatui::{Terminal, backend::TestBackend};

    use super::*;
    use crate::tui::RenderMode;

    fn app() -> PlayApp {
        let config = GameConfig {
            board_width: 6,
            board_height: 6,
            ..GameConfig::default()
        };
        let seed: PieceSeed = "000000000000000000000000000000ff".parse().unwrap();
        PlayApp::new(GameSession::with_seed(config, seed))
    }

    #[test]
    fn test_gravity_drops_until_game_over_then_restart() {
        let mut app = app();
        let mut runtime = Runtime::new(RenderMode::OnDirty);
        app.init(&mut runtime);

        for _ in 0..1000 {
            if app.session.state().is_game_over() {
                break;
            }
            app.gravity(&mut runtime);
        }
        assert!(app.session.state().is_game_over());

        // Gravity is ignored once the game is over.
        let board = app.session.board().clone();
        app.gravity(&mut runtime);
        assert_eq!(*app.session.board(), board);

        let restart = Event::Key(KeyEvent::from(KeyCode::Char('r')));
        app.handle_event(&mut runtime, &restart);
        assert!(app.session.state().is_active());
        assert_eq!(app.session.board().occupied_count(), 0);
    }

    #[test]
    fn test_quit_key_exits() {
        let mut app = app();
        let mut runtime = Runtime::new(RenderMode::OnDirty);
        assert!(!app.should_exit());
        let quit = Event::Key(KeyEvent::from(KeyCode::Esc));
        app.handle_event(&mut runtime, &quit);
        assert!(app.should_exit());
    }

    #[test]
    fn test_draw_shows_score_panel() {
        let app = app();
        let mut terminal = Terminal::new(TestBackend::new(60, 12)).unwrap();
        terminal.draw(|f| app.draw(f)).unwrap();
        let buffer = terminal.backend().buffer();
        let text: String = buffer.content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("SCORE:"));
        assert!(text.contains("blockfall"));
    }
}
