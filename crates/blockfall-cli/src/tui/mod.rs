//! Terminal runtime: one thread, one event queue, one app.

use std::{io, time::Duration};

use crossterm::event::Event;
use ratatui::Frame;

pub(crate) use self::event_loop::RenderMode;
use self::{event::TuiEvent, event_loop::EventLoop};

mod event;
mod event_loop;

/// Application driven by [`Runtime::run`].
pub(crate) trait App {
    /// Called once before the first event. Use this to start gravity.
    fn init(&mut self, runtime: &mut Runtime);

    /// Returns whether the application should exit.
    fn should_exit(&self) -> bool;

    /// Handles terminal events (key input, resize, etc.).
    fn handle_event(&mut self, runtime: &mut Runtime, event: &Event);

    /// Called on each gravity tick.
    fn gravity(&mut self, runtime: &mut Runtime);

    /// Draws the screen.
    fn draw(&self, frame: &mut Frame);
}

#[derive(Debug)]
pub(crate) struct Runtime {
    events: EventLoop,
}

impl Runtime {
    pub(crate) fn new(render_mode: RenderMode) -> Self {
        Self {
            events: EventLoop::new(render_mode),
        }
    }

    /// Sets the gravity interval. `None` stops gravity.
    pub(crate) fn set_gravity_interval(&mut self, interval: Option<Duration>) {
        self.events.set_gravity_interval(interval);
    }

    pub(crate) fn request_render(&mut self) {
        self.events.mark_dirty();
    }

    /// Runs `app` in the alternate screen until it asks to exit.
    ///
    /// Every event goes through a single dispatch point, so gravity and input never
    /// interleave inside a game update.
    pub(crate) fn run<A>(mut self, app: &mut A) -> io::Result<()>
    where
        A: App,
    {
        app.init(&mut self);

        ratatui::run(|terminal| {
            while !app.should_exit() {
                match self.events.next()? {
                    TuiEvent::Gravity => app.gravity(&mut self),
                    TuiEvent::Render => {
                        terminal.draw(|f| app.draw(f))?;
                    }
                    TuiEvent::Crossterm(event) => app.handle_event(&mut self, &event),
                }
            }
            Ok(())
        })
    }
}
