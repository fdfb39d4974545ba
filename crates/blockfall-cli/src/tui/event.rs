use crossterm::event::Event as CrosstermEvent;

/// Events delivered by [`EventLoop::next`](super::event_loop::EventLoop::next).
#[derive(Debug, Clone, derive_more::From)]
pub(crate) enum TuiEvent {
    /// Gravity interval elapsed; the falling piece should move down.
    Gravity,
    /// Screen should be redrawn.
    Render,
    /// Terminal events such as key input and resize.
    Crossterm(CrosstermEvent),
}
