use std::{
    io,
    time::{Duration, Instant},
};

use crossterm::event;

use super::event::TuiEvent;

/// Rendering trigger mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) enum RenderMode {
    /// Render after every state change (gravity or terminal event).
    #[default]
    OnDirty,
    /// Render after state changes, at most once per interval.
    ///
    /// Changes arriving faster than the interval are batched into one render.
    Throttled(Duration),
}

impl RenderMode {
    /// Creates `Throttled` mode from frame rate (FPS).
    pub(crate) fn throttled_from_rate(rate: f64) -> Self {
        Self::Throttled(Duration::from_secs_f64(1.0 / rate))
    }
}

/// Single-threaded event source.
///
/// Gravity ticks, render requests and terminal input are all returned from
/// [`EventLoop::next`], so the caller applies them one at a time in arrival order.
#[derive(Debug)]
pub(crate) struct EventLoop {
    gravity_interval: Option<Duration>,
    render_mode: RenderMode,
    last_gravity: Instant,
    last_render: Instant,
    dirty: bool,
}

impl EventLoop {
    /// Creates an event loop with gravity disabled.
    pub(crate) fn new(render_mode: RenderMode) -> Self {
        let now = Instant::now();
        let past_time = now.checked_sub(Duration::from_secs(86400)).unwrap_or(now);
        Self {
            gravity_interval: None,
            render_mode,
            last_gravity: now,
            last_render: past_time,
            dirty: true, // first frame
        }
    }

    /// Sets the gravity interval, restarting the gravity timer.
    ///
    /// Pass `None` to stop gravity events.
    pub(crate) fn set_gravity_interval(&mut self, interval: Option<Duration>) {
        self.gravity_interval = interval;
        self.last_gravity = Instant::now();
    }

    /// Requests a render on the next call to [`Self::next`].
    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Returns the next event.
    ///
    /// Blocks until gravity or a render is due, or a terminal event arrives.
    pub(crate) fn next(&mut self) -> io::Result<TuiEvent> {
        loop {
            let now = Instant::now();
            if let Some(interval) = self.gravity_interval
                && now.duration_since(self.last_gravity) >= interval
            {
                self.last_gravity = now;
                self.dirty = true;
                return Ok(TuiEvent::Gravity);
            }

            if self.render_due(now) {
                self.last_render = now;
                self.dirty = false;
                return Ok(TuiEvent::Render);
            }

            if let Some(timeout) = self.compute_timeout(now)
                && !event::poll(timeout)?
            {
                continue;
            }

            self.dirty = true;
            return Ok(event::read()?.into());
        }
    }

    fn render_due(&self, now: Instant) -> bool {
        match self.render_mode {
            RenderMode::OnDirty => self.dirty,
            RenderMode::Throttled(interval) => {
                self.dirty && now.duration_since(self.last_render) >= interval
            }
        }
    }

    fn compute_timeout(&self, now: Instant) -> Option<Duration> {
        let next_gravity_at = self
            .gravity_interval
            .map(|interval| self.last_gravity + interval);
        let next_render_at = match self.render_mode {
            RenderMode::OnDirty => self.dirty.then_some(now),
            RenderMode::Throttled(interval) => self.dirty.then(|| self.last_render + interval),
        };
        let next_timeout_at = [next_gravity_at, next_render_at]
            .into_iter()
            .flatten()
            .min()?;
        Some(next_timeout_at.saturating_duration_since(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn idle_loop(render_mode: RenderMode) -> (EventLoop, Instant) {
        let mut events = EventLoop::new(render_mode);
        let now = Instant::now();
        events.last_gravity = now;
        events.last_render = now;
        events.dirty = false;
        (events, now)
    }

    #[test]
    fn test_no_timeout_when_idle() {
        let (events, now) = idle_loop(RenderMode::OnDirty);
        assert_eq!(events.compute_timeout(now), None);
    }

    #[test]
    fn test_timeout_until_gravity() {
        let (mut events, now) = idle_loop(RenderMode::OnDirty);
        events.gravity_interval = Some(Duration::from_millis(1000));
        events.last_gravity = now;
        let later = now + Duration::from_millis(400);
        assert_eq!(
            events.compute_timeout(later),
            Some(Duration::from_millis(600))
        );
    }

    #[test]
    fn test_dirty_renders_immediately() {
        let (mut events, now) = idle_loop(RenderMode::OnDirty);
        events.gravity_interval = Some(Duration::from_millis(1000));
        events.mark_dirty();
        assert_eq!(events.compute_timeout(now), Some(Duration::ZERO));
        assert!(events.render_due(now));
    }

    #[test]
    fn test_throttled_render_waits_for_interval() {
        let interval = Duration::from_millis(50);
        let (mut events, now) = idle_loop(RenderMode::Throttled(interval));
        events.mark_dirty();
        assert!(!events.render_due(now + Duration::from_millis(10)));
        assert_eq!(
            events.compute_timeout(now + Duration::from_millis(10)),
            Some(Duration::from_millis(40))
        );
        assert!(events.render_due(now + interval));
    }
}
