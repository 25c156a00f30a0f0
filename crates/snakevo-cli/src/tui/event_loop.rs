use std::{
    io,
    time::{Duration, Instant},
};

use crossterm::event;

use crate::tui::event::TuiEvent;

/// When the screen is redrawn.
#[derive(Debug, Clone, Copy, Default)]
pub enum RenderMode {
    /// Redraw at a fixed interval.
    Interval(Duration),
    /// Redraw after every tick or terminal event.
    #[default]
    OnDirty,
}

impl RenderMode {
    #[must_use]
    pub fn interval_from_rate(rate: f64) -> Self {
        Self::Interval(Duration::from_secs_f64(1.0 / rate))
    }

    fn as_interval(self) -> Option<Duration> {
        match self {
            Self::Interval(interval) => Some(interval),
            Self::OnDirty => None,
        }
    }
}

#[derive(Debug)]
pub(super) struct EventLoop {
    tick_interval: Option<Duration>,
    render_mode: RenderMode,
    last_tick: Instant,
    last_render: Instant,
    dirty: bool,
}

impl Default for EventLoop {
    fn default() -> Self {
        let now = Instant::now();
        Self {
            tick_interval: None,
            render_mode: RenderMode::default(),
            last_tick: now,
            last_render: now,
            // the first frame is always drawn
            dirty: true,
        }
    }
}

impl EventLoop {
    pub(super) fn set_tick_interval(&mut self, interval: Option<Duration>) {
        self.tick_interval = interval;
    }

    pub(super) fn set_render_mode(&mut self, render_mode: RenderMode) {
        self.render_mode = render_mode;
    }

    /// Blocks until the next tick, render or terminal event.
    pub(super) fn next(&mut self) -> io::Result<TuiEvent> {
        loop {
            let now = Instant::now();
            if let Some(interval) = self.tick_interval
                && now.duration_since(self.last_tick) >= interval
            {
                self.last_tick = now;
                self.dirty = true;
                return Ok(TuiEvent::Tick);
            }

            let render = match self.render_mode {
                RenderMode::Interval(interval) => now.duration_since(self.last_render) >= interval,
                RenderMode::OnDirty => self.dirty,
            };
            if render {
                self.last_render = now;
                self.dirty = false;
                return Ok(TuiEvent::Render);
            }

            if let Some(timeout) = self.timeout(now)
                && !event::poll(timeout)?
            {
                continue;
            }

            self.dirty = true;
            return Ok(event::read()?.into());
        }
    }

    fn timeout(&self, now: Instant) -> Option<Duration> {
        let next_tick = self.tick_interval.map(|interval| self.last_tick + interval);
        let next_render = self
            .render_mode
            .as_interval()
            .map(|interval| self.last_render + interval);
        let deadline = [next_tick, next_render].into_iter().flatten().min()?;
        Some(deadline.saturating_duration_since(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_event_is_render() {
        let mut events = EventLoop::default();
        assert!(events.next().unwrap().is_render());
    }

    #[test]
    fn test_timeout_follows_nearest_deadline() {
        let mut events = EventLoop::default();
        assert_eq!(events.timeout(events.last_tick), None);

        events.set_tick_interval(Some(Duration::from_millis(50)));
        events.set_render_mode(RenderMode::Interval(Duration::from_millis(20)));
        let now = events.last_tick.max(events.last_render);
        let timeout = events.timeout(now).unwrap();
        assert!(timeout <= Duration::from_millis(20));
    }

    #[test]
    fn test_interval_from_rate() {
        let RenderMode::Interval(interval) = RenderMode::interval_from_rate(20.0) else {
            panic!("expected interval mode");
        };
        assert_eq!(interval, Duration::from_millis(50));
    }
}
