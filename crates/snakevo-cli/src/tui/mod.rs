//! Minimal terminal application runtime.
//!
//! An [`App`] is driven by [`Runtime::run`]: ticks update state, render events
//! redraw, and terminal input goes to [`App::handle_event`].

pub use self::{app::App, event_loop::RenderMode, runtime::Runtime};

mod app;
mod event;
mod event_loop;
mod runtime;
