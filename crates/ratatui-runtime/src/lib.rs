//! Minimal fixed-rate runtime for ratatui applications.
//!
//! [`Runtime::run`] owns the terminal and feeds an [`App`] three kinds of events:
//! ticks carrying the time elapsed since the previous tick, render requests, and raw
//! crossterm events. Everything happens on the calling thread.

pub use self::{app::App, event_loop::RenderMode, runtime::Runtime};

mod app;
mod event;
mod event_loop;
mod runtime;
