//! Terminal user interface: roster and chat screens.

mod app;
mod backend;
mod chat;
mod compose;
mod debug_log;
mod emoji;
mod help;
mod log_capture;
mod roster;
mod ui;

pub use app::run;
