// The binary in main.rs drives the terminal; everything it needs lives here
// so integration tests and criterion benches can reach it.

pub mod app;
pub mod clock;
pub mod config;
pub mod engine;
pub mod event;
pub mod logging;
pub mod session;
pub mod source;
pub mod ui;
