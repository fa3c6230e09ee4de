mod actors;
mod core;
mod event_bus;
mod event_loop;
mod state;
pub(crate) mod terminal_session;
mod view_ops;

#[cfg(test)]
mod tests;

pub use core::App;
pub use state::{AppState, StatusState};
