mod core;
mod dispatch;
mod types;

pub use dispatch::{CommandDispatchResult, dispatch};
pub use types::{ActionId, Command, CommandOutcome};
