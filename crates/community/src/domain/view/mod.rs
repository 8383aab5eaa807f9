mod actions;
mod sessions;
mod state;

pub use actions::AdminActions;
pub use sessions::{SessionStore, SessionSweeper};
pub use state::*;
