mod admin;
mod public;

pub use admin::*;
pub use public::*;
