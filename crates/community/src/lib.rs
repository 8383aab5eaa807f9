pub mod api;
pub mod config;
pub mod domain;
pub mod infra;
pub mod startup;
pub mod templates;

pub use config::*;
pub use domain::{Giveaway, GiveawayStore, NewGiveaway};
pub use infra::backend::{Backend, BackendClient, Error as BackendError};
pub use startup::*;
