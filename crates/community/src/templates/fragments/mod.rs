mod giveaway_card;
mod giveaways;

pub use giveaway_card::giveaway_card;
pub use giveaways::{giveaways_grid, giveaways_section};
