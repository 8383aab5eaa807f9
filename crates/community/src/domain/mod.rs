pub mod giveaways;
pub mod view;

pub use giveaways::{
    active_giveaways, format_time_remaining, CommunityStats, Countdown, Giveaway, GiveawayStore,
    GiveawayWatcher, NewGiveaway,
};
pub use view::{
    AdminActions, Alert, AlertKind, SessionStore, SessionSweeper, ViewEvent, ViewState,
};
