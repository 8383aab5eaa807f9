use maud::{html, Markup};
use time::OffsetDateTime;

use super::giveaway_card;
use crate::domain::giveaways::Giveaway;

/// Active giveaways section, the grid re-fetches itself every 30s
pub fn giveaways_section(giveaways: &[Giveaway], now: OffsetDateTime) -> Markup {
    html! {
        section id="giveaways" class="section" {
            div class="container" {
                h2 class="title is-2 has-text-centered" { "🔥 Active Giveaways" }
                div id="activeGiveaways"
                    hx-get="/giveaways/active"
                    hx-trigger="every 30s"
                    hx-swap="innerHTML" {
                    (giveaways_grid(giveaways, now))
                }
            }
        }
    }
}

/// Cards for `giveaways`, which must already be filtered to the active ones
pub fn giveaways_grid(giveaways: &[Giveaway], now: OffsetDateTime) -> Markup {
    html! {
        @if giveaways.is_empty() {
            div class="has-text-centered py-6" {
                p class="is-size-5" { "No active giveaways at the moment. Check back soon! 🐅" }
            }
        } @else {
            div class="columns is-multiline" {
                @for giveaway in giveaways {
                    (giveaway_card(giveaway, now))
                }
            }
        }
    }
}
