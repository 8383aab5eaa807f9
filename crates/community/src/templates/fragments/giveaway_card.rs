use maud::{html, Markup};
use time::OffsetDateTime;

use crate::domain::giveaways::{format_time_remaining, Giveaway, ENDED};

pub fn giveaway_card(giveaway: &Giveaway, now: OffsetDateTime) -> Markup {
    let remaining = giveaway
        .ends_at()
        .map(|end| format_time_remaining(end, now))
        .unwrap_or_else(|| ENDED.to_string());

    html! {
        div class="column is-one-third-desktop is-half-tablet" {
            div class="card giveaway-card" data-giveaway-id=(giveaway.id) {
                div class="card-content" {
                    p class="title is-5" { (giveaway.title) }
                    p class="subtitle is-6 has-text-warning" { "🎁 " (giveaway.prize) }
                    div class="content" {
                        p { (giveaway.description) }
                    }
                    div class="tags" {
                        span class="tag is-dark countdown" { "⏰ " (remaining) }
                    }
                    p class="is-size-7" {
                        strong { "Entry: " }
                        (giveaway.entry_requirement)
                    }
                }
            }
        }
    }
}
