use maud::{html, Markup};
use time::OffsetDateTime;

use crate::{
    domain::{
        giveaways::{CommunityStats, Giveaway},
        view::ViewState,
    },
    templates::{
        components::{admin_login_modal, admin_panel_modal, alert_modal, confirm_delete_modal},
        fragments::giveaways_section,
    },
};

/// Everything the landing page renders from
pub struct HomePage<'a> {
    pub site_name: &'a str,
    pub discord_url: &'a str,
    pub hero_image_url: &'a str,
    pub active: &'a [Giveaway],
    pub all: &'a [Giveaway],
    pub stats: Option<&'a CommunityStats>,
    pub state: &'a ViewState,
    pub now: OffsetDateTime,
}

pub fn home_page(page: &HomePage) -> Markup {
    html! {
        (hero(page.site_name, page.discord_url, page.hero_image_url))
        (why_join(page.site_name))
        (giveaways_section(page.active, page.now))
        (stats_section(page.stats))
        (call_to_action(page.discord_url))

        (admin_login_modal(page.state))
        (admin_panel_modal(page.state, page.all))
        (confirm_delete_modal(page.state, page.all))
        (alert_modal(page.state.alert.as_ref()))
    }
}

fn hero(site_name: &str, discord_url: &str, hero_image_url: &str) -> Markup {
    html! {
        section class="hero is-medium community-hero"
                style=(format!("background-image: url('{}')", hero_image_url)) {
            div class="hero-body" {
                div class="container has-text-centered" {
                    h1 class="title is-1 has-text-white" { "Welcome to " (site_name) }
                    p class="subtitle is-4 has-text-white" {
                        "Join our amazing tiger community for epic giveaways, gaming, and good vibes! 🐅"
                    }
                    a class="button is-warning is-large" href=(discord_url)
                      target="_blank" rel="noopener noreferrer" {
                        "Join Discord"
                    }
                }
            }
        }
    }
}

fn why_join(site_name: &str) -> Markup {
    const CARDS: [(&str, &str, &str); 3] = [
        ("🎁", "Epic Giveaways", "Regular giveaways with amazing prizes for our community members!"),
        ("😎", "Chill Community", "A relaxed and friendly environment where everyone is welcome."),
        ("🎮", "Gaming Fun", "Join gaming sessions, tournaments, and events with fellow members."),
    ];

    html! {
        section class="section" {
            div class="container" {
                h2 class="title is-2 has-text-centered" { "Why Join " (site_name) "?" }
                div class="columns" {
                    @for (icon, title, body) in CARDS {
                        div class="column" {
                            div class="box has-text-centered feature-card" {
                                p class="is-size-1" { (icon) }
                                h3 class="title is-4" { (title) }
                                p { (body) }
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Backend figures when the last poll got them, the fixed marketing numbers otherwise
fn stats_section(stats: Option<&CommunityStats>) -> Markup {
    let figures: [(String, &str); 3] = match stats {
        Some(stats) => [
            (stats.member_count.to_string(), "Members"),
            (stats.total_giveaways.to_string(), "Giveaways Hosted"),
            (stats.active_giveaways.to_string(), "Active Giveaways"),
        ],
        None => [
            (String::from("500+"), "Members"),
            (String::from("50+"), "Giveaways Hosted"),
            (String::from("24/7"), "Active Community"),
        ],
    };

    html! {
        section id="stats" class="section community-stats" {
            div class="container" {
                h2 class="title is-2 has-text-centered" { "Community Stats" }
                nav class="level" {
                    @for (value, label) in &figures {
                        div class="level-item has-text-centered" {
                            div {
                                p class="heading" { (label) }
                                p class="title" { (value) }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn call_to_action(discord_url: &str) -> Markup {
    html! {
        section class="section has-text-centered community-cta" {
            h2 class="title is-2" { "Ready to Join the Pack? 🐅" }
            p class="subtitle" {
                "Don't miss out on exclusive giveaways and awesome community events!"
            }
            a class="button is-warning is-large" href=(discord_url)
              target="_blank" rel="noopener noreferrer" {
                "Join Our Discord"
            }
        }
    }
}
