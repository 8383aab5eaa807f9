use maud::{html, Markup};
use time::OffsetDateTime;

pub fn footer(site_name: &str) -> Markup {
    html! {
        footer class="footer community-footer" {
            div class="content has-text-centered" {
                p { "© " (OffsetDateTime::now_utc().year()) " " (site_name) ". All rights reserved." }
                p { "Built with 🧡 for our amazing tiger community!" }
            }
        }
    }
}
