use maud::{html, Markup};

/// Top bar with the community logo and the admin entry point
pub fn header(site_name: &str, logo_url: &str) -> Markup {
    html! {
        nav class="navbar is-transparent community-header" role="navigation" aria-label="main navigation" {
            div class="container" {
                div class="navbar-brand" {
                    div class="navbar-item" {
                        figure class="image is-64x64 community-logo" {
                            img class="is-rounded" src=(logo_url) alt=(format!("{} Logo", site_name));
                        }
                        h1 class="title is-3 has-text-white ml-4" { (site_name) }
                    }
                }
                div class="navbar-end" {
                    div class="navbar-item" {
                        form method="post" action="/admin/login/open" {
                            button type="submit" class="button is-warning" { "Admin Panel" }
                        }
                    }
                }
            }
        }
    }
}
