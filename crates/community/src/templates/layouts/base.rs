use maud::{html, Markup, DOCTYPE};

use crate::templates::components::{footer, header};

pub struct PageConfig<'a> {
    pub title: &'a str,
    pub site_name: &'a str,
    pub logo_url: &'a str,
}

pub fn base(config: &PageConfig, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                base href="/";
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (config.title) }

                link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/bulma@1.0.2/css/bulma.min.css";
                link rel="stylesheet" href="/ui/styles.css";

                script src="https://unpkg.com/htmx.org@1.9.10" {}
            }
            body class="community" {
                (header(config.site_name, config.logo_url))

                div id="main-content" {
                    (content)
                }

                (footer(config.site_name))
            }
        }
    }
}
