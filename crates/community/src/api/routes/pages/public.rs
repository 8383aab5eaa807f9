use std::sync::Arc;

use axum::{
    extract::State,
    response::{Html, Redirect},
};
use axum_extra::extract::cookie::CookieJar;
use time::OffsetDateTime;

use crate::{
    api::routes::session::{back_home, current_view, load_session},
    domain::ViewEvent,
    startup::AppState,
    templates::{
        fragments::giveaways_grid,
        layouts::base::{base, PageConfig},
        pages::{home_page, HomePage},
    },
};

pub async fn home_page_handler(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Html<String> {
    let view = current_view(&state, &jar);
    let now = OffsetDateTime::now_utc();

    let all = state.store.all().await;
    let active = state.store.active(now).await;
    let stats = state.store.stats().await;

    let content = home_page(&HomePage {
        site_name: &state.ui.site_name,
        discord_url: &state.ui.discord_url,
        hero_image_url: &state.ui.hero_image_url,
        active: &active,
        all: &all,
        stats: stats.as_ref(),
        state: &view,
        now,
    });

    let title = format!("{} - Giveaways", state.ui.site_name);
    let config = PageConfig {
        title: &title,
        site_name: &state.ui.site_name,
        logo_url: &state.ui.logo_url,
    };
    Html(base(&config, content).into_string())
}

/// Cards only, swapped into the page by its 30s poll
pub async fn active_giveaways_fragment(State(state): State<Arc<AppState>>) -> Html<String> {
    let now = OffsetDateTime::now_utc();
    let active = state.store.active(now).await;
    Html(giveaways_grid(&active, now).into_string())
}

pub async fn dismiss_alert_handler(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> (CookieJar, Redirect) {
    let (jar, id) = load_session(&state, jar);
    state.sessions.dispatch(&id, ViewEvent::AlertDismissed);
    (jar, back_home())
}
