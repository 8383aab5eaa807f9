use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
    Form,
};
use axum_extra::extract::cookie::CookieJar;
use log::debug;
use serde::Deserialize;

use crate::{
    api::routes::session::{back_home, load_session},
    domain::{NewGiveaway, ViewEvent},
    startup::AppState,
};

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub password: String,
}

fn dispatch(state: &AppState, jar: CookieJar, event: ViewEvent) -> (CookieJar, Redirect) {
    let (jar, id) = load_session(state, jar);
    state.sessions.dispatch(&id, event);
    (jar, back_home())
}

pub async fn open_login_handler(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> (CookieJar, Redirect) {
    dispatch(&state, jar, ViewEvent::OpenAdminLogin)
}

pub async fn cancel_login_handler(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> (CookieJar, Redirect) {
    dispatch(&state, jar, ViewEvent::CancelAdminLogin)
}

pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> (CookieJar, Redirect) {
    let (jar, id) = load_session(&state, jar);
    state.actions.login(&id, &form.password).await;
    (jar, back_home())
}

pub async fn close_panel_handler(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> (CookieJar, Redirect) {
    dispatch(&state, jar, ViewEvent::CloseAdminPanel)
}

/// Keeps what the operator typed so an alert round trip doesn't lose it
pub async fn update_form_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    jar: CookieJar,
    Form(form): Form<NewGiveaway>,
) -> Response {
    let (jar, redirect) = dispatch(&state, jar, ViewEvent::FormEdited(form));
    if headers.get("HX-Request").is_some() {
        (jar, StatusCode::NO_CONTENT).into_response()
    } else {
        (jar, redirect).into_response()
    }
}

pub async fn add_giveaway_handler(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<NewGiveaway>,
) -> (CookieJar, Redirect) {
    let (jar, id) = load_session(&state, jar);
    state.actions.add_giveaway(&id, form).await;
    (jar, back_home())
}

pub async fn request_delete_handler(
    State(state): State<Arc<AppState>>,
    Path(giveaway_id): Path<String>,
    jar: CookieJar,
) -> (CookieJar, Redirect) {
    debug!("Delete requested for giveaway {}", giveaway_id);
    dispatch(&state, jar, ViewEvent::DeleteRequested(giveaway_id))
}

pub async fn confirm_delete_handler(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> (CookieJar, Redirect) {
    let (jar, id) = load_session(&state, jar);
    state.actions.confirm_delete(&id).await;
    (jar, back_home())
}

pub async fn cancel_delete_handler(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> (CookieJar, Redirect) {
    dispatch(&state, jar, ViewEvent::DeleteCancelled)
}
