use axum::response::Redirect;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use uuid::Uuid;

use crate::{domain::ViewState, startup::AppState};

fn session_id(state: &AppState, jar: &CookieJar) -> Option<Uuid> {
    jar.get(&state.cookie_name)
        .and_then(|cookie| Uuid::parse_str(cookie.value()).ok())
}

/// Page state for a read, a visitor without a live session sees the default page
/// and no session is stored for them.
pub fn current_view(state: &AppState, jar: &CookieJar) -> ViewState {
    state.sessions.view(session_id(state, jar).as_ref())
}

/// Session a state change applies to, issuing a new cookie when there is none
/// or the old session expired.
pub fn load_session(state: &AppState, jar: CookieJar) -> (CookieJar, Uuid) {
    let known = session_id(state, &jar);
    let (id, _) = state.sessions.get_or_create(known);
    if known == Some(id) {
        return (jar, id);
    }

    let cookie = Cookie::build((state.cookie_name.clone(), id.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();
    (jar.add(cookie), id)
}

/// Post/redirect/get, every state change lands back on the page
pub fn back_home() -> Redirect {
    Redirect::to("/")
}
