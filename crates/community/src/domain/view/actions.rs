use std::sync::Arc;

use log::{error, info, warn};
use uuid::Uuid;

use super::{SessionStore, ViewEvent, ViewState};
use crate::{
    domain::giveaways::{refresh_giveaways, GiveawayStore, NewGiveaway},
    infra::backend::Backend,
};

/// Operator actions: each one runs a single backend request for a session,
/// resyncs the giveaway store after a successful mutation, and records the
/// outcome in the session's view state.
pub struct AdminActions {
    backend: Arc<dyn Backend>,
    store: GiveawayStore,
    sessions: SessionStore,
}

/// A request holding the session's busy flag.
///
/// Dropped without an outcome (the handler was cancelled mid-request) it releases the flag.
struct InFlight<'a> {
    sessions: &'a SessionStore,
    session_id: Uuid,
    settled: bool,
}

impl InFlight<'_> {
    fn settle(mut self, outcome: ViewEvent) -> Option<ViewState> {
        self.settled = true;
        self.sessions.dispatch(&self.session_id, outcome)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.settled {
            warn!("Request for session {} abandoned", self.session_id);
            self.sessions
                .dispatch(&self.session_id, ViewEvent::RequestAbandoned);
        }
    }
}

impl AdminActions {
    pub fn new(backend: Arc<dyn Backend>, store: GiveawayStore, sessions: SessionStore) -> Self {
        Self {
            backend,
            store,
            sessions,
        }
    }

    fn start(&self, session_id: &Uuid, event: ViewEvent) -> Option<InFlight<'_>> {
        self.sessions.begin(session_id, event)?;
        Some(InFlight {
            sessions: &self.sessions,
            session_id: *session_id,
            settled: false,
        })
    }

    pub async fn login(&self, session_id: &Uuid, password: &str) -> Option<ViewState> {
        let Some(request) = self.start(session_id, ViewEvent::LoginSubmitted) else {
            return self.sessions.get(session_id);
        };

        let outcome = match self.backend.login(password).await {
            Ok(()) => {
                info!("Admin login accepted for session {}", session_id);
                ViewEvent::LoginSucceeded
            }
            Err(e) if e.is_rejection() => {
                warn!("Admin login rejected for session {}", session_id);
                ViewEvent::LoginRejected
            }
            Err(e) => {
                warn!("Admin login error: {}", e);
                ViewEvent::LoginFailed
            }
        };
        request.settle(outcome)
    }

    pub async fn add_giveaway(&self, session_id: &Uuid, form: NewGiveaway) -> Option<ViewState> {
        let missing = form.missing_fields();
        if !missing.is_empty() {
            self.sessions
                .dispatch(session_id, ViewEvent::FormEdited(form))?;
            return self
                .sessions
                .dispatch(session_id, ViewEvent::AddIncomplete(missing));
        }

        let Some(request) = self.start(session_id, ViewEvent::AddSubmitted(form.clone())) else {
            return self.sessions.get(session_id);
        };

        let outcome = match self.backend.create_giveaway(&form).await {
            Ok(()) => {
                info!("Giveaway '{}' created", form.title);
                self.resync().await;
                ViewEvent::AddSucceeded
            }
            Err(e) => {
                warn!("Error adding giveaway: {}", e);
                ViewEvent::AddFailed
            }
        };
        request.settle(outcome)
    }

    pub async fn confirm_delete(&self, session_id: &Uuid) -> Option<ViewState> {
        let Some(giveaway_id) = self.sessions.get(session_id)?.pending_delete else {
            return self.sessions.get(session_id);
        };

        let Some(request) = self.start(session_id, ViewEvent::DeleteConfirmed) else {
            return self.sessions.get(session_id);
        };

        let outcome = match self.backend.delete_giveaway(&giveaway_id).await {
            Ok(()) => {
                info!("Giveaway {} deleted", giveaway_id);
                self.resync().await;
                ViewEvent::DeleteSucceeded
            }
            Err(e) => {
                warn!("Error deleting giveaway {}: {}", giveaway_id, e);
                ViewEvent::DeleteFailed
            }
        };
        request.settle(outcome)
    }

    async fn resync(&self) {
        if let Err(e) = refresh_giveaways(self.backend.as_ref(), &self.store).await {
            error!("Error fetching giveaways: {}", e);
        }
    }
}
