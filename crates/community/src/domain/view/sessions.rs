use std::{
    collections::HashMap,
    sync::{Arc, PoisonError, RwLock},
    time::{Duration, Instant},
};

use log::{debug, info};
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use super::{ViewEvent, ViewState};

struct Session {
    state: ViewState,
    last_seen: Instant,
}

/// Per-browser view state, memory only, nothing survives a restart.
///
/// Locks are never held across an await, so every operation is synchronous.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, Session>>>,
    idle_ttl: Duration,
}

impl SessionStore {
    pub fn new(idle_ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            idle_ttl,
        }
    }

    /// What the visitor sees, unknown or missing ids get the default page and nothing is stored
    pub fn view(&self, id: Option<&Uuid>) -> ViewState {
        let Some(id) = id else {
            return ViewState::default();
        };
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        match sessions.get_mut(id) {
            Some(session) => {
                session.last_seen = Instant::now();
                session.state.clone()
            }
            None => ViewState::default(),
        }
    }

    /// Session for `id`, starting a fresh one when the id is unknown or missing
    pub fn get_or_create(&self, id: Option<Uuid>) -> (Uuid, ViewState) {
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        let now = Instant::now();

        if let Some(id) = id {
            if let Some(session) = sessions.get_mut(&id) {
                session.last_seen = now;
                return (id, session.state.clone());
            }
        }

        let id = Uuid::new_v4();
        sessions.insert(
            id,
            Session {
                state: ViewState::default(),
                last_seen: now,
            },
        );
        (id, ViewState::default())
    }

    pub fn get(&self, id: &Uuid) -> Option<ViewState> {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .map(|s| s.state.clone())
    }

    /// Applies `event` and returns the new state, `None` for an unknown session
    pub fn dispatch(&self, id: &Uuid, event: ViewEvent) -> Option<ViewState> {
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        let session = sessions.get_mut(id)?;
        let state = std::mem::take(&mut session.state).apply(event);
        session.state = state.clone();
        session.last_seen = Instant::now();
        Some(state)
    }

    /// Applies a request-starting event only if the session isn't already busy.
    ///
    /// Returns the state the request should run with, or `None` when it must not run.
    pub fn begin(&self, id: &Uuid, event: ViewEvent) -> Option<ViewState> {
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        let session = sessions.get_mut(id)?;
        if session.state.busy {
            return None;
        }

        let state = session.state.clone().apply(event);
        if !state.busy {
            // the transition refused the request
            session.state = state;
            return None;
        }
        session.state = state.clone();
        session.last_seen = Instant::now();
        Some(state)
    }

    /// Drops sessions idle for longer than the ttl, returns how many went
    pub fn prune(&self) -> usize {
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        let now = Instant::now();
        let before = sessions.len();
        sessions.retain(|_, session| now.duration_since(session.last_seen) < self.idle_ttl);
        before - sessions.len()
    }

    pub fn len(&self) -> usize {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Expires idle sessions on a fixed schedule until the token is cancelled
pub struct SessionSweeper {
    sessions: SessionStore,
    sweep_interval: Duration,
    cancel_token: CancellationToken,
}

impl SessionSweeper {
    pub fn new(
        sessions: SessionStore,
        cancel_token: CancellationToken,
        sweep_interval: Duration,
    ) -> Self {
        Self {
            sessions,
            sweep_interval,
            cancel_token,
        }
    }

    pub async fn watch(&self) -> Result<(), anyhow::Error> {
        info!("Starting session sweeper");
        let mut ticker = interval(self.sweep_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let dropped = self.sessions.prune();
                    if dropped > 0 {
                        debug!("Dropped {} idle sessions", dropped);
                    }
                }
                _ = self.cancel_token.cancelled() => {
                    info!("Session sweeper cancelled");
                    break;
                }
            }
        }

        Ok(())
    }
}
