use serde::{Deserialize, Serialize};

use crate::domain::giveaways::NewGiveaway;

pub const INVALID_PASSWORD: &str = "Invalid admin password!";
pub const LOGIN_FAILED: &str = "Login failed. Please try again.";
pub const ADD_SUCCEEDED: &str = "Giveaway added successfully!";
pub const ADD_FAILED: &str = "Failed to add giveaway. Please try again.";
pub const DELETE_SUCCEEDED: &str = "Giveaway deleted successfully!";
pub const DELETE_FAILED: &str = "Failed to delete giveaway. Please try again.";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    Success,
    Error,
}

/// Blocking notice, the page shows nothing else interactive until it is dismissed
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Alert {
    pub kind: AlertKind,
    pub message: String,
}

impl Alert {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: AlertKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: AlertKind::Error,
            message: message.into(),
        }
    }
}

/// Everything one visitor's page needs beyond the giveaway list
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ViewState {
    pub show_admin_login: bool,
    pub is_admin: bool,
    /// A request started from this page is still outstanding
    pub busy: bool,
    pub form: NewGiveaway,
    /// Giveaway waiting on the operator's "are you sure"
    pub pending_delete: Option<String>,
    pub alert: Option<Alert>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    OpenAdminLogin,
    CancelAdminLogin,
    LoginSubmitted,
    LoginSucceeded,
    LoginRejected,
    LoginFailed,
    CloseAdminPanel,
    FormEdited(NewGiveaway),
    AddSubmitted(NewGiveaway),
    AddIncomplete(Vec<&'static str>),
    AddSucceeded,
    AddFailed,
    DeleteRequested(String),
    DeleteCancelled,
    DeleteConfirmed,
    DeleteSucceeded,
    DeleteFailed,
    AlertDismissed,
    /// The request holding `busy` went away before its outcome arrived
    RequestAbandoned,
}

impl ViewEvent {
    /// Events that start a backend request and so hold the busy flag
    pub fn starts_request(&self) -> bool {
        matches!(
            self,
            ViewEvent::LoginSubmitted | ViewEvent::AddSubmitted(_) | ViewEvent::DeleteConfirmed
        )
    }
}

impl ViewState {
    pub fn login_modal_visible(&self) -> bool {
        self.show_admin_login && !self.is_admin
    }

    pub fn admin_panel_visible(&self) -> bool {
        self.is_admin
    }

    /// Pure transition, events that make no sense in the current state leave it untouched
    pub fn apply(self, event: ViewEvent) -> ViewState {
        if event.starts_request() && self.busy {
            return self;
        }

        match event {
            ViewEvent::OpenAdminLogin if !self.is_admin => ViewState {
                show_admin_login: true,
                ..self
            },
            ViewEvent::CancelAdminLogin => ViewState {
                show_admin_login: false,
                ..self
            },
            ViewEvent::LoginSubmitted if self.login_modal_visible() => ViewState {
                busy: true,
                ..self
            },
            ViewEvent::LoginSucceeded => ViewState {
                is_admin: true,
                show_admin_login: false,
                busy: false,
                ..self
            },
            ViewEvent::LoginRejected => ViewState {
                is_admin: false,
                busy: false,
                alert: Some(Alert::error(INVALID_PASSWORD)),
                ..self
            },
            ViewEvent::LoginFailed => ViewState {
                is_admin: false,
                busy: false,
                alert: Some(Alert::error(LOGIN_FAILED)),
                ..self
            },
            ViewEvent::CloseAdminPanel => ViewState {
                is_admin: false,
                pending_delete: None,
                ..self
            },
            ViewEvent::FormEdited(form) if self.is_admin => ViewState { form, ..self },
            ViewEvent::AddSubmitted(form) if self.is_admin => ViewState {
                form,
                busy: true,
                ..self
            },
            ViewEvent::AddIncomplete(missing) if self.is_admin => ViewState {
                alert: Some(Alert::error(format!(
                    "Please fill in: {}",
                    missing.join(", ")
                ))),
                ..self
            },
            ViewEvent::AddSucceeded => ViewState {
                form: NewGiveaway::default(),
                busy: false,
                alert: Some(Alert::success(ADD_SUCCEEDED)),
                ..self
            },
            ViewEvent::AddFailed => ViewState {
                busy: false,
                alert: Some(Alert::error(ADD_FAILED)),
                ..self
            },
            ViewEvent::DeleteRequested(id) if self.is_admin => ViewState {
                pending_delete: Some(id),
                ..self
            },
            ViewEvent::DeleteCancelled => ViewState {
                pending_delete: None,
                ..self
            },
            ViewEvent::DeleteConfirmed if self.is_admin && self.pending_delete.is_some() => {
                ViewState {
                    pending_delete: None,
                    busy: true,
                    ..self
                }
            }
            ViewEvent::DeleteSucceeded => ViewState {
                busy: false,
                alert: Some(Alert::success(DELETE_SUCCEEDED)),
                ..self
            },
            ViewEvent::DeleteFailed => ViewState {
                busy: false,
                alert: Some(Alert::error(DELETE_FAILED)),
                ..self
            },
            ViewEvent::AlertDismissed => ViewState {
                alert: None,
                ..self
            },
            ViewEvent::RequestAbandoned => ViewState {
                busy: false,
                ..self
            },
            _ => self,
        }
    }
}
