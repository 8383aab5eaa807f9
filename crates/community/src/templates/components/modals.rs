use maud::{html, Markup};
use reqwest_middleware::reqwest::Url;

use crate::domain::{
    giveaways::Giveaway,
    view::{Alert, AlertKind, ViewState},
};

/// Form target for deleting `giveaway_id`, the id is percent-encoded as one path segment
fn delete_action(giveaway_id: &str) -> String {
    Url::parse("http://localhost/")
        .ok()
        .and_then(|mut url| {
            url.path_segments_mut()
                .ok()?
                .pop_if_empty()
                .extend(["admin", "giveaways", giveaway_id, "delete"]);
            Some(url.path().to_string())
        })
        .unwrap_or_else(|| String::from("/"))
}

fn active(visible: bool) -> &'static str {
    if visible {
        "modal is-active"
    } else {
        "modal"
    }
}

pub fn admin_login_modal(state: &ViewState) -> Markup {
    html! {
        div id="adminLoginModal" class=(active(state.login_modal_visible())) {
            div class="modal-background" {}
            div class="modal-card" {
                header class="modal-card-head" {
                    p class="modal-card-title" { "Admin Login" }
                    form method="post" action="/admin/login/cancel" {
                        button type="submit" class="delete" aria-label="close" {}
                    }
                }
                section class="modal-card-body" {
                    form id="adminLoginForm" method="post" action="/admin/login" {
                        div class="field" {
                            div class="control" {
                                input class="input is-medium" type="password"
                                      name="password"
                                      placeholder="Enter admin password"
                                      required;
                            }
                        }
                        div class="field mt-5" {
                            div class="control" {
                                button type="submit" class="button is-warning is-fullwidth"
                                       disabled[state.busy] {
                                    @if state.busy { "Logging in..." } @else { "Login" }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Operator panel with the add form and every giveaway, ended ones included
pub fn admin_panel_modal(state: &ViewState, giveaways: &[Giveaway]) -> Markup {
    let form = &state.form;
    html! {
        div id="adminPanelModal" class=(active(state.admin_panel_visible())) {
            div class="modal-background" {}
            div class="modal-card admin-panel" {
                header class="modal-card-head" {
                    p class="modal-card-title" { "🛠️ Admin Panel" }
                    form method="post" action="/admin/close" {
                        button type="submit" class="delete" aria-label="close" {}
                    }
                }
                section class="modal-card-body" {
                    h3 class="title is-5" { "Add New Giveaway" }
                    form id="addGiveawayForm" method="post" action="/admin/giveaways"
                         hx-post="/admin/form" hx-trigger="change" hx-swap="none" {
                        div class="field" {
                            label class="label" { "Title" }
                            div class="control" {
                                input class="input" type="text" name="title"
                                      placeholder="Giveaway title" value=(form.title);
                            }
                        }
                        div class="field" {
                            label class="label" { "Prize" }
                            div class="control" {
                                input class="input" type="text" name="prize"
                                      placeholder="What's the prize?" value=(form.prize);
                            }
                        }
                        div class="field" {
                            label class="label" { "Description" }
                            div class="control" {
                                textarea class="textarea" name="description" rows="3"
                                         placeholder="Describe the giveaway" {
                                    (form.description)
                                }
                            }
                        }
                        div class="field" {
                            label class="label" { "End Date (UTC)" }
                            div class="control" {
                                input class="input" type="datetime-local" name="endDate"
                                      value=(form.end_date);
                            }
                        }
                        div class="field" {
                            label class="label" { "Entry Requirement" }
                            div class="control" {
                                input class="input" type="text" name="entryRequirement"
                                      placeholder="How do people enter?"
                                      value=(form.entry_requirement);
                            }
                        }
                        div class="field" {
                            div class="control" {
                                button type="submit" class="button is-warning is-fullwidth"
                                       disabled[state.busy] {
                                    @if state.busy { "Adding..." } @else { "Add Giveaway" }
                                }
                            }
                        }
                    }

                    hr;

                    h3 class="title is-5" { "Current Giveaways" }
                    @if giveaways.is_empty() {
                        p class="has-text-grey" { "No giveaways yet." }
                    }
                    @for giveaway in giveaways {
                        div class="box admin-giveaway" {
                            div class="level is-mobile" {
                                div class="level-left" {
                                    div {
                                        p class="has-text-weight-bold" { (giveaway.title) }
                                        p class="is-size-7" { "Prize: " (giveaway.prize) }
                                        p class="is-size-7" { "Ends: " (giveaway.display_end_date()) }
                                        p class="is-size-7" { "Entry: " (giveaway.entry_requirement) }
                                    }
                                }
                                div class="level-right" {
                                    form method="post" action=(delete_action(&giveaway.id)) {
                                        button type="submit" class="button is-danger is-small"
                                               disabled[state.busy] { "Delete" }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

pub fn confirm_delete_modal(state: &ViewState, giveaways: &[Giveaway]) -> Markup {
    let pending = state.pending_delete.as_deref();
    let title = pending
        .and_then(|id| giveaways.iter().find(|g| g.id == id))
        .map(|g| g.title.as_str());
    html! {
        div id="confirmDeleteModal" class=(active(state.is_admin && pending.is_some())) {
            div class="modal-background" {}
            div class="modal-card" {
                section class="modal-card-body" {
                    p {
                        "Are you sure you want to delete this giveaway?"
                        @if let Some(title) = title {
                            br;
                            strong { (title) }
                        }
                    }
                }
                footer class="modal-card-foot buttons" {
                    form method="post" action="/admin/delete/confirm" {
                        button type="submit" class="button is-danger" disabled[state.busy] { "Delete" }
                    }
                    form method="post" action="/admin/delete/cancel" {
                        button type="submit" class="button" { "Cancel" }
                    }
                }
            }
        }
    }
}

/// Blocking notice, sits above every other modal until dismissed
pub fn alert_modal(alert: Option<&Alert>) -> Markup {
    let Some(alert) = alert else {
        return html! {};
    };
    let notification = match alert.kind {
        AlertKind::Success => "notification is-success",
        AlertKind::Error => "notification is-danger",
    };

    html! {
        div id="alertModal" class="modal is-active alert-modal" {
            div class="modal-background" {}
            div class="modal-content" {
                div class=(notification) role="alert" {
                    p class="mb-4" { (alert.message) }
                    form method="post" action="/alert/dismiss" {
                        button type="submit" class="button is-light" autofocus { "OK" }
                    }
                }
            }
        }
    }
}
