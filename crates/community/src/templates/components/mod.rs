mod footer;
mod header;
pub mod modals;

pub use footer::footer;
pub use header::header;
pub use modals::{admin_login_modal, admin_panel_modal, alert_modal, confirm_delete_modal};
