//! UI Components
//!
//! Pages, modals and the small shared pieces they are built from.

mod confirm_button;
mod create_meeting_modal;
mod diagnostics_panel;
mod error_banner;
mod field_error;
mod form_actions;
mod generate_modal;
mod import_modal;
mod inventory_page;
mod login_form;
mod meeting_config_modal;
mod meetings_page;
mod modal;
mod nav_bar;
mod one_time_task_modal;
mod postpone_modal;
mod presenter_avatar;
mod recurring_task_modal;
mod request_form_modal;
mod requests_page;
mod scanner_modal;
mod swap_modal;
mod tasks_page;
mod upload_modal;

pub use diagnostics_panel::DiagnosticsPanel;
pub use inventory_page::InventoryPage;
pub use login_form::LoginForm;
pub use meetings_page::MeetingsPage;
pub use nav_bar::NavBar;
pub use requests_page::RequestsPage;
pub use tasks_page::TasksPage;
