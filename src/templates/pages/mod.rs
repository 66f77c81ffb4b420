pub mod dashboard;
pub mod error;
pub mod login;
pub mod register;
pub mod registrations;

pub use dashboard::{dashboard_page, DashboardVm};
pub use error::error_page;
pub use login::login_page;
pub use register::{register_page, RegisterVm};
pub use registrations::{registrations_page, RegistrationsVm};
