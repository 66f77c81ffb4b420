pub mod engine;
pub mod filters;
pub mod load;
pub mod stats;

pub use engine::{spawn_auto_refresh, RefreshFailure, RegistrationEngine};
pub use filters::{CustomFilter, FilterState, FilteredView, ViewState};
pub use load::AnnotatedRegistration;
pub use stats::{dashboard_stats, DashboardStats};
