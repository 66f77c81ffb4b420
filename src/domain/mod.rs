pub mod dates;
pub mod registration;
pub mod urgency;
pub mod validation;

pub use registration::{RecordId, Registration, VehicleType};
pub use urgency::{countdown, derive_urgency, Urgency};
