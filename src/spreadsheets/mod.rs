pub mod export_csv;
pub mod export_xlsx;

use chrono::NaiveDate;

use crate::domain::Registration;

pub use export_csv::registrations_csv;
pub use export_xlsx::registrations_workbook;

pub const EXPORT_HEADERS: [&str; 7] = [
    "ID",
    "Owner",
    "Vehicle Type",
    "Reg Number",
    "Testing Date",
    "Expiry Date",
    "Submitted",
];

/// Column values for one exported record, as stored. Missing fields are empty.
pub fn export_row(reg: &Registration) -> [&str; 7] {
    [
        reg.id.as_str(),
        reg.owner_name.as_deref().unwrap_or(""),
        reg.vehicle_type.as_deref().unwrap_or(""),
        reg.registration_number.as_deref().unwrap_or(""),
        reg.testing_date.as_deref().unwrap_or(""),
        reg.expiring_date.as_deref().unwrap_or(""),
        reg.submitted_at.as_deref().unwrap_or(""),
    ]
}

/// `vehicle-registrations-<YYYY-MM-DD>.<ext>`
pub fn export_filename(today: NaiveDate, ext: &str) -> String {
    format!("vehicle-registrations-{}.{ext}", today.format("%Y-%m-%d"))
}
