// src/domain/validation.rs

use std::sync::LazyLock;

use chrono::{DateTime, Months, NaiveDate, SecondsFormat, Utc};
use regex::Regex;
use serde_json::Value;

use crate::domain::dates::parse_calendar_date;
use crate::domain::registration::{Registration, VehicleType, DEFAULT_STATUS};
use crate::errors::ValidationErrors;

/// Longest validity a single test can grant.
pub const MAX_VALIDITY_MONTHS: u32 = 36;

static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z\s.]+$").expect("name regex is valid"));

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$"#,
    )
    .expect("email regex is valid")
});

/// Indian mobile number, optionally prefixed with a trunk `0` or country code `91`.
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:0|91)?[6789]\d{9}$").expect("phone regex is valid"));

/// Regional plate format, e.g. `MH12AB1234`.
static PLATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Z]{2}[0-9]{2}[A-Z]{1,2}[0-9]{4}$").expect("plate regex is valid")
});

const DOMAIN_TYPOS: &[(&str, &str)] = &[
    ("gmail.co", "gmail.com"),
    ("gmial.com", "gmail.com"),
    ("gmai.com", "gmail.com"),
    ("yahoo.co", "yahoo.com"),
    ("hotmai.com", "hotmail.com"),
    ("outlok.com", "outlook.com"),
];

/// Raw registration form input, as posted.
#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    pub owner_name: String,
    pub owner_email: String,
    pub owner_phone: String,
    pub vehicle_type: String,
    pub registration_number: String,
    pub testing_date: String,
    pub expiring_date: String,
}

impl RegistrationForm {
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut form = Self::default();
        for (k, v) in pairs {
            let slot = match k.as_ref() {
                "ownerName" => &mut form.owner_name,
                "ownerEmail" => &mut form.owner_email,
                "ownerPhone" => &mut form.owner_phone,
                "vehicleType" => &mut form.vehicle_type,
                "registrationNumber" => &mut form.registration_number,
                "testingDate" => &mut form.testing_date,
                "expiringDate" => &mut form.expiring_date,
                _ => continue,
            };
            *slot = v.into();
        }
        form
    }
}

/// Check every field and build the record to insert.
///
/// All failures are collected so the form can show them at once.
pub fn validate_submission(
    form: &RegistrationForm,
    today: NaiveDate,
    now: DateTime<Utc>,
    submitted_by: &str,
) -> Result<Registration, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let owner_name = form.owner_name.trim();
    if let Err(msg) = check_owner_name(owner_name) {
        errors.push("ownerName", msg);
    }

    let email = form.owner_email.trim().to_lowercase();
    if let Err(msg) = check_email(&email) {
        errors.push("ownerEmail", msg);
    }

    let phone = form.owner_phone.trim();
    if let Err(msg) = check_phone(phone) {
        errors.push("ownerPhone", msg);
    }

    let vehicle_type = VehicleType::parse(form.vehicle_type.trim());
    if vehicle_type.is_none() {
        errors.push("vehicleType", "Please select a vehicle type");
    }

    let plate = form.registration_number.trim().to_uppercase();
    if let Err(msg) = check_plate(&plate) {
        errors.push("registrationNumber", msg);
    }

    let testing = check_not_past(&form.testing_date, today, "Testing date");
    if let Err(msg) = &testing {
        errors.push("testingDate", msg.clone());
    }
    let expiring = check_not_past(&form.expiring_date, today, "Expiring date");
    match (&testing, &expiring) {
        (_, Err(msg)) => errors.push("expiringDate", msg.clone()),
        (Ok(test), Ok(exp)) => {
            if let Err(msg) = check_validity_window(*test, *exp) {
                errors.push("expiringDate", msg);
            }
        }
        (Err(_), Ok(_)) => {}
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    let mut reg = Registration {
        owner_name: Some(owner_name.to_string()),
        owner_email: Some(email),
        owner_phone: Some(phone.to_string()),
        vehicle_type: vehicle_type.map(|t| t.as_str().to_string()),
        registration_number: Some(plate),
        testing_date: Some(form.testing_date.trim().to_string()),
        expiring_date: Some(form.expiring_date.trim().to_string()),
        submitted_at: Some(now.to_rfc3339_opts(SecondsFormat::Millis, true)),
        status: Some(DEFAULT_STATUS.to_string()),
        ..Default::default()
    };
    reg.extra
        .insert("submittedBy".into(), Value::String(submitted_by.to_string()));
    Ok(reg)
}

fn check_owner_name(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("Owner name is required".into());
    }
    if name.chars().count() < 2 {
        return Err("Name must be at least 2 characters".into());
    }
    if !NAME_RE.is_match(name) {
        return Err("Name can only contain letters, spaces, and dots".into());
    }
    Ok(())
}

fn check_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email address is required".into());
    }
    if email.len() > 254 {
        return Err("Email address is too long".into());
    }
    if !EMAIL_RE.is_match(email) {
        return Err("Please enter a valid email address".into());
    }
    if let Some((local, domain)) = email.split_once('@') {
        if let Some((_, fix)) = DOMAIN_TYPOS.iter().find(|(typo, _)| *typo == domain) {
            return Err(format!("Did you mean {local}@{fix}?"));
        }
    }
    Ok(())
}

fn check_phone(phone: &str) -> Result<(), String> {
    if phone.is_empty() {
        return Err("Phone number is required".into());
    }

    let digits: String = phone.chars().filter(char::is_ascii_digit).collect();
    if digits.len() < 10 {
        return Err("Phone number is too short".into());
    }
    if digits.len() > 15 {
        return Err("Phone number is too long".into());
    }
    if !PHONE_RE.is_match(&digits) {
        return Err("Please enter a valid Indian phone number".into());
    }

    let subscriber = &digits[digits.len() - 10..];
    let repeated = subscriber.chars().all(|c| Some(c) == subscriber.chars().next());
    if repeated || subscriber == "1234567890" || subscriber == "0987654321" {
        return Err("Please enter a valid phone number".into());
    }
    Ok(())
}

fn check_plate(plate: &str) -> Result<(), String> {
    if plate.is_empty() {
        return Err("Registration number is required".into());
    }
    if !PLATE_RE.is_match(plate) {
        return Err("Invalid format. Use: MH12AB1234".into());
    }
    Ok(())
}

fn check_not_past(raw: &str, today: NaiveDate, label: &str) -> Result<NaiveDate, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(format!("{label} is required"));
    }
    let date = parse_calendar_date(raw).ok_or_else(|| format!("{label} is not a valid date"))?;
    if date < today {
        return Err(format!("{label} cannot be in the past"));
    }
    Ok(date)
}

fn check_validity_window(testing: NaiveDate, expiring: NaiveDate) -> Result<(), String> {
    if expiring <= testing {
        return Err("Expiring date must be after testing date".into());
    }
    let latest = testing
        .checked_add_months(Months::new(MAX_VALIDITY_MONTHS))
        .unwrap_or(testing);
    if expiring > latest {
        return Err("Expiring date seems too far in the future".into());
    }
    Ok(())
}

/// Group phone digits for display: `98765 43210` or `+91 98765 43210`.
pub fn format_phone_display(raw: &str) -> String {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    match digits.len() {
        0 => String::new(),
        1..=5 => digits,
        6..=10 => format!("{} {}", &digits[..5], &digits[5..]),
        11 | 12 if digits.starts_with("91") => {
            let rest = &digits[2..];
            let split = rest.len().min(5);
            format!("+91 {} {}", &rest[..split], &rest[split..])
        }
        _ => raw.to_string(),
    }
}
