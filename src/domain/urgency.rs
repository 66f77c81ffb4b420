// src/domain/urgency.rs

use chrono::NaiveDate;

use crate::domain::dates::{days_between, parse_calendar_date};

/// Days-left thresholds, inclusive upper bounds.
pub const CRITICAL_DAYS: i64 = 7;
pub const WARNING_DAYS: i64 = 30;

/// How close a registration is to lapsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UrgencyLevel {
    Expired,
    Critical,
    Warning,
    Normal,
    Unknown,
}

impl UrgencyLevel {
    /// Bucket a signed day count.
    pub fn from_days(days: i64) -> Self {
        if days < 0 {
            UrgencyLevel::Expired
        } else if days <= CRITICAL_DAYS {
            UrgencyLevel::Critical
        } else if days <= WARNING_DAYS {
            UrgencyLevel::Warning
        } else {
            UrgencyLevel::Normal
        }
    }

    /// CSS class suffix and wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            UrgencyLevel::Expired => "expired",
            UrgencyLevel::Critical => "critical",
            UrgencyLevel::Warning => "warning",
            UrgencyLevel::Normal => "normal",
            UrgencyLevel::Unknown => "unknown",
        }
    }
}

/// Fields derived from the expiry date. Recomputed on every load, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Urgency {
    pub level: UrgencyLevel,
    pub days_until_expiry: Option<i64>,
}

/// Classify an expiry date relative to `today`.
///
/// Missing and unparseable dates are both `Unknown` with no day count.
pub fn derive_urgency(expiring_date: Option<&str>, today: NaiveDate) -> Urgency {
    match expiring_date.and_then(parse_calendar_date) {
        Some(expiry) => {
            let days = days_between(today, expiry);
            Urgency {
                level: UrgencyLevel::from_days(days),
                days_until_expiry: Some(days),
            }
        }
        None => Urgency {
            level: UrgencyLevel::Unknown,
            days_until_expiry: None,
        },
    }
}

/// Human countdown text for the expiry column.
pub fn countdown(expiring_date: Option<&str>, today: NaiveDate) -> String {
    let raw = match expiring_date {
        Some(s) if !s.trim().is_empty() => s,
        _ => return "N/A".to_string(),
    };

    let Some(expiry) = parse_calendar_date(raw) else {
        return "Invalid date".to_string();
    };

    match days_between(today, expiry) {
        d if d < 0 => format!("Expired {} days ago", d.unsigned_abs()),
        0 => "Expires today".to_string(),
        1 => "Expires tomorrow".to_string(),
        d => format!("{d} days left"),
    }
}
