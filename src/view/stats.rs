// src/view/stats.rs

use std::cmp::Reverse;

use chrono::{Datelike, NaiveDateTime};

use crate::domain::dates::parse_timestamp;
use crate::domain::registration::DEFAULT_STATUS;
use crate::domain::urgency::WARNING_DAYS;
use crate::view::load::{AnnotatedRegistration, WorkingSet};

pub const RECENT_LIMIT: usize = 5;

/// Counters and the recent-activity list for the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardStats<'a> {
    pub total: usize,
    pub pending: usize,
    pub this_month: usize,
    pub expiring_soon: usize,
    pub expired: usize,
    pub recent: Vec<&'a AnnotatedRegistration>,
}

fn submitted(reg: &AnnotatedRegistration) -> Option<NaiveDateTime> {
    reg.record.submitted_or_created().and_then(parse_timestamp)
}

pub fn dashboard_stats(set: &WorkingSet, now: NaiveDateTime) -> DashboardStats<'_> {
    let mut stats = DashboardStats {
        total: set.len(),
        pending: 0,
        this_month: 0,
        expiring_soon: 0,
        expired: 0,
        recent: Vec::new(),
    };

    for reg in &set.records {
        if reg.record.status() == DEFAULT_STATUS {
            stats.pending += 1;
        }
        if let Some(at) = submitted(reg) {
            if at.year() == now.year() && at.month() == now.month() {
                stats.this_month += 1;
            }
        }
        match reg.urgency.days_until_expiry {
            Some(d) if d < 0 => stats.expired += 1,
            Some(d) if d <= WARNING_DAYS => stats.expiring_soon += 1,
            _ => {}
        }
    }

    let mut recent: Vec<&AnnotatedRegistration> = set.records.iter().collect();
    // Undated submissions rank last, as if stamped at the epoch.
    recent.sort_by_key(|r| Reverse(submitted(r)));
    recent.truncate(RECENT_LIMIT);
    stats.recent = recent;

    stats
}

/// "Just now", "5 minutes ago", "3 days ago", or a plain date past 30 days.
pub fn time_ago(then: NaiveDateTime, now: NaiveDateTime) -> String {
    let secs = now.signed_duration_since(then).num_seconds();
    let plural = |n: i64, unit: &str| {
        if n == 1 {
            format!("1 {unit} ago")
        } else {
            format!("{n} {unit}s ago")
        }
    };

    match secs {
        s if s < 60 => "Just now".to_string(),
        s if s < 3_600 => plural(s / 60, "minute"),
        s if s < 86_400 => plural(s / 3_600, "hour"),
        s if s < 2_592_000 => plural(s / 86_400, "day"),
        _ => then.format("%d %b %Y").to_string(),
    }
}
