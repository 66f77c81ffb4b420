// src/view/filters.rs

use crate::domain::dates::parse_calendar_date;
use crate::domain::urgency::WARNING_DAYS;
use crate::view::load::{AnnotatedRegistration, WorkingSet};

/// Named field filters. Empty strings mean "not filtering on this".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    /// Substring over every searchable field.
    pub global: String,
    pub owner_name: String,
    pub reg_number: String,
    /// Exact match.
    pub vehicle_type: String,
    /// Exact match; records without a status count as `pending`.
    pub status: String,
    /// `YYYY-MM-DD`; matches records expiring on that calendar day.
    pub expiring_date: String,
}

/// Query parameter names, in display order.
const QUERY_KEYS: [&str; 6] = ["q", "owner", "reg", "type", "status", "expiring"];

impl FilterState {
    pub fn is_empty(&self) -> bool {
        self.fields().iter().all(|v| v.trim().is_empty())
    }

    fn fields(&self) -> [&String; 6] {
        [
            &self.global,
            &self.owner_name,
            &self.reg_number,
            &self.vehicle_type,
            &self.status,
            &self.expiring_date,
        ]
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut state = Self::default();
        for (k, v) in pairs {
            let slot = match k.as_ref() {
                "q" => &mut state.global,
                "owner" => &mut state.owner_name,
                "reg" => &mut state.reg_number,
                "type" => &mut state.vehicle_type,
                "status" => &mut state.status,
                "expiring" => &mut state.expiring_date,
                _ => continue,
            };
            *slot = v.into();
        }
        state
    }

    /// Non-empty filters as URL query parameters (for export links and redirects).
    pub fn to_query_string(&self) -> String {
        let mut ser = url::form_urlencoded::Serializer::new(String::new());
        for (key, value) in QUERY_KEYS.iter().zip(self.fields()) {
            if !value.trim().is_empty() {
                ser.append_pair(key, value.trim());
            }
        }
        ser.finish()
    }
}

/// One-shot named predicate, applied to a single filter pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomFilter {
    /// Expires within the warning window, today included.
    ExpiringSoon,
    Expired,
}

impl CustomFilter {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "expiring-soon" => Some(CustomFilter::ExpiringSoon),
            "expired" => Some(CustomFilter::Expired),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CustomFilter::ExpiringSoon => "expiring-soon",
            CustomFilter::Expired => "expired",
        }
    }
}

/// Filtered rows, borrowed from the working set in its order.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    pub rows: Vec<&'a AnnotatedRegistration>,
    /// Size of the working set the rows were drawn from.
    pub total: usize,
}

impl FilteredView<'_> {
    pub fn visible(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Lower-cased, trimmed needles, prepared once per pass.
struct Needles<'f> {
    global: String,
    owner_name: String,
    reg_number: String,
    vehicle_type: &'f str,
    status: &'f str,
    expiring_date: &'f str,
}

impl<'f> Needles<'f> {
    fn new(filters: &'f FilterState) -> Self {
        Self {
            global: filters.global.trim().to_lowercase(),
            owner_name: filters.owner_name.trim().to_lowercase(),
            reg_number: filters.reg_number.trim().to_lowercase(),
            vehicle_type: filters.vehicle_type.trim(),
            status: filters.status.trim(),
            expiring_date: filters.expiring_date.trim(),
        }
    }
}

/// Keep the records that pass every active predicate.
///
/// Pure: the working set is untouched and relative order is preserved.
pub fn apply_filters<'a>(
    set: &'a WorkingSet,
    filters: &FilterState,
    custom: Option<CustomFilter>,
) -> FilteredView<'a> {
    let needles = Needles::new(filters);
    let rows = set
        .records
        .iter()
        .filter(|r| passes(r, &needles, custom))
        .collect();
    FilteredView {
        rows,
        total: set.len(),
    }
}

fn passes(r: &AnnotatedRegistration, n: &Needles<'_>, custom: Option<CustomFilter>) -> bool {
    let rec = &r.record;
    let days = r.urgency.days_until_expiry;

    match custom {
        Some(CustomFilter::ExpiringSoon) => {
            if !matches!(days, Some(d) if (0..=WARNING_DAYS).contains(&d)) {
                return false;
            }
        }
        Some(CustomFilter::Expired) => {
            if !matches!(days, Some(d) if d < 0) {
                return false;
            }
        }
        None => {}
    }

    if !n.global.is_empty() && !search_text(rec).contains(&n.global) {
        return false;
    }

    if !n.owner_name.is_empty() && !contains_ci(rec.owner_name.as_deref(), &n.owner_name) {
        return false;
    }

    if !n.reg_number.is_empty()
        && !contains_ci(rec.registration_number.as_deref(), &n.reg_number)
    {
        return false;
    }

    if !n.vehicle_type.is_empty() && rec.vehicle_type.as_deref() != Some(n.vehicle_type) {
        return false;
    }

    if !n.status.is_empty() && rec.status() != n.status {
        return false;
    }

    if !n.expiring_date.is_empty() {
        let normalized = rec
            .expiring_date
            .as_deref()
            .and_then(parse_calendar_date)
            .map(|d| d.format("%Y-%m-%d").to_string());
        if normalized.as_deref() != Some(n.expiring_date) {
            return false;
        }
    }

    true
}

fn contains_ci(haystack: Option<&str>, needle_lower: &str) -> bool {
    haystack
        .map(|h| h.to_lowercase().contains(needle_lower))
        .unwrap_or(false)
}

/// Lower-cased text the global search runs over.
///
/// Passthrough fields (auth tokens in particular) are not searchable.
pub fn search_text(rec: &crate::domain::Registration) -> String {
    [
        Some(rec.id.as_str()),
        rec.owner_name.as_deref(),
        rec.owner_email.as_deref(),
        rec.email.as_deref(),
        rec.owner_phone.as_deref(),
        rec.phone.as_deref(),
        rec.vehicle_type.as_deref(),
        rec.registration_number.as_deref(),
        rec.testing_date.as_deref(),
        rec.expiring_date.as_deref(),
        rec.submitted_at.as_deref(),
    ]
    .iter()
    .map(|f| f.unwrap_or(""))
    .collect::<Vec<_>>()
    .join(" ")
    .to_lowercase()
}

/// Filter settings for one list session.
///
/// `custom` is consumed by the next `apply`, so a dashboard shortcut like
/// "expiring soon" narrows one view and then gets out of the way.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    pub filters: FilterState,
    pub custom: Option<CustomFilter>,
}

impl ViewState {
    pub fn apply<'a>(&mut self, set: &'a WorkingSet) -> FilteredView<'a> {
        let custom = self.custom.take();
        apply_filters(set, &self.filters, custom)
    }

    /// Reset every named filter and re-apply.
    pub fn clear<'a>(&mut self, set: &'a WorkingSet) -> FilteredView<'a> {
        self.filters = FilterState::default();
        self.apply(set)
    }
}
