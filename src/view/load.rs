// src/view/load.rs

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::domain::dates::effective_expiry;
use crate::domain::{derive_urgency, Registration, Urgency};
use crate::errors::StoreError;
use crate::store::{OrderBy, RegistrationStore, FIELD_EXPIRING_DATE, FIELD_SUBMITTED_AT};

/// A record plus the fields derived from it at load time.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedRegistration {
    pub record: Registration,
    pub urgency: Urgency,
}

/// How the store ordered the fetch before the local sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortMethod {
    StoreExpiry,
    StoreSubmitted,
    ClientSide,
}

impl SortMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            SortMethod::StoreExpiry => "store-expiringDate",
            SortMethod::StoreSubmitted => "store-submittedAt",
            SortMethod::ClientSide => "client-side",
        }
    }
}

/// The sorted, annotated, in-memory copy of a collection.
///
/// Snapshots are immutable; a refresh builds a new one.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkingSet {
    pub records: Vec<AnnotatedRegistration>,
    /// The "today" every urgency in this set was derived against.
    pub loaded_on: NaiveDate,
    pub sort_method: SortMethod,
}

impl WorkingSet {
    pub fn empty(today: NaiveDate) -> Self {
        Self {
            records: Vec::new(),
            loaded_on: today,
            sort_method: SortMethod::ClientSide,
        }
    }

    /// Sort and annotate raw records.
    pub fn build(mut records: Vec<Registration>, today: NaiveDate, sort_method: SortMethod) -> Self {
        sort_by_expiry(&mut records);
        Self {
            records: annotate(records, today),
            loaded_on: today,
            sort_method,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Stable sort, soonest expiry first. Missing or bad dates sort last.
pub fn sort_by_expiry(records: &mut [Registration]) {
    records.sort_by_key(|r| effective_expiry(r.expiring_date.as_deref()));
}

pub fn annotate(records: Vec<Registration>, today: NaiveDate) -> Vec<AnnotatedRegistration> {
    records
        .into_iter()
        .map(|record| {
            let urgency = derive_urgency(record.expiring_date.as_deref(), today);
            AnnotatedRegistration { record, urgency }
        })
        .collect()
}

/// Fetch a collection and build its working set.
///
/// Asks the store for expiry order first, then submission order, then no
/// order at all. Only `OrderingUnsupported` moves to the next step. The local
/// stable sort always runs, since the store compares raw text and knows
/// nothing of the far-future policy for bad dates.
pub fn load_working_set(
    store: &dyn RegistrationStore,
    collection: &str,
    today: NaiveDate,
) -> Result<WorkingSet, StoreError> {
    let attempts = [
        (Some(OrderBy::asc(FIELD_EXPIRING_DATE)), SortMethod::StoreExpiry),
        (Some(OrderBy::desc(FIELD_SUBMITTED_AT)), SortMethod::StoreSubmitted),
        (None, SortMethod::ClientSide),
    ];

    for (order, method) in attempts {
        match store.fetch_all(collection, order.as_ref()) {
            Ok(records) => {
                let set = WorkingSet::build(records, today, method);
                info!(
                    collection,
                    count = set.len(),
                    sort_method = method.as_str(),
                    "loaded registrations"
                );
                return Ok(set);
            }
            Err(StoreError::OrderingUnsupported { field }) => {
                warn!(collection, field = %field, "store ordering failed, falling back");
            }
            Err(other) => return Err(other),
        }
    }

    // The unordered attempt never reports OrderingUnsupported.
    Err(StoreError::Query(format!(
        "no ordering strategy succeeded for '{collection}'"
    )))
}
