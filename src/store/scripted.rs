//! In-memory store with scriptable failures, for engine and loader tests.

use std::sync::Mutex;

use crate::domain::{RecordId, Registration};
use crate::errors::StoreError;
use crate::store::{OrderBy, RegistrationStore};

#[derive(Default)]
pub struct ScriptedStore {
    records: Mutex<Vec<Registration>>,
    unindexed: Vec<String>,
    failure: Mutex<Option<StoreError>>,
    calls: Mutex<Vec<Option<String>>>,
}

impl ScriptedStore {
    pub fn new(records: Vec<Registration>) -> Self {
        Self {
            records: Mutex::new(records),
            ..Default::default()
        }
    }

    /// Reject ordering by `field` like a store missing the index.
    pub fn without_index(mut self, field: &str) -> Self {
        self.unindexed.push(field.to_string());
        self
    }

    pub fn failing_with(self, err: StoreError) -> Self {
        self.set_failure(Some(err));
        self
    }

    pub fn set_failure(&self, err: Option<StoreError>) {
        *self.failure.lock().unwrap() = err;
    }

    pub fn set_records(&self, records: Vec<Registration>) {
        *self.records.lock().unwrap() = records;
    }

    /// Order requested by each fetch, as `"field dir"`.
    pub fn calls(&self) -> Vec<Option<String>> {
        self.calls.lock().unwrap().clone()
    }
}

impl RegistrationStore for ScriptedStore {
    fn fetch_all(
        &self,
        _collection: &str,
        order_by: Option<&OrderBy>,
    ) -> Result<Vec<Registration>, StoreError> {
        self.calls
            .lock()
            .unwrap()
            .push(order_by.map(|o| format!("{} {}", o.field, o.direction.as_sql())));

        if let Some(err) = self.failure.lock().unwrap().clone() {
            return Err(err);
        }
        if let Some(order) = order_by {
            if self.unindexed.contains(&order.field) {
                return Err(StoreError::OrderingUnsupported {
                    field: order.field.clone(),
                });
            }
        }
        Ok(self.records.lock().unwrap().clone())
    }

    fn insert(&self, _collection: &str, record: &Registration) -> Result<RecordId, StoreError> {
        if let Some(err) = self.failure.lock().unwrap().clone() {
            return Err(err);
        }
        let mut records = self.records.lock().unwrap();
        let id = format!("doc-{}", records.len() + 1);
        let mut stored = record.clone();
        stored.id = id.clone();
        records.push(stored);
        Ok(id)
    }
}
