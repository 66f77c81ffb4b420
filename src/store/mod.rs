//! Document store collaborator.
//!
//! The view engine only needs two capabilities from persistence: fetch a
//! whole collection (optionally ordered by one field) and insert a record.

pub mod sqlite;

#[cfg(test)]
pub mod scripted;

use crate::domain::{RecordId, Registration};
use crate::errors::StoreError;

pub use sqlite::SqliteDocumentStore;

/// Wire field names the loader orders by.
pub const FIELD_EXPIRING_DATE: &str = "expiringDate";
pub const FIELD_SUBMITTED_AT: &str = "submittedAt";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    pub fn as_sql(self) -> &'static str {
        match self {
            Direction::Asc => "asc",
            Direction::Desc => "desc",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub field: String,
    pub direction: Direction,
}

impl OrderBy {
    pub fn asc(field: &str) -> Self {
        Self {
            field: field.to_string(),
            direction: Direction::Asc,
        }
    }

    pub fn desc(field: &str) -> Self {
        Self {
            field: field.to_string(),
            direction: Direction::Desc,
        }
    }
}

pub trait RegistrationStore: Send + Sync {
    /// Every record in `collection`, in store order.
    ///
    /// Fails with `OrderingUnsupported` when the store cannot apply `order_by`.
    fn fetch_all(
        &self,
        collection: &str,
        order_by: Option<&OrderBy>,
    ) -> Result<Vec<Registration>, StoreError>;

    /// Store a new record and return its assigned id. `record.id` is ignored.
    fn insert(&self, collection: &str, record: &Registration) -> Result<RecordId, StoreError>;
}
