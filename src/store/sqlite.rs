// src/store/sqlite.rs
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, warn};

use crate::auth::token::generate_token_os;
use crate::db::Database;
use crate::domain::{RecordId, Registration};
use crate::errors::StoreError;
use crate::store::{OrderBy, RegistrationStore};

/// Bytes of randomness per document id (20 URL-safe characters).
const DOCUMENT_ID_BYTES: usize = 15;

/// Document store over SQLite.
///
/// Behaves like a hosted document database: ordering needs a declared index
/// and collections can carry read/write access rules.
#[derive(Debug, Clone)]
pub struct SqliteDocumentStore {
    db: Database,
}

#[derive(Clone, Copy)]
enum Access {
    Read,
    Write,
}

impl SqliteDocumentStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Allow ordering `collection` by `field`.
    pub fn ensure_index(&self, collection: &str, field: &str) -> Result<(), StoreError> {
        self.db.with_conn(|conn| {
            conn.execute(
                "insert or ignore into document_indexes (collection, field) values (?, ?)",
                params![collection, field],
            )?;
            Ok(())
        })
    }

    #[cfg(test)]
    pub fn drop_index(&self, collection: &str, field: &str) -> Result<(), StoreError> {
        self.db.with_conn(|conn| {
            conn.execute(
                "delete from document_indexes where collection = ? and field = ?",
                params![collection, field],
            )?;
            Ok(())
        })
    }

    pub fn set_rule(
        &self,
        collection: &str,
        allow_read: bool,
        allow_write: bool,
    ) -> Result<(), StoreError> {
        self.db.with_conn(|conn| {
            conn.execute(
                r#"
                insert into collection_rules (collection, allow_read, allow_write)
                values (?1, ?2, ?3)
                on conflict(collection) do update set
                    allow_read = excluded.allow_read,
                    allow_write = excluded.allow_write
                "#,
                params![collection, allow_read, allow_write],
            )?;
            Ok(())
        })
    }
}

fn check_access(conn: &Connection, collection: &str, access: Access) -> Result<(), StoreError> {
    let column = match access {
        Access::Read => "allow_read",
        Access::Write => "allow_write",
    };
    let allowed: Option<bool> = conn
        .query_row(
            &format!("select {column} from collection_rules where collection = ?"),
            params![collection],
            |r| r.get(0),
        )
        .optional()?;

    match allowed {
        Some(false) => Err(StoreError::PermissionDenied {
            collection: collection.to_string(),
        }),
        _ => Ok(()),
    }
}

fn has_index(conn: &Connection, collection: &str, field: &str) -> Result<bool, StoreError> {
    let found: Option<i64> = conn
        .query_row(
            "select 1 from document_indexes where collection = ? and field = ?",
            params![collection, field],
            |r| r.get(0),
        )
        .optional()?;
    Ok(found.is_some())
}

fn decode_rows(rows: Vec<(String, String)>, collection: &str) -> Vec<Registration> {
    rows.into_iter()
        .filter_map(|(id, body)| match Registration::from_document(&id, &body) {
            Ok(reg) => Some(reg),
            Err(e) => {
                warn!(collection, id = %id, error = %e, "skipping undecodable document");
                None
            }
        })
        .collect()
}

impl RegistrationStore for SqliteDocumentStore {
    fn fetch_all(
        &self,
        collection: &str,
        order_by: Option<&OrderBy>,
    ) -> Result<Vec<Registration>, StoreError> {
        self.db.with_conn(|conn| {
            check_access(conn, collection, Access::Read)?;

            let rows: Vec<(String, String)> = match order_by {
                None => {
                    let mut stmt = conn.prepare(
                        "select id, body from documents where collection = ? order by rowid",
                    )?;
                    let rows = stmt
                        .query_map(params![collection], |r| Ok((r.get(0)?, r.get(1)?)))?
                        .collect::<Result<_, _>>()?;
                    rows
                }
                Some(order) => {
                    if !has_index(conn, collection, &order.field)? {
                        return Err(StoreError::OrderingUnsupported {
                            field: order.field.clone(),
                        });
                    }
                    // Documents without the field go last, in insertion order.
                    let sql = format!(
                        r#"
                        select id, body from documents
                        where collection = ?1
                        order by json_extract(body, ?2) is null,
                                 json_extract(body, ?2) {},
                                 rowid
                        "#,
                        order.direction.as_sql()
                    );
                    let path = format!("$.{}", order.field);
                    let mut stmt = conn.prepare(&sql)?;
                    let rows = stmt
                        .query_map(params![collection, path], |r| Ok((r.get(0)?, r.get(1)?)))?
                        .collect::<Result<_, _>>()?;
                    rows
                }
            };

            debug!(collection, count = rows.len(), ?order_by, "fetched documents");
            Ok(decode_rows(rows, collection))
        })
    }

    fn insert(&self, collection: &str, record: &Registration) -> Result<RecordId, StoreError> {
        let body = record
            .to_document()
            .map_err(|e| StoreError::Write(format!("encode document failed: {e}")))?;
        let id = generate_token_os(DOCUMENT_ID_BYTES);
        let now = Utc::now().timestamp();

        self.db.with_conn(|conn| -> Result<(), StoreError> {
            check_access(conn, collection, Access::Write)?;
            conn.execute(
                "insert into documents (collection, id, body, created_at) values (?, ?, ?, ?)",
                params![collection, id, body, now],
            )
            .map_err(|e| StoreError::Write(format!("insert document failed: {e}")))?;
            Ok(())
        })?;

        debug!(collection, id = %id, "inserted document");
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_db;
    use tempfile::TempDir;

    const COLL: &str = "vehicleRegistrations";

    fn store() -> (TempDir, SqliteDocumentStore) {
        let dir = TempDir::new().unwrap();
        let db = Database::new(dir.path().join("store.sqlite"));
        init_db(&db, "sql/schema.sql").unwrap();
        (dir, SqliteDocumentStore::new(db))
    }

    fn reg(owner: &str, expiry: Option<&str>) -> Registration {
        Registration {
            owner_name: Some(owner.into()),
            expiring_date: expiry.map(str::to_string),
            ..Default::default()
        }
    }

    fn owners(regs: &[Registration]) -> Vec<&str> {
        regs.iter().filter_map(|r| r.owner_name.as_deref()).collect()
    }

    #[test]
    fn insert_assigns_unique_ids_and_strips_them_from_bodies() {
        let (_dir, store) = store();
        let a = store.insert(COLL, &reg("A", None)).unwrap();
        let b = store.insert(COLL, &reg("B", None)).unwrap();
        assert_ne!(a, b);
        assert_eq!(a.len(), 20);

        let all = store.fetch_all(COLL, None).unwrap();
        assert_eq!(owners(&all), ["A", "B"]);
        assert_eq!(all[0].id, a);
        assert!(!all[0].extra.contains_key("id"));
    }

    #[test]
    fn indexed_ordering_puts_missing_fields_last() {
        let (_dir, store) = store();
        store.insert(COLL, &reg("A", Some("2025-01-05"))).unwrap();
        store.insert(COLL, &reg("C", None)).unwrap();
        store.insert(COLL, &reg("B", Some("2025-01-01"))).unwrap();

        let sorted = store
            .fetch_all(COLL, Some(&OrderBy::asc("expiringDate")))
            .unwrap();
        assert_eq!(owners(&sorted), ["B", "A", "C"]);
    }

    #[test]
    fn ordering_without_index_is_unsupported() {
        let (_dir, store) = store();
        store.drop_index(COLL, "expiringDate").unwrap();
        let err = store
            .fetch_all(COLL, Some(&OrderBy::asc("expiringDate")))
            .unwrap_err();
        assert_eq!(
            err,
            StoreError::OrderingUnsupported {
                field: "expiringDate".into()
            }
        );

        let err = store
            .fetch_all(COLL, Some(&OrderBy::desc("ownerName")))
            .unwrap_err();
        assert!(matches!(err, StoreError::OrderingUnsupported { .. }));
    }

    #[test]
    fn access_rules_deny_reads_and_writes() {
        let (_dir, store) = store();
        store.set_rule(COLL, false, true).unwrap();
        assert!(store.fetch_all(COLL, None).unwrap_err().is_permission_denied());
        store.insert(COLL, &reg("A", None)).unwrap();

        store.set_rule(COLL, true, false).unwrap();
        assert!(store
            .insert(COLL, &reg("B", None))
            .unwrap_err()
            .is_permission_denied());
        assert_eq!(store.fetch_all(COLL, None).unwrap().len(), 1);
    }

    #[test]
    fn collections_are_isolated() {
        let (_dir, store) = store();
        store.insert(COLL, &reg("A", None)).unwrap();
        store.insert("archive", &reg("Z", None)).unwrap();
        assert_eq!(owners(&store.fetch_all(COLL, None).unwrap()), ["A"]);
    }
}
