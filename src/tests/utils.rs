use crate::auth::DemoCredentials;
use crate::db::connection::{init_db, Database};
use crate::domain::Registration;
use crate::router::{handle, AppState};
use crate::store::{RegistrationStore, SqliteDocumentStore};
use crate::view::RegistrationEngine;
use astra::{Body, Response};
use chrono::{Days, Local, NaiveDate};
use http::{Method, Request};
use std::io::Read;
use std::sync::Arc;
use tempfile::TempDir;

pub const COLLECTION: &str = "vehicleRegistrations";
pub const DEMO_EMAIL: &str = "abc@gmail.com";
pub const DEMO_PASSWORD: &str = "password";

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// `YYYY-MM-DD` for `today` shifted by `offset` days.
pub fn day(offset: i64) -> String {
    let d = if offset >= 0 {
        today().checked_add_days(Days::new(offset as u64))
    } else {
        today().checked_sub_days(Days::new(offset.unsigned_abs()))
    };
    d.unwrap().format("%Y-%m-%d").to_string()
}

/// A server state over a fresh SQLite file, removed on drop.
pub struct TestApp {
    _dir: TempDir,
    pub store: SqliteDocumentStore,
    pub state: AppState,
}

/// Initialize a fresh test DB using the production schema
pub fn test_app() -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::new(dir.path().join("test.sqlite3"));
    init_db(&db, "sql/schema.sql")
        .unwrap_or_else(|e| panic!("Database initialization failed: {e}"));

    let store = SqliteDocumentStore::new(db.clone());
    let engine = Arc::new(RegistrationEngine::new(
        Arc::new(store.clone()),
        COLLECTION,
        today(),
    ));

    TestApp {
        _dir: dir,
        store,
        state: AppState {
            db,
            engine,
            credentials: DemoCredentials {
                email: DEMO_EMAIL.into(),
                password: DEMO_PASSWORD.into(),
            },
            session_ttl_secs: 3600,
        },
    }
}

impl TestApp {
    /// Insert records straight into the store and reload the engine.
    pub fn seed(&self, records: &[Registration]) {
        for r in records {
            self.store.insert(COLLECTION, r).unwrap();
        }
        self.state.engine.refresh(today()).unwrap();
    }

    pub fn get(&self, uri: &str, cookie: Option<&str>) -> Response {
        self.send(Method::GET, uri, cookie, Body::empty())
    }

    pub fn post_form(&self, uri: &str, form: &str, cookie: Option<&str>) -> Response {
        self.send(Method::POST, uri, cookie, Body::from(form.as_bytes().to_vec()))
    }

    fn send(&self, method: Method, uri: &str, cookie: Option<&str>, body: Body) -> Response {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("Content-Type", "application/x-www-form-urlencoded");
        if let Some(c) = cookie {
            builder = builder.header("Cookie", c);
        }
        handle(builder.body(body).unwrap(), &self.state)
            .unwrap_or_else(crate::responses::error_to_response)
    }

    /// Sign in as the demo user and return the `Cookie` header value.
    pub fn login(&self) -> String {
        let resp = self.post_form(
            "/login",
            &format!("email={DEMO_EMAIL}&password={DEMO_PASSWORD}"),
            None,
        );
        assert_eq!(resp.status(), 302, "login failed");
        let set_cookie = resp
            .headers()
            .get("Set-Cookie")
            .and_then(|v| v.to_str().ok())
            .expect("login sets a cookie");
        set_cookie.split(';').next().unwrap().to_string()
    }
}

pub fn location(resp: &Response) -> &str {
    resp.headers()
        .get("Location")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
}

pub fn body_string(resp: Response) -> String {
    let mut body = String::new();
    resp.into_body().reader().read_to_string(&mut body).unwrap();
    body
}

pub fn registration(owner: &str, plate: &str, expiry: Option<String>) -> Registration {
    Registration {
        owner_name: Some(owner.into()),
        registration_number: Some(plate.into()),
        vehicle_type: Some("4-wheeler".into()),
        expiring_date: expiry,
        ..Default::default()
    }
}
