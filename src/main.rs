use crate::auth::DemoCredentials;
use crate::config::AppConfig;
use crate::db::connection::{init_db, Database};
use crate::router::{handle, AppState};
use crate::store::{SqliteDocumentStore, FIELD_EXPIRING_DATE, FIELD_SUBMITTED_AT};
use crate::telemetry::{init_logging, LogConfig};
use crate::view::{spawn_auto_refresh, RegistrationEngine};
use astra::Server;
use chrono::Local;
use std::sync::Arc;
use tracing::{error, info, warn};

mod auth;
mod config;
mod db;
mod domain;
mod errors;
mod responses;
mod router;
mod spreadsheets;
mod store;
mod telemetry;
mod templates;
mod view;

#[cfg(test)]
mod tests;

fn main() {
    init_logging(&LogConfig::from_env());
    let cfg = AppConfig::from_env();

    let db = Database::new(&cfg.db_path);
    if let Err(e) = init_db(&db, &cfg.schema_path) {
        error!(error = %e, "database initialization failed");
        std::process::exit(1);
    }

    let store = SqliteDocumentStore::new(db.clone());
    for field in [FIELD_EXPIRING_DATE, FIELD_SUBMITTED_AT] {
        if let Err(e) = store.ensure_index(&cfg.collection, field) {
            warn!(field, error = %e, "could not register ordering index");
        }
    }

    let engine = Arc::new(RegistrationEngine::new(
        Arc::new(store),
        cfg.collection.clone(),
        Local::now().date_naive(),
    ));
    // Serve with an empty set and the error banner if the first load fails.
    if let Err(e) = engine.refresh(Local::now().date_naive()) {
        error!(error = %e, "initial load failed");
    }
    if let Some(interval) = cfg.refresh_interval {
        spawn_auto_refresh(Arc::clone(&engine), interval);
        info!(secs = interval.as_secs(), "auto refresh enabled");
    }

    let state = AppState {
        db,
        engine,
        credentials: DemoCredentials {
            email: cfg.demo_email.clone(),
            password: cfg.demo_password.clone(),
        },
        session_ttl_secs: cfg.session_ttl_secs,
    };

    info!(addr = %cfg.bind_addr, workers = cfg.max_workers, "starting server");
    let server = Server::bind(&cfg.bind_addr).max_workers(cfg.max_workers);

    let result = server.serve(move |req, _info| match handle(req, &state) {
        Ok(resp) => resp,
        Err(err) => responses::error_to_response(err),
    });

    if let Err(e) = result {
        error!(error = %e, "server ended with error");
    }

    info!("server shut down");
}
