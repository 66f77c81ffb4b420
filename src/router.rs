use std::io::Read;
use std::sync::Arc;

use astra::Request;
use chrono::{DateTime, Local, NaiveDate, Utc};
use tracing::{debug, info, warn};

use crate::auth::{self, DemoCredentials};
use crate::db::{sessions, Database};
use crate::domain::validation::{validate_submission, RegistrationForm};
use crate::errors::{ExportError, ServerError, ValidationErrors};
use crate::responses::{
    csv_response, html_response, html_response_with_status, redirect, redirect_with_cookie,
    xlsx_response, ResultResp,
};
use crate::spreadsheets::{export_filename, registrations_csv, registrations_workbook};
use crate::templates::pages::{
    dashboard_page, login_page, register_page, registrations_page, DashboardVm, RegisterVm,
    RegistrationsVm,
};
use crate::templates::{Notice, NoticeKind};
use crate::view::{dashboard_stats, CustomFilter, FilterState, RegistrationEngine, ViewState};

/// Largest form body accepted from a browser.
const MAX_FORM_BYTES: u64 = 64 * 1024;

/// Everything a request handler needs, shared by all worker threads.
pub struct AppState {
    pub db: Database,
    pub engine: Arc<RegistrationEngine>,
    pub credentials: DemoCredentials,
    pub session_ttl_secs: i64,
}

pub fn handle(mut req: Request, state: &AppState) -> ResultResp {
    let method = req.method().as_str().to_string();
    let path = req.uri().path().to_string();
    let now = Utc::now();
    let today = Local::now().date_naive();
    debug!(%method, %path, "request");

    let user = auth::current_user(&req, &state.db, now.timestamp())?;

    match (method.as_str(), path.as_str(), user) {
        ("GET", "/login", Some(_)) => redirect("/dashboard"),
        ("GET", "/login", None) => html_response(login_page(None, "")),
        ("POST", "/login", _) => login(&mut req, state, now),

        (_, _, None) => redirect("/login"),

        ("GET", "/", Some(_)) => redirect("/dashboard"),
        ("POST", "/logout", Some(_)) => logout(&req, state, now),
        ("GET", "/dashboard", Some(user)) => dashboard(state, &user, now, today),
        ("GET", "/register", Some(user)) => html_response(register_page(&RegisterVm {
            user: &user,
            form: &RegistrationForm::default(),
            errors: &ValidationErrors::default(),
            today,
        })),
        ("POST", "/register", Some(user)) => register(&mut req, state, &user, now, today),
        ("GET", "/registrations", Some(user)) => list(&req, state, &user, today, None),
        ("POST", "/registrations/refresh", Some(_)) => refresh(&req, state, today),
        ("GET", "/registrations/export.csv", Some(user)) => export(&req, state, &user, today, Export::Csv),
        ("GET", "/registrations/export.xlsx", Some(user)) => export(&req, state, &user, today, Export::Xlsx),

        _ => Err(ServerError::NotFound),
    }
}

fn query_pairs(req: &Request) -> Vec<(String, String)> {
    req.uri()
        .query()
        .map(|q| url::form_urlencoded::parse(q.as_bytes()).into_owned().collect())
        .unwrap_or_default()
}

fn form_pairs(req: &mut Request) -> Result<Vec<(String, String)>, ServerError> {
    let mut body = Vec::new();
    req.body_mut()
        .reader()
        .take(MAX_FORM_BYTES)
        .read_to_end(&mut body)
        .map_err(|e| ServerError::BadRequest(format!("Failed to read form: {e}")))?;
    Ok(url::form_urlencoded::parse(&body).into_owned().collect())
}

fn param<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

fn login(req: &mut Request, state: &AppState, now: DateTime<Utc>) -> ResultResp {
    let pairs = form_pairs(req)?;
    let email = param(&pairs, "email").unwrap_or("");
    let password = param(&pairs, "password").unwrap_or("");

    match auth::authenticate(&state.credentials, email, password) {
        Ok(email) => {
            let token = state.db.with_conn(|conn| {
                sessions::create_session(conn, &email, now.timestamp(), state.session_ttl_secs)
            })?;
            info!(%email, "signed in");
            redirect_with_cookie(
                "/dashboard",
                &auth::session_cookie(&token, state.session_ttl_secs),
            )
        }
        Err(ServerError::BadRequest(msg)) => {
            html_response_with_status(400, login_page(Some(&msg), email))
        }
        Err(ServerError::Unauthorized(msg)) => {
            warn!(email = %email.trim(), "failed sign-in");
            html_response_with_status(401, login_page(Some(&msg), email))
        }
        Err(other) => Err(other),
    }
}

fn logout(req: &Request, state: &AppState, now: DateTime<Utc>) -> ResultResp {
    if let Some(token) = auth::session_token(req) {
        state
            .db
            .with_conn(|conn| sessions::revoke_session(conn, &token, now.timestamp()))?;
    }
    redirect_with_cookie("/login", &auth::cleared_session_cookie())
}

fn dashboard(state: &AppState, user: &str, now: DateTime<Utc>, today: NaiveDate) -> ResultResp {
    state.engine.refresh_if_stale(today);
    let snapshot = state.engine.snapshot();
    let vm = DashboardVm {
        email: user,
        stats: dashboard_stats(&snapshot, now.naive_utc()),
        now: now.naive_utc(),
    };
    html_response(dashboard_page(&vm))
}

fn register(
    req: &mut Request,
    state: &AppState,
    user: &str,
    now: DateTime<Utc>,
    today: NaiveDate,
) -> ResultResp {
    let form = RegistrationForm::from_pairs(form_pairs(req)?);

    let record = match validate_submission(&form, today, now, user) {
        Ok(record) => record,
        Err(errors) => {
            debug!(count = errors.0.len(), "registration rejected");
            return html_response_with_status(
                422,
                register_page(&RegisterVm {
                    user,
                    form: &form,
                    errors: &errors,
                    today,
                }),
            );
        }
    };

    state.engine.insert(&record)?;
    if let Err(e) = state.engine.refresh(today) {
        warn!(error = %e, "refresh after submit failed");
    }
    redirect("/registrations?submitted=1")
}

/// Filters and the one-shot custom filter carried by a list URL.
fn view_state(pairs: &[(String, String)]) -> ViewState {
    ViewState {
        filters: FilterState::from_pairs(pairs.iter().map(|(k, v)| (k.as_str(), v.clone()))),
        custom: param(pairs, "view").and_then(CustomFilter::parse),
    }
}

fn list(
    req: &Request,
    state: &AppState,
    user: &str,
    today: NaiveDate,
    notice: Option<Notice>,
) -> ResultResp {
    let pairs = query_pairs(req);
    let mut view_state = view_state(&pairs);

    let notice = notice.or_else(|| {
        if param(&pairs, "submitted").is_some() {
            Some(Notice::new(NoticeKind::Success, "Registration submitted successfully"))
        } else if param(&pairs, "refreshed").is_some() {
            Some(Notice::new(NoticeKind::Info, "Data refreshed"))
        } else {
            None
        }
    });

    state.engine.refresh_if_stale(today);
    let snapshot = state.engine.snapshot();
    let custom = view_state.custom;
    if let Some(custom) = custom {
        debug!(view = custom.as_str(), "one-shot view filter");
    }
    let (view, notice) = if param(&pairs, "clear").is_some() {
        let view = view_state.clear(&snapshot);
        (view, notice.or_else(|| Some(Notice::new(NoticeKind::Info, "Filters cleared"))))
    } else {
        (view_state.apply(&snapshot), notice)
    };

    html_response(registrations_page(&RegistrationsVm {
        user,
        view: &view,
        filters: &view_state.filters,
        custom,
        today,
        notice,
        last_error: state.engine.last_error(),
    }))
}

fn refresh(req: &Request, state: &AppState, today: NaiveDate) -> ResultResp {
    let pairs = query_pairs(req);
    let mut query = view_state(&pairs).filters.to_query_string();

    // A failure is shown from the engine's last error on the next render.
    if state.engine.refresh(today).is_ok() {
        if !query.is_empty() {
            query.push('&');
        }
        query.push_str("refreshed=1");
    }

    if query.is_empty() {
        redirect("/registrations")
    } else {
        redirect(&format!("/registrations?{query}"))
    }
}

#[derive(Clone, Copy)]
enum Export {
    Csv,
    Xlsx,
}

fn export(req: &Request, state: &AppState, user: &str, today: NaiveDate, kind: Export) -> ResultResp {
    let mut view_state = view_state(&query_pairs(req));
    let snapshot = state.engine.snapshot();
    let view = view_state.apply(&snapshot);

    let result = match kind {
        Export::Csv => registrations_csv(&view.rows)
            .map(|csv| csv_response(csv, &export_filename(today, "csv"))),
        Export::Xlsx => registrations_workbook(&view.rows)
            .map(|bytes| xlsx_response(bytes, &export_filename(today, "xlsx"))),
    };

    match result {
        Ok(resp) => {
            info!(rows = view.visible(), "exported registrations");
            resp
        }
        Err(ExportError::Empty) => list(
            req,
            state,
            user,
            today,
            Some(Notice::new(NoticeKind::Warning, ExportError::Empty.to_string())),
        ),
        Err(e) => Err(e.into()),
    }
}
