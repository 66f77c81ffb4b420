use crate::tests::utils::{body_string, location, test_app};

#[test]
fn login_page_loads_successfully() {
    let app = test_app();
    let resp = app.get("/login", None);
    assert_eq!(resp.status(), 200);

    let body = body_string(resp);
    assert!(body.contains("Sign in"));
    assert!(body.contains("form"));
}

#[test]
fn protected_pages_redirect_to_login() {
    let app = test_app();
    for uri in [
        "/",
        "/dashboard",
        "/register",
        "/registrations",
        "/registrations/export.csv",
    ] {
        let resp = app.get(uri, None);
        assert_eq!(resp.status(), 302, "{uri}");
        assert_eq!(location(&resp), "/login", "{uri}");
    }
}

#[test]
fn unknown_cookie_is_not_a_session() {
    let app = test_app();
    let resp = app.get("/dashboard", Some("session=forged"));
    assert_eq!(resp.status(), 302);
    assert_eq!(location(&resp), "/login");
}

#[test]
fn wrong_password_rerenders_with_401() {
    let app = test_app();
    let resp = app.post_form("/login", "email=abc%40gmail.com&password=nope", None);
    assert_eq!(resp.status(), 401);
    assert!(resp.headers().get("Set-Cookie").is_none());
    assert!(body_string(resp).contains("Invalid email or password"));
}

#[test]
fn blank_login_is_a_bad_request() {
    let app = test_app();
    let resp = app.post_form("/login", "email=&password=", None);
    assert_eq!(resp.status(), 400);
}

#[test]
fn login_sets_http_only_cookie_and_opens_dashboard() {
    let app = test_app();
    let resp = app.post_form("/login", "email=abc%40gmail.com&password=password", None);
    assert_eq!(resp.status(), 302);
    assert_eq!(location(&resp), "/dashboard");
    let set_cookie = resp.headers().get("Set-Cookie").unwrap().to_str().unwrap();
    assert!(set_cookie.starts_with("session="));
    assert!(set_cookie.contains("HttpOnly"));

    let cookie = app.login();
    let resp = app.get("/dashboard", Some(&cookie));
    assert_eq!(resp.status(), 200);
    assert!(body_string(resp).contains("abc@gmail.com"));

    let resp = app.get("/", Some(&cookie));
    assert_eq!(location(&resp), "/dashboard");
    let resp = app.get("/login", Some(&cookie));
    assert_eq!(location(&resp), "/dashboard");
}

#[test]
fn only_the_token_hash_is_stored() {
    let app = test_app();
    let cookie = app.login();
    let raw = cookie.trim_start_matches("session=").to_string();

    let stored: Vec<u8> = app
        .state
        .db
        .with_conn(|conn| conn.query_row("select token_hash from sessions", [], |r| r.get(0)))
        .unwrap();
    assert_eq!(stored.len(), 32);
    assert_ne!(stored, raw.as_bytes());
}

#[test]
fn logout_revokes_the_session() {
    let app = test_app();
    let cookie = app.login();

    let resp = app.post_form("/logout", "", Some(&cookie));
    assert_eq!(resp.status(), 302);
    assert_eq!(location(&resp), "/login");
    let cleared = resp.headers().get("Set-Cookie").unwrap().to_str().unwrap();
    assert!(cleared.contains("Max-Age=0"));

    let resp = app.get("/dashboard", Some(&cookie));
    assert_eq!(location(&resp), "/login");
}

#[test]
fn unknown_route_is_404_when_signed_in() {
    let app = test_app();
    let cookie = app.login();
    assert_eq!(app.get("/nope", Some(&cookie)).status(), 404);
}
