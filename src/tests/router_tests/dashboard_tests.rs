use crate::tests::utils::{body_string, day, registration, test_app};

#[test]
fn dashboard_counts_and_recent_activity() {
    let app = test_app();
    let mut expired = registration("Old Timer", "DL01CD5678", Some(day(-3)));
    expired.submitted_at = Some(chrono::Utc::now().to_rfc3339());
    app.seed(&[
        expired,
        registration("Soon Sharma", "MH12AB1234", Some(day(5))),
        registration("Later Lal", "KA05MN4321", Some(day(200))),
    ]);

    let cookie = app.login();
    let resp = app.get("/dashboard", Some(&cookie));
    assert_eq!(resp.status(), 200);
    let body = body_string(resp);

    assert!(body.contains("Total registrations"));
    assert!(body.contains("/registrations?view=expiring-soon"));
    assert!(body.contains("/registrations?view=expired"));
    assert!(body.contains("Old Timer"));
    assert!(body.contains("Just now"));
}

#[test]
fn empty_dashboard_invites_a_first_registration() {
    let app = test_app();
    let cookie = app.login();
    let body = body_string(app.get("/dashboard", Some(&cookie)));
    assert!(body.contains("No registrations yet"));
}
