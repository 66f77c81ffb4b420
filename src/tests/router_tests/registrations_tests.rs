use crate::tests::utils::{body_string, day, location, registration, test_app, COLLECTION};

fn position(body: &str, needle: &str) -> usize {
    body.find(needle)
        .unwrap_or_else(|| panic!("{needle} not in page"))
}

#[test]
fn list_is_sorted_by_expiry_with_counts() {
    let app = test_app();
    app.seed(&[
        registration("Later Lal", "KA05MN4321", Some(day(200))),
        registration("No Date", "GJ01AA0001", None),
        registration("Soon Sharma", "MH12AB1234", Some(day(5))),
    ]);
    let cookie = app.login();

    let resp = app.get("/registrations", Some(&cookie));
    assert_eq!(resp.status(), 200);
    let body = body_string(resp);

    assert!(position(&body, "MH12AB1234") < position(&body, "KA05MN4321"));
    assert!(position(&body, "KA05MN4321") < position(&body, "GJ01AA0001"));
    assert!(body.contains("urgency-critical"));
    assert!(body.contains("5 days left"));
    assert!(body.contains("Showing <strong>3</strong> of <strong>3</strong>"));
}

#[test]
fn global_search_matches_plate_case_insensitively() {
    let app = test_app();
    app.seed(&[
        registration("Asha", "MH12AB1234", Some(day(10))),
        registration("Dev", "DL01CD5678", Some(day(10))),
    ]);
    let cookie = app.login();

    let body = body_string(app.get("/registrations?q=mh12", Some(&cookie)));
    assert!(body.contains("MH12AB1234"));
    assert!(!body.contains("DL01CD5678"));
    assert!(body.contains("Showing <strong>1</strong> of <strong>2</strong>"));
}

#[test]
fn expired_view_is_one_shot() {
    let app = test_app();
    app.seed(&[
        registration("Gone", "DL01CD5678", Some(day(-12))),
        registration("Fine", "MH12AB1234", Some(day(100))),
    ]);
    let cookie = app.login();

    let body = body_string(app.get("/registrations?view=expired", Some(&cookie)));
    assert!(body.contains("Expired 12 days ago"));
    assert!(!body.contains("MH12AB1234"));
    // Filter links carry only the named filters, never the view shortcut.
    assert!(!body.contains("view=expired\""));

    let body = body_string(app.get("/registrations", Some(&cookie)));
    assert!(body.contains("MH12AB1234"));
}

#[test]
fn empty_collection_and_no_match_states() {
    let app = test_app();
    let cookie = app.login();
    let body = body_string(app.get("/registrations", Some(&cookie)));
    assert!(body.contains("No registrations found"));

    app.seed(&[registration("Asha", "MH12AB1234", Some(day(10)))]);
    let body = body_string(app.get("/registrations?owner=zzz", Some(&cookie)));
    assert!(body.contains("No registrations match your filters."));
    assert!(body.contains("/registrations?clear=1"));

    let body = body_string(app.get("/registrations?clear=1&owner=zzz", Some(&cookie)));
    assert!(body.contains("Filters cleared"));
    assert!(body.contains("MH12AB1234"));
}

#[test]
fn refresh_redirects_back_with_filters() {
    let app = test_app();
    let cookie = app.login();
    let resp = app.post_form("/registrations/refresh?owner=asha", "", Some(&cookie));
    assert_eq!(resp.status(), 302);
    assert_eq!(location(&resp), "/registrations?owner=asha&refreshed=1");
}

#[test]
fn permission_denied_keeps_last_good_rows() {
    let app = test_app();
    app.seed(&[registration("Asha", "MH12AB1234", Some(day(10)))]);
    let cookie = app.login();

    app.store.set_rule(COLLECTION, false, true).unwrap();
    let resp = app.post_form("/registrations/refresh", "", Some(&cookie));
    assert_eq!(location(&resp), "/registrations");

    let body = body_string(app.get("/registrations", Some(&cookie)));
    assert!(body.contains("Permission denied"));
    assert!(body.contains("MH12AB1234"));
}

#[test]
fn missing_indexes_fall_back_to_local_sort() {
    let app = test_app();
    app.store.drop_index(COLLECTION, "expiringDate").unwrap();
    app.store.drop_index(COLLECTION, "submittedAt").unwrap();
    app.seed(&[
        registration("Later", "KA05MN4321", Some(day(90))),
        registration("Sooner", "MH12AB1234", Some(day(3))),
    ]);
    let cookie = app.login();

    let body = body_string(app.get("/registrations", Some(&cookie)));
    assert!(position(&body, "MH12AB1234") < position(&body, "KA05MN4321"));
    assert!(!body.contains("class=\"notice notice-error\""));
}

#[test]
fn valid_submission_is_stored_and_listed() {
    let app = test_app();
    let cookie = app.login();
    let form = format!(
        "ownerName=Asha+Rao&ownerEmail=Asha%40Example.com&ownerPhone=9876543210\
         &vehicleType=4-wheeler&registrationNumber=mh12ab1234\
         &testingDate={}&expiringDate={}",
        day(0),
        day(365)
    );

    let resp = app.post_form("/register", &form, Some(&cookie));
    assert_eq!(resp.status(), 302);
    assert_eq!(location(&resp), "/registrations?submitted=1");

    let body = body_string(app.get("/registrations?submitted=1", Some(&cookie)));
    assert!(body.contains("Registration submitted successfully"));
    assert!(body.contains("MH12AB1234"));
    assert!(body.contains("asha@example.com"));
    assert!(body.contains("98765 43210"));
    assert!(body.contains("PENDING"));
}

#[test]
fn invalid_submission_shows_every_error() {
    let app = test_app();
    let cookie = app.login();
    let form = format!(
        "ownerName=A&ownerEmail=bad&ownerPhone=123&vehicleType=&registrationNumber=XX\
         &testingDate={}&expiringDate={}",
        day(-1),
        day(-2)
    );

    let resp = app.post_form("/register", &form, Some(&cookie));
    assert_eq!(resp.status(), 422);
    let body = body_string(resp);
    assert!(body.contains("Please fix the highlighted fields."));
    assert!(body.contains("Please select a vehicle type"));
    assert_eq!(body.matches("class=\"field-error\"").count(), 7);
    // Entered values are kept.
    assert!(body.contains("value=\"bad\""));

    let body = body_string(app.get("/registrations", Some(&cookie)));
    assert!(body.contains("No registrations found"));
}
