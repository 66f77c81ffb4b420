use crate::tests::utils::{body_string, day, registration, test_app, today};

#[test]
fn csv_export_is_an_attachment_of_the_filtered_view() {
    let app = test_app();
    app.seed(&[
        registration("Asha", "MH12AB1234", Some(day(10))),
        registration("Dev", "DL01CD5678", Some(day(20))),
    ]);
    let cookie = app.login();

    let resp = app.get("/registrations/export.csv?q=mh12", Some(&cookie));
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers().get("Content-Type").unwrap(),
        "text/csv; charset=utf-8"
    );
    let disposition = resp
        .headers()
        .get("Content-Disposition")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert_eq!(
        disposition,
        format!(
            "attachment; filename=\"vehicle-registrations-{}.csv\"",
            today().format("%Y-%m-%d")
        )
    );

    let body = body_string(resp);
    let lines: Vec<&str> = body.lines().collect();
    assert_eq!(
        lines[0],
        "ID,Owner,Vehicle Type,Reg Number,Testing Date,Expiry Date,Submitted"
    );
    assert_eq!(lines.len(), 2);
    assert!(lines[1].contains("\"MH12AB1234\""));
}

#[test]
fn empty_export_rerenders_the_list_with_a_warning() {
    let app = test_app();
    app.seed(&[registration("Asha", "MH12AB1234", Some(day(10)))]);
    let cookie = app.login();

    let resp = app.get("/registrations/export.csv?owner=nobody", Some(&cookie));
    assert_eq!(resp.status(), 200);
    assert!(resp.headers().get("Content-Disposition").is_none());
    let body = body_string(resp);
    assert!(body.contains("class=\"notice notice-warning\""));
    assert!(body.contains("No data to export"));
}

#[test]
fn xlsx_export_has_workbook_content_type() {
    let app = test_app();
    app.seed(&[registration("Asha", "MH12AB1234", Some(day(10)))]);
    let cookie = app.login();

    let resp = app.get("/registrations/export.xlsx", Some(&cookie));
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers().get("Content-Type").unwrap(),
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    );
}

#[test]
fn export_link_from_expired_view_exports_only_expired_rows() {
    let app = test_app();
    app.seed(&[
        registration("Gone", "KA05MN4321", Some(day(-12))),
        registration("Fine", "MH12AB1234", Some(day(100))),
    ]);
    let cookie = app.login();

    let page = body_string(app.get("/registrations?view=expired", Some(&cookie)));
    assert!(!page.contains("MH12AB1234"));
    assert!(page.contains("href=\"/registrations/export.csv?view=expired\""));
    assert!(page.contains("href=\"/registrations/export.xlsx?view=expired\""));
    // Refresh stays one-shot.
    assert!(page.contains("action=\"/registrations/refresh\""));

    let resp = app.get("/registrations/export.csv?view=expired", Some(&cookie));
    assert_eq!(resp.status(), 200);
    let body = body_string(resp);
    let lines: Vec<&str> = body.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[1].contains("\"KA05MN4321\""));
    assert!(!body.contains("MH12AB1234"));
}
