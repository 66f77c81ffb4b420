use crate::errors::ExportError;
use crate::spreadsheets::{export_row, EXPORT_HEADERS};
use crate::view::AnnotatedRegistration;

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

/// Header line plus one fully quoted line per row, `\n` separated.
pub fn registrations_csv(rows: &[&AnnotatedRegistration]) -> Result<String, ExportError> {
    if rows.is_empty() {
        return Err(ExportError::Empty);
    }

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(EXPORT_HEADERS.join(","));
    for row in rows {
        let fields: Vec<String> = export_row(&row.record).iter().map(|f| quote(f)).collect();
        lines.push(fields.join(","));
    }
    Ok(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Registration;
    use crate::view::load::{SortMethod, WorkingSet};
    use chrono::NaiveDate;

    fn set(records: Vec<Registration>) -> WorkingSet {
        WorkingSet::build(
            records,
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            SortMethod::ClientSide,
        )
    }

    #[test]
    fn empty_view_is_refused() {
        assert_eq!(registrations_csv(&[]), Err(ExportError::Empty));
    }

    #[test]
    fn quotes_every_field_and_blanks_missing_ones() {
        let ws = set(vec![Registration {
            id: "abc".into(),
            owner_name: Some("Ravi \"RK\" Kumar".into()),
            vehicle_type: Some("4-wheeler".into()),
            registration_number: Some("MH12AB1234".into()),
            expiring_date: Some("2025-06-01".into()),
            ..Default::default()
        }]);
        let rows: Vec<_> = ws.records.iter().collect();
        let csv = registrations_csv(&rows).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("ID,Owner,Vehicle Type,Reg Number,Testing Date,Expiry Date,Submitted")
        );
        assert_eq!(
            lines.next(),
            Some(r#""abc","Ravi ""RK"" Kumar","4-wheeler","MH12AB1234","","2025-06-01","""#)
        );
        assert_eq!(lines.next(), None);
        assert!(!csv.contains("null"));
    }

    #[test]
    fn rows_keep_view_order() {
        let ws = set(vec![
            Registration {
                id: "late".into(),
                expiring_date: Some("2026-01-01".into()),
                ..Default::default()
            },
            Registration {
                id: "soon".into(),
                expiring_date: Some("2025-02-01".into()),
                ..Default::default()
            },
        ]);
        let rows: Vec<_> = ws.records.iter().collect();
        let csv = registrations_csv(&rows).unwrap();
        let ids: Vec<&str> = csv.lines().skip(1).map(|l| &l[1..5]).collect();
        assert_eq!(ids, ["soon", "late"]);
    }
}
