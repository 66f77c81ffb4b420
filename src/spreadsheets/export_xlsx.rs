use crate::errors::ExportError;
use crate::spreadsheets::{export_row, EXPORT_HEADERS};
use crate::view::AnnotatedRegistration;
use rust_xlsxwriter::{Format, Workbook};

/// Same columns as the CSV export, one worksheet, header row in bold.
pub fn registrations_workbook(rows: &[&AnnotatedRegistration]) -> Result<Vec<u8>, ExportError> {
    if rows.is_empty() {
        return Err(ExportError::Empty);
    }

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name("Registrations")
        .map_err(|e| ExportError::Workbook(format!("Failed to name worksheet: {}", e)))?;

    let bold = Format::new().set_bold();
    for (col, header) in EXPORT_HEADERS.iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, *header, &bold)
            .map_err(|e| {
                ExportError::Workbook(format!("Failed to write header '{}': {}", header, e))
            })?;
    }

    for (i, row) in rows.iter().enumerate() {
        let r = (i + 1) as u32;
        for (col, value) in export_row(&row.record).iter().enumerate() {
            worksheet
                .write_string(r, col as u16, *value)
                .map_err(|e| {
                    ExportError::Workbook(format!(
                        "Failed to write {} for row {}: {}",
                        EXPORT_HEADERS[col], r, e
                    ))
                })?;
        }
    }

    workbook
        .save_to_buffer()
        .map_err(|e| ExportError::Workbook(format!("Failed to save workbook: {}", e)))
}
