/// Spreadsheet export endpoint
///
/// # Endpoint
///
/// ```text
/// GET /export
/// ```
///
/// Snapshots the caller's collections plus the dashboard summary and streams
/// back a five-sheet xlsx workbook as a downloadable attachment. The
/// workbook writer is the opaque sink here: the sheet shapes come from the
/// shared export assembler.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue},
    Extension,
};
use chrono::Utc;
use elarago_shared::{
    auth::AuthContext,
    export::{Cell, ExportSnapshot, EXPORT_FILENAME},
};
use rust_xlsxwriter::Workbook;

const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Export handler
///
/// # Errors
///
/// - `500 Internal Server Error`: snapshot query or workbook rendering failed
pub async fn export_workbook(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<(HeaderMap, Vec<u8>)> {
    let today = Utc::now().date_naive();
    let snapshot = ExportSnapshot::capture(&state.db, auth.user_id, today).await?;

    let bytes = render_workbook(&snapshot)
        .map_err(|e| ApiError::InternalError(format!("Workbook rendering failed: {}", e)))?;

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(XLSX_CONTENT_TYPE),
    );
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_str(&format!("attachment; filename=\"{}\"", EXPORT_FILENAME))
            .map_err(|e| ApiError::InternalError(format!("Invalid header value: {}", e)))?,
    );

    Ok((headers, bytes))
}

/// Feeds the assembled sheets into the xlsx writer
fn render_workbook(snapshot: &ExportSnapshot) -> Result<Vec<u8>, rust_xlsxwriter::XlsxError> {
    let mut workbook = Workbook::new();

    for sheet in snapshot.sheets() {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(sheet.name)?;

        for (col, title) in sheet.header.iter().enumerate() {
            worksheet.write_string(0, col as u16, *title)?;
        }

        for (row, cells) in sheet.rows.iter().enumerate() {
            let row = (row + 1) as u32;
            for (col, cell) in cells.iter().enumerate() {
                let col = col as u16;
                match cell {
                    Cell::Text(text) => {
                        worksheet.write_string(row, col, text)?;
                    }
                    Cell::Number(value) => {
                        worksheet.write_number(row, col, *value)?;
                    }
                    Cell::Empty => {}
                }
            }
        }
    }

    workbook.save_to_buffer()
}
