//! Rebuild of the master sheet from every member sheet.

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::config::RouterConfig;
use crate::error::Result;
use crate::mapping::{SPREADSHEET_ID_COLUMN, load_member_records, record_text};
use crate::services::SpreadsheetService;

/// Counters reported by [`rewrite_master_sheet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct RewriteSummary {
    pub rows_cleared: usize,
    pub members_copied: usize,
    pub members_skipped: usize,
    pub rows_appended: usize,
}

/// Rebuilds the master sheet from every member sheet, in mapping-table order.
#[instrument(level = "info", skip_all, fields(master = %config.master_sheet_id))]
pub fn rewrite_master_sheet(
    sheets: &mut dyn SpreadsheetService,
    config: &RouterConfig,
) -> Result<RewriteSummary> {
    let mut summary = RewriteSummary {
        rows_cleared: clear_master_sheet(sheets, &config.master_sheet_id)?,
        ..RewriteSummary::default()
    };

    let records = load_member_records(&*sheets, &config.member_mappings_sheet_id)?;
    for record in &records {
        let Some(member_sheet_id) = record_text(record, SPREADSHEET_ID_COLUMN) else {
            warn!(?record, "mapping row has no spreadsheet id, skipping");
            summary.members_skipped += 1;
            continue;
        };
        summary.rows_appended +=
            append_member_rows(sheets, &member_sheet_id, &config.master_sheet_id)?;
        summary.members_copied += 1;
    }

    info!(
        members = summary.members_copied,
        rows = summary.rows_appended,
        "master sheet rebuilt"
    );
    Ok(summary)
}

/// Deletes every row below the header. Returns the number of deleted rows.
pub fn clear_master_sheet(sheets: &mut dyn SpreadsheetService, master_id: &str) -> Result<usize> {
    let data_rows = sheets.last_row(master_id)?.saturating_sub(1);
    if data_rows > 0 {
        sheets.delete_rows(master_id, 2, data_rows)?;
    }
    debug!(rows = data_rows, "master sheet cleared");
    Ok(data_rows)
}

/// Appends every data row of the member sheet to the master sheet.
pub fn append_member_rows(
    sheets: &mut dyn SpreadsheetService,
    member_sheet_id: &str,
    master_id: &str,
) -> Result<usize> {
    let data = sheets.data_range(member_sheet_id)?;
    let rows = data.get(1..).unwrap_or_default();
    for row in rows {
        sheets.append_row(master_id, row)?;
    }
    debug!(member_sheet_id, rows = rows.len(), "member rows appended");
    Ok(rows.len())
}
