//! The member mapping table: which spreadsheet belongs to which member.

use tracing::{debug, instrument};

use crate::error::Result;
use crate::model::{Cell, Member, Record};
use crate::services::SpreadsheetService;

pub const LOCATION_COLUMN: &str = "Location";
pub const SPREADSHEET_ID_COLUMN: &str = "Spreadsheet ID";
pub const SHORT_NAME_COLUMN: &str = "Short Name";

/// Converts a data range into records keyed by the header row. Falsy cells
/// are left out of each record and rows that end up empty are dropped.
pub fn sheet_to_records(values: &[Vec<Cell>]) -> Vec<Record> {
    let Some((headers, rows)) = values.split_first() else {
        return Vec::new();
    };

    let mut records = Vec::new();
    for row in rows {
        let mut record = Record::new();
        for (col_idx, cell) in row.iter().enumerate() {
            if !cell.is_truthy() {
                continue;
            }
            let key = headers.get(col_idx).map(Cell::to_string).unwrap_or_default();
            record.insert(key, cell.clone());
        }
        if !record.is_empty() {
            records.push(record);
        }
    }
    records
}

/// Reads the mapping sheet and converts it to records.
#[instrument(level = "debug", skip(sheets))]
pub fn load_member_records(sheets: &dyn SpreadsheetService, mappings_id: &str) -> Result<Vec<Record>> {
    let records = sheet_to_records(&sheets.data_range(mappings_id)?);
    debug!(record_count = records.len(), "member mappings loaded");
    Ok(records)
}

/// First record whose `Location` equals `member_id`. A match without a
/// spreadsheet id cannot receive rows and counts as not found.
pub fn find_member(records: &[Record], member_id: &str) -> Option<Member> {
    let record = records
        .iter()
        .find(|record| record_text(record, LOCATION_COLUMN).as_deref() == Some(member_id))?;
    member_from_record(record)
}

pub fn member_from_record(record: &Record) -> Option<Member> {
    Some(Member {
        location: record_text(record, LOCATION_COLUMN)?,
        spreadsheet_id: record_text(record, SPREADSHEET_ID_COLUMN)?,
        short_name: record_text(record, SHORT_NAME_COLUMN).unwrap_or_default(),
    })
}

pub fn record_text(record: &Record, column: &str) -> Option<String> {
    record.get(column).map(Cell::to_string)
}
