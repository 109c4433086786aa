//! Export of master-sheet rows as program records for the pathways catalogue,
//! and detection of programs that should no longer be listed there.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, instrument};

use crate::model::Cell;

/// Column holding the generated row identifier.
pub const ROW_IDENTIFIER_COLUMN: &str = "Row Identifier (DO NOT EDIT)";
/// Column holding the submitter's pathways opt-in.
pub const PATHWAYS_OPT_IN_COLUMN: &str = "Should this program be available in Google Pathways?";
/// Placeholder written when an application deadline cannot be parsed.
pub const INVALID_DEADLINE: &str = "2099-09-09";

/// Sheet header to record field.
pub const HEADER_MAPPINGS: &[(&str, &str)] = &[
    ("Timestamp", "LastUpdated"),
    ("Organization Name", "ProgramProvider"),
    ("Organization URL", "ProviderUrl"),
    ("Organization Address", "ProviderAddress"),
    ("Program Name", "ProgramName"),
    ("Program Category", "ProgramCategory"),
    ("Population(s) Targeted", "PopulationTargeted"),
    ("Goal/Outcome", "Goal"),
    ("Time Investment", "TimeInvestment"),
    ("Program ID", "ProgramId"),
    ("Program Status", "ProgramStatus"),
    ("CIP Code", "CIP"),
    ("Application Deadline", "ApplicationDeadline"),
    (
        "Program Address (if different from organization address)",
        "ProgramAddress",
    ),
    ("URL of Program", "ProgramUrl"),
    ("Contact phone number for program", "ContactPhone"),
    ("Program description", "ProgramDescription"),
    (PATHWAYS_OPT_IN_COLUMN, "PathwaysEnabled"),
    ("Total cost of the program (in dollars)", "TotalCostOfProgram"),
    ("Duration / Time to complete", "ProgramLength"),
    ("Total Units", "TotalUnits"),
    ("Unit Cost (not required if total cost is given)", "UnitCost"),
    ("Format", "Format"),
    ("Timing", "Timing"),
    ("Start date(s)", "StartDates"),
    ("End Date(s)", "EndDates"),
    ("Credential level earned", "CredentialLevelEarned"),
    ("Accreditation body name", "AccreditationBodyName"),
    (
        "What certification (exam), license, or certificate (if any) does this program prepare you for or give you?",
        "CredentialEarned",
    ),
    (
        "What occupations/jobs does the training prepare you for?",
        "RelatedOccupations",
    ),
    ("Apprenticeship or Paid Training Available", "IsPaid"),
    ("If yes, average hourly wage paid to student", "AverageHourlyWagePaid"),
    ("Incentives", "Incentives"),
    ("Average ANNUAL salary post-graduation", "PostGradAnnualSalary"),
    ("Average HOURLY wage post-graduation", "PostGradHourlyWage"),
    ("Eligible groups", "EligibleGroups"),
    ("Maximum yearly household income to be eligible", "MaxIncomeEligibility"),
    ("HS diploma required?", "IsDiplomaRequired"),
    ("Other prerequisites", "Prerequisites"),
    ("Anything else to add about the program?", "Miscellaneous"),
    ("Maximum Enrollment", "MaximumEnrollment"),
    (ROW_IDENTIFIER_COLUMN, "gs_row_identifier"),
];

pub fn map_header(header: &str) -> &str {
    HEADER_MAPPINGS
        .iter()
        .find(|(sheet, _)| *sheet == header)
        .map_or(header, |(_, field)| *field)
}

/// Converts master-sheet values (header first) into JSON program records.
#[instrument(level = "debug", skip(values))]
pub fn to_program_records(values: &[Vec<Cell>], source_sheet_id: &str) -> Vec<Value> {
    let Some((headers, rows)) = values.split_first() else {
        return Vec::new();
    };
    let fields: Vec<String> = headers
        .iter()
        .map(|header| map_header(header.to_string().trim()).to_string())
        .collect();

    let records: Vec<Value> = rows
        .iter()
        .map(|row| {
            let mut record = Map::new();
            for (col_idx, field) in fields.iter().enumerate() {
                if field.is_empty() {
                    continue;
                }
                let raw = row.get(col_idx).map(Cell::to_string).unwrap_or_default();
                let value = match field.as_str() {
                    "ApplicationDeadline" => Value::String(format_deadline(&raw)),
                    "StartDates" | "EndDates" => Value::Array(
                        format_date_list(&raw).into_iter().map(Value::String).collect(),
                    ),
                    _ => Value::String(raw),
                };
                record.insert(field.clone(), value);
            }
            record.insert(
                "source_sheet_id".to_string(),
                Value::String(source_sheet_id.to_string()),
            );
            Value::Object(record)
        })
        .collect();

    debug!(record_count = records.len(), "program records built");
    records
}

/// `mm/dd/yyyy` in ISO form.
pub fn format_date(raw: &str) -> Option<String> {
    NaiveDate::parse_from_str(raw.trim(), "%m/%d/%Y")
        .ok()
        .map(|date| date.format("%Y-%m-%d").to_string())
}

/// Deadline in ISO form, or [`INVALID_DEADLINE`] when it does not parse.
pub fn format_deadline(raw: &str) -> String {
    format_date(raw).unwrap_or_else(|| INVALID_DEADLINE.to_string())
}

/// Splits a `;`-separated list of dates. Entries that are not dates are kept
/// trimmed, as written.
pub fn format_date_list(raw: &str) -> Vec<String> {
    raw.split(';')
        .map(|entry| format_date(entry).unwrap_or_else(|| entry.trim().to_string()))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct OptOutReport {
    /// Row identifiers whose opt-in answer is not `Yes`.
    pub not_marked_for_pathways: Vec<String>,
    /// Known identifiers that no longer appear in the sheet.
    pub deleted: Vec<String>,
}

/// Finds programs that should be withdrawn from the catalogue.
pub fn opt_out(values: &[Vec<Cell>], known_ids: &[String]) -> OptOutReport {
    let Some((headers, rows)) = values.split_first() else {
        return OptOutReport {
            deleted: known_ids.to_vec(),
            ..OptOutReport::default()
        };
    };
    let column = |name: &str| headers.iter().position(|header| header.to_string().trim() == name);
    let id_column = column(ROW_IDENTIFIER_COLUMN);
    let opt_in_column = column(PATHWAYS_OPT_IN_COLUMN);

    let cell_text = |row: &[Cell], col: Option<usize>| {
        col.and_then(|idx| row.get(idx))
            .map(|cell| cell.to_string().trim().to_string())
            .unwrap_or_default()
    };

    let mut in_sheet = BTreeSet::new();
    let mut not_marked_for_pathways = Vec::new();
    for row in rows {
        let id = cell_text(row.as_slice(), id_column);
        if id.is_empty() {
            continue;
        }
        if cell_text(row.as_slice(), opt_in_column) != "Yes" {
            not_marked_for_pathways.push(id.clone());
        }
        in_sheet.insert(id);
    }

    let deleted = known_ids
        .iter()
        .filter(|id| !in_sheet.contains(id.as_str()))
        .cloned()
        .collect();

    OptOutReport {
        not_marked_for_pathways,
        deleted,
    }
}
