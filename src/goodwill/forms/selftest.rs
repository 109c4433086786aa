//! Smoke checks run against a live deployment.
//!
//! Each check passes, fails with a reason, or is skipped when its fixture is
//! not configured. The report renders as a TAP stream so the output reads the
//! same in a terminal and in CI logs.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use tracing::{info, instrument};

use crate::config::{EmailFixture, MappingFixture, RouterConfig};
use crate::email::construct_email_body;
use crate::error::Result;
use crate::mapping::{LOCATION_COLUMN, SPREADSHEET_ID_COLUMN, member_from_record, sheet_to_records};
use crate::model::{Cell, Record};
use crate::services::Services;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckStatus {
    Passed,
    Failed(String),
    Skipped(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
}

impl CheckResult {
    pub fn failed(&self) -> bool {
        matches!(self.status, CheckStatus::Failed(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelfTestReport {
    pub checks: Vec<CheckResult>,
}

impl SelfTestReport {
    pub fn failures(&self) -> usize {
        self.checks.iter().filter(|check| check.failed()).count()
    }

    fn record(&mut self, name: impl Into<String>, outcome: std::result::Result<(), String>) {
        let status = match outcome {
            Ok(()) => CheckStatus::Passed,
            Err(reason) => CheckStatus::Failed(reason),
        };
        self.checks.push(CheckResult {
            name: name.into(),
            status,
        });
    }

    fn skip(&mut self, name: impl Into<String>, reason: impl Into<String>) {
        self.checks.push(CheckResult {
            name: name.into(),
            status: CheckStatus::Skipped(reason.into()),
        });
    }

    /// TAP version 13 rendering of the report.
    pub fn to_tap(&self) -> String {
        let mut log = String::from("TAP version 13\n");
        for (idx, check) in self.checks.iter().enumerate() {
            let number = idx + 1;
            let _ = match &check.status {
                CheckStatus::Passed => writeln!(log, "ok {number} - {}", check.name),
                CheckStatus::Failed(reason) => {
                    writeln!(log, "not ok {number} - {} # {reason}", check.name)
                }
                CheckStatus::Skipped(reason) => {
                    writeln!(log, "ok {number} - {} # SKIP {reason}", check.name)
                }
            };
        }
        let _ = writeln!(log, "1..{}", self.checks.len());
        let _ = writeln!(
            log,
            "# pass {}\n# fail {}",
            self.checks.len() - self.failures(),
            self.failures()
        );
        log
    }
}

/// Runs every smoke check. Backend errors become failed checks rather than
/// aborting the run.
#[instrument(level = "info", skip_all)]
pub fn run_self_test(services: &Services<'_>, config: &RouterConfig) -> Result<SelfTestReport> {
    let mut report = SelfTestReport::default();

    let mapping_values = services.sheets.data_range(&config.member_mappings_sheet_id);
    report.record(
        "member mappings sheet exists",
        mapping_values
            .as_ref()
            .map(|_| ())
            .map_err(|error| error.to_string()),
    );

    let records = mapping_values
        .map(|values| sheet_to_records(&values))
        .unwrap_or_default();
    report.record("mapping table has records", check_records(&records));

    for record in &records {
        let Some(member) = member_from_record(record) else {
            continue;
        };
        report.record(
            format!("member sheet for '{}' opens", member.location),
            services
                .sheets
                .data_range(&member.spreadsheet_id)
                .map(|_| ())
                .map_err(|error| error.to_string()),
        );
    }

    const MAPPING_CHECK: &str = "mapping fixture converts to expected records";
    match &config.self_test.mapping_fixture {
        Some(fixture) => report.record(MAPPING_CHECK, check_mapping_fixture(services, fixture)),
        None => report.skip(MAPPING_CHECK, "no mapping fixture configured"),
    }

    report.record(
        "form lists items",
        match services.forms.items(&config.form_id) {
            Ok(items) if items.is_empty() => Err("form has no items".to_string()),
            Ok(_) => Ok(()),
            Err(error) => Err(error.to_string()),
        },
    );

    const EMAIL_CHECK: &str = "email body matches fixture";
    match &config.self_test.email_fixture {
        Some(fixture) => report.record(EMAIL_CHECK, check_email_fixture(services, fixture)),
        None => report.skip(EMAIL_CHECK, "no email fixture configured"),
    }

    info!(
        checks = report.checks.len(),
        failures = report.failures(),
        "self test finished"
    );
    Ok(report)
}

fn check_records(records: &[Record]) -> std::result::Result<(), String> {
    if records.is_empty() {
        return Err("no member records".to_string());
    }
    for (idx, record) in records.iter().enumerate() {
        for column in [LOCATION_COLUMN, SPREADSHEET_ID_COLUMN] {
            if !record.contains_key(column) {
                return Err(format!("record {} lacks '{column}'", idx + 1));
            }
        }
    }
    Ok(())
}

fn check_mapping_fixture(
    services: &Services<'_>,
    fixture: &MappingFixture,
) -> std::result::Result<(), String> {
    let values = services
        .sheets
        .data_range(&fixture.sheet_id)
        .map_err(|error| error.to_string())?;
    let actual: Vec<BTreeMap<String, String>> = sheet_to_records(&values)
        .iter()
        .map(|record| {
            record
                .iter()
                .map(|(key, cell)| (key.clone(), Cell::to_string(cell)))
                .collect()
        })
        .collect();
    if actual == fixture.records {
        Ok(())
    } else {
        Err(format!("expected {:?}, got {actual:?}", fixture.records))
    }
}

fn check_email_fixture(
    services: &Services<'_>,
    fixture: &EmailFixture,
) -> std::result::Result<(), String> {
    let items = services
        .forms
        .items(&fixture.form_id)
        .map_err(|error| error.to_string())?;
    let body = construct_email_body(&items, &fixture.responses);
    if body == fixture.expected_body {
        Ok(())
    } else {
        Err(format!("expected {:?}, got {body:?}", fixture.expected_body))
    }
}
