//! The form submission handler.

use rand::Rng;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::config::RouterConfig;
use crate::email::{compose_html, construct_email_body, failure_message, success_message};
use crate::error::{FormsError, Result};
use crate::mapping::{find_member, load_member_records};
use crate::model::{Cell, Email, FormSubmission, Member};
use crate::services::{Services, SpreadsheetService};

/// What happened to one submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SubmissionOutcome {
    /// The row was copied to the member's sheet and the confirmation sent.
    Routed {
        member: Member,
        row_id: String,
        /// Set when a program id had to be generated.
        program_id: Option<String>,
        sheet_url: String,
    },
    /// The member is not in the mapping table. Only the failure notice went out.
    Unrouted { member_id: String },
    /// The submission carried no member identifier. Nothing was done.
    Skipped,
}

/// Routes a submission to its member's sheet and emails the submitter.
#[instrument(level = "info", skip_all, fields(master = %config.master_sheet_id))]
pub fn handle_submission(
    services: &mut Services<'_>,
    config: &RouterConfig,
    submission: &FormSubmission,
) -> Result<SubmissionOutcome> {
    debug!(event = ?submission, "form submission received");

    let Some(member_id) = member_identifier(config, submission) else {
        warn!("submission has no member identifier, ignoring");
        return Ok(SubmissionOutcome::Skipped);
    };

    let records = load_member_records(&*services.sheets, &config.member_mappings_sheet_id)?;

    let (outcome, subject, intro) = match find_member(&records, &member_id) {
        Some(member) => {
            let (row_id, program_id) =
                copy_to_member_sheet(&mut *services.sheets, config, &member, submission)?;
            let sheet_url = services.sheets.url(&member.spreadsheet_id)?;
            info!(
                member = %member.location,
                sheet = %member.spreadsheet_id,
                %row_id,
                "submission routed"
            );
            let intro = success_message(&sheet_url);
            (
                SubmissionOutcome::Routed {
                    member,
                    row_id,
                    program_id,
                    sheet_url,
                },
                config.messages.success_subject.clone(),
                intro,
            )
        }
        None => {
            warn!(%member_id, "member is not set up for programs data submission");
            let intro = failure_message(&member_id);
            (
                SubmissionOutcome::Unrouted { member_id },
                config.messages.failure_subject.clone(),
                intro,
            )
        }
    };

    let items = services.forms.items(&config.form_id)?;
    let body = construct_email_body(&items, &submission.named_values);
    let to = submission
        .trimmed(&config.fields.email)
        .filter(|address| !address.is_empty())
        .ok_or_else(|| FormsError::MissingField(config.fields.email.clone()))?;

    services.mail.send(&Email {
        to,
        subject,
        html_body: compose_html(&intro, &body),
        no_reply: config.messages.no_reply,
    })?;

    Ok(outcome)
}

/// Trimmed member identifier, trying the configured field and then its
/// aliases. Blank answers count as absent.
pub fn member_identifier(config: &RouterConfig, submission: &FormSubmission) -> Option<String> {
    config
        .fields
        .member_candidates()
        .filter_map(|field| submission.trimmed(field))
        .find(|value| !value.is_empty())
}

/// Builds the member row, copies the master header into the member sheet and
/// appends the row. Returns the row identifier and the generated program id.
fn copy_to_member_sheet(
    sheets: &mut dyn SpreadsheetService,
    config: &RouterConfig,
    member: &Member,
    submission: &FormSubmission,
) -> Result<(String, Option<String>)> {
    let width = sheets.max_columns(&config.master_sheet_id)?;
    let master_header = sheets.header(&config.master_sheet_id, width)?;

    let row_id = Uuid::new_v4().to_string();
    let mut row: Vec<Cell> = submission.values.iter().cloned().map(Cell::Text).collect();

    let program_id_missing = submission
        .named_values
        .get(&config.fields.program_id)
        .and_then(|answer| answer.first())
        .is_none_or(|value| value.trim().is_empty());

    let program_id = if program_id_missing {
        let column = master_header
            .iter()
            .position(|cell| cell.text.trim() == config.fields.program_id)
            .unwrap_or(config.program_id_column);
        let generated = generate_program_id(&member.short_name);
        if row.len() <= column {
            row.resize(column + 1, Cell::Empty);
        }
        row[column] = Cell::Text(generated.clone());
        debug!(column, program_id = %generated, "program id generated");
        Some(generated)
    } else {
        None
    };
    row.push(Cell::Text(row_id.clone()));

    sheets.set_header(&member.spreadsheet_id, &master_header)?;
    sheets.append_row(&member.spreadsheet_id, &row)?;
    Ok((row_id, program_id))
}

/// `"<short name>-<four digits>"`.
pub fn generate_program_id(short_name: &str) -> String {
    let number: u16 = rand::rng().random_range(1000..=9999);
    format!("{short_name}-{number}")
}
