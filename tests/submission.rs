mod common;

use common::*;
use goodwill_forms::io::memory::MemoryOutbox;
use goodwill_forms::model::{Answer, Cell, RichText};
use goodwill_forms::services::Services;
use goodwill_forms::submission::{SubmissionOutcome, handle_submission, member_identifier};
use goodwill_forms::FormsError;

#[test]
fn known_member_gets_one_row_with_trailing_identifier() {
    let mut sheets = spreadsheets();
    let forms = forms();
    let mut outbox = MemoryOutbox::new();
    let config = config();
    let event = submission("  Somewhere, CA ", "SWCA-0001");

    let outcome = {
        let mut services = Services::new(&mut sheets, &forms, &mut outbox);
        handle_submission(&mut services, &config, &event).expect("submission handled")
    };

    let SubmissionOutcome::Routed {
        member,
        row_id,
        program_id,
        sheet_url,
    } = outcome
    else {
        panic!("expected a routed submission");
    };
    assert_eq!(member.spreadsheet_id, SOMEWHERE_SHEET);
    assert_eq!(program_id, None);
    assert_eq!(sheet_url, format!("memory://spreadsheets/{SOMEWHERE_SHEET}"));

    let member_sheet = sheets.get(SOMEWHERE_SHEET).expect("member sheet");
    assert_eq!(member_sheet.rows.len(), 1);
    let row = &member_sheet.rows[0];
    assert_eq!(row.len(), event.values.len() + 1);
    assert_eq!(row.last(), Some(&Cell::Text(row_id.clone())));
    assert_eq!(row[7], Cell::from("SWCA-0001"));
    assert!(uuid::Uuid::parse_str(&row_id).is_ok());

    assert!(sheets.get(ELSEWHERE_SHEET).expect("other sheet").rows.is_empty());
    assert!(sheets.get(MASTER).expect("master").rows.is_empty());

    assert_eq!(outbox.sent.len(), 1);
    let email = &outbox.sent[0];
    assert_eq!(email.to, "someone@example.org");
    assert_eq!(email.subject, config.messages.success_subject);
    assert!(email.no_reply);
    assert!(email.html_body.contains(&sheet_url));
    assert!(email.html_body.ends_with(
        "<br><br><b>Goodwill Info</b><br>Goodwill Member Name:   Somewhere, CA <br>\
         Should this program be available in Google Pathways?: Yes<br>Format: In person, Online<br>"
    ));
}

#[test]
fn master_header_is_copied_before_the_row() {
    let mut sheets = spreadsheets();
    let forms = forms();
    let mut outbox = MemoryOutbox::new();
    let config = config();

    {
        let mut services = Services::new(&mut sheets, &forms, &mut outbox);
        handle_submission(&mut services, &config, &submission("Somewhere, CA", "X-1"))
            .expect("submission handled");
    }

    let member_sheet = sheets.get(SOMEWHERE_SHEET).expect("member sheet");
    let expected: Vec<RichText> = MASTER_HEADERS.iter().map(|h| RichText::bold(*h)).collect();
    assert_eq!(member_sheet.header, expected);
}

#[test]
fn blank_program_id_is_generated_from_short_name() {
    let mut sheets = spreadsheets();
    let forms = forms();
    let mut outbox = MemoryOutbox::new();
    let config = config();

    let outcome = {
        let mut services = Services::new(&mut sheets, &forms, &mut outbox);
        handle_submission(&mut services, &config, &submission("Elsewhere, OR", ""))
            .expect("submission handled")
    };

    let SubmissionOutcome::Routed { program_id, .. } = outcome else {
        panic!("expected a routed submission");
    };
    let program_id = program_id.expect("program id generated");
    let (prefix, number) = program_id.split_once('-').expect("dash separated");
    assert_eq!(prefix, "EWOR");
    let number: u32 = number.parse().expect("numeric suffix");
    assert!((1000..=9999).contains(&number));

    let row = &sheets.get(ELSEWHERE_SHEET).expect("member sheet").rows[0];
    assert_eq!(row[7], Cell::Text(program_id));
    assert_eq!(row.len(), 9);
}

#[test]
fn program_id_column_falls_back_to_configured_index() {
    let mut sheets = spreadsheets();
    let mut master = sheets.get(MASTER).expect("master").clone();
    for cell in &mut master.header {
        if cell.text == "Program ID" {
            cell.text = "Identifier".to_string();
        }
    }
    sheets.insert(MASTER, master);
    let forms = forms();
    let mut outbox = MemoryOutbox::new();
    let mut config = config();
    config.program_id_column = 3;

    let mut event = submission("Somewhere, CA", "");
    event.values.truncate(2);
    {
        let mut services = Services::new(&mut sheets, &forms, &mut outbox);
        handle_submission(&mut services, &config, &event).expect("submission handled");
    }

    let row = &sheets.get(SOMEWHERE_SHEET).expect("member sheet").rows[0];
    assert_eq!(row.len(), 5);
    assert_eq!(row[2], Cell::Empty);
    assert!(matches!(&row[3], Cell::Text(id) if id.starts_with("SWCA-")));
    assert!(matches!(&row[4], Cell::Text(id) if uuid::Uuid::parse_str(id).is_ok()));
}

#[test]
fn unknown_member_appends_nothing_and_sends_failure_notice() {
    let mut sheets = spreadsheets();
    let forms = forms();
    let mut outbox = MemoryOutbox::new();
    let config = config();

    let outcome = {
        let mut services = Services::new(&mut sheets, &forms, &mut outbox);
        handle_submission(&mut services, &config, &submission("Nowhere, NV", "N-1"))
            .expect("submission handled")
    };

    assert_eq!(
        outcome,
        SubmissionOutcome::Unrouted {
            member_id: "Nowhere, NV".to_string()
        }
    );
    for id in [MASTER, SOMEWHERE_SHEET, ELSEWHERE_SHEET] {
        assert!(sheets.get(id).expect("sheet").rows.is_empty(), "{id} was modified");
    }

    assert_eq!(outbox.sent.len(), 1);
    let email = &outbox.sent[0];
    assert_eq!(email.subject, config.messages.failure_subject);
    assert_eq!(email.to, "someone@example.org");
    assert!(email
        .html_body
        .starts_with("Goodwill organization 'Nowhere, NV' has not been set up"));
    assert!(email.html_body.contains("<br><br><b>Goodwill Info</b><br>"));
}

#[test]
fn missing_member_identifier_is_skipped_silently() {
    let mut sheets = spreadsheets();
    let forms = forms();
    let mut outbox = MemoryOutbox::new();
    let config = config();

    let outcome = {
        let mut services = Services::new(&mut sheets, &forms, &mut outbox);
        handle_submission(&mut services, &config, &submission("   ", "N-1"))
            .expect("submission handled")
    };

    assert_eq!(outcome, SubmissionOutcome::Skipped);
    assert!(outbox.sent.is_empty());
}

#[test]
fn member_alias_field_is_accepted() {
    let config = config();
    let mut event = submission("", "N-1");
    event.named_values.remove("Goodwill Member Name");
    event.named_values.insert(
        "Goodwill Member ID".to_string(),
        Answer::Single(" Elsewhere, OR".to_string()),
    );

    assert_eq!(
        member_identifier(&config, &event).as_deref(),
        Some("Elsewhere, OR")
    );
}

#[test]
fn missing_email_field_is_an_error() {
    let mut sheets = spreadsheets();
    let forms = forms();
    let mut outbox = MemoryOutbox::new();
    let config = config();
    let mut event = submission("Nowhere, NV", "N-1");
    event.named_values.remove("Your email address");

    let mut services = Services::new(&mut sheets, &forms, &mut outbox);
    let result = handle_submission(&mut services, &config, &event);
    assert!(matches!(result, Err(FormsError::MissingField(field)) if field == "Your email address"));
}
