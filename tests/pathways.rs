mod common;

use common::text_row;
use goodwill_forms::pathways::{format_date_list, format_deadline, opt_out, to_program_records};
use serde_json::json;

#[test]
fn start_and_end_dates_are_split_and_normalised() {
    let cases = [
        ("12/15/2019", vec!["2019-12-15"]),
        ("01/15/2019;12/15/2020", vec!["2019-01-15", "2020-12-15"]),
        ("01/15/2019; 12/15/2020", vec!["2019-01-15", "2020-12-15"]),
        (
            "01/15/2019; 12/15/2020; 7/01/2019",
            vec!["2019-01-15", "2020-12-15", "2019-07-01"],
        ),
        ("Open Enrollment", vec!["Open Enrollment"]),
    ];
    for (input, expected) in cases {
        assert_eq!(format_date_list(input), expected, "input {input:?}");
    }
}

#[test]
fn unparseable_deadline_gets_placeholder() {
    assert_eq!(format_deadline(" 03/01/2021 "), "2021-03-01");
    assert_eq!(format_deadline("rolling"), "2099-09-09");
}

#[test]
fn master_rows_become_program_records() {
    let values = vec![
        text_row(&[
            "Program Name",
            "Application Deadline",
            "Start date(s)",
            "Custom Column",
            "Row Identifier (DO NOT EDIT)",
        ]),
        text_row(&["Forklift", "02/01/2021", "03/01/2021; TBD", "x", "row-1"]),
    ];

    let records = to_program_records(&values, "master");

    assert_eq!(
        records,
        vec![json!({
            "ProgramName": "Forklift",
            "ApplicationDeadline": "2021-02-01",
            "StartDates": ["2021-03-01", "TBD"],
            "Custom Column": "x",
            "gs_row_identifier": "row-1",
            "source_sheet_id": "master",
        })]
    );
}

#[test]
fn opt_out_lists_unmarked_and_deleted_programs() {
    let values = vec![
        text_row(&[
            "Should this program be available in Google Pathways?",
            "Row Identifier (DO NOT EDIT)",
        ]),
        text_row(&["No", "663dfe-4aca"]),
        text_row(&["Yes", "a1"]),
        text_row(&["", ""]),
        text_row(&["Maybe", "b2"]),
    ];
    let known = vec!["a1".to_string(), "gone".to_string(), "b2".to_string()];

    let report = opt_out(&values, &known);

    assert_eq!(report.not_marked_for_pathways, vec!["663dfe-4aca", "b2"]);
    assert_eq!(report.deleted, vec!["gone"]);
}
