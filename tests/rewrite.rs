mod common;

use common::*;
use goodwill_forms::model::Cell;
use goodwill_forms::rewrite::rewrite_master_sheet;
use goodwill_forms::services::SpreadsheetService;

#[test]
fn rewrite_replaces_master_rows_with_member_rows_in_mapping_order() {
    let mut sheets = spreadsheets();
    let config = config();

    for row in [text_row(&["stale", "1"]), text_row(&["stale", "2"])] {
        sheets.append_row(MASTER, &row).expect("stale row");
    }
    for id in [SOMEWHERE_SHEET, ELSEWHERE_SHEET] {
        let mut member = goodwill_forms::model::Sheet::with_header("Programs", MASTER_HEADERS);
        member.rows = vec![
            text_row(&[id, "first"]),
            text_row(&[id, "second"]),
        ];
        sheets.insert(id, member);
    }

    let summary = rewrite_master_sheet(&mut sheets, &config).expect("master rewritten");

    assert_eq!(summary.rows_cleared, 2);
    assert_eq!(summary.members_copied, 2);
    assert_eq!(summary.rows_appended, 4);

    let master = sheets.get(MASTER).expect("master");
    assert_eq!(master.header.len(), MASTER_HEADERS.len());
    let firsts: Vec<(String, String)> = master
        .rows
        .iter()
        .map(|row| (row[0].to_string(), row[1].to_string()))
        .collect();
    assert_eq!(
        firsts,
        vec![
            (SOMEWHERE_SHEET.to_string(), "first".to_string()),
            (SOMEWHERE_SHEET.to_string(), "second".to_string()),
            (ELSEWHERE_SHEET.to_string(), "first".to_string()),
            (ELSEWHERE_SHEET.to_string(), "second".to_string()),
        ]
    );
}

#[test]
fn rewrite_of_header_only_master_deletes_nothing() {
    let mut sheets = spreadsheets();
    let config = config();

    let summary = rewrite_master_sheet(&mut sheets, &config).expect("master rewritten");

    assert_eq!(summary.rows_cleared, 0);
    assert_eq!(summary.rows_appended, 0);
    assert_eq!(sheets.last_row(MASTER).expect("last row"), 1);
}

#[test]
fn mapping_rows_without_spreadsheet_are_skipped() {
    let mut sheets = spreadsheets();
    let mut mappings = mapping_sheet();
    mappings.rows.push(vec![Cell::from("Pending, WA"), Cell::Empty, Cell::from("PWA")]);
    sheets.insert(MAPPINGS, mappings);

    let summary = rewrite_master_sheet(&mut sheets, &config()).expect("master rewritten");

    assert_eq!(summary.members_copied, 2);
    assert_eq!(summary.members_skipped, 1);
}

#[test]
fn missing_member_sheet_is_an_error() {
    let mut sheets = spreadsheets();
    let mut mappings = mapping_sheet();
    mappings.rows.push(text_row(&["Gone, TX", "gone-sheet", "GTX"]));
    sheets.insert(MAPPINGS, mappings);

    let result = rewrite_master_sheet(&mut sheets, &config());
    assert!(matches!(
        result,
        Err(goodwill_forms::FormsError::UnknownSpreadsheet(id)) if id == "gone-sheet"
    ));
}
