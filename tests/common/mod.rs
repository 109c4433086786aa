#![allow(dead_code)]

use std::collections::BTreeMap;

use goodwill_forms::config::RouterConfig;
use goodwill_forms::io::memory::{MemoryForms, MemorySpreadsheets};
use goodwill_forms::model::{Answer, Cell, FormItem, FormSubmission, Sheet};

pub const MASTER: &str = "master";
pub const MAPPINGS: &str = "mappings";
pub const FORM: &str = "form";
pub const SOMEWHERE_SHEET: &str = "somewhere-sheet";
pub const ELSEWHERE_SHEET: &str = "elsewhere-sheet";

pub const MASTER_HEADERS: [&str; 9] = [
    "Timestamp",
    "Your email address",
    "Goodwill Member Name",
    "Organization Name",
    "Program Name",
    "Format",
    "Should this program be available in Google Pathways?",
    "Program ID",
    "Row Identifier (DO NOT EDIT)",
];

pub fn config() -> RouterConfig {
    RouterConfig::new(MASTER, MAPPINGS, FORM)
}

pub fn mapping_sheet() -> Sheet {
    let mut sheet = Sheet::with_header("Mappings", ["Location", "Spreadsheet ID", "Short Name"]);
    sheet.rows = vec![
        text_row(&["Somewhere, CA", SOMEWHERE_SHEET, "SWCA"]),
        text_row(&["Elsewhere, OR", ELSEWHERE_SHEET, "EWOR"]),
    ];
    sheet
}

pub fn spreadsheets() -> MemorySpreadsheets {
    let mut sheets = MemorySpreadsheets::new();
    sheets.insert(MASTER, Sheet::with_header("Form Responses", MASTER_HEADERS));
    sheets.insert(MAPPINGS, mapping_sheet());
    sheets.insert(SOMEWHERE_SHEET, Sheet::default());
    sheets.insert(ELSEWHERE_SHEET, Sheet::default());
    sheets
}

pub fn form_items() -> Vec<FormItem> {
    vec![
        FormItem::section("Goodwill Info"),
        FormItem::question("Goodwill Member Name"),
        FormItem::question("Should this program be available in Google Pathways?"),
        FormItem::question("Format"),
    ]
}

pub fn forms() -> MemoryForms {
    let mut forms = MemoryForms::new();
    forms.insert(FORM, form_items());
    forms
}

pub fn text_row(values: &[&str]) -> Vec<Cell> {
    values.iter().map(|value| Cell::from(*value)).collect()
}

pub fn submission(member: &str, program_id: &str) -> FormSubmission {
    let values: Vec<String> = [
        "10/14/2026 09:30:00",
        "  someone@example.org ",
        member,
        "Goodwill of Somewhere",
        "Forklift Certification",
        "In person, Online",
        "Yes",
        program_id,
    ]
    .iter()
    .map(|value| value.to_string())
    .collect();

    let mut named_values = BTreeMap::new();
    for (header, value) in MASTER_HEADERS.iter().zip(values.iter()) {
        named_values.insert(header.to_string(), Answer::Multiple(vec![value.clone()]));
    }
    FormSubmission {
        values,
        named_values,
    }
}
