use std::path::Path;

use rust_xlsxwriter::{Format, Workbook, Worksheet};

use crate::error::Result;
use crate::io::HEADER_FORMAT_SHEET;
use crate::model::{Cell, Sheet};

/// Writes the sheet to the given path as the workbook's first worksheet,
/// followed by the header-format sheet recording which header cells are bold.
pub fn write_sheet(path: &Path, sheet: &Sheet) -> Result<()> {
    let mut workbook_writer = Workbook::new();
    let bold = Format::new().set_bold();

    let worksheet = workbook_writer.add_worksheet();
    worksheet.set_name(sanitize_sheet_name(&sheet.name))?;

    for (col_idx, header) in sheet.header.iter().enumerate() {
        if header.text.is_empty() {
            continue;
        }
        if header.bold {
            worksheet.write_string_with_format(0, col_idx as u16, &header.text, &bold)?;
        } else {
            worksheet.write_string(0, col_idx as u16, &header.text)?;
        }
    }

    let first_data_row = u32::from(!sheet.header.is_empty());
    for (row_idx, row) in sheet.rows.iter().enumerate() {
        for (col_idx, cell) in row.iter().enumerate() {
            write_cell(worksheet, first_data_row + row_idx as u32, col_idx as u16, cell)?;
        }
    }

    let formats = workbook_writer.add_worksheet();
    formats.set_name(HEADER_FORMAT_SHEET)?;
    for (col_idx, header) in sheet.header.iter().enumerate() {
        let flag = if header.bold { "bold" } else { "plain" };
        formats.write_string(0, col_idx as u16, flag)?;
    }

    workbook_writer.save(path)?;
    Ok(())
}

fn write_cell(worksheet: &mut Worksheet, row: u32, col: u16, cell: &Cell) -> Result<()> {
    match cell {
        Cell::Text(value) if value.is_empty() => {}
        Cell::Text(value) => {
            worksheet.write_string(row, col, value)?;
        }
        Cell::Number(value) => {
            worksheet.write_number(row, col, *value)?;
        }
        Cell::Bool(value) => {
            worksheet.write_boolean(row, col, *value)?;
        }
        Cell::Empty => {}
    }
    Ok(())
}

/// Worksheet names are at most 31 characters and exclude `:\/?*[]'"`.
fn sanitize_sheet_name(raw: &str) -> String {
    let invalid = [':', '\\', '/', '?', '*', '[', ']', '\'', '"'];
    let mut sanitized: String = raw
        .chars()
        .map(|ch| {
            if invalid.contains(&ch) || ch.is_control() {
                '_'
            } else {
                ch
            }
        })
        .collect();

    sanitized = sanitized.trim().to_string();
    if sanitized.is_empty() || sanitized == HEADER_FORMAT_SHEET {
        sanitized = "Sheet1".to_string();
    }

    if sanitized.chars().count() > 31 {
        sanitized = sanitized.chars().take(31).collect();
    }

    sanitized
}
