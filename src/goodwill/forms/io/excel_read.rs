use std::path::Path;

use calamine::{DataType, Range, Reader, Xlsx, open_workbook};

use crate::error::{FormsError, Result};
use crate::io::HEADER_FORMAT_SHEET;
use crate::model::{Cell, RichText, Sheet};

/// Reads the active sheet of a workbook written by
/// [`excel_write`](crate::io::excel_write). The active sheet is the first
/// worksheet that is not the header-format sheet.
pub fn read_sheet(path: &Path) -> Result<Sheet> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;

    let sheet_names: Vec<String> = workbook.sheet_names().to_owned();
    let name = sheet_names
        .iter()
        .find(|name| name.as_str() != HEADER_FORMAT_SHEET)
        .cloned()
        .ok_or_else(|| FormsError::InvalidWorkbook(format!("{} has no worksheets", path.display())))?;

    let grid = range_to_grid(&read_required_sheet(&mut workbook, &name)?);
    let bold_flags = if sheet_names.iter().any(|name| name == HEADER_FORMAT_SHEET) {
        parse_header_format(&read_required_sheet(&mut workbook, HEADER_FORMAT_SHEET)?)
    } else {
        Vec::new()
    };

    let mut rows = grid.into_iter();
    let header_values = rows.next().unwrap_or_default();
    let width = header_values.len().max(bold_flags.len());
    let header = (0..width)
        .map(|idx| RichText {
            text: header_values.get(idx).map(Cell::to_string).unwrap_or_default(),
            bold: bold_flags.get(idx).copied().unwrap_or(false),
        })
        .collect();

    Ok(Sheet {
        name,
        header,
        rows: rows.collect(),
    })
}

fn read_required_sheet<R: std::io::Read + std::io::Seek>(
    workbook: &mut Xlsx<R>,
    name: &str,
) -> Result<Range<DataType>> {
    let range_result = workbook
        .worksheet_range(name)
        .ok_or_else(|| FormsError::InvalidWorkbook(format!("missing sheet '{name}'")))?;
    let range = range_result.map_err(FormsError::from)?;
    Ok(range)
}

/// Expands a range into rows anchored at A1. Trailing blank cells of each
/// row are dropped.
fn range_to_grid(range: &Range<DataType>) -> Vec<Vec<Cell>> {
    let (row_offset, col_offset) = range
        .start()
        .map(|(row, col)| (row as usize, col as usize))
        .unwrap_or((0, 0));

    let mut grid = vec![Vec::new(); row_offset];
    for row in range.rows() {
        let mut cells = vec![Cell::Empty; col_offset];
        cells.extend(row.iter().map(data_to_cell));
        let used = cells
            .iter()
            .rposition(|cell| !cell.is_empty())
            .map_or(0, |idx| idx + 1);
        cells.truncate(used);
        grid.push(cells);
    }
    grid
}

fn parse_header_format(range: &Range<DataType>) -> Vec<bool> {
    match range.rows().next() {
        Some(first_row) => first_row
            .iter()
            .map(|cell| matches!(cell, DataType::String(value) if value == "bold"))
            .collect(),
        None => Vec::new(),
    }
}

fn data_to_cell(cell: &DataType) -> Cell {
    match cell {
        DataType::String(value) if value.is_empty() => Cell::Empty,
        DataType::String(value) => Cell::Text(value.clone()),
        DataType::Float(value) => Cell::Number(*value),
        DataType::Int(value) => Cell::Number(*value as f64),
        DataType::Bool(value) => Cell::Bool(*value),
        DataType::DateTime(value) => Cell::Number(*value),
        DataType::Empty => Cell::Empty,
        other => Cell::Text(other.to_string()),
    }
}
