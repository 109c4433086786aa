use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{FormsError, Result};
use crate::io::{excel_read, excel_write};
use crate::model::{Cell, RichText, Sheet};
use crate::services::SpreadsheetService;

/// Spreadsheets stored as `<id>.xlsx` files in one directory. Every call
/// loads the workbook, and mutating calls save it back before returning.
#[derive(Debug, Clone)]
pub struct WorkbookStore {
    root: PathBuf,
}

impl WorkbookStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the workbook backing `id`.
    pub fn path_for(&self, id: &str) -> PathBuf {
        self.root.join(format!("{id}.xlsx"))
    }

    /// Creates or replaces the workbook for `id`.
    pub fn create(&self, id: &str, sheet: &Sheet) -> Result<()> {
        std::fs::create_dir_all(&self.root)?;
        excel_write::write_sheet(&self.path_for(id), sheet)
    }

    pub fn load(&self, id: &str) -> Result<Sheet> {
        excel_read::read_sheet(&self.existing_path(id)?)
    }

    /// Path of an existing workbook. Ids that could step outside the root
    /// are reported as unknown.
    fn existing_path(&self, id: &str) -> Result<PathBuf> {
        if id.is_empty() || id.contains(['/', '\\']) || id.starts_with('.') {
            return Err(FormsError::UnknownSpreadsheet(id.to_string()));
        }
        let path = self.path_for(id);
        if !path.exists() {
            return Err(FormsError::UnknownSpreadsheet(id.to_string()));
        }
        Ok(path)
    }

    fn update<F>(&self, id: &str, mutate: F) -> Result<()>
    where
        F: FnOnce(&mut Sheet) -> Result<()>,
    {
        let mut sheet = self.load(id)?;
        mutate(&mut sheet)?;
        excel_write::write_sheet(&self.path_for(id), &sheet)?;
        debug!(id, rows = sheet.last_row(), "workbook saved");
        Ok(())
    }
}

impl SpreadsheetService for WorkbookStore {
    fn data_range(&self, id: &str) -> Result<Vec<Vec<Cell>>> {
        Ok(self.load(id)?.data_range())
    }

    fn header(&self, id: &str, width: usize) -> Result<Vec<RichText>> {
        Ok(self.load(id)?.header_cells(width))
    }

    fn set_header(&mut self, id: &str, header: &[RichText]) -> Result<()> {
        self.update(id, |sheet| {
            sheet.set_header(header);
            Ok(())
        })
    }

    fn append_row(&mut self, id: &str, row: &[Cell]) -> Result<()> {
        self.update(id, |sheet| {
            sheet.append_row(row);
            Ok(())
        })
    }

    fn last_row(&self, id: &str) -> Result<usize> {
        Ok(self.load(id)?.last_row())
    }

    fn max_columns(&self, id: &str) -> Result<usize> {
        Ok(self.load(id)?.max_columns())
    }

    fn delete_rows(&mut self, id: &str, position: usize, count: usize) -> Result<()> {
        self.update(id, |sheet| {
            if sheet.delete_rows(position, count) {
                Ok(())
            } else {
                Err(FormsError::InvalidWorkbook(format!(
                    "cannot delete {count} rows at row {position} of '{id}'"
                )))
            }
        })
    }

    fn url(&self, id: &str) -> Result<String> {
        let absolute = std::fs::canonicalize(self.existing_path(id)?)?;
        Ok(format!("file://{}", absolute.display()))
    }
}
