use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use crate::error::{FormsError, Result};
use crate::model::{Cell, Email, FormItem, RichText, Sheet};
use crate::services::{FormService, MailService, SpreadsheetService};

/// Spreadsheets held in memory, keyed by identifier.
#[derive(Debug, Clone, Default)]
pub struct MemorySpreadsheets {
    sheets: BTreeMap<String, Sheet>,
}

impl MemorySpreadsheets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>, sheet: Sheet) {
        self.sheets.insert(id.into(), sheet);
    }

    pub fn get(&self, id: &str) -> Option<&Sheet> {
        self.sheets.get(id)
    }

    fn sheet(&self, id: &str) -> Result<&Sheet> {
        self.sheets
            .get(id)
            .ok_or_else(|| FormsError::UnknownSpreadsheet(id.to_string()))
    }

    fn sheet_mut(&mut self, id: &str) -> Result<&mut Sheet> {
        self.sheets
            .get_mut(id)
            .ok_or_else(|| FormsError::UnknownSpreadsheet(id.to_string()))
    }
}

impl SpreadsheetService for MemorySpreadsheets {
    fn data_range(&self, id: &str) -> Result<Vec<Vec<Cell>>> {
        Ok(self.sheet(id)?.data_range())
    }

    fn header(&self, id: &str, width: usize) -> Result<Vec<RichText>> {
        Ok(self.sheet(id)?.header_cells(width))
    }

    fn set_header(&mut self, id: &str, header: &[RichText]) -> Result<()> {
        self.sheet_mut(id)?.set_header(header);
        Ok(())
    }

    fn append_row(&mut self, id: &str, row: &[Cell]) -> Result<()> {
        self.sheet_mut(id)?.append_row(row);
        Ok(())
    }

    fn last_row(&self, id: &str) -> Result<usize> {
        Ok(self.sheet(id)?.last_row())
    }

    fn max_columns(&self, id: &str) -> Result<usize> {
        Ok(self.sheet(id)?.max_columns())
    }

    fn delete_rows(&mut self, id: &str, position: usize, count: usize) -> Result<()> {
        if self.sheet_mut(id)?.delete_rows(position, count) {
            Ok(())
        } else {
            Err(FormsError::InvalidWorkbook(format!(
                "cannot delete {count} rows at row {position} of '{id}'"
            )))
        }
    }

    fn url(&self, id: &str) -> Result<String> {
        self.sheet(id)?;
        Ok(format!("memory://spreadsheets/{id}"))
    }
}

/// Form definitions held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryForms {
    forms: HashMap<String, Vec<FormItem>>,
}

impl MemoryForms {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>, items: Vec<FormItem>) {
        self.forms.insert(id.into(), items);
    }
}

impl FormService for MemoryForms {
    fn items(&self, form_id: &str) -> Result<Vec<FormItem>> {
        self.forms
            .get(form_id)
            .cloned()
            .ok_or_else(|| FormsError::UnknownForm(form_id.to_string()))
    }
}

/// Collects sent mail instead of delivering it.
#[derive(Debug, Clone, Default)]
pub struct MemoryOutbox {
    pub sent: Vec<Email>,
}

impl MemoryOutbox {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MailService for MemoryOutbox {
    fn send(&mut self, email: &Email) -> Result<()> {
        debug!(to = %email.to, subject = %email.subject, "email captured");
        self.sent.push(email.clone());
        Ok(())
    }
}
