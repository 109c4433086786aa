//! Seams to the hosted spreadsheet, form and mail platforms.
//!
//! Every handler in the crate talks to the outside world exclusively through
//! these traits. [`crate::io::memory`] backs them with plain collections and
//! [`crate::io::workbook_store`], [`crate::io::form_files`] and
//! [`crate::io::outbox`] back them with a local directory tree.

use crate::error::Result;
use crate::model::{Cell, Email, FormItem, RichText};

/// Spreadsheet access by identifier. Only the active (first) sheet of each
/// spreadsheet is addressed.
pub trait SpreadsheetService {
    /// All values in the data range, header row first.
    fn data_range(&self, id: &str) -> Result<Vec<Vec<Cell>>>;

    /// The first `width` header cells with their formatting. Missing cells
    /// come back as empty plain text.
    fn header(&self, id: &str, width: usize) -> Result<Vec<RichText>>;

    /// Overwrites the leading header cells with `header`, keeping any cells
    /// past its end.
    fn set_header(&mut self, id: &str, header: &[RichText]) -> Result<()>;

    fn append_row(&mut self, id: &str, row: &[Cell]) -> Result<()>;

    /// Position of the last occupied row, 1-based, header included.
    fn last_row(&self, id: &str) -> Result<usize>;

    fn max_columns(&self, id: &str) -> Result<usize>;

    /// Deletes `count` rows starting at the 1-based `position`. Row 1 is the
    /// header and cannot be deleted.
    fn delete_rows(&mut self, id: &str, position: usize, count: usize) -> Result<()>;

    /// Address a person can open to edit the spreadsheet.
    fn url(&self, id: &str) -> Result<String>;
}

pub trait FormService {
    /// Form items in display order.
    fn items(&self, form_id: &str) -> Result<Vec<FormItem>>;
}

pub trait MailService {
    fn send(&mut self, email: &Email) -> Result<()>;
}

/// The three collaborators a handler needs, borrowed for one invocation.
pub struct Services<'a> {
    pub sheets: &'a mut dyn SpreadsheetService,
    pub forms: &'a dyn FormService,
    pub mail: &'a mut dyn MailService,
}

impl<'a> Services<'a> {
    pub fn new(
        sheets: &'a mut dyn SpreadsheetService,
        forms: &'a dyn FormService,
        mail: &'a mut dyn MailService,
    ) -> Self {
        Self { sheets, forms, mail }
    }
}
