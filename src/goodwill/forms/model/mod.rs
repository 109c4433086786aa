use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A single spreadsheet value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Cell {
    /// Plain text.
    Text(String),
    /// Numeric value. Dates read from workbooks land here as serial numbers.
    Number(f64),
    /// Boolean value.
    Bool(bool),
    /// Blank cell.
    Empty,
}

impl Cell {
    /// Follows spreadsheet-script truthiness: blank text, zero, `NaN`,
    /// `false` and blank cells are all falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Cell::Text(value) => !value.is_empty(),
            Cell::Number(value) => *value != 0.0 && !value.is_nan(),
            Cell::Bool(value) => *value,
            Cell::Empty => false,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(value) => f.write_str(value),
            Cell::Number(value) if value.fract() == 0.0 && value.abs() < 1e15 => {
                write!(f, "{}", *value as i64)
            }
            Cell::Number(value) => write!(f, "{value}"),
            Cell::Bool(value) => write!(f, "{value}"),
            Cell::Empty => Ok(()),
        }
    }
}

/// One formatted header cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RichText {
    pub text: String,
    pub bold: bool,
}

impl RichText {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
        }
    }

    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: true,
        }
    }
}

/// The active sheet of a spreadsheet: a formatted header row followed by
/// data rows.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Sheet {
    pub name: String,
    pub header: Vec<RichText>,
    pub rows: Vec<Vec<Cell>>,
}

impl Sheet {
    /// Creates a sheet whose header cells are all bold.
    pub fn with_header<I, S>(name: impl Into<String>, header: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            header: header.into_iter().map(RichText::bold).collect(),
            rows: Vec::new(),
        }
    }

    /// Header and data rows as plain values, header first.
    pub fn data_range(&self) -> Vec<Vec<Cell>> {
        let mut values = Vec::with_capacity(self.rows.len() + 1);
        if !self.header.is_empty() {
            values.push(
                self.header
                    .iter()
                    .map(|cell| {
                        if cell.text.is_empty() {
                            Cell::Empty
                        } else {
                            Cell::Text(cell.text.clone())
                        }
                    })
                    .collect(),
            );
        }
        values.extend(self.rows.iter().cloned());
        values
    }

    /// Position of the last occupied row, 1-based, header included.
    pub fn last_row(&self) -> usize {
        let header_rows = usize::from(!self.header.is_empty());
        header_rows + self.rows.len()
    }

    /// Widest row in the sheet, header included.
    pub fn max_columns(&self) -> usize {
        self.rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(self.header.len()))
            .max()
            .unwrap_or(0)
    }

    /// The first `width` header cells, padded with empty plain text.
    pub fn header_cells(&self, width: usize) -> Vec<RichText> {
        (0..width)
            .map(|idx| {
                self.header
                    .get(idx)
                    .cloned()
                    .unwrap_or_else(|| RichText::plain(""))
            })
            .collect()
    }

    /// Overwrites the leading header cells, growing the header when needed.
    pub fn set_header(&mut self, header: &[RichText]) {
        if self.header.len() < header.len() {
            self.header.resize(header.len(), RichText::plain(""));
        }
        self.header[..header.len()].clone_from_slice(header);
    }

    /// Appends a row after the last occupied row, with trailing blank cells
    /// removed.
    pub fn append_row(&mut self, row: &[Cell]) {
        let used = row
            .iter()
            .rposition(|cell| !cell.is_empty())
            .map_or(0, |idx| idx + 1);
        self.rows.push(row[..used].to_vec());
    }

    /// Deletes `count` rows starting at the 1-based `position`; the header is
    /// row 1. Returns `false` when the range does not fit inside the data rows.
    pub fn delete_rows(&mut self, position: usize, count: usize) -> bool {
        let header_rows = usize::from(!self.header.is_empty());
        if position <= header_rows || position == 0 {
            return false;
        }
        let start = position - 1 - header_rows;
        let Some(end) = start.checked_add(count) else {
            return false;
        };
        if end > self.rows.len() {
            return false;
        }
        self.rows.drain(start..end);
        true
    }
}

/// A mapping-table row keyed by header text.
pub type Record = BTreeMap<String, Cell>;

/// A participating organization and the spreadsheet holding its programs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub location: String,
    pub spreadsheet_id: String,
    pub short_name: String,
}

/// A named value of a form response. Checkbox questions arrive as lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    Single(String),
    Multiple(Vec<String>),
}

impl Answer {
    /// The first submitted value, if any.
    pub fn first(&self) -> Option<&str> {
        match self {
            Answer::Single(value) => Some(value.as_str()),
            Answer::Multiple(values) => values.first().map(String::as_str),
        }
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Answer::Single(value) => f.write_str(value),
            Answer::Multiple(values) => f.write_str(&values.join(",")),
        }
    }
}

/// Payload of a "form submitted" event.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSubmission {
    /// Answers in sheet column order.
    #[serde(default)]
    pub values: Vec<String>,
    /// Answers keyed by question title.
    #[serde(default)]
    pub named_values: BTreeMap<String, Answer>,
}

impl FormSubmission {
    /// Trimmed text of the named answer, or `None` when the question is absent.
    pub fn trimmed(&self, question: &str) -> Option<String> {
        self.named_values
            .get(question)
            .map(|answer| answer.to_string().trim().to_string())
    }
}

/// Kind of a form item, kept as descriptive metadata from the form export.
/// Confirmation emails ignore it: an item renders as a bold header only when
/// the submission has no answer under its title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    #[default]
    Question,
    SectionHeader,
    PageBreak,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormItem {
    pub title: String,
    #[serde(default)]
    pub kind: ItemKind,
}

impl FormItem {
    pub fn question(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            kind: ItemKind::Question,
        }
    }

    pub fn section(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            kind: ItemKind::SectionHeader,
        }
    }
}

/// A form definition as stored by the local form backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormDefinition {
    pub id: String,
    #[serde(default)]
    pub title: String,
    pub items: Vec<FormItem>,
}

/// An outgoing HTML email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Email {
    pub to: String,
    pub subject: String,
    pub html_body: String,
    pub no_reply: bool,
}
