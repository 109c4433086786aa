//! Backends for the [`services`](crate::services) traits.

pub mod excel_read;
pub mod excel_write;
pub mod form_files;
pub mod memory;
pub mod outbox;
pub mod workbook_store;

/// Worksheet recording, per header column, whether the header cell is bold.
pub const HEADER_FORMAT_SHEET: &str = "_HeaderFormat";
