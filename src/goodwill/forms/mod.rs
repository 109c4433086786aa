pub mod config;
pub mod email;
pub mod error;
pub mod io;
pub mod mapping;
pub mod model;
pub mod pathways;
pub mod rewrite;
pub mod selftest;
pub mod services;
pub mod submission;

pub use error::{FormsError, Result};
