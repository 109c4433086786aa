//! Core library for the goodwill-forms command line application.
//!
//! The library routes program-data form submissions into each member's own
//! spreadsheet and keeps the master sheet in step. Hosted-platform access sits
//! behind the traits in [`goodwill::forms::services`], with backends under
//! [`goodwill::forms::io`]. The handlers live in
//! [`goodwill::forms::submission`], [`goodwill::forms::rewrite`] and
//! [`goodwill::forms::selftest`]; [`goodwill::forms::pathways`] exports the
//! master sheet for the pathways catalogue.

pub mod goodwill;

pub use goodwill::forms::{
    FormsError, Result, config, email, error, io, mapping, model, pathways, rewrite, selftest,
    services, submission,
};
