//! Form schemas
//!
//! Each form is a plain struct validated with `validator`; binding turns
//! submitted fields into either a cleaned value or per-field errors.

pub mod contact;

pub use contact::{ContactForm, ContactSubmission, FieldErrors, FormView};
