//! Database access layer for spoke-ui

pub mod assessments;

pub use assessments::ListFilter;
