//! symptom-core: Patient domain types shared by the registry service
//!
//! This crate provides the Patient model, its validation rules, list
//! sorting/pagination, and the structured error body.

pub mod error;
pub mod outcome;
pub mod page;
pub mod patient;
pub mod validation;

pub use error::QueryError;
pub use outcome::{ErrorBody, ErrorKind};
pub use page::{Direction, ListQuery, Page, PageMeta, PageRequest, Sort, SortField};
pub use patient::{NewPatient, Patient, PatientInput, demo_patients, today};
pub use validation::{ValidationContext, Validator, Violation, ViolationCode};
