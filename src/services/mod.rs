pub mod case_service;

pub use case_service::{CaseError, CaseService, Program, VisibilityScope};
