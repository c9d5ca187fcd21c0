pub mod collection;
pub mod record;

// Re-export handler functions for use in routing
pub use collection::by_district;
pub use collection::get as list;
pub use collection::post as create;

pub use record::delete as record_delete;
pub use record::get as record_get;
pub use record::patch as record_patch;
pub use record::put as record_put;

use crate::error::ApiError;
use crate::services::case_service::Program;

/// Resolve the `:program` path segment. Unknown programs are a plain 404,
/// the same as any other unknown route.
pub(crate) fn resolve_program(program: &str) -> Result<Program, ApiError> {
    Program::parse(program)
        .ok_or_else(|| ApiError::not_found(format!("unknown program: {}", program)))
}
