pub mod case;
pub mod user;

pub use case::{Case, CasePatch, CasePayload, DistrictCount, NewCase};
pub use user::User;
