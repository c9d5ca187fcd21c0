// Token acquisition endpoints; no authentication required.
pub mod login;
pub mod register;

pub use login::login;
pub use register::register;
