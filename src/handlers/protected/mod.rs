// Handlers behind the JWT middleware; every request carries an AuthUser
// extension by the time it reaches these.
pub mod auth;
pub mod cases;
