// Two handler tiers: public (no auth, token acquisition) and protected
// (JWT required, /api/*).
pub mod protected;
pub mod public;
