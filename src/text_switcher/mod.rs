//! The Windows-side wiring for the portable hybrid validator: process-wide stores,
//! a lingua-backed dictionary oracle, the double-modifier manual override, and the
//! coordinator that ties enable/disable/pause state to the rest of the application.

pub mod coordinator;
pub mod double_mod;
pub mod lingua_oracle;
pub mod stores;
