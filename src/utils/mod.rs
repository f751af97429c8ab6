//! Small cross-cutting utilities: startup tracing setup and the Win32 helper
//! re-exports shared across `platform`.

pub mod helpers;
pub mod tracing;
