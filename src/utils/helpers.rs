//! Re-exports the root Win32 helpers under the `utils` namespace the platform
//! layer imports from.

pub use crate::helpers::*;
