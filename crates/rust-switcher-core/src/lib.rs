//! Platform-agnostic decision logic for keyboard-layout auto-correction.
//!
//! This crate holds everything that does not need Win32: layout conversion,
//! the hybrid validator and its supporting stores, context history, and the
//! CLI/testing driver. The Windows application crate wires this into actual
//! keyboard/clipboard/UIA I/O.

pub mod cli_mode;
pub mod config;
pub mod history;
pub mod pipeline;
pub mod store;
pub mod text;
pub mod validator;
