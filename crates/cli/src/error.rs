//! CLI exit codes for scripting and automation.
//!
//! Responsibilities:
//! - Define structured exit codes that scripts can use to distinguish error types.
//! - Map command errors to exit codes.
//!
//! Does NOT handle:
//! - Error message formatting (handled by anyhow Display).
//!
//! Invariants:
//! - A key that no source supplies exits with `NotFound`, every other failure
//!   with `GeneralError`.

use thiserror::Error;

/// Structured exit codes for stratum-config.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Success - command completed successfully.
    Success = 0,

    /// General error - unreadable configuration, usage errors, anything unhandled.
    GeneralError = 1,

    /// Key not found - no source supplies a value for the requested key.
    ///
    /// Scripts can fall back to their own default.
    NotFound = 4,
}

impl ExitCode {
    /// Convert the exit code to an i32 for use with std::process::exit().
    pub const fn as_i32(self) -> i32 {
        self as u8 as i32
    }
}

/// No source supplies a value for a requested key.
#[derive(Debug, Error)]
#[error("key '{key}' is not set by any configuration source")]
pub struct KeyNotFound {
    pub key: String,
}

/// Extension trait for anyhow::Error to extract exit codes.
pub trait ExitCodeExt {
    fn exit_code(&self) -> ExitCode;
}

impl ExitCodeExt for anyhow::Error {
    fn exit_code(&self) -> ExitCode {
        if self
            .chain()
            .any(|cause| cause.downcast_ref::<KeyNotFound>().is_some())
        {
            ExitCode::NotFound
        } else {
            ExitCode::GeneralError
        }
    }
}
