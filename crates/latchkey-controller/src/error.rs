//! Error types for controller operations.

use thiserror::Error;

/// Result type alias for controller operations.
pub type Result<T> = std::result::Result<T, ControllerError>;

/// Errors surfaced by the control loop and its collaborators.
///
/// Only unrecoverable faults reach this type. Per-cycle reader anomalies
/// (a failed presence check, an incomplete read) are absorbed inside the
/// loop and logged instead.
#[derive(Debug, Error)]
pub enum ControllerError {
    /// A hardware driver failed in a way the loop cannot absorb:
    /// initialization, an actuator command, or an indicator write.
    #[error("Hardware fault: {0}")]
    Hardware(#[from] latchkey_hardware::HardwareError),

    /// Configuration could not be parsed or validated.
    #[error("Invalid configuration: {0}")]
    Config(#[from] latchkey_core::Error),
}
