//! Error types for hardware operations.
//!
//! This module defines error types specific to hardware device operations,
//! covering failure scenarios such as device disconnection, timeouts,
//! incomplete tag reads, and unsupported operations.

/// Result type alias for hardware operations.
pub type Result<T> = std::result::Result<T, HardwareError>;

/// Errors that can occur during hardware device operations.
#[derive(Debug, thiserror::Error)]
pub enum HardwareError {
    /// Device is not connected or has been disconnected.
    #[error("Device disconnected: {device}")]
    Disconnected { device: String },

    /// Operation timed out after specified duration.
    #[error("Operation timeout after {duration_ms}ms")]
    Timeout { duration_ms: u64 },

    /// Operation is not supported by this device.
    #[error("Unsupported operation: {operation}")]
    Unsupported { operation: String },

    /// Device communication error.
    #[error("Communication error: {message}")]
    CommunicationError { message: String },

    /// Device initialization failed.
    #[error("Initialization failed: {message}")]
    InitializationFailed { message: String },

    /// A tag was detected but its UID could not be read completely.
    #[error("Scan read error: {message}")]
    ScanReadError { message: String },

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error with custom message.
    #[error("{0}")]
    Other(String),
}

impl HardwareError {
    /// Create a new disconnected error.
    pub fn disconnected(device: impl Into<String>) -> Self {
        Self::Disconnected {
            device: device.into(),
        }
    }

    /// Create a new timeout error.
    pub fn timeout(duration_ms: u64) -> Self {
        Self::Timeout { duration_ms }
    }

    /// Create a new unsupported operation error.
    pub fn unsupported(operation: impl Into<String>) -> Self {
        Self::Unsupported {
            operation: operation.into(),
        }
    }

    /// Create a new communication error.
    pub fn communication(message: impl Into<String>) -> Self {
        Self::CommunicationError {
            message: message.into(),
        }
    }

    /// Create a new initialization failed error.
    pub fn initialization_failed(message: impl Into<String>) -> Self {
        Self::InitializationFailed {
            message: message.into(),
        }
    }

    /// Create a new scan read error.
    pub fn scan_read(message: impl Into<String>) -> Self {
        Self::ScanReadError {
            message: message.into(),
        }
    }

    /// Create a generic error with custom message.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disconnected_error() {
        let error = HardwareError::disconnected("MFRC522");
        assert!(matches!(error, HardwareError::Disconnected { .. }));
        assert_eq!(error.to_string(), "Device disconnected: MFRC522");
    }

    #[test]
    fn test_timeout_error() {
        let error = HardwareError::timeout(3000);
        assert!(matches!(error, HardwareError::Timeout { .. }));
        assert_eq!(error.to_string(), "Operation timeout after 3000ms");
    }

    #[test]
    fn test_unsupported_error() {
        let error = HardwareError::unsupported("set_angle");
        assert!(matches!(error, HardwareError::Unsupported { .. }));
        assert_eq!(error.to_string(), "Unsupported operation: set_angle");
    }

    #[test]
    fn test_scan_read_error() {
        let error = HardwareError::scan_read("anticollision failed");
        assert!(matches!(error, HardwareError::ScanReadError { .. }));
        assert_eq!(error.to_string(), "Scan read error: anticollision failed");
    }

    #[test]
    fn test_initialization_failed_error() {
        let error = HardwareError::initialization_failed("SPI bus not available");
        assert!(matches!(error, HardwareError::InitializationFailed { .. }));
        assert_eq!(
            error.to_string(),
            "Initialization failed: SPI bus not available"
        );
    }

    #[test]
    fn test_error_display() {
        let errors = vec![
            HardwareError::disconnected("Device1"),
            HardwareError::timeout(1000),
            HardwareError::unsupported("operation"),
            HardwareError::communication("bus error"),
            HardwareError::other("anything"),
        ];

        for error in errors {
            let _ = format!("{}", error);
            let _ = format!("{:?}", error);
        }
    }
}
