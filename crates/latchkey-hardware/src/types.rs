//! Common types shared across hardware device implementations.
//!
//! This module defines types used by multiple device traits, such as
//! device information, reader metadata, and indicator channel names.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Generic device information.
///
/// Contains metadata about a hardware device such as name, model,
/// serial number, and firmware version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    /// Device name (e.g., "SG90", "MockServo").
    pub name: String,

    /// Device model identifier.
    pub model: String,

    /// Optional device serial number.
    pub serial_number: Option<String>,

    /// Optional firmware version string.
    pub firmware_version: Option<String>,
}

impl DeviceInfo {
    /// Create a new DeviceInfo with required fields.
    pub fn new(name: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
            serial_number: None,
            firmware_version: None,
        }
    }

    /// Set the serial number.
    pub fn with_serial_number(mut self, serial_number: impl Into<String>) -> Self {
        self.serial_number = Some(serial_number.into());
        self
    }

    /// Set the firmware version.
    pub fn with_firmware_version(mut self, firmware_version: impl Into<String>) -> Self {
        self.firmware_version = Some(firmware_version.into());
        self
    }
}

/// Proximity reader information.
///
/// Contains reader-specific metadata such as supported protocols
/// and maximum baud rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReaderInfo {
    /// Reader name (e.g., "MFRC522 NFC Reader").
    pub name: String,

    /// List of supported protocols (e.g., ["ISO14443A"]).
    pub protocols: Vec<String>,

    /// Maximum supported baud rate in bits per second.
    pub max_baud_rate: Option<u32>,
}

impl ReaderInfo {
    /// Create a new ReaderInfo.
    pub fn new(name: impl Into<String>, protocols: Vec<String>) -> Self {
        Self {
            name: name.into(),
            protocols,
            max_baud_rate: None,
        }
    }

    /// Set the maximum baud rate.
    pub fn with_max_baud_rate(mut self, max_baud_rate: u32) -> Self {
        self.max_baud_rate = Some(max_baud_rate);
        self
    }
}

/// Indicator channels on the status panel.
///
/// Exactly one channel is active at any time once the controller has
/// synced hardware: `Locked` while the bolt is engaged, `Unlocked` while
/// it is retracted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IndicatorChannel {
    /// Lit while the lock is closed (red LED on the reference build).
    Locked,

    /// Lit while the lock is open (green LED on the reference build).
    Unlocked,
}

impl fmt::Display for IndicatorChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Locked => write!(f, "locked"),
            Self::Unlocked => write!(f, "unlocked"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_info_builder() {
        let info = DeviceInfo::new("SG90", "Micro Servo")
            .with_serial_number("123456789")
            .with_firmware_version("v1.2");

        assert_eq!(info.name, "SG90");
        assert_eq!(info.model, "Micro Servo");
        assert_eq!(info.serial_number, Some("123456789".to_string()));
        assert_eq!(info.firmware_version, Some("v1.2".to_string()));
    }

    #[test]
    fn test_device_info_minimal() {
        let info = DeviceInfo::new("MockServo", "Mock");

        assert_eq!(info.name, "MockServo");
        assert_eq!(info.model, "Mock");
        assert_eq!(info.serial_number, None);
        assert_eq!(info.firmware_version, None);
    }

    #[test]
    fn test_reader_info() {
        let info =
            ReaderInfo::new("MFRC522", vec!["ISO14443A".to_string()]).with_max_baud_rate(424000);

        assert_eq!(info.name, "MFRC522");
        assert_eq!(info.protocols, vec!["ISO14443A"]);
        assert_eq!(info.max_baud_rate, Some(424000));
    }

    #[test]
    fn test_indicator_channel_display() {
        assert_eq!(IndicatorChannel::Locked.to_string(), "locked");
        assert_eq!(IndicatorChannel::Unlocked.to_string(), "unlocked");
    }

    #[test]
    fn test_indicator_channel_serialization() {
        let channel = IndicatorChannel::Unlocked;
        let json = serde_json::to_string(&channel).unwrap();
        let deserialized: IndicatorChannel = serde_json::from_str(&json).unwrap();
        assert_eq!(channel, deserialized);
    }
}
