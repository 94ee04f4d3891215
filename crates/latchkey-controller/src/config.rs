//! Controller configuration.
//!
//! Configuration is injected once at startup and immutable afterwards.
//! Every field has a default mirroring the reference hardware build, so a
//! bare `ControllerConfig::default()` drives the bench unit correctly.

use latchkey_core::constants::{
    DEFAULT_ALLOWED_TAGS, DEFAULT_OPEN_DURATION_MS, DEFAULT_POLL_INTERVAL_MS, MAX_SERVO_ANGLE,
    SERVO_ANGLE_CLOSED, SERVO_ANGLE_OPEN,
};
use latchkey_core::{AllowList, Error};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Closed/open actuator angle pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServoAngles {
    /// Angle commanded while the lock is closed, in degrees.
    pub closed: u8,

    /// Angle commanded while the lock is open, in degrees.
    pub open: u8,
}

/// Static configuration for a lock controller.
///
/// Unknown fields in a config file are rejected; missing fields fall back
/// to the defaults below.
///
/// # Examples
///
/// ```
/// use latchkey_controller::ControllerConfig;
///
/// let config = ControllerConfig::default();
/// assert_eq!(config.open_duration_ms, 5000);
/// assert_eq!(config.poll_interval_ms, 50);
/// config.validate().unwrap();
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ControllerConfig {
    /// Authorized tag UIDs as hex strings (e.g. "85CEDBD1").
    pub allowed_tags: Vec<String>,

    /// How long the lock stays open before relocking, in milliseconds.
    pub open_duration_ms: u32,

    /// Control loop cadence in milliseconds.
    pub poll_interval_ms: u64,

    /// Servo angle commanded while closed, in degrees.
    pub closed_angle: u8,

    /// Servo angle commanded while open, in degrees.
    pub open_angle: u8,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            allowed_tags: DEFAULT_ALLOWED_TAGS.iter().map(|s| s.to_string()).collect(),
            open_duration_ms: DEFAULT_OPEN_DURATION_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            closed_angle: SERVO_ANGLE_CLOSED,
            open_angle: SERVO_ANGLE_OPEN,
        }
    }
}

impl ControllerConfig {
    /// Parse `allowed_tags` into an [`AllowList`].
    ///
    /// An empty tag list is legal and yields a list that rejects every scan.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCredential`] on the first malformed entry.
    pub fn allow_list(&self) -> latchkey_core::Result<AllowList> {
        AllowList::from_hex(&self.allowed_tags)
    }

    /// Validate field ranges and the allow-list entries.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the poll interval is zero or an angle
    /// exceeds [`MAX_SERVO_ANGLE`], and [`Error::InvalidCredential`] if an
    /// allow-list entry cannot be parsed.
    pub fn validate(&self) -> latchkey_core::Result<()> {
        if self.poll_interval_ms == 0 {
            return Err(Error::Config(
                "poll_interval_ms must be non-zero".to_string(),
            ));
        }
        if self.open_duration_ms == 0 {
            return Err(Error::Config(
                "open_duration_ms must be non-zero".to_string(),
            ));
        }
        if self.closed_angle > MAX_SERVO_ANGLE || self.open_angle > MAX_SERVO_ANGLE {
            return Err(Error::Config(format!(
                "servo angles must be 0-{MAX_SERVO_ANGLE} degrees, got closed={} open={}",
                self.closed_angle, self.open_angle
            )));
        }
        self.allow_list()?;
        Ok(())
    }

    /// Poll cadence as a [`Duration`].
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// The actuator angle pair used when syncing hardware.
    pub fn servo_angles(&self) -> ServoAngles {
        ServoAngles {
            closed: self.closed_angle,
            open: self.open_angle,
        }
    }
}
