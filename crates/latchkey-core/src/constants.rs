//! Constants shared across the lock controller.
//!
//! Values mirror the reference hardware build (MFRC522 reader, SG90 servo,
//! two status LEDs) so a controller started with defaults behaves exactly
//! like the bench unit.

// ============================================================================
// Credential Format
// ============================================================================

/// Credential UID length in bytes.
///
/// # Value
///
/// 4 bytes: the single-size UID of MIFARE Classic tags, which is what the
/// reference reader delivers. Scans of any other length are defined as
/// non-matches, not errors.
pub const UID_SIZE: usize = 4;

// ============================================================================
// Timing
// ============================================================================

/// Default time the lock stays open before relocking, in milliseconds.
///
/// # Value
///
/// 5000 ms gives the operator time to open the door without leaving the
/// bolt retracted indefinitely.
pub const DEFAULT_OPEN_DURATION_MS: u32 = 5000;

/// Default control loop cadence in milliseconds.
///
/// # Value
///
/// 50 ms keeps scan-to-unlock latency imperceptible while leaving the
/// reader bus mostly idle.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;

// ============================================================================
// Actuator
// ============================================================================

/// Servo angle commanded while the lock is closed, in degrees.
pub const SERVO_ANGLE_CLOSED: u8 = 0;

/// Servo angle commanded while the lock is open, in degrees.
pub const SERVO_ANGLE_OPEN: u8 = 90;

/// Largest angle any supported servo accepts, in degrees.
///
/// Configured angles beyond this are rejected at validation time rather
/// than clamped at the driver.
pub const MAX_SERVO_ANGLE: u8 = 180;

// ============================================================================
// Default Allow-List
// ============================================================================

/// Tag UIDs authorized out of the box, as uppercase hex strings.
///
/// Replaced wholesale by configuration when a config file is supplied;
/// kept here so a bare `--help`-level install still opens for the tags
/// enrolled on the bench unit.
pub const DEFAULT_ALLOWED_TAGS: [&str; 3] = ["85CEDBD1", "B740945B", "09101112"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_angles_within_actuator_range() {
        assert!(SERVO_ANGLE_CLOSED <= MAX_SERVO_ANGLE);
        assert!(SERVO_ANGLE_OPEN <= MAX_SERVO_ANGLE);
    }

    #[test]
    fn test_default_tags_are_valid_hex() {
        for tag in DEFAULT_ALLOWED_TAGS {
            assert_eq!(tag.len(), UID_SIZE * 2);
            assert!(tag.chars().all(|c| c.is_ascii_hexdigit()));
        }
    }
}
