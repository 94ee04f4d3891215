//! Hardware device trait definitions.
//!
//! This module defines trait interfaces for the three peripherals a lock
//! controller drives: the proximity tag reader, the bolt actuator, and the
//! status indicator panel. These traits establish the contract between the
//! controller and its devices, enabling substitution between mock and real
//! hardware implementations.
//!
//! All traits use native `async fn` methods (Rust 1.90 + Edition 2024 RPITIT),
//! eliminating the need for the `async_trait` macro.

#![allow(async_fn_in_trait)]

use crate::error::Result;
use crate::types::{DeviceInfo, IndicatorChannel, ReaderInfo};

/// A raw proximity tag scan.
///
/// Carries the UID bytes exactly as the reader delivered them, plus the
/// wall-clock time of the read for diagnostics. UID length is deliberately
/// not validated here: the access decision treats a wrong-length UID as an
/// ordinary non-match, so the scan type must be able to represent one.
#[derive(Debug, Clone, PartialEq)]
pub struct TagScan {
    /// UID bytes as delivered by the reader.
    pub uid: Vec<u8>,

    /// Timestamp when the read completed.
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl TagScan {
    /// Create a new scan with the current timestamp.
    ///
    /// # Examples
    ///
    /// ```
    /// use latchkey_hardware::traits::TagScan;
    ///
    /// let scan = TagScan::new(vec![0x85, 0xCE, 0xDB, 0xD1]);
    /// assert_eq!(scan.uid_hex(), "85CEDBD1");
    /// ```
    pub fn new(uid: Vec<u8>) -> Self {
        Self {
            uid,
            timestamp: chrono::Utc::now(),
        }
    }

    /// Create a scan with a custom timestamp, for replaying recorded events.
    pub fn with_timestamp(uid: Vec<u8>, timestamp: chrono::DateTime<chrono::Utc>) -> Self {
        Self { uid, timestamp }
    }

    /// Get the UID as an uppercase hexadecimal string.
    pub fn uid_hex(&self) -> String {
        self.uid
            .iter()
            .map(|b| format!("{:02X}", b))
            .collect::<Vec<_>>()
            .join("")
    }
}

/// Proximity tag reader abstraction.
///
/// Represents an NFC/RFID reader polled for tag presence. A successful read
/// opens a session with the tag; the controller releases the session once
/// the scan has been evaluated so the same tag can be read again later.
///
/// # Object Safety and Dynamic Dispatch
///
/// **NOTE**: This trait is NOT object-safe because `async fn` methods return
/// `impl Future`, which is an opaque type that cannot be used in trait objects
/// (Edition 2024 RPITIT). You cannot use `Box<dyn ProximityReader>` or
/// `&dyn ProximityReader`. Use generic type parameters instead:
///
/// ```no_run
/// use latchkey_hardware::traits::{ProximityReader, TagScan};
/// use latchkey_hardware::error::Result;
///
/// async fn next_scan<R: ProximityReader>(reader: &mut R) -> Result<Option<TagScan>> {
///     if !reader.presence_detected().await? {
///         return Ok(None);
///     }
///     let scan = reader.read_scan().await?;
///     reader.release_session().await?;
///     Ok(Some(scan))
/// }
/// ```
pub trait ProximityReader: Send + Sync {
    /// Check whether a tag is currently in the reader field.
    ///
    /// This is a non-blocking check that returns immediately.
    ///
    /// # Errors
    ///
    /// Returns an error if a communication error occurs while checking
    /// for tag presence.
    async fn presence_detected(&self) -> Result<bool>;

    /// Read the UID of the tag in the field.
    ///
    /// Must only be called after [`presence_detected`](Self::presence_detected)
    /// reported a tag. A read can still fail partway if the tag leaves the
    /// field mid-transaction; callers treat that as "no scan this cycle".
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The tag left the field before the UID transfer completed
    /// - A communication error occurs
    /// - The device is disconnected
    async fn read_scan(&mut self) -> Result<TagScan>;

    /// Release the session with the current tag.
    ///
    /// Halts the tag and resets reader crypto state so the same tag can be
    /// detected again on a later poll. Called after every completed read,
    /// whether or not the scan was authorized.
    ///
    /// # Errors
    ///
    /// Returns an error if a communication error occurs while releasing
    /// the session.
    async fn release_session(&mut self) -> Result<()>;

    /// Get reader information.
    ///
    /// Returns metadata about the reader including name, supported
    /// protocols, and maximum baud rate.
    ///
    /// # Errors
    ///
    /// Returns an error if a communication error occurs while querying
    /// reader information.
    async fn reader_info(&self) -> Result<ReaderInfo>;
}

/// Lock bolt actuator abstraction.
///
/// Represents the servo that physically engages and retracts the bolt.
/// The controller only ever commands absolute angles; the closed and open
/// positions come from configuration.
///
/// # Object Safety and Dynamic Dispatch
///
/// **NOTE**: Not object-safe, same as [`ProximityReader`]. Use generic
/// type parameters.
pub trait LockActuator: Send + Sync {
    /// Command the actuator to the given angle in degrees.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The angle is outside the range the device supports
    /// - A communication error occurs
    /// - The device is disconnected
    async fn set_angle(&mut self, degrees: u8) -> Result<()>;

    /// Get device information.
    ///
    /// # Errors
    ///
    /// Returns an error if a communication error occurs while querying
    /// device information.
    async fn device_info(&self) -> Result<DeviceInfo>;
}

/// Status indicator panel abstraction.
///
/// Represents the pair of lamps showing whether the lock is currently
/// closed or open. Channels are set individually; the controller always
/// writes both channels when syncing so the panel never shows a stale
/// combination.
///
/// # Object Safety and Dynamic Dispatch
///
/// **NOTE**: Not object-safe, same as [`ProximityReader`]. Use generic
/// type parameters.
pub trait IndicatorPanel: Send + Sync {
    /// Set one indicator channel on or off.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A communication error occurs
    /// - The device is disconnected
    async fn set_output(&mut self, channel: IndicatorChannel, active: bool) -> Result<()>;

    /// Get device information.
    ///
    /// # Errors
    ///
    /// Returns an error if a communication error occurs while querying
    /// device information.
    async fn device_info(&self) -> Result<DeviceInfo>;
}
