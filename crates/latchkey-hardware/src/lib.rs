//! Hardware device abstraction layer for the latchkey lock controller.
//!
//! This crate provides trait-based abstractions for the peripherals a safe
//! lock is built from: the proximity tag reader, the bolt servo, and the
//! status indicator panel. These traits enable substitution between mock
//! implementations (for development and testing) and real hardware drivers.
//!
//! # Design Philosophy
//!
//! The hardware abstraction layer is designed with the following principles:
//!
//! - **Async-first**: All I/O operations are asynchronous using native `async fn`
//!   in traits (Rust 1.90 + Edition 2024 RPITIT).
//! - **Thread-safe**: All traits require `Send + Sync` for use with Tokio.
//! - **Error-aware**: All operations return `Result<T>` with detailed error
//!   information; the controller decides which failures it can absorb.
//!
//! # Device Traits
//!
//! ## Proximity Readers
//!
//! The [`ProximityReader`] trait represents NFC/RFID tag readers polled for
//! presence. A completed read opens a tag session that the caller releases
//! once the scan has been evaluated:
//!
//! ```no_run
//! use latchkey_hardware::traits::ProximityReader;
//! use latchkey_hardware::error::Result;
//!
//! async fn scan_once<R: ProximityReader>(reader: &mut R) -> Result<Option<String>> {
//!     if !reader.presence_detected().await? {
//!         return Ok(None);
//!     }
//!     let scan = reader.read_scan().await?;
//!     reader.release_session().await?;
//!     Ok(Some(scan.uid_hex()))
//! }
//! ```
//!
//! ## Lock Actuators
//!
//! The [`LockActuator`] trait represents the servo driving the bolt:
//!
//! ```no_run
//! use latchkey_hardware::traits::LockActuator;
//! use latchkey_hardware::error::Result;
//!
//! async fn retract_bolt<A: LockActuator>(servo: &mut A) -> Result<()> {
//!     servo.set_angle(90).await
//! }
//! ```
//!
//! ## Indicator Panels
//!
//! The [`IndicatorPanel`] trait represents the locked/unlocked status lamps:
//!
//! ```no_run
//! use latchkey_hardware::traits::IndicatorPanel;
//! use latchkey_hardware::types::IndicatorChannel;
//! use latchkey_hardware::error::Result;
//!
//! async fn show_locked<P: IndicatorPanel>(panel: &mut P) -> Result<()> {
//!     panel.set_output(IndicatorChannel::Locked, true).await?;
//!     panel.set_output(IndicatorChannel::Unlocked, false).await?;
//!     Ok(())
//! }
//! ```
//!
//! # Error Handling
//!
//! All operations return [`Result<T>`][error::Result] which uses the
//! [`HardwareError`] error type. This provides detailed context about
//! hardware failures including disconnections, timeouts, and incomplete
//! tag reads.
//!
//! # Mock Implementations
//!
//! The [`mock`] module provides simulated devices paired with test handles,
//! so the full controller can run without physical hardware.
//!
//! [`ProximityReader`]: traits::ProximityReader
//! [`LockActuator`]: traits::LockActuator
//! [`IndicatorPanel`]: traits::IndicatorPanel

pub mod error;
pub mod mock;
pub mod traits;
pub mod types;

// Re-export commonly used types for convenience
pub use error::{HardwareError, Result};
pub use traits::{IndicatorPanel, LockActuator, ProximityReader, TagScan};
pub use types::{DeviceInfo, IndicatorChannel, ReaderInfo};
