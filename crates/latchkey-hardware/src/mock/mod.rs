//! Mock device implementations for testing and development.
//!
//! This module provides simulated device implementations that can be controlled
//! programmatically without requiring physical hardware. Each mock comes with a
//! paired handle: the device side is handed to the controller, the handle side
//! stays with the test (or the daemon) to inject scans and observe commands.

pub mod indicator;
pub mod reader;
pub mod servo;

// Re-export commonly used types
pub use indicator::{MockIndicatorHandle, MockIndicatorPanel};
pub use reader::{MockProximityReader, MockReaderHandle};
pub use servo::{MockLockServo, MockServoHandle};
