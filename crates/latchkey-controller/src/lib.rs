//! Lock controller crate: state machine, hardware sync, and control loop.
//!
//! This crate contains the decision-making core of the latchkey system.
//! [`LockStateMachine`] owns the Closed/Open state and applies the
//! transition rules; [`HardwareCommand`] maps each state to the complete
//! output set it implies; [`ControlLoop`] drives both against the device
//! traits from `latchkey-hardware` at a fixed polling cadence.
//!
//! Devices are supplied as generic trait implementations, so the same loop
//! runs against the mock suite in tests and real drivers in production.

pub mod clock;
pub mod config;
pub mod control_loop;
pub mod error;
pub mod state_machine;
pub mod sync;

pub use clock::MonotonicClock;
pub use config::{ControllerConfig, ServoAngles};
pub use control_loop::ControlLoop;
pub use error::{ControllerError, Result};
pub use state_machine::{LockState, LockStateMachine, StateChange};
pub use sync::{HardwareCommand, apply_command};
