//! Mock lock servo implementation for testing and development.
//!
//! This module provides a simulated bolt actuator that records every angle
//! command so tests can assert the exact hardware command sequence.

use crate::{Result, traits::LockActuator, types::DeviceInfo};
use tokio::sync::mpsc;

/// Mock servo actuator for testing and development.
///
/// Tracks the last commanded angle and forwards every command to the paired
/// [`MockServoHandle`] in order.
///
/// # Examples
///
/// ```
/// use latchkey_hardware::mock::MockLockServo;
/// use latchkey_hardware::traits::LockActuator;
///
/// #[tokio::main]
/// async fn main() -> latchkey_hardware::Result<()> {
///     let (mut servo, mut handle) = MockLockServo::new();
///
///     servo.set_angle(90).await?;
///     assert_eq!(servo.current_angle(), Some(90));
///     assert_eq!(handle.commanded_angles(), vec![90]);
///
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockLockServo {
    /// Channel sender forwarding angle commands to the handle
    command_tx: mpsc::UnboundedSender<u8>,

    /// Last commanded angle, None until the first command
    current_angle: Option<u8>,

    /// Device name
    name: String,
}

impl MockLockServo {
    /// Create a new mock servo with the default name.
    ///
    /// Returns a tuple of (MockLockServo, MockServoHandle) where the handle
    /// observes the command stream.
    pub fn new() -> (Self, MockServoHandle) {
        Self::with_name("Mock SG90 Servo".to_string())
    }

    /// Create a new mock servo with a custom name.
    pub fn with_name(name: String) -> (Self, MockServoHandle) {
        let (command_tx, command_rx) = mpsc::unbounded_channel();

        let servo = Self {
            command_tx,
            current_angle: None,
            name: name.clone(),
        };

        let handle = MockServoHandle { command_rx, name };

        (servo, handle)
    }

    /// Get the last commanded angle, if any.
    ///
    /// This is useful for testing before the device is handed to the
    /// controller.
    pub fn current_angle(&self) -> Option<u8> {
        self.current_angle
    }
}

impl LockActuator for MockLockServo {
    async fn set_angle(&mut self, degrees: u8) -> Result<()> {
        self.current_angle = Some(degrees);
        // Best-effort: the mock stays functional even if the handle is gone
        let _ = self.command_tx.send(degrees);
        Ok(())
    }

    async fn device_info(&self) -> Result<DeviceInfo> {
        Ok(DeviceInfo::new(self.name.clone(), "Mock Servo").with_firmware_version("mock-1.0"))
    }
}

/// Handle observing a mock servo's command stream.
#[derive(Debug)]
pub struct MockServoHandle {
    /// Channel receiver for angle commands
    command_rx: mpsc::UnboundedReceiver<u8>,

    /// Device name
    name: String,
}

impl MockServoHandle {
    /// Drain every angle commanded since the last call, in order.
    pub fn commanded_angles(&mut self) -> Vec<u8> {
        let mut angles = Vec::new();
        while let Ok(angle) = self.command_rx.try_recv() {
            angles.push(angle);
        }
        angles
    }

    /// Get the device name.
    pub fn name(&self) -> &str {
        &self.name
    }
}
