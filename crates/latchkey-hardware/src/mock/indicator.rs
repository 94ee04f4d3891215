//! Mock indicator panel implementation for testing and development.
//!
//! This module provides a simulated two-lamp status panel that records every
//! channel write so tests can assert both ordering and final lamp state.

use crate::{
    Result,
    traits::IndicatorPanel,
    types::{DeviceInfo, IndicatorChannel},
};
use std::collections::HashMap;
use tokio::sync::mpsc;

/// Mock indicator panel for testing and development.
///
/// Tracks the current state of each channel and forwards every write to the
/// paired [`MockIndicatorHandle`] in order.
///
/// # Examples
///
/// ```
/// use latchkey_hardware::mock::MockIndicatorPanel;
/// use latchkey_hardware::traits::IndicatorPanel;
/// use latchkey_hardware::types::IndicatorChannel;
///
/// #[tokio::main]
/// async fn main() -> latchkey_hardware::Result<()> {
///     let (mut panel, mut handle) = MockIndicatorPanel::new();
///
///     panel.set_output(IndicatorChannel::Locked, true).await?;
///     assert!(panel.is_active(IndicatorChannel::Locked));
///     assert_eq!(handle.commands(), vec![(IndicatorChannel::Locked, true)]);
///
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockIndicatorPanel {
    /// Channel sender forwarding writes to the handle
    command_tx: mpsc::UnboundedSender<(IndicatorChannel, bool)>,

    /// Current state per channel, off until first written
    states: HashMap<IndicatorChannel, bool>,

    /// Device name
    name: String,
}

impl MockIndicatorPanel {
    /// Create a new mock panel with the default name.
    ///
    /// Returns a tuple of (MockIndicatorPanel, MockIndicatorHandle) where the
    /// handle observes the write stream.
    pub fn new() -> (Self, MockIndicatorHandle) {
        Self::with_name("Mock Indicator Panel".to_string())
    }

    /// Create a new mock panel with a custom name.
    pub fn with_name(name: String) -> (Self, MockIndicatorHandle) {
        let (command_tx, command_rx) = mpsc::unbounded_channel();

        let panel = Self {
            command_tx,
            states: HashMap::new(),
            name: name.clone(),
        };

        let handle = MockIndicatorHandle { command_rx, name };

        (panel, handle)
    }

    /// Whether the given channel is currently active.
    ///
    /// Channels that were never written report inactive.
    pub fn is_active(&self, channel: IndicatorChannel) -> bool {
        self.states.get(&channel).copied().unwrap_or(false)
    }
}

impl IndicatorPanel for MockIndicatorPanel {
    async fn set_output(&mut self, channel: IndicatorChannel, active: bool) -> Result<()> {
        self.states.insert(channel, active);
        // Best-effort: the mock stays functional even if the handle is gone
        let _ = self.command_tx.send((channel, active));
        Ok(())
    }

    async fn device_info(&self) -> Result<DeviceInfo> {
        Ok(DeviceInfo::new(self.name.clone(), "Mock Panel"))
    }
}

/// Handle observing a mock indicator panel's write stream.
#[derive(Debug)]
pub struct MockIndicatorHandle {
    /// Channel receiver for channel writes
    command_rx: mpsc::UnboundedReceiver<(IndicatorChannel, bool)>,

    /// Device name
    name: String,
}

impl MockIndicatorHandle {
    /// Drain every channel write since the last call, in order.
    pub fn commands(&mut self) -> Vec<(IndicatorChannel, bool)> {
        let mut commands = Vec::new();
        while let Ok(command) = self.command_rx.try_recv() {
            commands.push(command);
        }
        commands
    }

    /// Get the device name.
    pub fn name(&self) -> &str {
        &self.name
    }
}
