//! Common test utilities for control loop integration tests.
//!
//! The rig wires the full mock device suite into a running control loop and
//! hands the test the observation side of every device: the reader handle to
//! present tags and count session releases, the servo and panel handles to
//! drain the exact command sequences the loop issued.
//!
//! All tests run under a paused tokio clock, so "sleeping" through poll
//! cycles and the 5 second relock window costs no real time.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use latchkey_controller::{ControlLoop, ControllerConfig, Result};
use latchkey_hardware::mock::{
    MockIndicatorHandle, MockIndicatorPanel, MockLockServo, MockProximityReader, MockReaderHandle,
    MockServoHandle,
};

/// Enrolled on the bench unit, first allow-list entry.
pub const TAG_A: [u8; 4] = [0x85, 0xCE, 0xDB, 0xD1];

/// Enrolled on the bench unit, second allow-list entry.
pub const TAG_B: [u8; 4] = [0xB7, 0x40, 0x94, 0x5B];

/// Correct length, not enrolled anywhere.
pub const STRANGER: [u8; 4] = [0x00, 0x00, 0x00, 0x00];

/// A control loop running in a background task, plus every mock handle.
pub struct Rig {
    pub reader: MockReaderHandle,
    pub servo: MockServoHandle,
    pub panel: MockIndicatorHandle,
    pub shutdown: watch::Sender<bool>,
    pub task: JoinHandle<Result<()>>,
}

impl Rig {
    /// Signal shutdown and wait for the loop to finish cleanly.
    pub async fn stop(self) {
        self.shutdown.send(true).expect("loop dropped its receiver");
        self.task
            .await
            .expect("control loop task panicked")
            .expect("control loop returned an error");
    }
}

/// Build mock devices, assemble a control loop from `config`, and spawn it.
pub fn spawn_controller(config: ControllerConfig) -> Rig {
    let (reader, reader_handle) = MockProximityReader::new();
    let (servo, servo_handle) = MockLockServo::new();
    let (panel, panel_handle) = MockIndicatorPanel::new();

    let mut control_loop =
        ControlLoop::new(&config, reader, servo, panel).expect("test config must validate");

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let task = tokio::spawn(async move { control_loop.run(shutdown_rx).await });

    Rig {
        reader: reader_handle,
        servo: servo_handle,
        panel: panel_handle,
        shutdown: shutdown_tx,
        task,
    }
}

/// Let the paused clock advance `ms` milliseconds of loop cycles.
pub async fn settle(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
}
