//! Mock proximity reader implementation for testing and development.
//!
//! This module provides a simulated NFC reader that can be controlled
//! programmatically for testing without requiring physical hardware.

use crate::{
    Result,
    traits::{ProximityReader, TagScan},
    types::ReaderInfo,
};
use tokio::sync::mpsc;

/// Internal event type for the mock reader.
#[derive(Debug, Clone)]
enum ScanEvent {
    /// A tag with this UID enters the reader field.
    TagPresented(Vec<u8>),

    /// Presence is reported but the UID transfer fails partway.
    ReadFailure,
}

/// Mock proximity reader for testing and development.
///
/// The reader reports presence whenever its handle has queued an event, and
/// resolves that event on the next [`read_scan`](ProximityReader::read_scan)
/// call. Session releases are forwarded back to the handle so tests can
/// assert the controller released the tag after evaluating it.
///
/// # Examples
///
/// ```
/// use latchkey_hardware::mock::MockProximityReader;
/// use latchkey_hardware::traits::ProximityReader;
///
/// #[tokio::main]
/// async fn main() -> latchkey_hardware::Result<()> {
///     let (mut reader, handle) = MockProximityReader::new();
///
///     handle.present_tag(vec![0x85, 0xCE, 0xDB, 0xD1]).await?;
///
///     assert!(reader.presence_detected().await?);
///     let scan = reader.read_scan().await?;
///     assert_eq!(scan.uid_hex(), "85CEDBD1");
///
///     reader.release_session().await?;
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockProximityReader {
    /// Channel receiver for scan events
    event_rx: mpsc::Receiver<ScanEvent>,

    /// Channel sender reporting session releases back to the handle
    release_tx: mpsc::UnboundedSender<()>,

    /// Device name
    name: String,
}

impl MockProximityReader {
    /// Create a new mock reader with the default name.
    ///
    /// Returns a tuple of (MockProximityReader, MockReaderHandle) where the
    /// handle is used to present tags and observe session releases.
    ///
    /// # Examples
    ///
    /// ```
    /// use latchkey_hardware::mock::MockProximityReader;
    ///
    /// let (reader, handle) = MockProximityReader::new();
    /// ```
    pub fn new() -> (Self, MockReaderHandle) {
        Self::with_name("Mock MFRC522 Reader".to_string())
    }

    /// Create a new mock reader with a custom name.
    pub fn with_name(name: String) -> (Self, MockReaderHandle) {
        let (event_tx, event_rx) = mpsc::channel(32);
        let (release_tx, release_rx) = mpsc::unbounded_channel();

        let reader = Self {
            event_rx,
            release_tx,
            name: name.clone(),
        };

        let handle = MockReaderHandle {
            event_tx,
            release_rx,
            name,
        };

        (reader, handle)
    }
}

impl ProximityReader for MockProximityReader {
    async fn presence_detected(&self) -> Result<bool> {
        // A queued event stands in for a tag sitting in the field
        Ok(!self.event_rx.is_empty())
    }

    async fn read_scan(&mut self) -> Result<TagScan> {
        let event = self
            .event_rx
            .recv()
            .await
            .ok_or_else(|| crate::HardwareError::disconnected("scan event channel closed"))?;

        match event {
            ScanEvent::TagPresented(uid) => Ok(TagScan::new(uid)),
            ScanEvent::ReadFailure => Err(crate::HardwareError::scan_read(
                "tag left the field before the UID transfer completed",
            )),
        }
    }

    async fn release_session(&mut self) -> Result<()> {
        // Best-effort: the mock stays functional even if the handle is gone
        let _ = self.release_tx.send(());
        Ok(())
    }

    async fn reader_info(&self) -> Result<ReaderInfo> {
        Ok(
            ReaderInfo::new(self.name.clone(), vec!["ISO14443A".to_string()])
                .with_max_baud_rate(424000),
        )
    }
}

/// Handle for controlling a mock proximity reader.
///
/// The handle side queues tag presentations and injected read failures, and
/// counts the session releases the device performed.
///
/// # Examples
///
/// ```
/// use latchkey_hardware::mock::MockProximityReader;
///
/// #[tokio::main]
/// async fn main() -> latchkey_hardware::Result<()> {
///     let (_reader, handle) = MockProximityReader::new();
///
///     handle.present_tag(vec![0x85, 0xCE, 0xDB, 0xD1]).await?;
///     handle.inject_read_failure().await?;
///
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockReaderHandle {
    /// Channel sender for scan events
    event_tx: mpsc::Sender<ScanEvent>,

    /// Channel receiver for session release notifications
    release_rx: mpsc::UnboundedReceiver<()>,

    /// Device name
    name: String,
}

impl MockReaderHandle {
    /// Present a tag with the given UID to the reader.
    ///
    /// The UID may have any length; validating it is the controller's job,
    /// not the reader's.
    ///
    /// # Errors
    ///
    /// Returns an error if the reader has been dropped and the channel
    /// is closed.
    pub async fn present_tag(&self, uid: Vec<u8>) -> Result<()> {
        self.event_tx
            .send(ScanEvent::TagPresented(uid))
            .await
            .map_err(|_| crate::HardwareError::disconnected("scan event channel closed"))
    }

    /// Make the next read attempt fail after presence is detected.
    ///
    /// Simulates a tag leaving the field mid-transaction: presence fires,
    /// then the UID transfer errors out.
    ///
    /// # Errors
    ///
    /// Returns an error if the reader has been dropped and the channel
    /// is closed.
    pub async fn inject_read_failure(&self) -> Result<()> {
        self.event_tx
            .send(ScanEvent::ReadFailure)
            .await
            .map_err(|_| crate::HardwareError::disconnected("scan event channel closed"))
    }

    /// Drain and count the sessions released since the last call.
    pub fn released_sessions(&mut self) -> usize {
        let mut count = 0;
        while self.release_rx.try_recv().is_ok() {
            count += 1;
        }
        count
    }

    /// Get the device name.
    pub fn name(&self) -> &str {
        &self.name
    }
}
