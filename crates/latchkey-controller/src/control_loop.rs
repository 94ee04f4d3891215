//! The polling control loop that drives the lock.
//!
//! Once started, the loop cycles at the configured cadence. Each cycle does
//! exactly one of two things depending on the lock state:
//!
//! - **Closed**: poll the reader. If a tag is present and its UID reads
//!   completely, feed the scan to the state machine, release the reader
//!   session, and sync hardware if the lock opened. A failed presence check
//!   or an incomplete read ends the cycle with no other effect.
//! - **Open**: feed the current tick to the state machine and sync hardware
//!   if the open duration elapsed. The reader is not polled at all.
//!
//! Reader anomalies are absorbed per cycle; actuator, indicator, and reader
//! initialization failures end the loop with an error.

use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info, trace, warn};

use latchkey_core::Tick;
use latchkey_hardware::{IndicatorPanel, LockActuator, ProximityReader};

use crate::clock::MonotonicClock;
use crate::config::{ControllerConfig, ServoAngles};
use crate::error::Result;
use crate::state_machine::{LockState, LockStateMachine};
use crate::sync::{self, HardwareCommand};

/// Polling driver connecting the reader, the state machine, and the
/// output devices.
///
/// Owns all three devices for the lifetime of the loop. Constructed from a
/// validated [`ControllerConfig`]; run with [`run`](Self::run) until the
/// shutdown signal fires.
pub struct ControlLoop<R, A, P> {
    reader: R,
    actuator: A,
    panel: P,
    machine: LockStateMachine,
    clock: MonotonicClock,
    poll_interval: Duration,
    angles: ServoAngles,
}

impl<R, A, P> ControlLoop<R, A, P>
where
    R: ProximityReader,
    A: LockActuator,
    P: IndicatorPanel,
{
    /// Assemble a control loop from configuration and device drivers.
    ///
    /// The lock starts Closed; hardware is not touched until
    /// [`run`](Self::run).
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `config` fails validation or an
    /// allow-list entry cannot be parsed.
    pub fn new(config: &ControllerConfig, reader: R, actuator: A, panel: P) -> Result<Self> {
        config.validate()?;
        let machine = LockStateMachine::new(config.allow_list()?, config.open_duration_ms);

        Ok(Self {
            reader,
            actuator,
            panel,
            machine,
            clock: MonotonicClock::new(),
            poll_interval: config.poll_interval(),
            angles: config.servo_angles(),
        })
    }

    /// Get the current lock state.
    pub fn state(&self) -> LockState {
        self.machine.state()
    }

    /// Run the loop until `shutdown` signals true or its sender is dropped.
    ///
    /// Startup probes the reader and establishes the hardware baseline for
    /// the Closed state, so the physical outputs match the machine before
    /// the first cycle. Both steps are fatal on failure: a controller that
    /// cannot reach its devices must not pretend to guard anything.
    ///
    /// # Errors
    ///
    /// Returns an error if the startup probe or baseline sync fails, or if
    /// an actuator or indicator write fails during a cycle.
    pub async fn run(&mut self, mut shutdown: watch::Receiver<bool>) -> Result<()> {
        let reader_info = self.reader.reader_info().await?;
        info!("proximity reader ready: {}", reader_info.name);

        self.sync_hardware(self.machine.state()).await?;
        info!("hardware baseline established, lock is {}", self.machine.state());

        let mut interval = time::interval(self.poll_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    // A dropped sender counts as a shutdown request
                    if changed.is_err() || *shutdown.borrow() {
                        info!("shutdown requested, stopping control loop");
                        break;
                    }
                }
                _ = interval.tick() => {
                    self.cycle().await?;
                }
            }
        }

        Ok(())
    }

    /// One polling cycle.
    async fn cycle(&mut self) -> Result<()> {
        let now = self.clock.now();

        match self.machine.state() {
            LockState::Closed => self.poll_reader(now).await,
            LockState::Open => {
                match self.machine.handle_tick(now) {
                    Some(change) => self.sync_hardware(change.to).await?,
                    None => {
                        if let Some(remaining) = self.machine.remaining_open_ms(now) {
                            trace!("lock open, {}ms until relock", remaining);
                        }
                    }
                }
                Ok(())
            }
        }
    }

    /// Poll for a tag and feed any completed scan to the state machine.
    ///
    /// The reader session is released after every completed read, match or
    /// not, so the same tag can be presented again later. An incomplete
    /// read releases nothing: the tag is already gone.
    async fn poll_reader(&mut self, now: Tick) -> Result<()> {
        let present = match self.reader.presence_detected().await {
            Ok(present) => present,
            Err(e) => {
                warn!("presence check failed, skipping cycle: {}", e);
                return Ok(());
            }
        };
        if !present {
            return Ok(());
        }

        let scan = match self.reader.read_scan().await {
            Ok(scan) => scan,
            Err(e) => {
                debug!("tag read incomplete, retrying next cycle: {}", e);
                return Ok(());
            }
        };
        info!("tag scanned, uid {}", scan.uid_hex());

        let change = self.machine.handle_scan(&scan.uid, now);

        if let Err(e) = self.reader.release_session().await {
            warn!("failed to release reader session: {}", e);
        }

        if let Some(change) = change {
            self.sync_hardware(change.to).await?;
        }

        Ok(())
    }

    /// Push the outputs implied by `state` to the devices.
    async fn sync_hardware(&mut self, state: LockState) -> Result<()> {
        let command = HardwareCommand::for_state(state, self.angles);
        sync::apply_command(command, &mut self.actuator, &mut self.panel).await
    }
}
