//! Hardware synchronization: mapping lock state onto device outputs.
//!
//! Synchronization is split in two. [`HardwareCommand::for_state`] is the
//! pure mapping from a [`LockState`] to the complete output set it implies;
//! [`apply_command`] pushes such a command to the devices. Keeping the
//! mapping pure means the state-to-output table can be tested without any
//! hardware at all.

use latchkey_hardware::{IndicatorChannel, IndicatorPanel, LockActuator};
use tracing::debug;

use crate::config::ServoAngles;
use crate::error::Result;
use crate::state_machine::LockState;

/// Fully specified output set for one lock state.
///
/// Every field is always set: hardware sync never does partial updates, so
/// the devices cannot drift into a combination no state maps to (for
/// example both indicator lamps lit).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HardwareCommand {
    /// Locked indicator lamp (active while closed).
    pub locked_indicator: bool,

    /// Unlocked indicator lamp (active while open).
    pub unlocked_indicator: bool,

    /// Actuator angle in degrees.
    pub servo_angle: u8,
}

impl HardwareCommand {
    /// The outputs implied by `state`.
    ///
    /// Total over both states, with the two indicator lamps always in
    /// opposite positions.
    ///
    /// # Examples
    ///
    /// ```
    /// use latchkey_controller::{HardwareCommand, LockState, ServoAngles};
    ///
    /// let angles = ServoAngles { closed: 0, open: 90 };
    /// let cmd = HardwareCommand::for_state(LockState::Open, angles);
    /// assert!(!cmd.locked_indicator);
    /// assert!(cmd.unlocked_indicator);
    /// assert_eq!(cmd.servo_angle, 90);
    /// ```
    #[must_use]
    pub fn for_state(state: LockState, angles: ServoAngles) -> Self {
        match state {
            LockState::Closed => Self {
                locked_indicator: true,
                unlocked_indicator: false,
                servo_angle: angles.closed,
            },
            LockState::Open => Self {
                locked_indicator: false,
                unlocked_indicator: true,
                servo_angle: angles.open,
            },
        }
    }
}

/// Issue `command` to the indicator panel and the actuator.
///
/// Writes the indicator channels first and the actuator last, matching the
/// reference build. Any device failure propagates to the caller: after a
/// failed write the physical outputs no longer provably match the lock
/// state, which the controller treats as fatal.
///
/// # Errors
///
/// Returns the underlying [`HardwareError`](latchkey_hardware::HardwareError)
/// if any indicator write or the actuator command fails.
pub async fn apply_command<A, P>(
    command: HardwareCommand,
    actuator: &mut A,
    panel: &mut P,
) -> Result<()>
where
    A: LockActuator,
    P: IndicatorPanel,
{
    debug!(
        "syncing hardware: locked={} unlocked={} angle={}",
        command.locked_indicator, command.unlocked_indicator, command.servo_angle
    );

    panel
        .set_output(IndicatorChannel::Locked, command.locked_indicator)
        .await?;
    panel
        .set_output(IndicatorChannel::Unlocked, command.unlocked_indicator)
        .await?;
    actuator.set_angle(command.servo_angle).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use latchkey_hardware::mock::{MockIndicatorPanel, MockLockServo};

    const ANGLES: ServoAngles = ServoAngles {
        closed: 0,
        open: 90,
    };

    #[test]
    fn test_command_for_closed_state() {
        let cmd = HardwareCommand::for_state(LockState::Closed, ANGLES);
        assert!(cmd.locked_indicator);
        assert!(!cmd.unlocked_indicator);
        assert_eq!(cmd.servo_angle, 0);
    }

    #[test]
    fn test_command_for_open_state() {
        let cmd = HardwareCommand::for_state(LockState::Open, ANGLES);
        assert!(!cmd.locked_indicator);
        assert!(cmd.unlocked_indicator);
        assert_eq!(cmd.servo_angle, 90);
    }

    #[test]
    fn test_indicators_are_mutually_exclusive() {
        for state in [LockState::Closed, LockState::Open] {
            let cmd = HardwareCommand::for_state(state, ANGLES);
            assert!(cmd.locked_indicator != cmd.unlocked_indicator);
        }
    }

    #[test]
    fn test_commands_respect_configured_angles() {
        let angles = ServoAngles {
            closed: 15,
            open: 135,
        };
        assert_eq!(
            HardwareCommand::for_state(LockState::Closed, angles).servo_angle,
            15
        );
        assert_eq!(
            HardwareCommand::for_state(LockState::Open, angles).servo_angle,
            135
        );
    }

    #[tokio::test]
    async fn test_apply_command_drives_devices() {
        let (mut servo, _servo_handle) = MockLockServo::new();
        let (mut panel, mut panel_handle) = MockIndicatorPanel::new();

        let cmd = HardwareCommand::for_state(LockState::Closed, ANGLES);
        apply_command(cmd, &mut servo, &mut panel).await.unwrap();

        assert_eq!(servo.current_angle(), Some(0));
        assert!(panel.is_active(IndicatorChannel::Locked));
        assert!(!panel.is_active(IndicatorChannel::Unlocked));

        // Indicators are written before the actuator, locked channel first
        assert_eq!(
            panel_handle.commands(),
            vec![
                (IndicatorChannel::Locked, true),
                (IndicatorChannel::Unlocked, false),
            ]
        );
    }

    #[tokio::test]
    async fn test_apply_command_open_then_closed() {
        let (mut servo, mut servo_handle) = MockLockServo::new();
        let (mut panel, _panel_handle) = MockIndicatorPanel::new();

        let open = HardwareCommand::for_state(LockState::Open, ANGLES);
        apply_command(open, &mut servo, &mut panel).await.unwrap();

        let closed = HardwareCommand::for_state(LockState::Closed, ANGLES);
        apply_command(closed, &mut servo, &mut panel).await.unwrap();

        assert_eq!(servo_handle.commanded_angles(), vec![90, 0]);
        assert!(panel.is_active(IndicatorChannel::Locked));
        assert!(!panel.is_active(IndicatorChannel::Unlocked));
    }
}
