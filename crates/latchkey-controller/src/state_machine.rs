//! Lock state machine implementation.
//!
//! This module provides the state machine at the heart of the controller:
//! two states, driven by exactly two kinds of event, with every decision
//! made against an injected [`Tick`] so behavior is reproducible in tests.
//!
//! # States
//!
//! - `Closed`: Bolt engaged. Scans are evaluated against the allow-list.
//! - `Open`: Bolt retracted. Scans are ignored; time alone closes the lock.
//!
//! # Valid Transitions
//!
//! - Closed → Open: a scan matched an allow-list entry
//! - Open → Closed: the configured open duration elapsed
//!
//! Rejected scans, wrong-length scans, and early ticks produce no
//! transition at all.
//!
//! # Examples
//!
//! ```
//! use latchkey_controller::{LockState, LockStateMachine};
//! use latchkey_core::{AllowList, Tick, Uid};
//!
//! let list = AllowList::new(vec![Uid::new([0x85, 0xCE, 0xDB, 0xD1])]);
//! let mut machine = LockStateMachine::new(list, 5000);
//! assert_eq!(machine.state(), LockState::Closed);
//!
//! // Authorized scan opens the lock and records when
//! let change = machine.handle_scan(&[0x85, 0xCE, 0xDB, 0xD1], Tick::from_millis(1000));
//! assert!(change.is_some());
//! assert_eq!(machine.state(), LockState::Open);
//!
//! // One tick before the deadline nothing happens
//! assert!(machine.handle_tick(Tick::from_millis(5999)).is_none());
//!
//! // At the deadline the lock closes
//! assert!(machine.handle_tick(Tick::from_millis(6000)).is_some());
//! assert_eq!(machine.state(), LockState::Closed);
//! ```

use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use latchkey_core::{AllowList, Tick};

/// Maximum number of state changes to keep in history.
///
/// This value is chosen to balance memory usage with debugging capability:
/// - Each change is 12 bytes (2 single-byte enums + a u32 tick + padding)
/// - 64 changes equals 32 complete open/close rounds
/// - Sufficient for reconstructing recent access activity without growing
///   unbounded on a long-running controller
const MAX_HISTORY_SIZE: usize = 64;

/// Lock positions.
///
/// There is no intermediate state: the actuator is commanded atomically
/// and the controller considers the move instantaneous.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LockState {
    /// Bolt engaged; scans are evaluated against the allow-list.
    Closed,

    /// Bolt retracted; scans are ignored until the lock closes again.
    Open,
}

impl fmt::Display for LockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state_str = match self {
            LockState::Closed => "closed",
            LockState::Open => "open",
        };
        write!(f, "{}", state_str)
    }
}

impl LockState {
    /// Check if transition to target state is valid from this state.
    ///
    /// With two states every change of state is legal and every self-loop
    /// is not; the method exists so the transition rule is written down in
    /// one place rather than implied.
    ///
    /// # Examples
    ///
    /// ```
    /// use latchkey_controller::LockState;
    ///
    /// assert!(LockState::Closed.can_transition_to(&LockState::Open));
    /// assert!(!LockState::Open.can_transition_to(&LockState::Open));
    /// ```
    pub fn can_transition_to(&self, target: &LockState) -> bool {
        matches!(
            (self, target),
            (LockState::Closed, LockState::Open) | (LockState::Open, LockState::Closed)
        )
    }
}

/// A single recorded state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateChange {
    /// The state changed from.
    pub from: LockState,

    /// The state changed to.
    pub to: LockState,

    /// Tick at which the change happened.
    pub at: Tick,
}

/// State machine driving the lock.
///
/// Owns the allow-list and the open timestamp, and is mutated only through
/// [`handle_scan`](Self::handle_scan) and [`handle_tick`](Self::handle_tick).
/// Both take the current tick as a parameter; the machine never reads a
/// clock itself.
///
/// # Thread Safety
///
/// This struct is not thread-safe by design. The control loop owns it
/// exclusively; in other async contexts, protect access with
/// `tokio::sync::Mutex` or similar.
pub struct LockStateMachine {
    /// Current lock position.
    state: LockState,

    /// Tick at which the lock opened; `Some` exactly while `state` is Open.
    opened_at: Option<Tick>,

    /// How long the lock stays open, in milliseconds.
    open_duration_ms: u32,

    /// UIDs authorized to open the lock.
    allow_list: AllowList,

    /// History of state changes (limited to MAX_HISTORY_SIZE).
    history: VecDeque<StateChange>,
}

impl LockStateMachine {
    /// Create a new machine in the Closed state.
    ///
    /// # Examples
    ///
    /// ```
    /// use latchkey_controller::{LockState, LockStateMachine};
    /// use latchkey_core::AllowList;
    ///
    /// let machine = LockStateMachine::new(AllowList::new(vec![]), 5000);
    /// assert_eq!(machine.state(), LockState::Closed);
    /// assert!(machine.opened_at().is_none());
    /// ```
    pub fn new(allow_list: AllowList, open_duration_ms: u32) -> Self {
        Self {
            state: LockState::Closed,
            opened_at: None,
            open_duration_ms,
            allow_list,
            history: VecDeque::with_capacity(MAX_HISTORY_SIZE),
        }
    }

    /// Get the current lock state.
    pub fn state(&self) -> LockState {
        self.state
    }

    /// Get the tick at which the lock opened, if it is open.
    pub fn opened_at(&self) -> Option<Tick> {
        self.opened_at
    }

    /// Get the configured open duration in milliseconds.
    pub fn open_duration_ms(&self) -> u32 {
        self.open_duration_ms
    }

    /// Get the number of enrolled allow-list entries.
    pub fn allow_list_len(&self) -> usize {
        self.allow_list.len()
    }

    /// Get a reference to the state change history.
    ///
    /// Ordered from oldest to newest, capped at the most recent
    /// `MAX_HISTORY_SIZE` entries.
    pub fn history(&self) -> &VecDeque<StateChange> {
        &self.history
    }

    /// Milliseconds left before the lock relocks, as seen at `now`.
    ///
    /// Returns `None` while Closed. Returns `Some(0)` when the relock is
    /// due on this very tick, and `None` once the deadline has been
    /// overshot (a late tick still closes the lock via
    /// [`handle_tick`](Self::handle_tick)).
    pub fn remaining_open_ms(&self, now: Tick) -> Option<u32> {
        let opened_at = self.opened_at?;
        self.open_duration_ms
            .checked_sub(now.millis_since(opened_at))
    }

    /// Feed a scanned credential to the machine.
    ///
    /// While Open the scan is ignored entirely: no evaluation, no effect on
    /// the relock deadline. While Closed the candidate is matched against
    /// the allow-list; a hit opens the lock and records `now` as the open
    /// tick, a miss (including any wrong-length candidate) changes nothing.
    ///
    /// Returns the state change, if one happened.
    pub fn handle_scan(&mut self, candidate: &[u8], now: Tick) -> Option<StateChange> {
        if self.state == LockState::Open {
            debug!("scan ignored while open");
            return None;
        }

        match self.allow_list.position_of(candidate) {
            Some(index) => {
                info!("credential accepted (allow-list entry {}), opening lock", index);
                self.opened_at = Some(now);
                Some(self.perform_state_change(LockState::Open, now))
            }
            None => {
                info!("credential rejected, lock stays closed");
                None
            }
        }
    }

    /// Feed the passage of time to the machine.
    ///
    /// Closes the lock once at least the configured open duration has
    /// elapsed since it opened, measured with wrapping subtraction so the
    /// comparison survives the tick clock rolling over. A no-op while
    /// Closed.
    ///
    /// Returns the state change, if one happened.
    pub fn handle_tick(&mut self, now: Tick) -> Option<StateChange> {
        let opened_at = self.opened_at?;

        if now.millis_since(opened_at) < self.open_duration_ms {
            return None;
        }

        info!("open duration elapsed, closing lock");
        self.opened_at = None;
        Some(self.perform_state_change(LockState::Closed, now))
    }

    /// Internal method to apply a state change and record it in history.
    fn perform_state_change(&mut self, new_state: LockState, at: Tick) -> StateChange {
        debug_assert!(self.state.can_transition_to(&new_state));

        let change = StateChange {
            from: self.state,
            to: new_state,
            at,
        };
        self.state = new_state;
        self.add_to_history(change);
        change
    }

    /// Add a change to history, maintaining the size limit.
    fn add_to_history(&mut self, change: StateChange) {
        self.history.push_back(change);
        if self.history.len() > MAX_HISTORY_SIZE {
            self.history.pop_front();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use latchkey_core::Uid;

    const TAG_A: [u8; 4] = [0x85, 0xCE, 0xDB, 0xD1];
    const TAG_B: [u8; 4] = [0xB7, 0x40, 0x94, 0x5B];
    const TAG_C: [u8; 4] = [0x09, 0x10, 0x11, 0x12];
    const STRANGER: [u8; 4] = [0xDE, 0xAD, 0xBE, 0xEF];

    fn test_machine() -> LockStateMachine {
        let list = AllowList::new(vec![
            Uid::new(TAG_A),
            Uid::new(TAG_B),
            Uid::new(TAG_C),
        ]);
        LockStateMachine::new(list, 5000)
    }

    #[test]
    fn test_new_machine_starts_closed() {
        let machine = test_machine();
        assert_eq!(machine.state(), LockState::Closed);
        assert_eq!(machine.opened_at(), None);
        assert_eq!(machine.open_duration_ms(), 5000);
        assert_eq!(machine.allow_list_len(), 3);
        assert!(machine.history().is_empty());
    }

    #[test]
    fn test_matching_scan_opens_lock() {
        let mut machine = test_machine();
        let now = Tick::from_millis(1000);

        let change = machine.handle_scan(&TAG_A, now).unwrap();
        assert_eq!(change.from, LockState::Closed);
        assert_eq!(change.to, LockState::Open);
        assert_eq!(change.at, now);

        assert_eq!(machine.state(), LockState::Open);
        assert_eq!(machine.opened_at(), Some(now));
        assert_eq!(machine.history().len(), 1);
    }

    #[test]
    fn test_every_enrolled_tag_opens_lock() {
        for tag in [TAG_A, TAG_B, TAG_C] {
            let mut machine = test_machine();
            assert!(machine.handle_scan(&tag, Tick::ZERO).is_some());
            assert_eq!(machine.state(), LockState::Open);
        }
    }

    #[test]
    fn test_unknown_scan_keeps_lock_closed() {
        let mut machine = test_machine();

        assert!(machine.handle_scan(&STRANGER, Tick::from_millis(100)).is_none());
        assert_eq!(machine.state(), LockState::Closed);
        assert_eq!(machine.opened_at(), None);
        assert!(machine.history().is_empty());
    }

    #[test]
    fn test_wrong_length_scan_is_a_non_match() {
        let mut machine = test_machine();

        assert!(machine.handle_scan(&[], Tick::ZERO).is_none());
        assert!(machine.handle_scan(&TAG_A[..3], Tick::ZERO).is_none());
        assert!(machine.handle_scan(&[0x85, 0xCE, 0xDB, 0xD1, 0xFF], Tick::ZERO).is_none());
        assert_eq!(machine.state(), LockState::Closed);
    }

    #[test]
    fn test_scans_ignored_while_open() {
        let mut machine = test_machine();
        let opened = Tick::from_millis(1000);
        machine.handle_scan(&TAG_A, opened).unwrap();

        // Neither a matching nor an unknown scan has any effect
        assert!(machine.handle_scan(&TAG_B, Tick::from_millis(2000)).is_none());
        assert!(machine.handle_scan(&STRANGER, Tick::from_millis(3000)).is_none());

        // The relock deadline did not move
        assert_eq!(machine.opened_at(), Some(opened));
        assert_eq!(machine.history().len(), 1);
    }

    #[test]
    fn test_tick_before_deadline_keeps_lock_open() {
        let mut machine = test_machine();
        machine.handle_scan(&TAG_A, Tick::from_millis(1000)).unwrap();

        assert!(machine.handle_tick(Tick::from_millis(1001)).is_none());
        assert!(machine.handle_tick(Tick::from_millis(5999)).is_none());
        assert_eq!(machine.state(), LockState::Open);
    }

    #[test]
    fn test_tick_at_exact_deadline_closes_lock() {
        let mut machine = test_machine();
        machine.handle_scan(&TAG_A, Tick::from_millis(1000)).unwrap();

        let change = machine.handle_tick(Tick::from_millis(6000)).unwrap();
        assert_eq!(change.from, LockState::Open);
        assert_eq!(change.to, LockState::Closed);
        assert_eq!(change.at, Tick::from_millis(6000));

        assert_eq!(machine.state(), LockState::Closed);
        assert_eq!(machine.opened_at(), None);
    }

    #[test]
    fn test_late_tick_still_closes_lock() {
        let mut machine = test_machine();
        machine.handle_scan(&TAG_A, Tick::from_millis(1000)).unwrap();

        assert!(machine.handle_tick(Tick::from_millis(60_000)).is_some());
        assert_eq!(machine.state(), LockState::Closed);
    }

    #[test]
    fn test_tick_while_closed_is_noop() {
        let mut machine = test_machine();

        assert!(machine.handle_tick(Tick::from_millis(100_000)).is_none());
        assert_eq!(machine.state(), LockState::Closed);
        assert!(machine.history().is_empty());
    }

    #[test]
    fn test_relock_across_tick_wraparound() {
        let mut machine = test_machine();
        let opened = Tick::from_millis(u32::MAX - 2000);
        machine.handle_scan(&TAG_A, opened).unwrap();

        // 4000ms elapsed, 1999 of them past the wrap point
        assert!(machine.handle_tick(opened.advanced_by(4000)).is_none());
        assert_eq!(machine.state(), LockState::Open);

        // 5000ms elapsed exactly
        assert!(machine.handle_tick(opened.advanced_by(5000)).is_some());
        assert_eq!(machine.state(), LockState::Closed);
    }

    #[test]
    fn test_lock_reopens_after_relock() {
        let mut machine = test_machine();

        machine.handle_scan(&TAG_A, Tick::from_millis(1000)).unwrap();
        machine.handle_tick(Tick::from_millis(6000)).unwrap();

        let change = machine.handle_scan(&TAG_B, Tick::from_millis(7000)).unwrap();
        assert_eq!(change.to, LockState::Open);
        assert_eq!(machine.opened_at(), Some(Tick::from_millis(7000)));
        assert_eq!(machine.history().len(), 3);
    }

    #[test]
    fn test_remaining_open_ms() {
        let mut machine = test_machine();
        assert_eq!(machine.remaining_open_ms(Tick::ZERO), None);

        machine.handle_scan(&TAG_A, Tick::from_millis(1000)).unwrap();
        assert_eq!(machine.remaining_open_ms(Tick::from_millis(1000)), Some(5000));
        assert_eq!(machine.remaining_open_ms(Tick::from_millis(3500)), Some(2500));
        assert_eq!(machine.remaining_open_ms(Tick::from_millis(6000)), Some(0));
        assert_eq!(machine.remaining_open_ms(Tick::from_millis(6001)), None);
    }

    #[test]
    fn test_history_is_capped() {
        let mut machine = test_machine();

        // 40 full open/close rounds produce 80 changes, over the cap
        for round in 0..40u32 {
            let base = Tick::from_millis(round * 10_000);
            machine.handle_scan(&TAG_A, base).unwrap();
            machine.handle_tick(base.advanced_by(5000)).unwrap();
        }

        assert_eq!(machine.history().len(), MAX_HISTORY_SIZE);
        // Oldest surviving entry is a relatively recent one
        let first = machine.history().front().unwrap();
        assert_eq!(first.at, Tick::from_millis(80_000));
    }

    #[test]
    fn test_can_transition_to() {
        assert!(LockState::Closed.can_transition_to(&LockState::Open));
        assert!(LockState::Open.can_transition_to(&LockState::Closed));
        assert!(!LockState::Closed.can_transition_to(&LockState::Closed));
        assert!(!LockState::Open.can_transition_to(&LockState::Open));
    }

    #[test]
    fn test_lock_state_display() {
        assert_eq!(LockState::Closed.to_string(), "closed");
        assert_eq!(LockState::Open.to_string(), "open");
    }

    #[test]
    fn test_lock_state_serde() {
        assert_eq!(serde_json::to_string(&LockState::Closed).unwrap(), r#""closed""#);
        assert_eq!(serde_json::to_string(&LockState::Open).unwrap(), r#""open""#);
        assert_eq!(
            serde_json::from_str::<LockState>(r#""open""#).unwrap(),
            LockState::Open
        );
    }

    #[test]
    fn test_state_change_serde_round_trip() {
        let change = StateChange {
            from: LockState::Closed,
            to: LockState::Open,
            at: Tick::from_millis(1500),
        };
        let json = serde_json::to_string(&change).unwrap();
        let back: StateChange = serde_json::from_str(&json).unwrap();
        assert_eq!(back, change);
    }

    #[test]
    fn test_empty_allow_list_rejects_everything() {
        let mut machine = LockStateMachine::new(AllowList::new(Vec::new()), 5000);

        assert!(machine.handle_scan(&TAG_A, Tick::ZERO).is_none());
        assert!(machine.handle_scan(&STRANGER, Tick::ZERO).is_none());
        assert_eq!(machine.state(), LockState::Closed);
    }
}
