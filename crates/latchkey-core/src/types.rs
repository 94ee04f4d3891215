//! Domain types: credential UIDs, the allow-list, and the wrapping tick clock.

use crate::constants::UID_SIZE;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use subtle::ConstantTimeEq;

/// A proximity tag UID, always exactly [`UID_SIZE`] bytes.
///
/// # Security
///
/// Equality between two `Uid` values uses constant-time comparison to avoid
/// leaking, through timing, how many leading bytes of a presented credential
/// matched an enrolled one. Candidates of the wrong length are rejected by a
/// plain length check before any byte comparison; the length of a credential
/// is not secret.
///
/// # Examples
///
/// ```
/// use latchkey_core::Uid;
///
/// let uid = Uid::from_hex("85CEDBD1").unwrap();
/// assert_eq!(uid.as_bytes(), &[0x85, 0xCE, 0xDB, 0xD1]);
/// assert_eq!(uid.to_hex(), "85CEDBD1");
/// ```
#[derive(Debug, Clone, Copy, Eq, Serialize, Deserialize)]
pub struct Uid([u8; UID_SIZE]);

impl Uid {
    /// Create a UID from an exact-size byte array.
    #[must_use]
    pub const fn new(bytes: [u8; UID_SIZE]) -> Self {
        Uid(bytes)
    }

    /// Create a UID from a byte slice, validating its length.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCredential`] if the slice is not exactly
    /// [`UID_SIZE`] bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let arr: [u8; UID_SIZE] = bytes.try_into().map_err(|_| {
            Error::InvalidCredential(format!(
                "UID must be {UID_SIZE} bytes, got {}",
                bytes.len()
            ))
        })?;
        Ok(Uid(arr))
    }

    /// Parse a UID from a hex string such as `"85CEDBD1"`.
    ///
    /// Case-insensitive; surrounding whitespace is trimmed. This is the
    /// format allow-list entries use in configuration files.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCredential`] if the string is not exactly
    /// `UID_SIZE * 2` hex digits.
    pub fn from_hex(s: &str) -> Result<Self> {
        let s = s.trim();
        if !s.is_ascii() {
            return Err(Error::InvalidCredential(format!(
                "UID hex must be ASCII: {s:?}"
            )));
        }
        if s.len() != UID_SIZE * 2 {
            return Err(Error::InvalidCredential(format!(
                "UID hex must be {} characters, got {} in {s:?}",
                UID_SIZE * 2,
                s.len()
            )));
        }
        let mut bytes = [0u8; UID_SIZE];
        for (i, byte) in bytes.iter_mut().enumerate() {
            let pair = &s[i * 2..i * 2 + 2];
            *byte = u8::from_str_radix(pair, 16).map_err(|_| {
                Error::InvalidCredential(format!("invalid hex byte {pair:?} in UID {s:?}"))
            })?;
        }
        Ok(Uid(bytes))
    }

    /// The raw UID bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; UID_SIZE] {
        &self.0
    }

    /// Uppercase hex rendering, e.g. `"85CEDBD1"`.
    #[must_use]
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02X}")).collect()
    }

    /// Timing-safe equality against a raw byte candidate of any length.
    ///
    /// A candidate whose length differs from [`UID_SIZE`] never matches;
    /// the length check itself may short-circuit.
    #[must_use]
    pub fn matches_candidate(&self, candidate: &[u8]) -> bool {
        candidate.len() == UID_SIZE && bool::from(self.0.as_slice().ct_eq(candidate))
    }
}

impl PartialEq for Uid {
    fn eq(&self, other: &Self) -> bool {
        // Constant-time comparison to prevent timing attacks
        self.0.as_slice().ct_eq(other.0.as_slice()).into()
    }
}

impl std::hash::Hash for Uid {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl fmt::Display for Uid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in &self.0 {
            write!(f, "{b:02X}")?;
        }
        Ok(())
    }
}

impl FromStr for Uid {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

/// The set of UIDs authorized to open the lock.
///
/// Fixed at startup from configuration and never mutated afterwards. Order
/// is preserved: matching scans the list front to back and reports the first
/// hit, so diagnostics can name the entry that granted access.
///
/// # Examples
///
/// ```
/// use latchkey_core::{AllowList, Uid};
///
/// let list = AllowList::new(vec![Uid::new([0x85, 0xCE, 0xDB, 0xD1])]);
/// assert!(list.matches(&[0x85, 0xCE, 0xDB, 0xD1]));
/// assert!(!list.matches(&[0x85, 0xCE, 0xDB])); // wrong length, never an error
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowList(Vec<Uid>);

impl AllowList {
    /// Create an allow-list from enrolled UIDs.
    ///
    /// An empty list is legal: every scan is then rejected.
    #[must_use]
    pub fn new(entries: Vec<Uid>) -> Self {
        AllowList(entries)
    }

    /// Parse an allow-list from hex strings, as found in configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCredential`] on the first malformed entry.
    pub fn from_hex<I, S>(tags: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entries = tags
            .into_iter()
            .map(|tag| Uid::from_hex(tag.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(AllowList(entries))
    }

    /// Index of the first enrolled UID equal to `candidate`, if any.
    ///
    /// Candidates that are not exactly [`UID_SIZE`] bytes long never match.
    /// Each individual byte comparison is constant-time; the scan stops at
    /// the first hit.
    #[must_use]
    pub fn position_of(&self, candidate: &[u8]) -> Option<usize> {
        if candidate.len() != UID_SIZE {
            return None;
        }
        self.0.iter().position(|uid| uid.matches_candidate(candidate))
    }

    /// Whether `candidate` is authorized.
    #[must_use]
    pub fn matches(&self, candidate: &[u8]) -> bool {
        self.position_of(candidate).is_some()
    }

    /// Enrolled UIDs in configuration order.
    #[must_use]
    pub fn entries(&self) -> &[Uid] {
        &self.0
    }

    /// Number of enrolled UIDs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no UIDs are enrolled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A monotonic millisecond timestamp that wraps at `u32::MAX`.
///
/// Models a `millis()`-style reference clock. Durations are always measured
/// with modular subtraction ([`Tick::millis_since`]), never by comparing
/// absolute values, so measurements stay correct across the wrap roughly
/// every 49.7 days. `Tick` deliberately does not implement `Ord`: an
/// absolute ordering of wrapped timestamps is meaningless.
///
/// # Examples
///
/// ```
/// use latchkey_core::Tick;
///
/// let opened = Tick::from_millis(u32::MAX - 100);
/// let now = opened.advanced_by(150); // wrapped past zero
/// assert_eq!(now.millis_since(opened), 150);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tick(u32);

impl Tick {
    /// Tick zero, the clock origin.
    pub const ZERO: Tick = Tick(0);

    /// Tick at an absolute millisecond count.
    #[must_use]
    pub const fn from_millis(ms: u32) -> Self {
        Tick(ms)
    }

    /// The absolute millisecond count, for display and serialization.
    #[must_use]
    pub const fn as_millis(self) -> u32 {
        self.0
    }

    /// Milliseconds elapsed since `earlier`, with wraparound.
    #[must_use]
    pub const fn millis_since(self, earlier: Tick) -> u32 {
        self.0.wrapping_sub(earlier.0)
    }

    /// This tick advanced by `ms` milliseconds, with wraparound.
    #[must_use]
    pub const fn advanced_by(self, ms: u32) -> Tick {
        Tick(self.0.wrapping_add(ms))
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}
