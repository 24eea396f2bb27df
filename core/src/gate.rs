//! Access gate.
//!
//! A time-derived code check in front of the catalogue. This is a speed-bump,
//! not a trust boundary: the expected code is reproducible from the wall clock
//! and a fixed override code always passes.
//!
//! The expected code is the first four characters of
//! `minute ++ day-of-month ++ month`, each as an unpadded decimal string.

use chrono::{Datelike, Local, Timelike};
use thiserror::Error;

use crate::store::KeyValueStore;

/// Key of the persisted verification flag.
pub const STORE_KEY: &str = "verified";

/// Time-independent code that always passes.
pub const OVERRIDE_CODE: &str = "826068";

const EXPECTED_CODE_LEN: usize = 4;

/// The slice of wall-clock time the gate reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateTime {
    pub minute: u32,
    pub day: u32,
    /// 1-based.
    pub month: u32,
}

impl GateTime {
    #[must_use]
    pub const fn new(minute: u32, day: u32, month: u32) -> Self {
        Self { minute, day, month }
    }

    #[must_use]
    pub fn now() -> Self {
        Self::from_datetime(&Local::now())
    }

    #[must_use]
    pub fn from_datetime<T: Datelike + Timelike>(at: &T) -> Self {
        Self {
            minute: at.minute(),
            day: at.day(),
            month: at.month(),
        }
    }
}

/// The code the gate expects at `now`.
#[must_use]
pub fn expected_code(now: GateTime) -> String {
    format!("{}{}{}", now.minute, now.day, now.month)
        .chars()
        .take(EXPECTED_CODE_LEN)
        .collect()
}

/// Pure predicate: does `candidate` open the gate at `now`?
#[must_use]
pub fn verify(candidate: &str, now: GateTime) -> bool {
    candidate == OVERRIDE_CODE || candidate == expected_code(now)
}

/// A rejected code. The display text is the inline message shown under the prompt.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("Incorrect access code. Try again.")]
pub struct AccessDenied;

/// Gate state: whether this user has been verified, backed by a key-value store.
#[derive(Debug)]
pub struct AccessGate<S> {
    store: S,
    verified: bool,
}

impl<S: KeyValueStore> AccessGate<S> {
    /// Load the persisted flag. Absent or unreadable reads as not verified.
    pub fn new(store: S) -> Self {
        let verified = match store.get_flag(STORE_KEY) {
            Ok(flag) => flag.unwrap_or(false),
            Err(err) => {
                tracing::warn!("Failed to read verification flag: {err}");
                false
            }
        };
        Self { store, verified }
    }

    #[must_use]
    pub fn is_verified(&self) -> bool {
        self.verified
    }

    /// Check `candidate`. On success the flag is set and persisted.
    ///
    /// A failed write is logged; the current session stays verified. On failure
    /// nothing changes and the caller may retry immediately.
    pub fn verify(&mut self, candidate: &str, now: GateTime) -> bool {
        if !verify(candidate, now) {
            tracing::debug!("Access code rejected");
            return false;
        }

        self.verified = true;
        if let Err(err) = self.store.set_flag(STORE_KEY, true) {
            tracing::warn!("Failed to persist verification flag: {err}");
        }
        tracing::info!("Access granted");
        true
    }

    /// [`Self::verify`] with the failure as a typed error for display.
    pub fn submit(&mut self, candidate: &str, now: GateTime) -> Result<(), AccessDenied> {
        if self.verify(candidate, now) {
            Ok(())
        } else {
            Err(AccessDenied)
        }
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }
}
