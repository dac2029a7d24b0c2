//! Reentrancy guard for mutating pool operations.
//!
//! A value-transfer hook could try to re-invoke a mutating operation while
//! the first is mid-flight, observing half-committed state. Every mutating
//! entry point sets the in-progress flag before doing anything and clears
//! it on both the success and error path; a nested call fails fast with
//! `ReentrantCall` instead.

use openvoucher_types::{Result, VoucherError};

/// "Operation in progress" flag checked around every mutating call.
#[derive(Debug, Default)]
pub struct ReentrancyLock {
    in_progress: bool,
}

impl ReentrancyLock {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the lock.
    ///
    /// # Errors
    /// Returns [`VoucherError::ReentrantCall`] if an operation is already
    /// in flight.
    pub fn enter(&mut self) -> Result<()> {
        if self.in_progress {
            return Err(VoucherError::ReentrantCall);
        }
        self.in_progress = true;
        Ok(())
    }

    /// Release the lock. Must run on every exit path of the guarded
    /// operation, error paths included.
    pub fn exit(&mut self) {
        self.in_progress = false;
    }

    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.in_progress
    }
}
