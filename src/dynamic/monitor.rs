//! Snapshots of monitored service state.
//!
//! Plugins usually base their decisions on the health of monitored
//! services. A service changes its state only after a number of
//! consecutive checks disagreed with the current state. From a snapshot of
//! that process, the earliest moment the state can change follows. This is
//! what plugins report as the time to change of their answer.

use crate::base::ttl::Ttl;
use std::time::Duration;

//------------ HealthState ---------------------------------------------------

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum HealthState {
    Up,
    Down,
}

//------------ ServiceState --------------------------------------------------

/// The state of a monitored service at one point in time.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ServiceState {
    /// The current state of the service.
    state: HealthState,

    /// The number of consecutive checks that disagreed with `state`.
    contrary_checks: u32,

    /// The number of successful checks needed to go up.
    up_threshold: u32,

    /// The number of failed checks needed to go down.
    down_threshold: u32,

    /// The time between two checks.
    interval: Duration,
}

impl ServiceState {
    pub fn new(
        state: HealthState,
        up_threshold: u32,
        down_threshold: u32,
        interval: Duration,
    ) -> Self {
        ServiceState {
            state,
            contrary_checks: 0,
            up_threshold,
            down_threshold,
            interval,
        }
    }

    /// Sets the number of recent checks that disagreed with the state.
    #[must_use]
    pub fn with_contrary_checks(mut self, checks: u32) -> Self {
        self.contrary_checks = checks;
        self
    }

    pub fn state(&self) -> HealthState {
        self.state
    }

    pub fn is_up(&self) -> bool {
        self.state == HealthState::Up
    }

    pub fn contrary_checks(&self) -> u32 {
        self.contrary_checks
    }

    /// Returns the shortest time until the state could change.
    ///
    /// This is the number of contrary checks still missing times the check
    /// interval. At least one more check is always necessary.
    pub fn time_to_change(&self) -> Ttl {
        let remaining = self
            .threshold()
            .saturating_sub(self.contrary_checks)
            .max(1);
        let secs = self.interval.as_secs().saturating_mul(remaining.into());
        Ttl::from_secs(u32::try_from(secs).unwrap_or(u32::MAX))
    }

    fn threshold(&self) -> u32 {
        match self.state {
            HealthState::Up => self.down_threshold,
            HealthState::Down => self.up_threshold,
        }
    }
}

//------------ min_time_to_change --------------------------------------------

/// Returns the shortest time to change of a number of services.
///
/// If there are no services, nothing can change and the result is the
/// maximum TTL.
pub fn min_time_to_change<'a>(
    states: impl IntoIterator<Item = &'a ServiceState>,
) -> Ttl {
    states
        .into_iter()
        .map(ServiceState::time_to_change)
        .min()
        .unwrap_or(Ttl::MAX)
}

//============ Tests =========================================================
