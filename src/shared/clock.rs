//! Time source used by the catalog and the reconciliation engine.
//!
//! Every instant that reaches the catalog is expressed in UTC, whatever the
//! filesystem or database reported, so comparisons never mix zones.

use chrono::{DateTime, Utc};
use std::time::SystemTime;

pub trait Clock: Send + Sync {
    /// Current instant
    fn now(&self) -> DateTime<Utc>;

    /// Convert a filesystem timestamp to the canonical zone
    fn to_canonical(&self, time: SystemTime) -> DateTime<Utc> {
        DateTime::<Utc>::from(time)
    }
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock frozen at a given instant
#[cfg(test)]
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

#[cfg(test)]
impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
