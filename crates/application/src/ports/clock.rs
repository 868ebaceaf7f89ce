//! Clock port for time-related operations

use chrono::{DateTime, Utc};

/// Port for reading the wall clock.
///
/// Adapters that stamp generated codes take a `Clock` so tests can pin the
/// value.
pub trait Clock: Send + Sync {
    /// Returns the current UTC timestamp.
    fn now(&self) -> DateTime<Utc>;
}
