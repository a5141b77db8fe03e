//! The `Clock` capability contract (§9).
//!
//! Threaded through `Deps` like every other port, rather than read from
//! `SystemTime::now()` inline — this is what makes `Create`'s `created`
//! timestamp and `MetadataBuilder`'s `updated_at` deterministic in tests.

use chrono::{DateTime, Utc};

pub trait Clock {
    fn now(&self) -> DateTime<Utc>;

    /// Today's date, used to compute the conventional workspace root
    /// `<home>/workspaces/<YYYY-MM-DD>` (§4.1's `LoadConfig` default, §6).
    fn today(&self) -> chrono::NaiveDate {
        self.now().date_naive()
    }
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
