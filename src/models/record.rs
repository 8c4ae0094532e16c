//! Shared record behaviour
//!
//! Time-stamped records and creation-time id assignment.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

/// A record logged at an instant
pub trait Dated {
    fn timestamp(&self) -> DateTime<Utc>;

    /// Local calendar day of the record in `tz`
    fn local_day<Tz: TimeZone>(&self, tz: &Tz) -> NaiveDate {
        self.timestamp().with_timezone(tz).date_naive()
    }
}

/// A record with a numeric id
pub trait Identified {
    fn id(&self) -> i64;
}

/// Next id for a store: the creation time in milliseconds, bumped past the
/// current maximum so ids stay unique when records are created in the same
/// millisecond.
pub fn next_id<T: Identified>(existing: &[T], now: DateTime<Utc>) -> i64 {
    let millis = now.timestamp_millis();
    match existing.iter().map(Identified::id).max() {
        Some(max) if max >= millis => max + 1,
        _ => millis,
    }
}

macro_rules! impl_record {
    ($ty:ty) => {
        impl $crate::models::Dated for $ty {
            fn timestamp(&self) -> chrono::DateTime<chrono::Utc> {
                self.date
            }
        }

        impl $crate::models::Identified for $ty {
            fn id(&self) -> i64 {
                self.id
            }
        }
    };
}

pub(crate) use impl_record;
