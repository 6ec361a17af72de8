//! Partial updates.

use chrono::{DateTime, Utc};

use crate::error::DomainResult;

/// A partial update over a record of type `T`.
///
/// Implementations apply only the fields that were explicitly supplied and
/// leave everything else at its prior value, then stamp `updated_at` with
/// `now`. Supplied values are validated before the record is touched, so a
/// failed patch leaves the target unchanged.
pub trait Patch<T> {
    fn apply(self, target: &mut T, now: DateTime<Utc>) -> DomainResult<()>;
}
