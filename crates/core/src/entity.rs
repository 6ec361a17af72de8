//! Entity trait: identity + continuity across state changes.

use chrono::{DateTime, Utc};

/// Entity marker + minimal interface.
///
/// Every record kept by the registry is an entity: it has a server-side
/// identifier and a creation timestamp used for stable ordering.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Copy + Eq + Ord + core::hash::Hash + core::fmt::Debug + core::fmt::Display;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;

    /// When the entity was first stored.
    fn created_at(&self) -> DateTime<Utc>;

    /// Human-readable kind name used in "not found" errors (e.g. `"course"`).
    fn kind() -> &'static str;
}
