//! Value object trait: equality by value, not identity.
//!
//! Value objects have **no identity**; they are defined entirely by their
//! attribute values. A postal address nested inside a person record is the
//! typical example here.

/// Marker trait for value objects.
///
/// - **Value Object**: no identity (two values with the same fields are equal)
/// - **Entity**: has identity (two records with the same id are the same record)
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
