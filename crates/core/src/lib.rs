//! `campus-core`: shared building blocks for the campus registry.
//!
//! This crate contains **pure domain** primitives (no storage, no HTTP).

pub mod entity;
pub mod error;
pub mod id;
pub mod patch;
pub mod value_object;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{AddressId, CourseId, PersonId, RegistrationId};
pub use patch::Patch;
pub use value_object::ValueObject;
