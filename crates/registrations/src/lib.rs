//! Registrations domain module.
//!
//! A registration links a person to a course and records whether that person
//! holds a seat (`enrolled`), is queued for one (`waitlisted`), or has left
//! (`dropped`). Seat accounting itself lives in the infra workflow; this crate
//! only describes the records and classifies status transitions.

pub mod registration;

pub use registration::{
    NewRegistration, Registration, RegistrationFilter, RegistrationPatch, RegistrationStatus,
    StatusTransition,
};
