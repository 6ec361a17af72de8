//! Courses domain module.
//!
//! A course record carries its own seat ledger (`capacity` / `enrollment`).
//! The ledger is only ever moved by the registration workflow; this crate
//! provides the seat arithmetic and guards its invariants.

pub mod course;

pub use course::{Course, CourseFilter, CoursePatch, NewCourse};
