//! Infrastructure layer: record stores and the registration workflow.

pub mod enrollment_audit;
pub mod registrar;
pub mod store;


pub use enrollment_audit::EnrollmentAudit;
pub use registrar::{Registrar, StatusUpdate};
pub use store::{EntityStore, InMemoryEntityStore};
