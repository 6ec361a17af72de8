//! People domain module (persons and their postal addresses).
//!
//! Plain records with validation and partial-update rules; no IO, no HTTP,
//! no storage.

pub mod address;
pub mod person;
mod validate;

pub use address::{Address, AddressFilter, AddressPatch, NewAddress, PostalAddress};
pub use person::{NewPerson, Person, PersonFilter, PersonPatch};
