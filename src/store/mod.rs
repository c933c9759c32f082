//! Persona store: durable seller/buyer records, assets and rentals
//!
//! The store is an explicit repository object passed to its callers;
//! redaction and distillation never touch it.

pub mod persona;
pub mod telemetry;

pub use persona::{InstallRecord, InstallRow, PersonaStore, RentalRow};
pub use telemetry::{host_fingerprint, install_record};
