//! Rental tokens: time-bounded capabilities over cognition profiles

pub mod service;
pub mod token;

pub use service::RentalService;
pub use token::{RentalToken, DEFAULT_NAMESPACE};
