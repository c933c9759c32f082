//! MindPrint - Privacy-preserving cognition distillation and persona rental
//!
//! MindPrint turns free-form personal memory text into a privacy-safe,
//! shareable "cognition profile," and gates reuse of that profile through
//! opaque, time-bounded rental tokens.
//!
//! ## Architecture
//!
//! ```text
//! raw memory text (MEMORY.md / HISTORY.md)
//!        │
//!        ▼
//! ┌──────────────┐   ┌───────────────────┐   ┌─────────────────┐
//! │   Redactor   │──▶│ SectionClassifier │──▶│    Distiller    │
//! │ (catalog of  │   │ (keyword predicate│   │ (generalize,    │
//! │  rules)      │   │  table)           │   │  fail-closed)   │
//! └──────────────┘   └───────────────────┘   └────────┬────────┘
//!                                                     │
//!                                            CognitionProfile
//!                                                     │
//!              ┌──────────────────────────────────────┼─────────┐
//!              ▼                                      ▼         │
//!      ┌───────────────┐  sync                ┌──────────────┐  │ write
//!      │  PersonaStore │◀─────────────────────│ Cognition-   │◀─┘
//!      │  (SQLite)     │                      │ Writer       │
//!      └───────┬───────┘                      └──────────────┘
//!              │ issue / validate / revoke
//!              ▼
//!      ┌───────────────┐  pull
//!      │ RentalService │─────▶ personas/<seller>/.mindprint/cognition.md
//!      └───────────────┘
//! ```
//!
//! ## Key guarantees
//!
//! - **Irreversibility**: redaction replaces matches with fixed category
//!   placeholders; re-running redaction on its own output is a no-op.
//! - **Fail-closed**: ambiguous lines are dropped, never guessed into a
//!   section; partial redaction aborts the run instead of degrading.
//! - **Typed store**: the persona store only accepts and returns
//!   [`CognitionProfile`](distill::CognitionProfile) values; raw memory
//!   text has no route into any shareable artifact.
//! - **Capability tokens**: rentals are opaque bearer tokens from a
//!   cryptographically strong random source, validated atomically against a
//!   single clock reading.
//!
//! ## Modules
//!
//! - [`redact`]: pattern catalog and idempotent redactor
//! - [`distill`]: classifier, distiller, canonical document, writer
//! - [`store`]: durable persona store (sellers, buyers, assets, rentals)
//! - [`rental`]: token format and rental lifecycle service
//! - [`market`]: seller sync and buyer pull operations
//! - [`config`]: configuration management

pub mod config;
pub mod distill;
pub mod error;
pub mod market;
pub mod redact;
pub mod rental;
pub mod store;

pub use config::MindprintConfig;
pub use error::{Error, Result};
