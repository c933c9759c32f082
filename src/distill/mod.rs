//! Distillation: redacted memory text to structured cognition profiles
//!
//! The pipeline is pure and synchronous: load sources, redact the combined
//! text, classify line by line, generalize fail-closed, then hand the
//! profile to the writer. The redaction pass always completes before any
//! section assignment; the classifier only ever receives redactor output.

pub mod classifier;
pub mod distiller;
pub mod document;
pub mod profile;
pub mod sources;
pub mod writer;

pub use classifier::SectionClassifier;
pub use distiller::{DistillOutcome, Distiller};
pub use document::{parse, render, DOCUMENT_DIR, DOCUMENT_FILE, VERSION_PREFIX};
pub use profile::{CognitionProfile, CognitionSection, SectionKind, COGNITION_MODEL_VERSION};
pub use sources::{load_sources, MemorySource, SourceKind, HISTORY_FILE, MEMORY_FILE};
pub use writer::CognitionWriter;
