//! Memory source loading
//!
//! Sources are ephemeral: read once per distillation run and never persisted
//! or copied into any shareable artifact. `MEMORY.md` carries durable facts,
//! `HISTORY.md` carries events; facts always sort before events so a run is
//! deterministic regardless of filesystem enumeration order.

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// Well-known fact source file name
pub const MEMORY_FILE: &str = "MEMORY.md";
/// Well-known event source file name
pub const HISTORY_FILE: &str = "HISTORY.md";

/// Kind of a memory source, which determines concatenation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SourceKind {
    Fact,
    Event,
}

/// One raw memory source: a text blob plus where it came from
#[derive(Debug, Clone)]
pub struct MemorySource {
    pub kind: SourceKind,
    pub path: PathBuf,
    pub text: String,
}

/// Load memory sources from a directory.
///
/// Returns `Error::SourceNotFound` when neither well-known file exists; a
/// single present file is enough. The result is sorted facts-first.
pub async fn load_sources(dir: &Path) -> Result<Vec<MemorySource>> {
    let mut sources = Vec::new();

    for (name, kind) in [(MEMORY_FILE, SourceKind::Fact), (HISTORY_FILE, SourceKind::Event)] {
        let path = dir.join(name);
        if path.is_file() {
            let text = tokio::fs::read_to_string(&path).await?;
            sources.push(MemorySource { kind, path, text });
        }
    }

    if sources.is_empty() {
        return Err(Error::SourceNotFound);
    }

    sources.sort_by_key(|s| s.kind);
    Ok(sources)
}
