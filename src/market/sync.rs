//! Seller-side sync: publish the current cognition asset
//!
//! Scans the workspace for cognition documents, upserts seller telemetry and
//! saves the newest document as the seller's canonical asset. Raw memory
//! sources are never synced; only parsed `CognitionProfile` values reach the
//! store. Syncs for the same workspace serialize on an in-process lock so a
//! background sync never overlaps a foreground one.

use crate::distill::{self, DOCUMENT_DIR, DOCUMENT_FILE};
use crate::error::Result;
use crate::store::{install_record, PersonaStore};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;
use tokio::sync::Mutex;

/// Per-workspace sync locks (keyed by canonicalized root).
static SYNC_LOCKS: Lazy<Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

async fn workspace_lock(root: &Path) -> Arc<Mutex<()>> {
    let key = root.canonicalize().unwrap_or_else(|_| root.to_path_buf());
    let mut locks = SYNC_LOCKS.lock().await;
    locks.entry(key).or_default().clone()
}

/// Outcome of a sync run
#[derive(Debug)]
pub struct SyncReport {
    pub user_id: String,
    pub documents_found: usize,
    pub asset_saved: bool,
}

/// Find every cognition document under `root`.
///
/// Hidden directories other than `.mindprint` and common build trees are
/// skipped. Results are sorted for determinism.
pub fn find_documents(root: &Path) -> Vec<PathBuf> {
    let mut found = Vec::new();
    collect_documents(root, &mut found);
    found.sort();
    found
}

fn collect_documents(dir: &Path, found: &mut Vec<PathBuf>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if name == DOCUMENT_DIR {
            let doc = path.join(DOCUMENT_FILE);
            if doc.is_file() {
                found.push(doc);
            }
            continue;
        }
        if name.starts_with('.') || name == "node_modules" || name == "target" {
            continue;
        }
        collect_documents(&path, found);
    }
}

/// Sync the workspace's current cognition asset into the store.
pub async fn sync_workspace(
    store: &PersonaStore,
    workspace: &Path,
    user_id: Option<&str>,
) -> Result<SyncReport> {
    let lock = workspace_lock(workspace).await;
    let _guard = lock.lock().await;

    let record = install_record(user_id, workspace);
    store.upsert_seller(&record).await?;

    let documents = find_documents(workspace);
    tracing::info!(
        workspace = %workspace.display(),
        count = documents.len(),
        "cognition documents found"
    );

    // The newest document (by mtime, ties broken by path order) is the
    // seller's current asset; a full replace, never a merge.
    let mut current: Option<(SystemTime, PathBuf)> = None;
    for doc in &documents {
        let modified = std::fs::metadata(doc)
            .and_then(|m| m.modified())
            .unwrap_or(SystemTime::UNIX_EPOCH);
        if current.as_ref().map(|(t, _)| modified > *t).unwrap_or(true) {
            current = Some((modified, doc.clone()));
        }
    }

    let mut asset_saved = false;
    if let Some((_, doc)) = current {
        let text = tokio::fs::read_to_string(&doc).await?;
        match distill::parse(&text) {
            Ok(profile) => {
                store.save_asset(&record.user_id, &profile).await?;
                asset_saved = true;
            }
            Err(e) => {
                tracing::warn!(path = %doc.display(), error = %e, "skipping malformed document");
            }
        }
    }

    Ok(SyncReport {
        user_id: record.user_id,
        documents_found: documents.len(),
        asset_saved,
    })
}
