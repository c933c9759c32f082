//! Marketplace client operations: seller sync and buyer pull

pub mod pull;
pub mod sync;

pub use pull::pull_persona;
pub use sync::{find_documents, sync_workspace, SyncReport};
