//! Buyer-side pull: materialize a rented persona
//!
//! Validates the rental token, then renders the returned profile under a
//! persona-scoped directory. Only the validated `CognitionProfile` ever
//! reaches the buyer's disk; the seller's raw memory never leaves the
//! seller's machine in the first place.

use crate::distill::{CognitionWriter, DOCUMENT_DIR};
use crate::error::{Error, Result};
use crate::rental::{RentalService, RentalToken};
use crate::store::{install_record, PersonaStore};
use std::path::{Path, PathBuf};

/// Pull the persona behind `token_text` into `workspace`.
///
/// Returns the path of the materialized cognition document.
pub async fn pull_persona(
    store: &PersonaStore,
    rentals: &RentalService,
    token_text: &str,
    workspace: &Path,
    buyer_user_id: Option<&str>,
) -> Result<PathBuf> {
    let record = install_record(buyer_user_id, workspace);
    store.upsert_buyer(&record).await?;

    let profile = rentals.validate(token_text).await?;
    let token = RentalToken::parse(token_text);
    let seller_user_id = store
        .get_seller_id(token.opaque())
        .await?
        .ok_or(Error::TokenNotFound)?;

    let destination = workspace
        .join("personas")
        .join(&seller_user_id)
        .join(DOCUMENT_DIR);
    let path = CognitionWriter::write(&profile, &destination).await?;

    tracing::info!(seller = %seller_user_id, path = %path.display(), "persona pulled");
    Ok(path)
}
