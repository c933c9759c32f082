//! Rental issuance, validation and revocation
//!
//! Lifecycle per rental: Issued → Valid | Expired | Revoked, with Expired
//! and Revoked terminal. Revocation wins over expiry when both hold. The
//! service owns no state of its own; every read and write goes through the
//! persona store, and validation resolves the rental and the seller's asset
//! in one store transaction against a single `now`.

use crate::config::RentalConfig;
use crate::distill::CognitionProfile;
use crate::error::{Error, Result};
use crate::store::{PersonaStore, RentalRow};
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;

use super::token::RentalToken;

pub struct RentalService {
    store: Arc<PersonaStore>,
    config: RentalConfig,
}

impl RentalService {
    pub fn new(store: Arc<PersonaStore>, config: RentalConfig) -> Self {
        Self { store, config }
    }

    /// The configured default rental duration.
    pub fn default_ttl(&self) -> Duration {
        Duration::hours(self.config.default_ttl_hours)
    }

    /// Issue a new rental for `seller_user_id`.
    ///
    /// `ttl = None` issues a non-expiring rental (discouraged; callers must
    /// opt in explicitly). Fails with `SellerNotFound` when the seller has
    /// no saved asset to rent.
    pub async fn issue(
        &self,
        seller_user_id: &str,
        ttl: Option<Duration>,
    ) -> Result<RentalToken> {
        if !self.store.has_asset(seller_user_id).await? {
            return Err(Error::SellerNotFound);
        }

        let token = RentalToken::generate(&self.config.namespace, self.config.token_bytes);
        let now = Utc::now();
        let row = RentalRow {
            token: token.opaque().to_string(),
            seller_user_id: seller_user_id.to_string(),
            created_at: now.to_rfc3339(),
            expires_at: ttl.map(|d| (now + d).to_rfc3339()),
            revoked: false,
        };
        self.store.insert_rental(&row).await?;

        tracing::info!(seller = seller_user_id, "rental issued");
        Ok(token)
    }

    /// Validate a token and return the rented cognition profile.
    pub async fn validate(&self, token_text: &str) -> Result<CognitionProfile> {
        self.validate_at(token_text, Utc::now()).await
    }

    /// Validation against an explicit clock; the public `validate` passes
    /// the current time, tests pass crafted instants.
    async fn validate_at(
        &self,
        token_text: &str,
        now: DateTime<Utc>,
    ) -> Result<CognitionProfile> {
        let token = RentalToken::parse(token_text);

        let Some((rental, asset)) = self.store.rental_with_asset(token.opaque()).await? else {
            return Err(Error::TokenNotFound);
        };

        if rental.revoked {
            return Err(Error::TokenRevoked);
        }

        if let Some(expires_at) = &rental.expires_at {
            let expiry = DateTime::parse_from_rfc3339(expires_at)
                .map_err(|e| Error::Store(format!("malformed expiry timestamp: {e}")))?
                .with_timezone(&Utc);
            // Valid through the expiry instant itself; expired strictly after.
            if now > expiry {
                return Err(Error::TokenExpired);
            }
        }

        let content = asset.ok_or(Error::SellerNotFound)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Revoke a token. Idempotent: unknown, expired and already-revoked
    /// tokens are all successful no-ops.
    pub async fn revoke(&self, token_text: &str) -> Result<()> {
        let token = RentalToken::parse(token_text);
        self.store.revoke_rental(token.opaque()).await?;
        tracing::info!("rental revoked");
        Ok(())
    }
}
