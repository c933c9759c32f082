//! MindPrint configuration management

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main MindPrint configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MindprintConfig {
    /// Distillation tunables
    #[serde(default)]
    pub distill: DistillConfig,

    /// Persona store configuration
    #[serde(default)]
    pub store: StoreConfig,

    /// Rental issuance configuration
    #[serde(default)]
    pub rental: RentalConfig,

    /// Stable user identifier for sync/pull; empty = derive from the host
    /// fingerprint
    #[serde(default)]
    pub user_id: String,
}

/// Distillation tunables
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistillConfig {
    /// Lines with fewer whitespace-separated tokens are discarded
    pub min_line_tokens: usize,

    /// Upper bound on bullets kept per cognition section
    pub max_bullets_per_section: usize,
}

impl Default for DistillConfig {
    fn default() -> Self {
        Self {
            min_line_tokens: 4,
            max_bullets_per_section: 10,
        }
    }
}

/// Persona store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// SQLite database path
    pub db_path: PathBuf,

    /// Per-query timeout; expiry surfaces a retryable store error
    pub query_timeout_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        let base = dirs_next::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("mindprint");
        Self {
            db_path: base.join("mindprint.db"),
            query_timeout_secs: 30,
        }
    }
}

/// Rental issuance configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RentalConfig {
    /// Display namespace prefixed to issued tokens
    pub namespace: String,

    /// Entropy of the opaque token value in bytes
    pub token_bytes: usize,

    /// Default rental duration when the caller does not specify one
    pub default_ttl_hours: i64,
}

impl Default for RentalConfig {
    fn default() -> Self {
        Self {
            namespace: "mp".to_string(),
            token_bytes: 24,
            default_ttl_hours: 720,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MindprintConfig::default();
        assert_eq!(config.distill.min_line_tokens, 4);
        assert_eq!(config.distill.max_bullets_per_section, 10);
        assert_eq!(config.rental.default_ttl_hours, 720);
        assert_eq!(config.rental.token_bytes, 24);
        assert_eq!(config.store.query_timeout_secs, 30);
        assert!(config.user_id.is_empty());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = MindprintConfig::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: MindprintConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed.rental.namespace, config.rental.namespace);
        assert_eq!(parsed.store.db_path, config.store.db_path);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let parsed: MindprintConfig = toml::from_str("user_id = \"abc\"").unwrap();
        assert_eq!(parsed.user_id, "abc");
        assert_eq!(parsed.distill.max_bullets_per_section, 10);
    }
}
