//! Host telemetry for installation records
//!
//! A stable fingerprint identifies an installation across syncs without
//! carrying raw host details in the key itself; the human-readable details
//! ride along as metadata.

use crate::store::persona::InstallRecord;
use chrono::Utc;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Best-effort host name; absent on minimal environments.
fn hostname() -> String {
    std::env::var("HOSTNAME")
        .or_else(|_| std::env::var("COMPUTERNAME"))
        .unwrap_or_else(|_| "unknown-host".to_string())
}

/// Stable host fingerprint: SHA-256 over host identity inputs, truncated to
/// 12 hex chars. Deterministic per installation, opaque to the marketplace.
pub fn host_fingerprint() -> String {
    let home = std::env::var("HOME").unwrap_or_default();
    let input = format!(
        "{}|{}|{}|{}",
        hostname(),
        std::env::consts::OS,
        std::env::consts::ARCH,
        home
    );
    let digest = Sha256::digest(input.as_bytes());
    hex::encode(digest)[..12].to_string()
}

/// Build an installation record for the given (or fingerprint-derived)
/// user id and install path.
pub fn install_record(user_id: Option<&str>, install_path: &Path) -> InstallRecord {
    let fingerprint = host_fingerprint();
    let user_id = user_id
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| fingerprint.clone());

    InstallRecord {
        user_id,
        host_fingerprint: fingerprint,
        metadata: serde_json::json!({
            "hostname": hostname(),
            "os": std::env::consts::OS,
            "arch": std::env::consts::ARCH,
            "install_path": install_path.display().to_string(),
            "timestamp": Utc::now().to_rfc3339(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_is_stable_and_short() {
        let a = host_fingerprint();
        let b = host_fingerprint();
        assert_eq!(a, b);
        assert_eq!(a.len(), 12);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_record_defaults_user_id_to_fingerprint() {
        let record = install_record(None, Path::new("/tmp/ws"));
        assert_eq!(record.user_id, record.host_fingerprint);
    }

    #[test]
    fn test_record_keeps_explicit_user_id() {
        let record = install_record(Some("user-42"), Path::new("/tmp/ws"));
        assert_eq!(record.user_id, "user-42");
        assert_ne!(record.user_id, record.host_fingerprint);
    }

    #[test]
    fn test_empty_user_id_falls_back() {
        let record = install_record(Some(""), Path::new("/tmp/ws"));
        assert_eq!(record.user_id, record.host_fingerprint);
    }

    #[test]
    fn test_metadata_fields() {
        let record = install_record(None, Path::new("/tmp/ws"));
        assert_eq!(record.metadata["install_path"], "/tmp/ws");
        assert!(record.metadata["os"].is_string());
    }
}
