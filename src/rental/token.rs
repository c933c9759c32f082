//! Rental token format and generation
//!
//! A token is a bearer capability: `<namespace>@<opaque>`. Only the opaque
//! value participates in validation; the namespace prefix is informational
//! display text. Opaque values come from the OS random source and are never
//! re-issued.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use rand::rngs::OsRng;
use rand::RngCore;

/// Default display namespace for issued tokens
pub const DEFAULT_NAMESPACE: &str = "mp";

/// A rental token split into its display namespace and opaque value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RentalToken {
    namespace: String,
    opaque: String,
}

impl RentalToken {
    /// Generate a fresh token with `entropy_bytes` of OS randomness.
    pub fn generate(namespace: &str, entropy_bytes: usize) -> Self {
        let mut buf = vec![0u8; entropy_bytes];
        OsRng.fill_bytes(&mut buf);
        Self {
            namespace: namespace.to_string(),
            opaque: URL_SAFE_NO_PAD.encode(&buf),
        }
    }

    /// Parse user-supplied token text.
    ///
    /// Everything up to and including the last `@` is treated as the
    /// (ignored) namespace; a bare opaque value is accepted unchanged.
    pub fn parse(text: &str) -> Self {
        match text.rsplit_once('@') {
            Some((namespace, opaque)) => Self {
                namespace: namespace.to_string(),
                opaque: opaque.to_string(),
            },
            None => Self {
                namespace: DEFAULT_NAMESPACE.to_string(),
                opaque: text.to_string(),
            },
        }
    }

    /// The value validation is keyed on
    pub fn opaque(&self) -> &str {
        &self.opaque
    }
}

impl std::fmt::Display for RentalToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.namespace, self.opaque)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_length_and_charset() {
        let token = RentalToken::generate(DEFAULT_NAMESPACE, 24);
        // 24 bytes → 32 base64url chars, no padding
        assert_eq!(token.opaque().len(), 32);
        assert!(token
            .opaque()
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn test_generated_tokens_are_unique() {
        let a = RentalToken::generate(DEFAULT_NAMESPACE, 24);
        let b = RentalToken::generate(DEFAULT_NAMESPACE, 24);
        assert_ne!(a.opaque(), b.opaque());
    }

    #[test]
    fn test_display_format() {
        let token = RentalToken::generate("mp", 24);
        let text = token.to_string();
        assert!(text.starts_with("mp@"));
        assert_eq!(&text[3..], token.opaque());
    }

    #[test]
    fn test_parse_strips_namespace() {
        let parsed = RentalToken::parse("marketplace@abc123");
        assert_eq!(parsed.opaque(), "abc123");
    }

    #[test]
    fn test_parse_bare_opaque() {
        let parsed = RentalToken::parse("abc123");
        assert_eq!(parsed.opaque(), "abc123");
    }

    #[test]
    fn test_parse_uses_last_at_sign() {
        let parsed = RentalToken::parse("odd@ns@opaque");
        assert_eq!(parsed.opaque(), "opaque");
    }

    #[test]
    fn test_round_trip() {
        let token = RentalToken::generate("mp", 24);
        let parsed = RentalToken::parse(&token.to_string());
        assert_eq!(parsed.opaque(), token.opaque());
    }
}
