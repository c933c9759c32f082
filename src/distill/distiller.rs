//! Distillation pipeline: redact, classify, generalize
//!
//! Stages, in order:
//!
//! 1. Concatenate sources facts-first into one blob.
//! 2. Redact the blob as a whole (a value split across adjacent lines is
//!    still visible to the matcher).
//! 3. Split into candidate bullets, dropping headings and blanks.
//! 4. Classify each bullet; unclassified bullets are dropped.
//! 5. Generalize: a bullet still carrying a proper-noun-looking fragment is
//!    dropped entirely. No rephrasing, no guessing.
//!
//! Classification only ever sees `RedactedText` output, so no code path can
//! file unredacted content into a section.

use super::classifier::SectionClassifier;
use super::profile::{CognitionProfile, CognitionSection, SectionKind, COGNITION_MODEL_VERSION};
use super::sources::MemorySource;
use crate::error::Result;
use crate::redact::{RedactionResult, Redactor};
use std::collections::{BTreeMap, HashSet};

/// Distills memory sources into a cognition profile.
pub struct Distiller {
    redactor: Redactor,
    classifier: SectionClassifier,
    max_bullets_per_section: usize,
}

/// Outcome of a distillation run: the profile plus the redaction tally
/// (the tally feeds CLI/log reporting and never contains matched text).
#[derive(Debug)]
pub struct DistillOutcome {
    pub profile: CognitionProfile,
    pub redaction: RedactionResult,
}

impl Distiller {
    pub fn new(min_line_tokens: usize, max_bullets_per_section: usize) -> Self {
        Self {
            redactor: Redactor::new(),
            classifier: SectionClassifier::new(min_line_tokens),
            max_bullets_per_section,
        }
    }

    /// Run the full pipeline over `sources`.
    pub fn distill(&self, sources: &[MemorySource]) -> Result<DistillOutcome> {
        let mut ordered: Vec<&MemorySource> = sources.iter().collect();
        ordered.sort_by_key(|s| s.kind);

        let combined = ordered
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        let redaction = self.redactor.redact(&combined)?;
        tracing::debug!(replacements = redaction.total(), "redaction pass complete");

        let mut buckets: BTreeMap<SectionKind, Vec<String>> = BTreeMap::new();
        let mut seen: HashSet<String> = HashSet::new();

        for line in redaction.text.lines() {
            let Some(bullet) = normalize_bullet(line) else {
                continue;
            };
            let Some(kind) = self.classifier.classify(&bullet) else {
                continue;
            };
            if looks_identifying(&bullet) {
                tracing::trace!(section = ?kind, "dropping bullet with residual proper noun");
                continue;
            }
            if !seen.insert(bullet.clone()) {
                continue;
            }
            let bucket = buckets.entry(kind).or_default();
            if bucket.len() < self.max_bullets_per_section {
                bucket.push(bullet);
            }
        }

        let profile = CognitionProfile {
            sections: SectionKind::ALL
                .into_iter()
                .map(|kind| CognitionSection {
                    bullets: buckets.remove(&kind).unwrap_or_default(),
                    kind,
                })
                .collect(),
            model_version: COGNITION_MODEL_VERSION.to_string(),
        };

        Ok(DistillOutcome { profile, redaction })
    }
}

/// Strip bullet markers and reject non-content lines (blank, headings).
fn normalize_bullet(line: &str) -> Option<String> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }
    let stripped = trimmed.trim_start_matches(['-', '*', '•']).trim();
    if stripped.is_empty() {
        None
    } else {
        Some(stripped.to_string())
    }
}

/// Residual proper-noun detector for the generalization pass.
///
/// A TitleCase word that neither starts the bullet nor follows
/// sentence-ending punctuation reads as a name the catalog did not catch,
/// so the whole bullet is dropped. Placeholders (`[EMAIL]` and friends),
/// single letters, and ALL-CAPS technical acronyms are exempt.
fn looks_identifying(bullet: &str) -> bool {
    let words: Vec<&str> = bullet.split_whitespace().collect();
    for (idx, word) in words.iter().enumerate() {
        let stripped = word.trim_matches(|c: char| !c.is_alphanumeric());
        let mut chars = stripped.chars();
        let Some(first) = chars.next() else {
            continue;
        };
        let rest_has_lower = chars.clone().any(|c| c.is_lowercase());
        let title_case = first.is_uppercase() && rest_has_lower;
        if !title_case {
            continue;
        }
        if idx == 0 {
            continue;
        }
        let prev = words[idx - 1];
        if prev.ends_with(['.', '!', '?', ':', ';']) {
            continue;
        }
        return true;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distill::sources::SourceKind;
    use std::path::PathBuf;

    fn source(kind: SourceKind, text: &str) -> MemorySource {
        MemorySource {
            kind,
            path: PathBuf::from(match kind {
                SourceKind::Fact => "MEMORY.md",
                SourceKind::Event => "HISTORY.md",
            }),
            text: text.to_string(),
        }
    }

    fn distiller() -> Distiller {
        Distiller::new(4, 10)
    }

    #[test]
    fn test_basic_distillation() {
        let sources = [source(
            SourceKind::Fact,
            "- weighs risk against expected payoff before deciding\n\
             - prefers to iterate on small experiments first",
        )];
        let outcome = distiller().distill(&sources).unwrap();

        assert_eq!(
            outcome.profile.section(SectionKind::DecisionApproach),
            ["weighs risk against expected payoff before deciding"]
        );
        assert_eq!(
            outcome.profile.section(SectionKind::LearningStyle),
            ["prefers to iterate on small experiments first"]
        );
        assert_eq!(outcome.profile.model_version, COGNITION_MODEL_VERSION);
    }

    #[test]
    fn test_facts_sort_before_events() {
        let sources = [
            source(SourceKind::Event, "- iterates on feedback loops constantly here"),
            source(SourceKind::Fact, "- learns fastest from hands-on experiments"),
        ];
        let outcome = distiller().distill(&sources).unwrap();
        let bullets = outcome.profile.section(SectionKind::LearningStyle);
        assert_eq!(bullets[0], "learns fastest from hands-on experiments");
        assert_eq!(bullets[1], "iterates on feedback loops constantly here");
    }

    #[test]
    fn test_no_raw_leak() {
        let sources = [source(
            SourceKind::Fact,
            "- works with Jane Doe (jane@acme.com) on project Falcon, customer ACME-2024-001\n\
             - weighs risk against expected payoff before deciding",
        )];
        let outcome = distiller().distill(&sources).unwrap();
        let json = serde_json::to_string(&outcome.profile).unwrap();
        assert!(!json.contains("jane@acme.com"));
        assert!(!json.contains("ACME-2024-001"));
        assert!(!json.contains("Jane Doe"));
        // The clean bullet survives
        assert_eq!(
            outcome.profile.section(SectionKind::DecisionApproach).len(),
            1
        );
    }

    #[test]
    fn test_residual_proper_noun_drops_bullet() {
        let sources = [source(
            SourceKind::Fact,
            "- learned the migration workflow while pairing with Falcon engineers",
        )];
        let outcome = distiller().distill(&sources).unwrap();
        assert_eq!(outcome.profile.bullet_count(), 0);
    }

    #[test]
    fn test_headings_and_blanks_skipped() {
        let sources = [source(
            SourceKind::Fact,
            "# Memory\n\n## Preferences\n- automates every recurring workflow quickly",
        )];
        let outcome = distiller().distill(&sources).unwrap();
        assert_eq!(
            outcome.profile.section(SectionKind::ExecutionTendencies),
            ["automates every recurring workflow quickly"]
        );
    }

    #[test]
    fn test_unclassified_lines_never_appear() {
        let discarded = "the weather was pleasant all afternoon";
        let sources = [source(SourceKind::Fact, &format!("- {discarded}"))];
        let outcome = distiller().distill(&sources).unwrap();
        let json = serde_json::to_string(&outcome.profile).unwrap();
        assert!(!json.contains(discarded));
    }

    #[test]
    fn test_duplicate_bullets_collapsed() {
        let sources = [source(
            SourceKind::Fact,
            "- automates every recurring workflow quickly\n\
             - automates every recurring workflow quickly",
        )];
        let outcome = distiller().distill(&sources).unwrap();
        assert_eq!(
            outcome.profile.section(SectionKind::ExecutionTendencies).len(),
            1
        );
    }

    #[test]
    fn test_section_cap_respected() {
        let text: String = (0..15)
            .map(|i| format!("- automates recurring workflow number {i} every single day\n"))
            .collect();
        let sources = [source(SourceKind::Fact, &text)];
        let outcome = Distiller::new(4, 10).distill(&sources).unwrap();
        assert_eq!(
            outcome.profile.section(SectionKind::ExecutionTendencies).len(),
            10
        );
    }

    #[test]
    fn test_pii_split_across_lines_redacted_as_whole() {
        // The combined blob joins with a newline; whole-text redaction means
        // per-fragment redaction gaps cannot occur. A URL broken off at a
        // line start is still matched where it lands.
        let sources = [
            source(SourceKind::Fact, "- reviews dashboards at"),
            source(SourceKind::Event, "https://internal.acme.com/grafana daily for risk validation signals"),
        ];
        let outcome = distiller().distill(&sources).unwrap();
        let json = serde_json::to_string(&outcome.profile).unwrap();
        assert!(!json.contains("internal.acme.com"));
    }

    #[test]
    fn test_empty_sections_present() {
        let sources = [source(SourceKind::Fact, "- no classifiable content here at all")];
        let outcome = distiller().distill(&sources).unwrap();
        assert_eq!(outcome.profile.sections.len(), 6);
    }

    #[test]
    fn test_looks_identifying() {
        assert!(looks_identifying("pairs weekly with Falcon engineers"));
        assert!(looks_identifying("met Jane Doe at the summit"));
        assert!(!looks_identifying("Iterates on prototypes before committing"));
        assert!(!looks_identifying("ships via CI every single day"));
        assert!(!looks_identifying("keeps notes. Reviews them weekly"));
        assert!(!looks_identifying("sends updates to [EMAIL] every week"));
    }
}
