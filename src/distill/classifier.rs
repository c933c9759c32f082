//! Heuristic classification of redacted lines into cognition sections
//!
//! One ordered table of keyword predicates, first match wins. Lines that
//! match no predicate are discarded, never defaulted into a catch-all:
//! dropping an ambiguous line is cheaper than filing an identifying one
//! under the wrong heading. Lines below the minimum token count, and lines
//! on the boilerplate blocklist, are discarded before classification.

use super::profile::SectionKind;

/// Predicate table: section → lowercase keywords, in tie-break order.
/// A line belongs to the first section with a keyword hit.
const PREDICATES: &[(SectionKind, &[&str])] = &[
    (
        SectionKind::CoreThinkingPatterns,
        &[
            "pattern",
            "architecture",
            "abstraction",
            "framework",
            "mental model",
            "first principles",
            "systems thinking",
            "structure",
            "principle",
        ],
    ),
    (
        SectionKind::DecisionApproach,
        &[
            "decision",
            "decide",
            "trade-off",
            "tradeoff",
            "risk",
            "validate",
            "validation",
            "evaluate",
            "criteria",
            "prioritize",
            "weigh",
        ],
    ),
    (
        SectionKind::LearningStyle,
        &[
            "learn",
            "iterate",
            "iteration",
            "experiment",
            "explore",
            "prototype",
            "practice",
            "feedback",
            "study",
            "curious",
        ],
    ),
    (
        SectionKind::ExecutionTendencies,
        &[
            "workflow",
            "pipeline",
            "process",
            "checklist",
            "automate",
            "automation",
            "ship",
            "deliver",
            "routine",
            "habit",
            "incremental",
            "testing",
        ],
    ),
    (
        SectionKind::CognitiveStrengths,
        &[
            "strength",
            "strong at",
            "good at",
            "excels",
            "expertise",
            "skilled",
            "thorough",
            "analytical",
            "attention to detail",
            "debugging",
        ],
    ),
    (
        SectionKind::ExperienceThemes,
        &[
            "project",
            "worked",
            "works with",
            "built",
            "shipped",
            "collaborat",
            "team",
            "customer",
            "client",
            "experience",
            "maintained",
            "migrated",
        ],
    ),
];

/// Boilerplate lines that carry no cognition content regardless of keywords.
/// Includes the memory-template placeholders emitted by agent harnesses.
const BLOCKLIST: &[&str] = &[
    "(important facts about the user)",
    "(user preferences learned over time)",
    "(information about ongoing projects)",
    "(things to remember)",
    "n/a",
    "none",
    "tbd",
    "todo",
];

/// Classifies redacted lines into cognition sections.
pub struct SectionClassifier {
    min_tokens: usize,
}

impl SectionClassifier {
    pub fn new(min_tokens: usize) -> Self {
        Self { min_tokens }
    }

    /// Classify a single redacted line.
    ///
    /// Returns `None` for lines that are too short, boilerplate, or that hit
    /// no predicate; all three are discarded by the distiller.
    pub fn classify(&self, line: &str) -> Option<SectionKind> {
        let trimmed = line.trim();
        if trimmed.split_whitespace().count() < self.min_tokens {
            return None;
        }

        let lower = trimmed.to_lowercase();
        if BLOCKLIST.contains(&lower.as_str()) {
            return None;
        }

        PREDICATES
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
            .map(|(kind, _)| *kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> SectionClassifier {
        SectionClassifier::new(4)
    }

    #[test]
    fn test_decision_vocabulary() {
        let c = classifier();
        assert_eq!(
            c.classify("weighs risk against expected payoff before committing"),
            Some(SectionKind::DecisionApproach)
        );
    }

    #[test]
    fn test_learning_vocabulary() {
        let c = classifier();
        assert_eq!(
            c.classify("prefers to iterate on small experiments first"),
            Some(SectionKind::LearningStyle)
        );
    }

    #[test]
    fn test_first_match_wins_declaration_order() {
        // "pattern" (CoreThinkingPatterns) and "decision" (DecisionApproach)
        // both hit; CoreThinkingPatterns is declared first.
        let c = classifier();
        assert_eq!(
            c.classify("uses a recurring pattern for every major decision taken"),
            Some(SectionKind::CoreThinkingPatterns)
        );
    }

    #[test]
    fn test_unmatched_line_discarded() {
        let c = classifier();
        assert_eq!(c.classify("the weather was pleasant all afternoon"), None);
    }

    #[test]
    fn test_short_line_discarded_even_with_keywords() {
        let c = classifier();
        assert_eq!(c.classify("risk decision"), None);
    }

    #[test]
    fn test_blocklist_discarded() {
        let c = classifier();
        assert_eq!(c.classify("(Important facts about the user)"), None);
        assert_eq!(c.classify("(User preferences learned over time)"), None);
    }

    #[test]
    fn test_experience_vocabulary() {
        let c = classifier();
        assert_eq!(
            c.classify("worked across several long-running infrastructure projects"),
            Some(SectionKind::ExperienceThemes)
        );
    }

    #[test]
    fn test_execution_vocabulary() {
        let c = classifier();
        assert_eq!(
            c.classify("keeps a strict checklist for every release"),
            Some(SectionKind::ExecutionTendencies)
        );
    }

    #[test]
    fn test_strengths_vocabulary() {
        let c = classifier();
        assert_eq!(
            c.classify("particularly good at debugging distributed failures"),
            Some(SectionKind::CognitiveStrengths)
        );
    }
}
