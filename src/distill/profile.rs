//! Cognition profile types
//!
//! A profile is the distilled, shareable output of a run: six fixed sections
//! in fixed order plus the schema version it was produced under. Profiles
//! are immutable once written; a new run fully replaces the previous one.

use serde::{Deserialize, Serialize};

/// Current cognition schema version, stamped into every written document.
pub const COGNITION_MODEL_VERSION: &str = "2.0";

/// The fixed, exhaustive set of cognition sections, in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SectionKind {
    CoreThinkingPatterns,
    DecisionApproach,
    LearningStyle,
    ExecutionTendencies,
    CognitiveStrengths,
    ExperienceThemes,
}

impl SectionKind {
    /// All sections in canonical document order
    pub const ALL: [SectionKind; 6] = [
        SectionKind::CoreThinkingPatterns,
        SectionKind::DecisionApproach,
        SectionKind::LearningStyle,
        SectionKind::ExecutionTendencies,
        SectionKind::CognitiveStrengths,
        SectionKind::ExperienceThemes,
    ];

    /// Heading text used in the on-disk document
    pub fn title(&self) -> &'static str {
        match self {
            SectionKind::CoreThinkingPatterns => "Core Thinking Patterns",
            SectionKind::DecisionApproach => "Decision Approach",
            SectionKind::LearningStyle => "Learning Style",
            SectionKind::ExecutionTendencies => "Execution Tendencies",
            SectionKind::CognitiveStrengths => "Cognitive Strengths",
            SectionKind::ExperienceThemes => "Generalized Experience Themes",
        }
    }

    /// Resolve a document heading back to its section
    pub fn from_title(title: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.title() == title)
    }
}

/// One section of a cognition profile: ordered bullets under a fixed heading
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CognitionSection {
    pub kind: SectionKind,
    pub bullets: Vec<String>,
}

/// A complete cognition profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CognitionProfile {
    /// Always all six sections, in canonical order; empty sections included
    pub sections: Vec<CognitionSection>,
    pub model_version: String,
}

impl CognitionProfile {
    /// Empty profile at the current schema version
    pub fn empty() -> Self {
        Self {
            sections: SectionKind::ALL
                .into_iter()
                .map(|kind| CognitionSection {
                    kind,
                    bullets: Vec::new(),
                })
                .collect(),
            model_version: COGNITION_MODEL_VERSION.to_string(),
        }
    }

    /// Bullets for one section
    pub fn section(&self, kind: SectionKind) -> &[String] {
        self.sections
            .iter()
            .find(|s| s.kind == kind)
            .map(|s| s.bullets.as_slice())
            .unwrap_or(&[])
    }

    /// Total bullet count across all sections
    pub fn bullet_count(&self) -> usize {
        self.sections.iter().map(|s| s.bullets.len()).sum()
    }
}
