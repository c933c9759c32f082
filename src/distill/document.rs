//! Canonical on-disk cognition document
//!
//! The document format is versioned and stable for downstream parsers:
//! fixed title, six section headings in fixed order (empty sections are
//! emitted, never omitted), and exactly one trailing version line.
//!
//! ```text
//! # 🧠 Cognitive Profile
//! ## Core Thinking Patterns
//! ...
//! Cognition Model Version: <semver>
//! ```

use super::profile::{CognitionProfile, CognitionSection, SectionKind};
use crate::error::{Error, Result};

/// Document title line
pub const DOCUMENT_TITLE: &str = "# 🧠 Cognitive Profile";
/// Prefix of the version stamp line
pub const VERSION_PREFIX: &str = "Cognition Model Version:";
/// Canonical file name of a cognition document
pub const DOCUMENT_FILE: &str = "cognition.md";
/// Directory a cognition document lives under, relative to its workspace
pub const DOCUMENT_DIR: &str = ".mindprint";

/// Render a profile into the canonical document text.
pub fn render(profile: &CognitionProfile) -> String {
    let mut out = String::new();
    out.push_str(DOCUMENT_TITLE);
    out.push('\n');

    for section in &profile.sections {
        out.push('\n');
        out.push_str("## ");
        out.push_str(section.kind.title());
        out.push('\n');
        for bullet in &section.bullets {
            out.push_str("- ");
            out.push_str(bullet);
            out.push('\n');
        }
    }

    out.push('\n');
    out.push_str(VERSION_PREFIX);
    out.push(' ');
    out.push_str(&profile.model_version);
    out.push('\n');
    out
}

/// Parse a canonical document back into a profile.
///
/// Lenient about blank lines and section order, strict about the title and
/// the version stamp: a document without exactly one version line is
/// rejected. Unknown headings fail the parse rather than silently dropping
/// content.
pub fn parse(text: &str) -> Result<CognitionProfile> {
    let mut lines = text.lines();
    match lines.next() {
        Some(first) if first.trim() == DOCUMENT_TITLE => {}
        _ => {
            return Err(Error::Document(
                "missing cognition document title".to_string(),
            ))
        }
    }

    let mut profile = CognitionProfile::empty();
    let mut current: Option<SectionKind> = None;
    let mut version: Option<String> = None;

    for line in lines {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if let Some(heading) = trimmed.strip_prefix("## ") {
            let kind = SectionKind::from_title(heading).ok_or_else(|| {
                Error::Document(format!("unknown section heading '{heading}'"))
            })?;
            current = Some(kind);
        } else if let Some(stamp) = trimmed.strip_prefix(VERSION_PREFIX) {
            if version.is_some() {
                return Err(Error::Document("duplicate version line".to_string()));
            }
            version = Some(stamp.trim().to_string());
        } else if let Some(bullet) = trimmed.strip_prefix("- ") {
            let kind = current.ok_or_else(|| {
                Error::Document("bullet before any section heading".to_string())
            })?;
            section_mut(&mut profile, kind).bullets.push(bullet.to_string());
        } else {
            return Err(Error::Document(format!("unexpected line '{trimmed}'")));
        }
    }

    profile.model_version =
        version.ok_or_else(|| Error::Document("missing version line".to_string()))?;
    Ok(profile)
}

fn section_mut(profile: &mut CognitionProfile, kind: SectionKind) -> &mut CognitionSection {
    // `CognitionProfile::empty` always carries all six sections.
    profile
        .sections
        .iter_mut()
        .find(|s| s.kind == kind)
        .expect("profile contains every section kind")
}
