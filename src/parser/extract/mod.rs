pub mod education;
pub mod experience;
pub mod header;
pub mod skills;

use crate::model::{generate_id, now_iso, CvData, CvStatus, PersonalInfo};
use super::sections::{Section, SectionKind};

/// Placeholder pair surfaced when no name candidate clears the threshold;
/// applied only here at assembly, never inside the extractor.
const PLACEHOLDER_FIRST_NAME: &str = "Your";
const PLACEHOLDER_LAST_NAME: &str = "Name";

fn summary_text(sections: &[Section]) -> String {
    sections
        .iter()
        .filter(|s| s.kind == SectionKind::Summary)
        .flat_map(|s| &s.lines)
        .map(|l| l.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

fn derive_title(info: &PersonalInfo) -> String {
    if info.first_name.is_empty() {
        "Imported CV".to_string()
    } else {
        format!("{}'s CV (Imported)", info.first_name)
    }
}

/// Merge the per-section extractors into one fully-shaped record. Every
/// field gets at least an empty/default value so callers never null-check.
pub fn assemble(sections: &[Section]) -> CvData {
    let mut personal_info = header::extract(sections);
    let experience = experience::extract(sections);
    let education = education::extract(sections);
    let skills = skills::extract(sections);
    let summary = summary_text(sections);

    let title = derive_title(&personal_info);
    if personal_info.first_name.is_empty() {
        personal_info.first_name = PLACEHOLDER_FIRST_NAME.to_string();
        personal_info.last_name = PLACEHOLDER_LAST_NAME.to_string();
    }

    let now = now_iso();
    CvData {
        id: generate_id(),
        title,
        personal_info,
        summary,
        experience,
        education,
        skills,
        status: CvStatus::Draft,
        created_at: now.clone(),
        updated_at: now,
        ..CvData::default()
    }
}

// ── Tests ──
