use crate::model::{generate_id, SkillItem, SkillLevel};
use crate::parser::sections::{Section, SectionKind};

const MAX_SKILLS: usize = 15;
const MIN_LEN: usize = 2;
const MAX_LEN: usize = 25;
const MAX_WORDS: usize = 3;
const SENTENCE_END: &[char] = &['.', '!', '?'];

fn looks_like_skill(candidate: &str) -> bool {
    candidate.len() > MIN_LEN
        && candidate.len() < MAX_LEN
        && candidate.split_whitespace().count() <= MAX_WORDS
        && !candidate.contains(SENTENCE_END)
        && !candidate.chars().any(|c| c.is_ascii_digit())
}

/// Split the skills block by its dominant delimiter (comma, else pipe, else
/// one candidate per line), then keep the first 15 entries that survive the
/// noise filter. Proficiency is never inferred from the source document.
pub fn extract(sections: &[Section]) -> Vec<SkillItem> {
    let lines: Vec<&String> = sections
        .iter()
        .filter(|s| s.kind == SectionKind::Skills)
        .flat_map(|s| &s.lines)
        .collect();
    if lines.is_empty() {
        return Vec::new();
    }

    let joined = lines
        .iter()
        .map(|l| l.as_str())
        .collect::<Vec<_>>()
        .join(" ");

    let candidates: Vec<String> = if joined.contains(',') {
        joined.split(',').map(|c| c.trim().to_string()).collect()
    } else if joined.contains('|') {
        joined.split('|').map(|c| c.trim().to_string()).collect()
    } else {
        lines.iter().map(|l| l.trim().to_string()).collect()
    };

    candidates
        .into_iter()
        .filter(|c| looks_like_skill(c))
        .take(MAX_SKILLS)
        .map(|name| SkillItem {
            id: generate_id(),
            name,
            level: SkillLevel::Intermediate,
        })
        .collect()
}

// ── Tests ──
