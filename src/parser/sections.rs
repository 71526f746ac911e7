use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Lines longer than this are never headings, whatever they contain.
const MAX_HEADING_LEN: usize = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    Header,
    Summary,
    Experience,
    Education,
    Skills,
    Projects,
    Unknown,
}

/// A contiguous, typed run of lines. The recognized heading line is kept
/// apart from the content so extractors never see it; heading + lines
/// together still reconstruct the original line sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    pub kind: SectionKind,
    pub heading: Option<String>,
    pub lines: Vec<String>,
}

impl Section {
    fn header() -> Self {
        Section {
            kind: SectionKind::Header,
            heading: None,
            lines: Vec::new(),
        }
    }

    fn with_heading(kind: SectionKind, heading: String) -> Self {
        Section {
            kind,
            heading: Some(heading),
            lines: Vec::new(),
        }
    }

    fn is_empty(&self) -> bool {
        self.heading.is_none() && self.lines.is_empty()
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

static HEADING_PATTERNS: LazyLock<Vec<(SectionKind, Regex)>> = LazyLock::new(|| {
    // Whole-line matches only: a sentence mentioning "skills" in passing
    // must not open a section. Trailing colons are part of the heading.
    let sets = [
        (
            SectionKind::Experience,
            r"^((work|professional|employment|relevant)\s+)?experience\s*:?$|^(work|employment|career)\s+history\s*:?$",
        ),
        (
            SectionKind::Education,
            r"^(education(\s+(and|&)\s+training)?|academic\s+(background|history)|qualifications)\s*:?$",
        ),
        (
            SectionKind::Skills,
            r"^((technical|core|key)\s+)?(skills|competencies|expertise)\s*:?$",
        ),
        (
            SectionKind::Summary,
            r"^((professional|personal|career)\s+)?(summary|profile|objective|statement)\s*:?$|^about\s+me\s*:?$",
        ),
        (
            SectionKind::Projects,
            r"^((personal|side|selected)\s+)?(projects|portfolio)\s*:?$",
        ),
    ];
    sets.iter()
        .map(|(kind, pattern)| (*kind, Regex::new(&format!("(?i){}", pattern)).unwrap()))
        .collect()
});

/// Split raw extracted text into trimmed, non-empty lines.
pub fn normalize_lines(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

fn heading_kind(line: &str) -> Option<SectionKind> {
    if line.len() >= MAX_HEADING_LEN {
        return None;
    }
    HEADING_PATTERNS
        .iter()
        .find(|(_, re)| re.is_match(line))
        .map(|(kind, _)| *kind)
}

/// Partition lines into typed sections. Everything before the first
/// recognized heading lands in an implicit Header section; each heading
/// line closes the current section and opens a new one of the matched kind.
pub fn segment(lines: &[String]) -> Vec<Section> {
    let mut sections: Vec<Section> = Vec::new();
    let mut current = Section::header();

    for line in lines {
        if let Some(kind) = heading_kind(line) {
            if !current.is_empty() {
                sections.push(current);
            }
            current = Section::with_heading(kind, line.clone());
        } else {
            current.lines.push(line.clone());
        }
    }

    if !current.is_empty() {
        sections.push(current);
    }

    sections
}

// ── Tests ──
