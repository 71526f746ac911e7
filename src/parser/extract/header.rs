use std::sync::LazyLock;

use regex::Regex;

use crate::model::PersonalInfo;
use crate::parser::sections::{Section, SectionKind};

/// A name candidate is promoted only at or above this score.
const NAME_THRESHOLD: i32 = 5;
/// A job-title candidate is promoted only at or above this score.
const TITLE_THRESHOLD: i32 = 4;

const SENTENCE_PUNCT: &[char] = &['.', ',', ';', '!', '?'];
const DOCUMENT_LABEL_WORDS: &[&str] = &["resume", "curriculum", "vitae", "cv"];
const ROLE_KEYWORDS: &[&str] = &[
    "engineer", "developer", "designer", "manager", "analyst", "consultant", "officer",
    "admin", "assistant", "specialist", "director", "lead", "head",
];

/// One scored heuristic: a named predicate and the points it contributes.
struct ScoreRule {
    #[allow(dead_code)]
    name: &'static str,
    weight: i32,
    matches: fn(&str) -> bool,
}

static NAME_RULES: &[ScoreRule] = &[
    ScoreRule {
        name: "two-to-four-words",
        weight: 3,
        matches: |line: &str| (2..=4).contains(&line.split_whitespace().count()),
    },
    ScoreRule {
        name: "no-digits-or-at",
        weight: 3,
        matches: |line: &str| {
            !line.contains('@') && !line.chars().any(|c| c.is_ascii_digit())
        },
    },
    ScoreRule {
        name: "all-caps",
        weight: 2,
        matches: |line: &str| {
            line.len() > 3
                && line.chars().any(|c| c.is_alphabetic())
                && !line.chars().any(|c| c.is_lowercase())
        },
    },
    ScoreRule {
        name: "sentence-like",
        weight: -5,
        matches: |line: &str| {
            line.contains(SENTENCE_PUNCT) || line.split_whitespace().count() > 10
        },
    },
    ScoreRule {
        name: "document-label",
        weight: -10,
        matches: |line: &str| {
            let lower = line.to_lowercase();
            DOCUMENT_LABEL_WORDS.iter().any(|w| lower.contains(w))
        },
    },
];

static TITLE_RULES: &[ScoreRule] = &[
    ScoreRule {
        name: "short",
        weight: 2,
        matches: |line: &str| line.len() < 60,
    },
    ScoreRule {
        name: "role-keyword",
        weight: 5,
        matches: |line: &str| {
            let lower = line.to_lowercase();
            ROLE_KEYWORDS.iter().any(|kw| lower.contains(kw))
        },
    },
    ScoreRule {
        name: "has-digit",
        weight: -2,
        matches: |line: &str| line.chars().any(|c| c.is_ascii_digit()),
    },
];

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").unwrap());

// International (+ / 00 prefix), bare UK 11-digit, or UK grouped forms.
static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\+|00)[1-9][0-9 \-().]{7,32}|0\d{10}|0\d{3,4}[ \-]\d{3}[ \-]?\d{3,4}")
        .unwrap()
});

static URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:https?://|www\.)[^\s]+|linkedin\.com/in/[A-Za-z0-9_-]+").unwrap()
});

fn score(rules: &[ScoreRule], line: &str) -> i32 {
    rules
        .iter()
        .filter(|rule| (rule.matches)(line))
        .map(|rule| rule.weight)
        .sum()
}

/// Highest-scoring line at or above `threshold`; first in scan order wins
/// ties. `skip` excludes the index already promoted to another field.
fn best_candidate(
    lines: &[&String],
    rules: &[ScoreRule],
    threshold: i32,
    skip: Option<usize>,
) -> Option<usize> {
    let mut best: Option<(usize, i32)> = None;
    for (i, line) in lines.iter().enumerate() {
        if skip == Some(i) {
            continue;
        }
        let s = score(rules, line);
        if s >= threshold && best.map_or(true, |(_, bs)| s > bs) {
            best = Some((i, s));
        }
    }
    best.map(|(i, _)| i)
}

/// Best-effort personal info from the header section. Contact patterns run
/// over header text only so contact-like strings buried in job descriptions
/// are never picked up.
pub fn extract(sections: &[Section]) -> PersonalInfo {
    let header_lines: Vec<&String> = sections
        .iter()
        .filter(|s| s.kind == SectionKind::Header)
        .flat_map(|s| &s.lines)
        .collect();
    let header_text = sections
        .iter()
        .filter(|s| s.kind == SectionKind::Header)
        .map(|s| s.text())
        .collect::<Vec<_>>()
        .join("\n");

    let mut info = PersonalInfo::default();

    let name_idx = best_candidate(&header_lines, NAME_RULES, NAME_THRESHOLD, None);
    if let Some(i) = name_idx {
        let mut words = header_lines[i].split_whitespace();
        if let Some(first) = words.next() {
            info.first_name = first.to_string();
        }
        info.last_name = words.collect::<Vec<_>>().join(" ");
    }

    if let Some(i) = best_candidate(&header_lines, TITLE_RULES, TITLE_THRESHOLD, name_idx) {
        info.job_title = header_lines[i].clone();
    }

    if let Some(m) = EMAIL_RE.find(&header_text) {
        info.email = m.as_str().to_string();
    }
    if let Some(m) = PHONE_RE.find(&header_text) {
        info.phone = m.as_str().trim().to_string();
    }
    if let Some(m) = URL_RE.find(&header_text) {
        let url = m.as_str().trim_end_matches(['.', ',']).to_string();
        if url.contains("linkedin.com") {
            info.linkedin = url;
        } else {
            info.website = url;
        }
    }

    info
}

// ── Tests ──
