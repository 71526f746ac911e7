use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::model::{generate_id, ExperienceItem};
use crate::parser::sections::{Section, SectionKind};

const MIN_BULLET_LEN: usize = 5;
const BULLET_GLYPHS: &[char] = &['•', '-', '*'];

// A date token is a month-name + year, MM/YYYY, or a bare 4-digit year.
// The range joins two tokens with -, – or "to"; the end may instead be an
// ongoing-role marker.
static DATE_RANGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    let token = r"(?:jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?\s+\d{4}|\d{1,2}/\d{4}|\d{4}";
    Regex::new(&format!(
        r"(?i)({token})\s*(?:-|–|—|to)\s*({token}|present|current|now)"
    ))
    .unwrap()
});

pub fn is_date_range(line: &str) -> bool {
    DATE_RANGE_RE.is_match(line)
}

/// Normalize one captured date token: "Jan 2020" -> "2020-01",
/// "03/2016" -> "2016-03", "2019" -> "2019".
fn normalize_date_token(token: &str) -> String {
    let token = token.trim();
    if let Some((month, year)) = token.split_once('/') {
        if let (Ok(m), Ok(y)) = (month.parse::<u32>(), year.parse::<u32>()) {
            return format!("{:04}-{:02}", y, m);
        }
    }
    let lower = token.to_lowercase();
    const MONTHS: &[&str] = &[
        "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
    ];
    if let Some(m) = MONTHS.iter().position(|m| lower.starts_with(m)) {
        if let Some(year) = token.split_whitespace().last() {
            return format!("{}-{:02}", year, m + 1);
        }
    }
    token.to_string()
}

fn is_ongoing_marker(token: &str) -> bool {
    matches!(token.to_lowercase().as_str(), "present" | "current" | "now")
}

/// (start, end, current) from the first date-range match on the line.
fn parse_range(line: &str) -> (String, String, bool) {
    match DATE_RANGE_RE.captures(line) {
        Some(caps) => {
            let start = normalize_date_token(&caps[1]);
            let end_token = caps[2].trim().to_string();
            if is_ongoing_marker(&end_token) {
                (start, String::new(), true)
            } else {
                (start, normalize_date_token(&end_token), false)
            }
        }
        None => (String::new(), String::new(), false),
    }
}

fn strip_bullet(line: &str) -> &str {
    line.trim_start_matches(BULLET_GLYPHS).trim()
}

/// Title/company for the entry anchored at `anchor`, read from the 1–2
/// lines immediately before it (never reaching past `floor`). Returns the
/// pair plus the indices consumed, so those lines are not also counted as
/// the previous entry's bullets.
fn entry_heading(
    lines: &[String],
    anchor: usize,
    floor: usize,
) -> (String, String, Vec<usize>) {
    if anchor == floor {
        return (String::new(), String::new(), Vec::new());
    }
    let title_idx = anchor - 1;
    let title_line = &lines[title_idx];

    if let Some(split_at) = title_line.find([',', '|']) {
        let title = title_line[..split_at].trim().to_string();
        let company = title_line[split_at + 1..].trim().to_string();
        return (title, company, vec![title_idx]);
    }

    let title = title_line.trim().to_string();
    // Company fallback from two lines back, skipping obvious non-headers.
    if title_idx > floor {
        let company_idx = title_idx - 1;
        let company_line = &lines[company_idx];
        if !is_date_range(company_line) && !company_line.starts_with(BULLET_GLYPHS) {
            return (title, company_line.trim().to_string(), vec![title_idx, company_idx]);
        }
    }
    (title, String::new(), vec![title_idx])
}

/// Date-anchor extraction: every date-range line starts an entry; the lines
/// between anchors become the preceding entry's bullets, except those
/// consumed as the next entry's title/company.
pub fn extract(sections: &[Section]) -> Vec<ExperienceItem> {
    let mut entries = Vec::new();
    for section in sections.iter().filter(|s| s.kind == SectionKind::Experience) {
        extract_from_lines(&section.lines, &mut entries);
    }
    entries
}

fn extract_from_lines(lines: &[String], out: &mut Vec<ExperienceItem>) {
    let anchors: Vec<usize> = lines
        .iter()
        .enumerate()
        .filter(|(_, line)| is_date_range(line))
        .map(|(i, _)| i)
        .collect();

    let mut consumed: HashSet<usize> = HashSet::new();
    let mut headings = Vec::with_capacity(anchors.len());
    for (k, &anchor) in anchors.iter().enumerate() {
        let floor = if k == 0 { 0 } else { anchors[k - 1] + 1 };
        let (title, company, used) = entry_heading(lines, anchor, floor);
        consumed.extend(used.iter().copied());
        headings.push((title, company));
    }

    for (k, &anchor) in anchors.iter().enumerate() {
        let (title, company) = headings[k].clone();
        let (start_date, end_date, current) = parse_range(&lines[anchor]);

        let until = anchors.get(k + 1).copied().unwrap_or(lines.len());
        let mut bullets = Vec::new();
        for i in anchor + 1..until {
            if consumed.contains(&i) {
                continue;
            }
            let text = strip_bullet(&lines[i]);
            if text.len() > MIN_BULLET_LEN && !is_date_range(text) {
                bullets.push(text.to_string());
            }
        }

        out.push(ExperienceItem {
            id: generate_id(),
            job_title: if title.is_empty() { "Role".to_string() } else { title },
            company: if company.is_empty() { "Company".to_string() } else { company },
            city: String::new(),
            start_date,
            end_date,
            current,
            description: String::new(),
            bullets,
        });
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::sections::{normalize_lines, segment};

    fn parse_exp(raw: &str) -> Vec<ExperienceItem> {
        let lines = normalize_lines(raw);
        let sections = segment(&lines);
        extract(&sections)
    }

    #[test]
    fn date_range_patterns() {
        assert!(is_date_range("Jan 2020 - Present"));
        assert!(is_date_range("January 2020 – December 2022"));
        assert!(is_date_range("03/2016 - 12/2019"));
        assert!(is_date_range("2015 to 2018"));
        assert!(is_date_range("Sep 2021 - now"));
        assert!(!is_date_range("Led a team of 12 engineers"));
        assert!(!is_date_range("2019"));
    }

    #[test]
    fn date_tokens_normalize() {
        assert_eq!(normalize_date_token("Jan 2020"), "2020-01");
        assert_eq!(normalize_date_token("September 2021"), "2021-09");
        assert_eq!(normalize_date_token("03/2016"), "2016-03");
        assert_eq!(normalize_date_token("2019"), "2019");
    }

    #[test]
    fn anchor_with_comma_heading_and_bullet() {
        let entries = parse_exp(
            "Work Experience\nSenior Engineer, Acme Corp\nJan 2020 - Present\nLed backend redesign",
        );
        assert_eq!(entries.len(), 1);
        let e = &entries[0];
        assert_eq!(e.job_title, "Senior Engineer");
        assert_eq!(e.company, "Acme Corp");
        assert!(e.current);
        assert_eq!(e.end_date, "");
        assert_eq!(e.bullets, vec!["Led backend redesign".to_string()]);
    }

    #[test]
    fn pipe_delimited_heading() {
        let entries = parse_exp("Experience\nPlatform Engineer | Initech Ltd\n03/2016 - 12/2019");
        assert_eq!(entries[0].job_title, "Platform Engineer");
        assert_eq!(entries[0].company, "Initech Ltd");
        assert_eq!(entries[0].start_date, "2016-03");
        assert_eq!(entries[0].end_date, "2019-12");
        assert!(!entries[0].current);
    }

    #[test]
    fn title_alone_takes_company_from_two_back() {
        let entries = parse_exp("Experience\nAcme Corp\nSenior Engineer\nJan 2020 - Dec 2021");
        assert_eq!(entries[0].job_title, "Senior Engineer");
        assert_eq!(entries[0].company, "Acme Corp");
    }

    #[test]
    fn first_line_anchor_gets_placeholders() {
        let entries = parse_exp("Experience\nJan 2020 - Present\nShipped the thing");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].job_title, "Role");
        assert_eq!(entries[0].company, "Company");
        assert_eq!(entries[0].bullets, vec!["Shipped the thing".to_string()]);
    }

    #[test]
    fn bullet_glyphs_stripped_and_short_lines_dropped() {
        let entries = parse_exp(
            "Experience\nEngineer, Acme\nJan 2020 - Present\n• Led the backend redesign\n- Cut latency\n* Shipped weekly\nok",
        );
        let bullets = &entries[0].bullets;
        assert_eq!(
            bullets,
            &vec![
                "Led the backend redesign".to_string(),
                "Cut latency".to_string(),
                "Shipped weekly".to_string(),
            ]
        );
    }

    #[test]
    fn consecutive_entries_do_not_leak_headings_into_bullets() {
        let entries = parse_exp(
            "Experience\nSenior Engineer, Acme Corp\nJan 2020 - Present\nLed the backend redesign\nPlatform Engineer | Initech Ltd\n03/2016 - 12/2019\nBuilt the deployment pipeline",
        );
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].bullets, vec!["Led the backend redesign".to_string()]);
        assert_eq!(entries[1].job_title, "Platform Engineer");
        assert_eq!(entries[1].bullets, vec!["Built the deployment pipeline".to_string()]);
    }

    #[test]
    fn no_experience_section_yields_nothing() {
        assert!(parse_exp("Jane Doe\nSkills\nRust, SQL").is_empty());
    }

    #[test]
    fn ongoing_markers() {
        for marker in ["Present", "current", "NOW"] {
            let entries = parse_exp(&format!("Experience\nEngineer, Acme\nJan 2020 - {marker}"));
            assert!(entries[0].current, "marker {marker} should mark ongoing");
        }
    }
}
