use std::sync::LazyLock;

use regex::Regex;

use crate::model::{generate_id, EducationItem};
use crate::parser::sections::{Section, SectionKind};

static INSTITUTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(university|college|school|institute)\b").unwrap());

static DEGREE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(bachelor|master|phd|diploma|degree|bsc|msc|ba|ma)\b").unwrap()
});

static YEAR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b(?:19|20)\d{2}\b").unwrap());

#[derive(Default)]
struct Draft {
    school: String,
    degree: String,
    start_date: String,
    end_date: String,
}

impl Draft {
    fn finish(self) -> EducationItem {
        EducationItem {
            id: generate_id(),
            degree: if self.degree.is_empty() { "Degree".to_string() } else { self.degree },
            school: if self.school.is_empty() { "University".to_string() } else { self.school },
            city: String::new(),
            start_date: self.start_date,
            end_date: self.end_date,
            description: String::new(),
        }
    }
}

/// Explicit build state: entries finished so far plus the one under
/// construction, so the finalize-on-conflict-or-end rule stays in one place.
#[derive(Default)]
struct Accumulator {
    entries: Vec<EducationItem>,
    building: Option<Draft>,
}

impl Accumulator {
    fn observe(&mut self, line: &str) {
        let hits_institution = INSTITUTION_RE.is_match(line);
        let hits_degree = DEGREE_RE.is_match(line);

        if hits_institution || hits_degree {
            // A qualifying line that would overwrite an already-set field
            // closes the current entry and seeds the next one.
            let conflicts = self.building.as_ref().is_some_and(|b| {
                (hits_institution && !b.school.is_empty())
                    || (hits_degree && !b.degree.is_empty())
            });
            if conflicts {
                self.finish_building();
            }
            let draft = self.building.get_or_insert_with(Draft::default);
            if hits_institution && draft.school.is_empty() {
                draft.school = line.to_string();
            }
            if hits_degree && draft.degree.is_empty() {
                draft.degree = line.to_string();
            }
        }

        let years: Vec<&str> = YEAR_RE.find_iter(line).map(|m| m.as_str()).collect();
        if let (Some(first), Some(last)) = (years.first(), years.last()) {
            let draft = self.building.get_or_insert_with(Draft::default);
            draft.end_date = last.to_string();
            if years.len() > 1 {
                draft.start_date = first.to_string();
            }
        }
    }

    fn finish_building(&mut self) {
        if let Some(draft) = self.building.take() {
            self.entries.push(draft.finish());
        }
    }
}

pub fn extract(sections: &[Section]) -> Vec<EducationItem> {
    let mut acc = Accumulator::default();
    for section in sections.iter().filter(|s| s.kind == SectionKind::Education) {
        for line in &section.lines {
            acc.observe(line);
        }
    }
    acc.finish_building();
    acc.entries
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::sections::{normalize_lines, segment};

    fn parse_edu(raw: &str) -> Vec<EducationItem> {
        let lines = normalize_lines(raw);
        let sections = segment(&lines);
        extract(&sections)
    }

    #[test]
    fn school_degree_and_years() {
        let entries = parse_edu("Education\nUniversity of Cambridge\nBSc Computer Science\n2012 - 2015");
        assert_eq!(entries.len(), 1);
        let e = &entries[0];
        assert_eq!(e.school, "University of Cambridge");
        assert_eq!(e.degree, "BSc Computer Science");
        assert_eq!(e.start_date, "2012");
        assert_eq!(e.end_date, "2015");
    }

    #[test]
    fn second_qualifying_line_starts_a_new_entry() {
        let entries = parse_edu(
            "Education\nUniversity of Cambridge\nBSc Computer Science\n2012 - 2015\nImperial College London\nMSc Advanced Computing\n2015 - 2016",
        );
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].school, "University of Cambridge");
        assert_eq!(entries[1].school, "Imperial College London");
        assert_eq!(entries[1].degree, "MSc Advanced Computing");
        assert_eq!(entries[1].end_date, "2016");
    }

    #[test]
    fn single_year_sets_end_date_only() {
        let entries = parse_edu("Education\nNorthside College\nGraduated 2018");
        assert_eq!(entries[0].end_date, "2018");
        assert_eq!(entries[0].start_date, "");
    }

    #[test]
    fn line_matching_both_vocabularies_seeds_both_fields() {
        let entries = parse_edu("Education\nBA History, Kings College");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].school, "BA History, Kings College");
        assert_eq!(entries[0].degree, "BA History, Kings College");
    }

    #[test]
    fn placeholders_fill_missing_fields() {
        let entries = parse_edu("Education\nBachelor of Arts");
        assert_eq!(entries[0].degree, "Bachelor of Arts");
        assert_eq!(entries[0].school, "University");

        let entries = parse_edu("Education\nOpen University\n");
        assert_eq!(entries[0].school, "Open University");
        assert_eq!(entries[0].degree, "Degree");
    }

    #[test]
    fn years_alone_start_an_entry() {
        let entries = parse_edu("Education\n2014 - 2018");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].school, "University");
        assert_eq!(entries[0].degree, "Degree");
        assert_eq!(entries[0].start_date, "2014");
        assert_eq!(entries[0].end_date, "2018");
    }

    #[test]
    fn short_degree_tokens_need_word_boundaries() {
        // "ba" must not fire inside ordinary words.
        assert!(!DEGREE_RE.is_match("Barcelona Academy of Arts and Crafts"));
        assert!(DEGREE_RE.is_match("BA (Hons) Fine Art"));
        assert!(!DEGREE_RE.is_match("Grandmaster course"));
        assert!(DEGREE_RE.is_match("Master of Science"));
    }

    #[test]
    fn empty_section_yields_nothing() {
        assert!(parse_edu("Jane Doe").is_empty());
        assert!(parse_edu("Education").is_empty());
    }
}
