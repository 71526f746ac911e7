use serde::{Deserialize, Serialize};

use crate::model::CvData;

const MIN_SUMMARY_LEN: usize = 50;
const MIN_SKILLS: usize = 3;
const MIN_BULLET_LEN: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Content,
    Formatting,
    Completeness,
    Impact,
    Ats,
}

/// One checklist rule: a predicate over the record plus the copy shown for
/// either outcome.
struct CheckRule {
    id: &'static str,
    category: Category,
    severity: Severity,
    penalty: i32,
    title: &'static str,
    description: &'static str,
    suggestion: &'static str,
    pass_title: Option<&'static str>,
    pass_description: &'static str,
    passes: fn(&CvData) -> bool,
}

static RULES: &[CheckRule] = &[
    CheckRule {
        id: "contact",
        category: Category::Content,
        severity: Severity::Error,
        penalty: 10,
        title: "Missing Contact Information",
        description: "Your CV is missing an email address or phone number.",
        suggestion: "Add your contact details in the Personal Info section.",
        pass_title: Some("Contact Information"),
        pass_description: "Contact details are present.",
        passes: |cv: &CvData| {
            !cv.personal_info.email.is_empty() && !cv.personal_info.phone.is_empty()
        },
    },
    CheckRule {
        id: "summary",
        category: Category::Impact,
        severity: Severity::Warning,
        penalty: 15,
        title: "Summary is too short",
        description: "A professional summary should be at least 50 characters long.",
        suggestion: "Expand your summary to highlight your key achievements and goals.",
        pass_title: Some("Professional Summary"),
        pass_description: "Summary length is good.",
        passes: |cv: &CvData| cv.summary.len() >= MIN_SUMMARY_LEN,
    },
    CheckRule {
        id: "experience",
        category: Category::Content,
        severity: Severity::Error,
        penalty: 20,
        title: "No Work Experience",
        description: "Employers look for work history first.",
        suggestion: "Add at least one previous job or internship.",
        pass_title: Some("Work Experience"),
        pass_description: "Work history included.",
        passes: |cv: &CvData| !cv.experience.is_empty(),
    },
    CheckRule {
        id: "bullets",
        category: Category::Formatting,
        severity: Severity::Warning,
        penalty: 5,
        title: "Weak Bullet Points",
        description: "Some of your experience bullet points are very short.",
        suggestion: "Use the STAR method (Situation, Task, Action, Result) to flesh them out.",
        pass_title: None,
        pass_description: "",
        passes: |cv: &CvData| {
            !cv.experience
                .iter()
                .any(|exp| exp.bullets.iter().any(|b| b.len() < MIN_BULLET_LEN))
        },
    },
    CheckRule {
        id: "skills",
        category: Category::Content,
        severity: Severity::Warning,
        penalty: 10,
        title: "Not Enough Skills",
        description: "Listing skills helps with ATS ranking.",
        suggestion: "Add at least 3-5 relevant skills.",
        pass_title: Some("Skills Section"),
        pass_description: "Good number of skills listed.",
        passes: |cv: &CvData| cv.skills.len() >= MIN_SKILLS,
    },
];

#[derive(Debug, Serialize)]
pub struct CheckIssue {
    pub id: &'static str,
    pub category: Category,
    pub severity: Severity,
    pub title: &'static str,
    pub description: &'static str,
    pub suggestion: &'static str,
}

#[derive(Debug, Serialize)]
pub struct PassedRule {
    pub id: &'static str,
    pub category: Category,
    pub title: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Serialize)]
pub struct CheckReport {
    pub score: i32,
    pub issues: Vec<CheckIssue>,
    pub passed: Vec<PassedRule>,
}

/// Rule-based lint of an already-structured record. Starts at 100 and
/// deducts per failed rule; never goes below zero.
pub fn analyze(cv: &CvData) -> CheckReport {
    let mut score = 100;
    let mut issues = Vec::new();
    let mut passed = Vec::new();

    for rule in RULES {
        if (rule.passes)(cv) {
            if let Some(title) = rule.pass_title {
                passed.push(PassedRule {
                    id: rule.id,
                    category: rule.category,
                    title,
                    description: rule.pass_description,
                });
            }
        } else {
            score -= rule.penalty;
            issues.push(CheckIssue {
                id: rule.id,
                category: rule.category,
                severity: rule.severity,
                title: rule.title,
                description: rule.description,
                suggestion: rule.suggestion,
            });
        }
    }

    CheckReport {
        score: score.max(0),
        issues,
        passed,
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_document;

    #[test]
    fn complete_record_scores_full_marks() {
        let raw = std::fs::read_to_string("tests/fixtures/sample_cv.txt").unwrap();
        let report = analyze(&parse_document(&raw));
        assert_eq!(report.score, 100);
        assert!(report.issues.is_empty());
        assert_eq!(report.passed.len(), 4);
    }

    #[test]
    fn empty_record_accumulates_deductions() {
        let report = analyze(&parse_document(""));
        // contact -10, summary -15, experience -20, skills -10
        assert_eq!(report.score, 45);
        let ids: Vec<&str> = report.issues.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec!["contact", "summary", "experience", "skills"]);
    }

    #[test]
    fn short_bullets_are_flagged() {
        let raw = "Jane Doe\njane@example.com\n07700 900123\nExperience\nEngineer, Acme\nJan 2020 - Present\nDid stuff today";
        let mut cv = parse_document(raw);
        cv.experience[0].bullets.push("Helped".into());
        let report = analyze(&cv);
        assert!(report.issues.iter().any(|i| i.id == "bullets"));
    }

    #[test]
    fn score_never_goes_negative() {
        let cv = parse_document("");
        let report = analyze(&cv);
        assert!(report.score >= 0);
    }
}
