use crate::model::CvData;

const BANNER_WIDTH: usize = 50;
const RULE_WIDTH: usize = 30;

fn push_section(lines: &mut Vec<String>, title: &str) {
    lines.push(title.to_string());
    lines.push("-".repeat(RULE_WIDTH));
}

/// Render a record as plain text, mirroring the editor's TXT download
/// layout line for line.
pub fn render_txt(cv: &CvData) -> String {
    let info = &cv.personal_info;
    let mut lines: Vec<String> = Vec::new();

    lines.push("=".repeat(BANNER_WIDTH));
    lines.push(format!("{} {}", info.first_name, info.last_name).trim().to_string());
    if !info.job_title.is_empty() {
        lines.push(info.job_title.clone());
    }
    lines.push("=".repeat(BANNER_WIDTH));
    lines.push(String::new());

    push_section(&mut lines, "CONTACT INFORMATION");
    if !info.email.is_empty() {
        lines.push(format!("Email: {}", info.email));
    }
    if !info.phone.is_empty() {
        lines.push(format!("Phone: {}", info.phone));
    }
    let location: Vec<&str> = [&info.address, &info.city, &info.country, &info.postcode]
        .into_iter()
        .map(|s| s.as_str())
        .filter(|s| !s.is_empty())
        .collect();
    if !location.is_empty() {
        lines.push(format!("Location: {}", location.join(", ")));
    }
    if !info.linkedin.is_empty() {
        lines.push(format!("LinkedIn: {}", info.linkedin));
    }
    if !info.website.is_empty() {
        lines.push(format!("Website: {}", info.website));
    }
    lines.push(String::new());

    if !cv.summary.is_empty() {
        push_section(&mut lines, "PROFESSIONAL SUMMARY");
        lines.push(cv.summary.clone());
        lines.push(String::new());
    }

    if !cv.experience.is_empty() {
        push_section(&mut lines, "WORK EXPERIENCE");
        for exp in &cv.experience {
            lines.push(format!("{} at {}", exp.job_title, exp.company));
            let dates = if exp.current {
                format!("{} - Present", exp.start_date)
            } else {
                format!("{} - {}", exp.start_date, exp.end_date)
            };
            lines.push(dates);
            if !exp.city.is_empty() {
                lines.push(exp.city.clone());
            }
            if !exp.description.is_empty() {
                lines.push(exp.description.clone());
            }
            for bullet in &exp.bullets {
                lines.push(format!("• {}", bullet));
            }
            lines.push(String::new());
        }
    }

    if !cv.education.is_empty() {
        push_section(&mut lines, "EDUCATION");
        for edu in &cv.education {
            lines.push(edu.degree.clone());
            lines.push(edu.school.clone());
            lines.push(format!("{} - {}", edu.start_date, edu.end_date));
            if !edu.city.is_empty() {
                lines.push(edu.city.clone());
            }
            if !edu.description.is_empty() {
                lines.push(edu.description.clone());
            }
            lines.push(String::new());
        }
    }

    if !cv.skills.is_empty() {
        push_section(&mut lines, "SKILLS");
        let names: Vec<&str> = cv.skills.iter().map(|s| s.name.as_str()).collect();
        lines.push(names.join(", "));
        lines.push(String::new());
    }

    if !cv.languages.is_empty() {
        push_section(&mut lines, "LANGUAGES");
        for lang in &cv.languages {
            lines.push(format!("{} - {}", lang.name, lang.proficiency.as_str()));
        }
        lines.push(String::new());
    }

    if !cv.certifications.is_empty() {
        push_section(&mut lines, "CERTIFICATIONS");
        for cert in &cv.certifications {
            let mut line = cert.name.clone();
            if !cert.issuer.is_empty() {
                line.push_str(&format!(" - {}", cert.issuer));
            }
            if !cert.date.is_empty() {
                line.push_str(&format!(" ({})", cert.date));
            }
            lines.push(line);
        }
        lines.push(String::new());
    }

    for section in &cv.custom_sections {
        push_section(&mut lines, &section.title.to_uppercase());
        for item in &section.items {
            if !item.heading.is_empty() {
                lines.push(item.heading.clone());
            }
            if !item.description.is_empty() {
                lines.push(item.description.clone());
            }
        }
        lines.push(String::new());
    }

    lines.join("\n")
}

/// Default download filename for a record.
pub fn txt_filename(cv: &CvData) -> String {
    format!(
        "{}_{}_CV.txt",
        cv.personal_info.first_name, cv.personal_info.last_name
    )
}

// ── Tests ──
