use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_TEMPLATE_ID: &str = "modern";
pub const DEFAULT_COLOR_SCHEME: &str = "#002d6b";

pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}

pub fn now_iso() -> String {
    Utc::now().to_rfc3339()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalInfo {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub country: String,
    pub postcode: String,
    pub linkedin: String,
    pub website: String,
    pub photo: Option<String>,
    pub job_title: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExperienceItem {
    pub id: String,
    pub job_title: String,
    pub company: String,
    pub city: String,
    pub start_date: String,
    pub end_date: String,
    pub current: bool,
    pub description: String,
    pub bullets: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EducationItem {
    pub id: String,
    pub degree: String,
    pub school: String,
    pub city: String,
    pub start_date: String,
    pub end_date: String,
    pub description: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillLevel {
    Beginner,
    #[default]
    Intermediate,
    Advanced,
    Expert,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SkillItem {
    pub id: String,
    pub name: String,
    pub level: SkillLevel,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageProficiency {
    #[default]
    Basic,
    Conversational,
    Fluent,
    Native,
}

impl LanguageProficiency {
    pub fn as_str(&self) -> &'static str {
        match self {
            LanguageProficiency::Basic => "basic",
            LanguageProficiency::Conversational => "conversational",
            LanguageProficiency::Fluent => "fluent",
            LanguageProficiency::Native => "native",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LanguageItem {
    pub id: String,
    pub name: String,
    pub proficiency: LanguageProficiency,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CertificationItem {
    pub id: String,
    pub name: String,
    pub issuer: String,
    pub date: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomSectionItem {
    pub id: String,
    pub heading: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomSection {
    pub id: String,
    pub title: String,
    pub items: Vec<CustomSectionItem>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CvStatus {
    #[default]
    Draft,
    Complete,
}

/// The full document record. Parsing fills the subset it can recover from
/// raw text; everything else stays at its default so stored records always
/// round-trip the editor's JSON shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CvData {
    pub id: String,
    pub title: String,
    pub template_id: String,
    pub color_scheme: String,
    pub include_photo: bool,
    pub personal_info: PersonalInfo,
    pub summary: String,
    pub experience: Vec<ExperienceItem>,
    pub education: Vec<EducationItem>,
    pub skills: Vec<SkillItem>,
    pub languages: Vec<LanguageItem>,
    pub certifications: Vec<CertificationItem>,
    pub custom_sections: Vec<CustomSection>,
    pub status: CvStatus,
    pub created_at: String,
    pub updated_at: String,
}

impl Default for CvData {
    fn default() -> Self {
        CvData {
            id: String::new(),
            title: "Untitled CV".to_string(),
            template_id: DEFAULT_TEMPLATE_ID.to_string(),
            color_scheme: DEFAULT_COLOR_SCHEME.to_string(),
            include_photo: false,
            personal_info: PersonalInfo::default(),
            summary: String::new(),
            experience: Vec::new(),
            education: Vec::new(),
            skills: Vec::new(),
            languages: Vec::new(),
            certifications: Vec::new(),
            custom_sections: Vec::new(),
            status: CvStatus::Draft,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }
}
