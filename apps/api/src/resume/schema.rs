//! Section schemas: one table describes each résumé section, and every
//! generic operation (storage, validation, progress) is driven from it.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldFormat {
    Text,
    Email,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    /// Maximum length in characters; `None` for unbounded text.
    pub max_length: Option<usize>,
    /// Whether `null` is an accepted value.
    pub nullable: bool,
    pub format: FieldFormat,
}

const fn text(name: &'static str, max_length: Option<usize>) -> FieldSpec {
    FieldSpec {
        name,
        max_length,
        nullable: false,
        format: FieldFormat::Text,
    }
}

const PERSONAL_INFO_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        name: "full_name",
        max_length: Some(100),
        nullable: true,
        format: FieldFormat::Text,
    },
    FieldSpec {
        name: "email",
        max_length: Some(254),
        nullable: true,
        format: FieldFormat::Email,
    },
    text("phone", Some(20)),
    text("location", Some(100)),
    text("professional_title", Some(100)),
];

const EXPERIENCE_FIELDS: &[FieldSpec] = &[
    text("title", Some(100)),
    text("company", Some(100)),
    text("location", Some(100)),
    text("duration", Some(50)),
    text("description", None),
];

const EDUCATION_FIELDS: &[FieldSpec] = &[
    text("degree", Some(100)),
    text("institution", Some(100)),
    text("education_duration", Some(50)),
    text("education_location", Some(100)),
];

const PROJECT_FIELDS: &[FieldSpec] = &[
    text("name", Some(100)),
    text("duration", Some(50)),
    text("description", None),
    text("technologies", None),
];

const SKILL_FIELDS: &[FieldSpec] = &[text("skills", None)];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    PersonalInfo,
    Experience,
    Education,
    Project,
    Skill,
}

impl SectionKind {
    #[cfg(test)]
    pub const ALL: [SectionKind; 5] = [
        SectionKind::PersonalInfo,
        SectionKind::Experience,
        SectionKind::Education,
        SectionKind::Project,
        SectionKind::Skill,
    ];

    pub fn table(self) -> &'static str {
        match self {
            SectionKind::PersonalInfo => "personal_info",
            SectionKind::Experience => "experiences",
            SectionKind::Education => "education",
            SectionKind::Project => "projects",
            SectionKind::Skill => "skills",
        }
    }

    /// Human-readable name used in error messages.
    pub fn label(self) -> &'static str {
        match self {
            SectionKind::PersonalInfo => "Personal info",
            SectionKind::Experience => "Experience",
            SectionKind::Education => "Education",
            SectionKind::Project => "Project",
            SectionKind::Skill => "Skills",
        }
    }

    pub fn fields(self) -> &'static [FieldSpec] {
        match self {
            SectionKind::PersonalInfo => PERSONAL_INFO_FIELDS,
            SectionKind::Experience => EXPERIENCE_FIELDS,
            SectionKind::Education => EDUCATION_FIELDS,
            SectionKind::Project => PROJECT_FIELDS,
            SectionKind::Skill => SKILL_FIELDS,
        }
    }

    /// Singleton sections hold at most one row per user.
    pub fn is_singleton(self) -> bool {
        matches!(self, SectionKind::PersonalInfo | SectionKind::Skill)
    }

    /// Fields that must all be non-blank for a row to count toward progress.
    pub fn progress_fields(self) -> &'static [&'static str] {
        match self {
            SectionKind::PersonalInfo => &["full_name"],
            SectionKind::Experience => &["title", "company", "location", "duration", "description"],
            SectionKind::Education => &[
                "degree",
                "institution",
                "education_duration",
                "education_location",
            ],
            SectionKind::Project => &["name", "duration", "description", "technologies"],
            SectionKind::Skill => &["skills"],
        }
    }

    #[cfg(test)]
    pub fn field(self, name: &str) -> Option<&'static FieldSpec> {
        self.fields().iter().find(|f| f.name == name)
    }
}
