use serde::Serialize;

use crate::models::section::SectionRecord;
use crate::resume::schema::SectionKind;

pub const COMPLETE: u8 = 100;
pub const INCOMPLETE: u8 = 0;

/// Per-section onboarding checklist. Each value is either 0 or 100.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    pub personal_info: u8,
    pub experience: u8,
    pub education: u8,
    pub projects: u8,
    pub skills: u8,
}

/// A section is complete when at least one of its rows has every progress
/// field of that kind filled with non-whitespace text.
pub fn section_complete<'a, I>(kind: SectionKind, records: I) -> bool
where
    I: IntoIterator<Item = &'a SectionRecord>,
{
    records.into_iter().any(|record| {
        kind.progress_fields()
            .iter()
            .all(|field| record.is_filled(field))
    })
}

fn score<'a, I>(kind: SectionKind, records: I) -> u8
where
    I: IntoIterator<Item = &'a SectionRecord>,
{
    if section_complete(kind, records) {
        COMPLETE
    } else {
        INCOMPLETE
    }
}

/// Derives progress from a user's current sections. Pure: missing sections
/// and empty collections simply score 0.
pub fn compute_progress(
    personal_info: Option<&SectionRecord>,
    experiences: &[SectionRecord],
    education: &[SectionRecord],
    projects: &[SectionRecord],
    skills: Option<&SectionRecord>,
) -> Progress {
    Progress {
        personal_info: score(SectionKind::PersonalInfo, personal_info),
        experience: score(SectionKind::Experience, experiences),
        education: score(SectionKind::Education, education),
        projects: score(SectionKind::Project, projects),
        skills: score(SectionKind::Skill, skills),
    }
}
