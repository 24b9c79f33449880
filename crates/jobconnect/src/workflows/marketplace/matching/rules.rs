use std::collections::BTreeSet;

use super::super::domain::JobSeekerProfile;
use super::criteria::SearchCriteria;

/// Share of the required skills present in the candidate's skill set,
/// rounded to the nearest integer. The divisor is always the required-set
/// size; criteria validation guarantees it is non-zero.
pub(crate) fn match_percentage(
    candidate_skills: &BTreeSet<String>,
    required_skills: &BTreeSet<String>,
) -> u8 {
    let matched = candidate_skills.intersection(required_skills).count();
    ((matched as f64 / required_skills.len() as f64) * 100.0).round() as u8
}

/// Hard filters outside the skill score: portfolio presence, declared job
/// type, and spoken language.
pub(crate) fn satisfies_preferences(profile: &JobSeekerProfile, criteria: &SearchCriteria) -> bool {
    if criteria.project_required && profile.projects.is_empty() {
        return false;
    }
    if let Some(job_type) = criteria.job_type {
        if profile.job_type != job_type {
            return false;
        }
    }
    if let Some(language) = &criteria.language {
        if !profile.languages.contains(language) {
            return false;
        }
    }
    true
}
