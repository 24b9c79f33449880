use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::super::domain::JobType;
use super::super::repository::CandidateFilter;

/// Recruiter-supplied search criteria. The skill set drives the score; the
/// remaining fields are hard filters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCriteria {
    pub required_skills: BTreeSet<String>,
    #[serde(default)]
    pub min_experience: u32,
    pub salary_min: u32,
    pub salary_max: u32,
    #[serde(default)]
    pub project_required: bool,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub job_type: Option<JobType>,
}

impl SearchCriteria {
    /// Reject malformed criteria before any store access. An empty skill set
    /// would make the match percentage undefined.
    pub fn validate(&self) -> Result<(), CriteriaError> {
        if self.required_skills.is_empty() {
            return Err(CriteriaError::EmptySkillSet);
        }
        if self.salary_min > self.salary_max {
            return Err(CriteriaError::InvalidSalaryRange {
                min: self.salary_min,
                max: self.salary_max,
            });
        }
        Ok(())
    }

    /// The portion of the criteria the store can evaluate as a conjunctive
    /// range/equality query.
    pub fn filter(&self) -> CandidateFilter {
        CandidateFilter {
            min_experience: self.min_experience,
            salary_min: self.salary_min,
            salary_max: self.salary_max,
        }
    }
}

/// Validation errors raised before the search runs.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CriteriaError {
    #[error("at least one required skill must be provided")]
    EmptySkillSet,
    #[error("salary range is inverted (min {min} > max {max})")]
    InvalidSalaryRange { min: u32, max: u32 },
}

/// Threshold configuration for the matcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchPolicy {
    /// Minimum rounded match percentage a candidate must reach.
    pub threshold: u8,
}

impl Default for MatchPolicy {
    fn default() -> Self {
        Self { threshold: 60 }
    }
}
