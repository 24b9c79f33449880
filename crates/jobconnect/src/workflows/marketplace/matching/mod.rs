mod criteria;
mod rules;

pub use criteria::{CriteriaError, MatchPolicy, SearchCriteria};

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::domain::JobSeekerProfile;
use super::repository::{JobSeekerRepository, RepositoryError};

/// A candidate that cleared the threshold, annotated with its score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateMatch {
    pub profile: JobSeekerProfile,
    pub match_percentage: u8,
}

/// Candidate matcher: validates criteria, delegates the coarse pre-filter to
/// the profile store, then scores and ranks the survivors locally.
pub struct CandidateSearch {
    seekers: Arc<dyn JobSeekerRepository>,
    policy: MatchPolicy,
}

impl CandidateSearch {
    pub fn new(seekers: Arc<dyn JobSeekerRepository>, policy: MatchPolicy) -> Self {
        Self { seekers, policy }
    }

    /// Run a search. An empty result is a valid outcome, not an error.
    pub fn search(&self, criteria: &SearchCriteria) -> Result<Vec<CandidateMatch>, SearchError> {
        criteria.validate()?;

        let pool = self.seekers.seeking_candidates(&criteria.filter())?;
        Ok(rank_candidates(pool, criteria, &self.policy))
    }
}

/// Score, filter, and order an already pre-filtered candidate pool. Callers
/// reach this through [`CandidateSearch::search`], which validates the
/// criteria first. The sort is stable, so equal scores keep the store's
/// retrieval order.
pub(crate) fn rank_candidates(
    pool: Vec<JobSeekerProfile>,
    criteria: &SearchCriteria,
    policy: &MatchPolicy,
) -> Vec<CandidateMatch> {
    let mut matches: Vec<CandidateMatch> = pool
        .into_iter()
        .filter(|profile| rules::satisfies_preferences(profile, criteria))
        .map(|profile| {
            let match_percentage =
                rules::match_percentage(&profile.skills, &criteria.required_skills);
            CandidateMatch {
                profile,
                match_percentage,
            }
        })
        .filter(|candidate| candidate.match_percentage >= policy.threshold)
        .collect();

    matches.sort_by(|a, b| b.match_percentage.cmp(&a.match_percentage));
    matches
}

/// Error raised by the candidate matcher.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error(transparent)]
    Criteria(#[from] CriteriaError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
