//! Candidate scoring and ranking.

use crate::certainty::combine_list;
use serde::Serialize;
use std::cmp::Ordering;
use thiserror::Error;

/// A disease with the relation weights matching the selected symptoms,
/// in retrieval order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candidate {
    pub disease_id: String,
    pub weights: Vec<f64>,
}

impl Candidate {
    pub fn new(disease_id: impl Into<String>, weights: Vec<f64>) -> Self {
        Self { disease_id: disease_id.into(), weights }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredCandidate {
    pub disease_id: String,
    pub weights: Vec<f64>,
    pub cf: f64,
}

/// Result of ranking: the winner plus every other scored candidate,
/// best first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ranking {
    pub best: ScoredCandidate,
    pub runners_up: Vec<ScoredCandidate>,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RankError {
    #[error("no candidate has any relation weight")]
    NoEligibleCandidate,
}

/// Score every candidate with at least one weight and rank them by CF.
///
/// The sort is stable: equal scores keep their input order, so the earliest
/// candidate wins a tie.
pub fn rank_candidates(candidates: Vec<Candidate>) -> Result<Ranking, RankError> {
    let mut scored: Vec<ScoredCandidate> = candidates
        .into_iter()
        .filter(|c| !c.weights.is_empty())
        .map(|c| ScoredCandidate {
            cf: combine_list(&c.weights),
            disease_id: c.disease_id,
            weights: c.weights,
        })
        .collect();

    scored.sort_by(|a, b| b.cf.partial_cmp(&a.cf).unwrap_or(Ordering::Equal));

    let mut iter = scored.into_iter();
    let best = iter.next().ok_or(RankError::NoEligibleCandidate)?;
    Ok(Ranking { best, runners_up: iter.collect() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_highest_cf_wins() {
        let ranking = rank_candidates(vec![
            Candidate::new("A", vec![0.3]),
            Candidate::new("B", vec![0.7, 0.4]),
            Candidate::new("C", vec![0.5]),
        ])
        .unwrap();

        assert_eq!(ranking.best.disease_id, "B");
        assert!((ranking.best.cf - 0.82).abs() < 1e-12);
        let rest: Vec<&str> = ranking.runners_up.iter().map(|c| c.disease_id.as_str()).collect();
        assert_eq!(rest, vec!["C", "A"]);
    }

    #[test]
    fn test_tie_keeps_retrieval_order() {
        let ranking = rank_candidates(vec![
            Candidate::new("A", vec![0.1]),
            Candidate::new("B", vec![0.5]),
            Candidate::new("C", vec![0.5]),
        ])
        .unwrap();
        assert_eq!(ranking.best.disease_id, "B");
        assert_eq!(ranking.runners_up[0].disease_id, "C");
    }

    #[test]
    fn test_signed_zero_ties() {
        let ranking = rank_candidates(vec![
            Candidate::new("neg", vec![-0.0]),
            Candidate::new("pos", vec![0.0]),
        ])
        .unwrap();
        assert_eq!(ranking.best.disease_id, "neg");
    }

    #[test]
    fn test_candidates_without_weights_are_skipped() {
        let ranking = rank_candidates(vec![
            Candidate::new("empty", vec![]),
            Candidate::new("neg", vec![-0.4]),
        ])
        .unwrap();
        assert_eq!(ranking.best.disease_id, "neg");
        assert!(ranking.runners_up.is_empty());
    }

    #[test]
    fn test_no_eligible_candidate() {
        assert_eq!(rank_candidates(vec![]), Err(RankError::NoEligibleCandidate));
        assert_eq!(
            rank_candidates(vec![Candidate::new("A", vec![]), Candidate::new("B", vec![])]),
            Err(RankError::NoEligibleCandidate)
        );
    }

    #[test]
    fn test_negative_winner_when_all_negative() {
        let ranking = rank_candidates(vec![
            Candidate::new("A", vec![-0.6]),
            Candidate::new("B", vec![-0.2]),
        ])
        .unwrap();
        assert_eq!(ranking.best.disease_id, "B");
    }
}
