//! neuroscreen-ranker - certainty-factor inference for symptom screening.
//!
//! Relation weights (MB − MD) for the selected symptoms are combined per
//! disease, candidates are ranked by the combined CF, and the winner is
//! labelled and persisted through a [`store::KnowledgeStore`].

pub mod certainty;
pub mod label;
pub mod ranking;
pub mod store;
pub mod diagnosis;

pub use certainty::{combine, combine_list, combine_pair};
pub use diagnosis::{run_diagnosis, DiagnosisError, DiagnosisOutcome, DiagnosisRequest};
pub use label::{cf_to_percent_and_label, classify, CfLabel, ConfidenceLevel};
pub use ranking::{rank_candidates, Candidate, RankError, Ranking, ScoredCandidate};
pub use store::{KnowledgeStore, MockKnowledgeStore, PgKnowledgeStore};
