//! Pairwise comparison of input schemas against candidate schemas.
//!
//! The driver walks the cross product of both lists with an explicit cursor,
//! normalizing each identifier at most once per run and scoring a pair 1.0
//! when both canonical forms are equal. Cache and matrix belong to a single
//! run; nothing is shared between calls.
mod state;

use crate::normalize::SchemaNormalizer;
use serde::Serialize;
use state::{ComparisonRun, Step};
use std::collections::BTreeMap;
use std::time::Instant;

/// Score recorded for a pair whose canonical forms are equal.
pub const MATCH_SCORE: f64 = 1.0;
/// Score recorded for every other pair.
pub const MISMATCH_SCORE: f64 = 0.0;

/// input identifier -> candidate identifier -> score.
pub type ComparisonMatrix = BTreeMap<String, BTreeMap<String, f64>>;
/// raw identifier -> canonical form.
pub type CanonicalCache = BTreeMap<String, String>;

/// Counters collected while the loop runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    pub pairs_compared: usize,
    pub matches: usize,
    pub advances: usize,
}

/// Terminal output of one comparison run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonOutcome {
    pub final_output: ComparisonMatrix,
    pub canonical_forms: CanonicalCache,
    pub stats: RunStats,
}

impl ComparisonOutcome {
    /// Candidates scored as matches for `input`, in key order.
    pub fn matches_for(&self, input: &str) -> Vec<&str> {
        self.final_output
            .get(input)
            .map(|row| {
                row.iter()
                    .filter(|(_, score)| **score == MATCH_SCORE)
                    .map(|(candidate, _)| candidate.as_str())
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Compare every input schema against every candidate schema.
pub fn compare_schemas(
    normalizer: &SchemaNormalizer,
    inputs: Vec<String>,
    candidates: Vec<String>,
) -> ComparisonOutcome {
    let start = Instant::now();
    let mut run = ComparisonRun::new(inputs);
    let mut step = Step::FetchCandidates(candidates);
    loop {
        step = match step {
            Step::FetchCandidates(candidates) => run.fetch_candidates(candidates),
            Step::NormalizePair => run.normalize_pair(normalizer),
            Step::ComparePair => run.compare_pair(),
            Step::AdvanceOrTerminate => run.advance_or_terminate(),
            Step::Done => break,
        };
    }
    tracing::info!(
        elapsed_ms = start.elapsed().as_millis(),
        pairs = run.stats.pairs_compared,
        matches = run.stats.matches,
        "comparison complete"
    );
    ComparisonOutcome {
        final_output: run.final_output,
        canonical_forms: run.canonical_forms,
        stats: run.stats,
    }
}
