//! Run state and transitions for the pairwise comparison loop.
//!
//! Every transition takes the run by exclusive reference and returns the next
//! step; the loop in `compare_schemas` owns the run for its whole lifetime.
use super::{CanonicalCache, ComparisonMatrix, RunStats, MATCH_SCORE, MISMATCH_SCORE};
use crate::normalize::SchemaNormalizer;

/// Next transition to execute.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Step {
    /// Install the fetched candidate list and reset the cursor.
    FetchCandidates(Vec<String>),
    NormalizePair,
    ComparePair,
    AdvanceOrTerminate,
    Done,
}

/// Position of the next (input, candidate) pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct TraversalCursor {
    pub(crate) input_index: usize,
    pub(crate) candidate_index: usize,
}

#[derive(Debug)]
pub(crate) struct ComparisonRun {
    pub(crate) inputs: Vec<String>,
    pub(crate) candidates: Vec<String>,
    pub(crate) cursor: TraversalCursor,
    pub(crate) canonical_forms: CanonicalCache,
    pub(crate) final_output: ComparisonMatrix,
    pub(crate) stats: RunStats,
}

impl ComparisonRun {
    pub(crate) fn new(inputs: Vec<String>) -> Self {
        Self {
            inputs,
            candidates: Vec::new(),
            cursor: TraversalCursor::default(),
            canonical_forms: CanonicalCache::new(),
            final_output: ComparisonMatrix::new(),
            stats: RunStats::default(),
        }
    }

    pub(crate) fn fetch_candidates(&mut self, candidates: Vec<String>) -> Step {
        tracing::debug!(
            inputs = self.inputs.len(),
            candidates = candidates.len(),
            "fetched candidate schemas"
        );
        self.candidates = candidates;
        self.cursor = TraversalCursor::default();
        let Some(first) = self.inputs.first() else {
            return Step::Done;
        };
        self.final_output.entry(first.clone()).or_default();
        self.next_pair_step()
    }

    pub(crate) fn normalize_pair(&mut self, normalizer: &SchemaNormalizer) -> Step {
        let (input, candidate) = pair_at(&self.inputs, &self.candidates, self.cursor);
        tracing::trace!(input, candidate, "normalizing pair");
        for id in [input, candidate] {
            if !self.canonical_forms.contains_key(id) {
                let canonical = normalizer.normalize(id);
                tracing::trace!(id, canonical = canonical.as_str(), "cached canonical form");
                self.canonical_forms.insert(id.to_string(), canonical);
            }
        }
        Step::ComparePair
    }

    pub(crate) fn compare_pair(&mut self) -> Step {
        let (input, candidate) = pair_at(&self.inputs, &self.candidates, self.cursor);
        let canonical_input = cached(&self.canonical_forms, input);
        let canonical_candidate = cached(&self.canonical_forms, candidate);
        let matched = canonical_input == canonical_candidate;
        let score = if matched { MATCH_SCORE } else { MISMATCH_SCORE };
        tracing::trace!(
            canonical_input,
            canonical_candidate,
            score,
            "compared pair"
        );

        self.final_output
            .entry(input.to_string())
            .or_default()
            .entry(candidate.to_string())
            .or_insert(score);
        self.stats.pairs_compared += 1;
        if matched {
            self.stats.matches += 1;
        }
        Step::AdvanceOrTerminate
    }

    pub(crate) fn advance_or_terminate(&mut self) -> Step {
        self.stats.advances += 1;
        self.cursor.candidate_index += 1;
        if self.cursor.candidate_index >= self.candidates.len() {
            self.cursor.candidate_index = 0;
            self.cursor.input_index += 1;
            if let Some(next) = self.inputs.get(self.cursor.input_index) {
                tracing::debug!(input = next.as_str(), "advancing to next input schema");
                self.final_output.entry(next.clone()).or_default();
            }
        }
        if self.cursor.input_index >= self.inputs.len() {
            tracing::debug!(advances = self.stats.advances, "all input schemas processed");
            return Step::Done;
        }
        self.next_pair_step()
    }

    // With no candidates there is no pair to normalize; keep advancing so each
    // input still gets its (empty) row.
    fn next_pair_step(&self) -> Step {
        if self.candidates.is_empty() {
            Step::AdvanceOrTerminate
        } else {
            Step::NormalizePair
        }
    }
}

fn pair_at<'a>(
    inputs: &'a [String],
    candidates: &'a [String],
    cursor: TraversalCursor,
) -> (&'a str, &'a str) {
    assert!(
        cursor.input_index < inputs.len() && cursor.candidate_index < candidates.len(),
        "traversal cursor {cursor:?} out of range ({} inputs, {} candidates)",
        inputs.len(),
        candidates.len()
    );
    (
        inputs[cursor.input_index].as_str(),
        candidates[cursor.candidate_index].as_str(),
    )
}

fn cached<'a>(cache: &'a CanonicalCache, id: &str) -> &'a str {
    match cache.get(id) {
        Some(canonical) => canonical.as_str(),
        None => panic!("canonical form for {id:?} compared before it was normalized"),
    }
}
