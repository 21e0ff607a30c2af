//! Schema identifier canonicalization.
//!
//! A raw identifier such as `ADM_PRD` or `USER-uat` is reduced to a grouping
//! key: `<core>_prod` when a core synonym is recognized, otherwise the
//! lowercased identifier stripped to `[a-z0-9]`. The environment slot is
//! always collapsed to `prod` so every environment of one core shares a bucket;
//! the detected environment is still reported by [`SchemaNormalizer::classify`].
use crate::synonyms::{SynonymTable, Variation, COLLAPSED_ENV};
use anyhow::{Context, Result};
use regex::Regex;
use serde::Serialize;

const DELIMITER_PATTERN: &str = r"[_,-]";
const NON_ALNUM_PATTERN: &str = r"[^a-z0-9]";

/// How the core token of an identifier was recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CoreMatch {
    /// A delimited part equals a core variation.
    Part,
    /// A core variation occurs somewhere in the lowercased identifier.
    Substring,
    /// No core variation found; the canonical form is the cleaned fallback.
    Unmatched,
}

/// Full normalization result, including the environment that was detected
/// but not used for grouping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub identifier: String,
    pub core: Option<String>,
    pub env: Option<String>,
    pub core_match: CoreMatch,
    pub canonical: String,
}

/// Maps raw schema identifiers to canonical grouping keys.
///
/// Construct once per run and pass by reference; it holds no mutable state.
#[derive(Debug, Clone)]
pub struct SchemaNormalizer {
    table: SynonymTable,
    delimiters: Regex,
    non_alnum: Regex,
}

impl SchemaNormalizer {
    pub fn new(table: SynonymTable) -> Result<Self> {
        Ok(Self {
            table,
            delimiters: Regex::new(DELIMITER_PATTERN).context("compile delimiter pattern")?,
            non_alnum: Regex::new(NON_ALNUM_PATTERN).context("compile cleanup pattern")?,
        })
    }

    /// Canonical grouping key for `identifier`.
    pub fn normalize(&self, identifier: &str) -> String {
        self.classify(identifier).canonical
    }

    /// Run the full greedy scan and report what was recognized.
    pub fn classify(&self, identifier: &str) -> Classification {
        let lower = identifier.to_lowercase();
        let mut parts: Vec<Option<&str>> = self.delimiters.split(&lower).map(Some).collect();

        let mut core = take_exact_part(&mut parts, self.table.core());
        let mut core_match = if core.is_some() {
            CoreMatch::Part
        } else {
            CoreMatch::Unmatched
        };
        let mut env = take_exact_part(&mut parts, self.table.env());

        if core.is_none() {
            core = self
                .table
                .core()
                .iter()
                .find(|variation| lower.contains(variation.text.as_str()));
            if core.is_some() {
                core_match = CoreMatch::Substring;
            }
        }

        if env.is_none() {
            env = self.env_by_substring(&lower, core);
        }

        let canonical = match core {
            Some(core) => format!("{}_{COLLAPSED_ENV}", core.canonical),
            None => self.non_alnum.replace_all(&lower, "").into_owned(),
        };
        Classification {
            identifier: identifier.to_string(),
            core: core.map(|variation| variation.canonical.clone()),
            env: env.map(|variation| variation.canonical.clone()),
            core_match,
            canonical,
        }
    }

    // The core name is dropped with a plain text replace, not per token, so a
    // core spelled inside another word is removed too.
    fn env_by_substring(&self, lower: &str, core: Option<&Variation>) -> Option<&Variation> {
        let stripped = core.map(|core| lower.replace(core.canonical.as_str(), ""));
        let haystack = match stripped.as_deref() {
            Some(stripped) if !stripped.is_empty() => stripped,
            _ => lower,
        };
        self.table
            .env()
            .iter()
            .filter(|variation| !variation.text.is_empty())
            .find(|variation| haystack.contains(variation.text.as_str()))
    }
}

/// Match unconsumed parts left to right against longest-first variations and
/// consume the first part that matches exactly.
fn take_exact_part<'t>(
    parts: &mut [Option<&str>],
    variations: &'t [Variation],
) -> Option<&'t Variation> {
    for slot in parts.iter_mut() {
        let Some(part) = *slot else {
            continue;
        };
        if let Some(found) = variations.iter().find(|variation| variation.text == part) {
            *slot = None;
            return Some(found);
        }
    }
    None
}

#[cfg(test)]
#[path = "normalize_tests.rs"]
mod tests;
