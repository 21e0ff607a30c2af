//! Report assembly and rendering for comparison runs.
//!
//! JSON reports are the machine-facing artifact; the text renderers are a thin
//! console view over the same data.
use crate::compare::ComparisonOutcome;
use crate::normalize::{Classification, CoreMatch};
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

/// Current schema version for comparison reports.
pub const REPORT_SCHEMA_VERSION: u32 = 1;

/// Serialized as one flat object: `final_output`, `canonical_forms`, and
/// `stats` sit next to the metadata fields.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonReport {
    pub schema_version: u32,
    pub generated_at_epoch_ms: u128,
    pub config_origin: String,
    pub candidate_source: String,
    #[serde(flatten)]
    pub outcome: ComparisonOutcome,
}

/// Where the inputs of a run came from, recorded in the report.
pub struct ReportSources<'a> {
    pub config_origin: &'a str,
    pub candidate_source: &'a str,
}

pub fn build_report(
    outcome: ComparisonOutcome,
    sources: &ReportSources<'_>,
) -> Result<ComparisonReport> {
    let generated_at_epoch_ms = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .context("compute timestamp")?
        .as_millis();
    Ok(ComparisonReport {
        schema_version: REPORT_SCHEMA_VERSION,
        generated_at_epoch_ms,
        config_origin: sources.config_origin.to_string(),
        candidate_source: sources.candidate_source.to_string(),
        outcome,
    })
}

/// Pretty JSON with a trailing newline.
pub fn to_json_text<T: Serialize>(value: &T) -> Result<String> {
    let mut text = serde_json::to_string_pretty(value).context("serialize JSON")?;
    text.push('\n');
    Ok(text)
}

/// Write pretty JSON to `path`, creating parent directories.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("create {}", parent.display()))?;
    }
    let text = to_json_text(value)?;
    fs::write(path, text.as_bytes()).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

/// One line per input schema listing matching candidates.
pub fn render_summary(report: &ComparisonReport) -> String {
    let outcome = &report.outcome;
    let mut lines = Vec::with_capacity(outcome.final_output.len() + 1);
    for (input, row) in &outcome.final_output {
        let canonical = outcome
            .canonical_forms
            .get(input)
            .map(String::as_str)
            .unwrap_or("-");
        let matches = outcome.matches_for(input);
        let listed = if matches.is_empty() {
            "(no matches)".to_string()
        } else {
            matches.join(", ")
        };
        lines.push(format!(
            "{input} [{canonical}] {}/{}: {listed}",
            matches.len(),
            row.len()
        ));
    }
    lines.push(format!(
        "compared {} pairs, {} matches",
        outcome.stats.pairs_compared, outcome.stats.matches
    ));
    join_lines(lines)
}

/// Text view of normalization results; `explain` adds the detected parts.
pub fn render_classifications(classified: &[Classification], explain: bool) -> String {
    let lines = classified.iter().map(|entry| {
        if !explain {
            return format!("{} -> {}", entry.identifier, entry.canonical);
        }
        format!(
            "{} -> {} (core: {}, env: {}, match: {})",
            entry.identifier,
            entry.canonical,
            entry.core.as_deref().unwrap_or("-"),
            entry.env.as_deref().unwrap_or("-"),
            core_match_label(entry),
        )
    });
    join_lines(lines)
}

// Every line, including the last, ends with a newline.
fn join_lines(lines: impl IntoIterator<Item = String>) -> String {
    lines.into_iter().map(|line| line + "\n").collect()
}

fn core_match_label(entry: &Classification) -> &'static str {
    match entry.core_match {
        CoreMatch::Part => "part",
        CoreMatch::Substring => "substring",
        CoreMatch::Unmatched => "fallback",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::compare_schemas;
    use crate::normalize::SchemaNormalizer;
    use crate::synonyms::SynonymTable;

    fn report() -> ComparisonReport {
        let normalizer = SchemaNormalizer::new(SynonymTable::default()).expect("normalizer");
        let outcome = compare_schemas(
            &normalizer,
            vec!["ADMDEV".to_string(), "APP".to_string()],
            vec!["ADMPRD".to_string(), "USER_UAT".to_string()],
        );
        let sources = ReportSources {
            config_origin: "built-in defaults",
            candidate_source: "mock",
        };
        build_report(outcome, &sources).expect("build report")
    }

    #[test]
    fn summary_lists_matches_per_input() {
        let text = render_summary(&report());
        assert_eq!(
            text,
            "ADMDEV [admin_prod] 1/2: ADMPRD\nAPP [app] 0/2: (no matches)\ncompared 4 pairs, 1 matches\n"
        );
    }

    #[test]
    fn written_report_parses_back() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("nested/report.json");
        let report = report();
        write_json(&path, &report).expect("write report");

        let text = std::fs::read_to_string(&path).expect("read report");
        assert!(text.ends_with('\n'));
        let value: serde_json::Value = serde_json::from_str(&text).expect("parse report");
        assert_eq!(value["schema_version"], 1);
        assert_eq!(value["final_output"]["ADMDEV"]["ADMPRD"], 1.0);
        assert_eq!(value["canonical_forms"]["USER_UAT"], "user_prod");
        assert_eq!(value["stats"]["pairs_compared"], 4);
    }

    #[test]
    fn explain_view_shows_detected_environment() {
        let normalizer = SchemaNormalizer::new(SynonymTable::default()).expect("normalizer");
        let classified = vec![normalizer.classify("USER_UAT"), normalizer.classify("XYZ")];
        assert_eq!(
            render_classifications(&classified, true),
            "USER_UAT -> user_prod (core: user, env: uat, match: part)\nXYZ -> xyz (core: -, env: -, match: fallback)\n"
        );
        assert_eq!(
            render_classifications(&classified, false),
            "USER_UAT -> user_prod\nXYZ -> xyz\n"
        );
    }

    #[test]
    fn empty_classification_list_renders_nothing() {
        assert_eq!(render_classifications(&[], true), "");
        assert_eq!(render_classifications(&[], false), "");
    }
}
