//! Candidate schema sources.
//!
//! The comparison loop only needs an ordered list of identifiers; where it
//! comes from is up to the caller. A fixed mock list stands in for a database
//! listing, and files or an external command can supply real ones.
use crate::util::{first_line, truncate_string};
use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Instant;

/// Candidate list used when no source is configured.
pub const MOCK_CANDIDATES: [&str; 8] = [
    "ADMPRD", "ADMDEV", "USER_PROD", "USER_UAT", "DEV_ADM", "ADMINPRD", "XYZ_TEST", "APP_V1",
];
/// Input list used when `compare` is run without inputs.
pub const DEMO_INPUTS: [&str; 3] = ["ADMDEV", "USER_UAT", "NONEXISTENT_CORE"];

const MAX_STDERR_BYTES: usize = 512;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateSource {
    Mock,
    File(PathBuf),
    /// A command line, split with shell quoting rules, whose stdout lists identifiers.
    Command(String),
}

impl CandidateSource {
    /// Fetch the ordered candidate list.
    pub fn fetch(&self) -> Result<Vec<String>> {
        let candidates: Vec<String> = match self {
            CandidateSource::Mock => MOCK_CANDIDATES.iter().map(|id| id.to_string()).collect(),
            CandidateSource::File(path) => read_identifier_file(path)?,
            CandidateSource::Command(command) => {
                let stdout = run_candidates_command(command)?;
                parse_identifier_list(&stdout).context("parse candidates command output")?
            }
        };
        tracing::debug!(
            source = %self.describe(),
            count = candidates.len(),
            "fetched candidates"
        );
        Ok(candidates)
    }

    pub fn describe(&self) -> String {
        match self {
            CandidateSource::Mock => "mock".to_string(),
            CandidateSource::File(path) => format!("file {}", path.display()),
            CandidateSource::Command(command) => format!("command `{command}`"),
        }
    }
}

/// Read identifiers from a file in either list format accepted by
/// [`parse_identifier_list`].
pub fn read_identifier_file(path: &Path) -> Result<Vec<String>> {
    let text =
        fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    parse_identifier_list(&text).with_context(|| format!("parse {}", path.display()))
}

/// Parse a JSON array of strings, or plain text with one identifier per line.
///
/// Plain-text lines are trimmed; blank lines and `#` comments are skipped.
pub fn parse_identifier_list(text: &str) -> Result<Vec<String>> {
    let trimmed = text.trim_start();
    if trimmed.starts_with('[') {
        let ids: Vec<String> =
            serde_json::from_str(trimmed).context("parse identifier JSON array")?;
        return Ok(ids);
    }
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}

fn run_candidates_command(command: &str) -> Result<String> {
    let mut argv = shell_words::split(command).context("parse candidates command")?;
    if argv.is_empty() {
        return Err(anyhow!("candidates command is empty"));
    }
    let program = argv.remove(0);
    let start = Instant::now();
    let output = Command::new(&program)
        .args(&argv)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .with_context(|| format!("run candidates command {program}"))?;
    tracing::info!(
        elapsed_ms = start.elapsed().as_millis(),
        stdout_bytes = output.stdout.len(),
        "candidates command complete"
    );
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let line = first_line(&stderr);
        let detail = if line.is_empty() {
            format!("status {}", output.status)
        } else {
            truncate_string(line, MAX_STDERR_BYTES)
        };
        return Err(anyhow!("candidates command failed: {detail}"));
    }
    String::from_utf8(output.stdout).context("candidates command output is not UTF-8")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_source_returns_fixed_list_in_order() {
        let candidates = CandidateSource::Mock.fetch().expect("mock fetch");
        assert_eq!(candidates.len(), 8);
        assert_eq!(candidates.first().map(String::as_str), Some("ADMPRD"));
        assert_eq!(candidates.last().map(String::as_str), Some("APP_V1"));
    }

    #[test]
    fn parses_plain_lines_and_skips_comments() {
        let ids = parse_identifier_list("# prod listing\nADMPRD\n\n  USER_UAT  \n").expect("parse");
        assert_eq!(ids, vec!["ADMPRD", "USER_UAT"]);
    }

    #[test]
    fn parses_json_arrays() {
        let ids = parse_identifier_list(" [\"ADMPRD\", \"APP_V1\"]\n").expect("parse");
        assert_eq!(ids, vec!["ADMPRD", "APP_V1"]);
        assert!(parse_identifier_list("[\"ADMPRD\", 3]").is_err());
    }

    #[test]
    fn file_source_reads_identifiers() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("candidates.txt");
        std::fs::write(&path, "ADMPRD\nXYZ_TEST\n").expect("write candidates");
        let ids = CandidateSource::File(path).fetch().expect("file fetch");
        assert_eq!(ids, vec!["ADMPRD", "XYZ_TEST"]);
    }

    #[test]
    fn missing_file_reports_path() {
        let err = CandidateSource::File(PathBuf::from("/nonexistent/candidates.txt"))
            .fetch()
            .expect_err("missing file");
        assert!(format!("{err:#}").contains("/nonexistent/candidates.txt"));
    }

    #[test]
    fn empty_command_is_rejected() {
        let err = CandidateSource::Command("   ".to_string())
            .fetch()
            .expect_err("empty command");
        assert!(err.to_string().contains("empty"));
    }

    #[cfg(unix)]
    #[test]
    fn command_source_reads_stdout() {
        let ids = CandidateSource::Command("printf 'ADMPRD\\nUSER_UAT\\n'".to_string())
            .fetch()
            .expect("command fetch");
        assert_eq!(ids, vec!["ADMPRD", "USER_UAT"]);
    }

    #[cfg(unix)]
    #[test]
    fn failing_command_is_an_error() {
        let err = CandidateSource::Command("sh -c 'echo boom >&2; exit 3'".to_string())
            .fetch()
            .expect_err("failing command");
        assert!(err.to_string().contains("boom"), "{err}");
    }
}
