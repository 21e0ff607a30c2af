//! CLI argument parsing for schema matching.
//!
//! The CLI only gathers inputs and picks an output form; normalization and
//! comparison live in their own modules.
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Root CLI entrypoint.
#[derive(Parser, Debug)]
#[command(
    name = "smatch",
    version,
    about = "Canonicalize schema names and match them across environments",
    after_help = "Examples:\n  smatch normalize ADMDEV USER_UAT --explain\n  smatch compare --input ADMDEV --input USER_UAT\n  smatch compare --inputs-file inputs.txt --candidates-file schemas.json --out report.json\n  smatch config --stub > synonyms.json",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct RootArgs {
    /// Emit debug logs on stderr (SMATCH_LOG overrides the filter)
    #[arg(long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    Normalize(NormalizeArgs),
    Compare(CompareArgs),
    Config(ConfigArgs),
}

/// Synonym config selection shared by every command.
#[derive(Args, Debug)]
pub struct ConfigSelection {
    /// Synonym config JSON (defaults to SMATCH_CONFIG, then the user config dir)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
#[command(about = "Print the canonical form of each identifier")]
pub struct NormalizeArgs {
    /// Schema identifiers to normalize
    #[arg(value_name = "ID", required = true)]
    pub ids: Vec<String>,

    /// Also show the detected core, environment, and match kind
    #[arg(long)]
    pub explain: bool,

    /// Emit machine-readable JSON output
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub selection: ConfigSelection,
}

#[derive(Parser, Debug)]
#[command(about = "Score every input schema against every candidate schema")]
pub struct CompareArgs {
    /// Input schema identifier (repeatable)
    #[arg(long = "input", value_name = "ID", conflicts_with = "inputs_file")]
    pub inputs: Vec<String>,

    /// File with input identifiers (JSON array or one per line)
    #[arg(long, value_name = "PATH")]
    pub inputs_file: Option<PathBuf>,

    /// File with candidate identifiers (JSON array or one per line)
    #[arg(long, value_name = "PATH", conflicts_with = "candidates_command")]
    pub candidates_file: Option<PathBuf>,

    /// Command whose stdout lists candidate identifiers
    #[arg(long, value_name = "CMD")]
    pub candidates_command: Option<String>,

    /// Output path for the JSON report
    #[arg(long, value_name = "PATH")]
    pub out: Option<PathBuf>,

    /// Print the JSON report on stdout instead of the summary
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub selection: ConfigSelection,
}

#[derive(Parser, Debug)]
#[command(about = "Show or validate the synonym config")]
pub struct ConfigArgs {
    /// Print the built-in config as a starting point
    #[arg(long, conflicts_with = "config")]
    pub stub: bool,

    #[command(flatten)]
    pub selection: ConfigSelection,
}
