//! Synonym config helpers.
//!
//! Loads, validates, and resolves the synonym tables so every run works from
//! one immutable, checked set of variations.
use super::{
    SynonymConfig, SynonymGroups, CONFIG_DIR_NAME, CONFIG_ENV_VAR, CONFIG_FILE_NAME, CONFIG_SCHEMA_VERSION,
};
use anyhow::{anyhow, Context, Result};
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const DELIMITERS: [char; 3] = ['_', ',', '-'];

fn entry(canonical: &str, variations: &[&str]) -> (String, Vec<String>) {
    (
        canonical.to_string(),
        variations.iter().map(|variation| variation.to_string()).collect(),
    )
}

/// Build the built-in synonym config.
///
/// The empty `prod` variation means an identifier with only a core token is
/// treated as production. Entry order matters: equal-length variations are
/// tried in the order they appear here.
pub fn default_config() -> SynonymConfig {
    SynonymConfig {
        schema_version: CONFIG_SCHEMA_VERSION,
        core_synonyms: SynonymGroups::from(vec![
            entry("admin", &["admin", "adm"]),
            entry("user", &["user", "usr"]),
        ]),
        env_synonyms: SynonymGroups::from(vec![
            entry("prod", &["prod", "prd", ""]),
            entry("dev", &["dev", "develop"]),
            entry("uat", &["uat"]),
            entry("test", &["test", "tst"]),
        ]),
    }
}

/// Render the default config as pretty JSON for new config files.
pub fn config_stub() -> Result<String> {
    let config = default_config();
    serde_json::to_string_pretty(&config).context("serialize synonym config stub")
}

/// Load a synonym config from a JSON file and validate it.
pub fn load_config(path: &Path) -> Result<SynonymConfig> {
    let bytes = fs::read(path).with_context(|| format!("read config {}", path.display()))?;
    let config: SynonymConfig = serde_json::from_slice(&bytes)
        .with_context(|| format!("parse synonym config JSON {}", path.display()))?;
    validate_config(&config).with_context(|| format!("invalid config {}", path.display()))?;
    Ok(config)
}

/// Where the active config came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOrigin {
    Flag(PathBuf),
    EnvVar(PathBuf),
    UserDir(PathBuf),
    BuiltIn,
}

impl ConfigOrigin {
    pub fn describe(&self) -> String {
        match self {
            ConfigOrigin::Flag(path) => format!("--config {}", path.display()),
            ConfigOrigin::EnvVar(path) => format!("{CONFIG_ENV_VAR}={}", path.display()),
            ConfigOrigin::UserDir(path) => path.display().to_string(),
            ConfigOrigin::BuiltIn => "built-in defaults".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub config: SynonymConfig,
    pub origin: ConfigOrigin,
}

/// Resolve the synonym config in priority order:
/// 1. explicit `--config` path
/// 2. `SMATCH_CONFIG` environment variable
/// 3. `schema-match/synonyms.json` under the user config directory, if present
/// 4. built-in defaults
pub fn resolve_config(flag: Option<&Path>) -> Result<ResolvedConfig> {
    let env_path = env::var_os(CONFIG_ENV_VAR)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from);
    let user_path = dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME));
    resolve_config_from(flag, env_path, user_path)
}

fn resolve_config_from(
    flag: Option<&Path>,
    env_path: Option<PathBuf>,
    user_path: Option<PathBuf>,
) -> Result<ResolvedConfig> {
    let (path, origin) = if let Some(path) = flag {
        (path.to_path_buf(), ConfigOrigin::Flag(path.to_path_buf()))
    } else if let Some(path) = env_path {
        (path.clone(), ConfigOrigin::EnvVar(path))
    } else if let Some(path) = user_path.filter(|path| path.is_file()) {
        (path.clone(), ConfigOrigin::UserDir(path))
    } else {
        tracing::debug!("using built-in synonym tables");
        return Ok(ResolvedConfig {
            config: default_config(),
            origin: ConfigOrigin::BuiltIn,
        });
    };
    tracing::debug!(path = %path.display(), "loading synonym config");
    let config = load_config(&path)?;
    Ok(ResolvedConfig { config, origin })
}

/// Validate schema version and the one-variation-one-canonical invariant.
pub fn validate_config(config: &SynonymConfig) -> Result<()> {
    if config.schema_version != CONFIG_SCHEMA_VERSION {
        return Err(anyhow!(
            "unsupported synonym config schema_version {}",
            config.schema_version
        ));
    }
    validate_table(&config.core_synonyms, "core_synonyms", false)?;
    validate_table(&config.env_synonyms, "env_synonyms", true)?;
    Ok(())
}

fn validate_table(
    table: &SynonymGroups,
    label: &str,
    allow_empty_variation: bool,
) -> Result<()> {
    if table.is_empty() {
        return Err(anyhow!("{label} must contain at least one entry"));
    }
    let mut owners: BTreeMap<&str, &str> = BTreeMap::new();
    for (canonical, variations) in table.iter() {
        if canonical.trim().is_empty() {
            return Err(anyhow!("{label} canonical names must be non-empty"));
        }
        if variations.is_empty() {
            return Err(anyhow!("{label}.{canonical} must list at least one variation"));
        }
        for variation in variations {
            if variation.is_empty() && !allow_empty_variation {
                return Err(anyhow!(
                    "{label}.{canonical} contains an empty variation (it would match every name)"
                ));
            }
            if variation.to_lowercase() != *variation {
                return Err(anyhow!(
                    "{label}.{canonical} variation {variation:?} must be lowercase"
                ));
            }
            if variation.contains(DELIMITERS) {
                return Err(anyhow!(
                    "{label}.{canonical} variation {variation:?} must not contain '_', ',' or '-'"
                ));
            }
            match owners.insert(variation.as_str(), canonical) {
                Some(previous) if previous != canonical => {
                    return Err(anyhow!(
                        "{label} variation {variation:?} maps to both {previous:?} and {canonical:?}"
                    ));
                }
                _ => {}
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
