//! Synonym tables for schema core and environment tokens.
//!
//! The tables are plain configuration data: a canonical name mapped to the
//! spellings that should collapse onto it. Lookups used by the normalizer are
//! derived once from a validated config and never mutated afterwards.
/// Current schema version for synonym config files.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;
/// Environment every recognized core is bucketed under.
pub const COLLAPSED_ENV: &str = "prod";
/// Environment variable naming an explicit synonym config path.
pub const CONFIG_ENV_VAR: &str = "SMATCH_CONFIG";
/// File name looked up under the user config directory.
pub const CONFIG_FILE_NAME: &str = "synonyms.json";
/// Directory name under the user config directory.
pub const CONFIG_DIR_NAME: &str = "schema-match";

mod config;

pub use config::{config_stub, default_config, resolve_config, ResolvedConfig};

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;

/// On-disk synonym configuration.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct SynonymConfig {
    pub schema_version: u32,
    pub core_synonyms: SynonymGroups,
    pub env_synonyms: SynonymGroups,
}

/// Canonical names and their variations, kept in declaration order.
///
/// Declaration order decides which of two equal-length variations is tried
/// first, so the groups serialize as a JSON object without reordering keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynonymGroups(Vec<(String, Vec<String>)>);

impl SynonymGroups {
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0
            .iter()
            .map(|(canonical, variations)| (canonical.as_str(), variations.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
impl SynonymGroups {
    pub fn get(&self, canonical: &str) -> Option<&[String]> {
        self.iter()
            .find(|(name, _)| *name == canonical)
            .map(|(_, variations)| variations)
    }

    pub fn get_mut(&mut self, canonical: &str) -> Option<&mut Vec<String>> {
        self.0
            .iter_mut()
            .find(|(name, _)| name == canonical)
            .map(|(_, variations)| variations)
    }
}

impl From<Vec<(String, Vec<String>)>> for SynonymGroups {
    fn from(groups: Vec<(String, Vec<String>)>) -> Self {
        Self(groups)
    }
}

impl Serialize for SynonymGroups {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (canonical, variations) in &self.0 {
            map.serialize_entry(canonical, variations)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for SynonymGroups {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(GroupsVisitor)
    }
}

struct GroupsVisitor;

impl<'de> Visitor<'de> for GroupsVisitor {
    type Value = SynonymGroups;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("an object mapping canonical names to variation lists")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut groups: Vec<(String, Vec<String>)> = Vec::new();
        while let Some((canonical, variations)) = access.next_entry::<String, Vec<String>>()? {
            if groups.iter().any(|(name, _)| *name == canonical) {
                return Err(serde::de::Error::custom(format!(
                    "duplicate canonical name {canonical:?}"
                )));
            }
            groups.push((canonical, variations));
        }
        Ok(SynonymGroups(groups))
    }
}

/// One variation and the canonical name it maps to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variation {
    pub text: String,
    pub canonical: String,
}

/// Immutable variation lookups, ordered for greedy longest-first matching.
#[derive(Debug, Clone)]
pub struct SynonymTable {
    core: Vec<Variation>,
    env: Vec<Variation>,
}

impl SynonymTable {
    /// Build lookups from a config that already passed `validate_config`.
    pub fn from_config(config: &SynonymConfig) -> Self {
        Self {
            core: ordered_variations(&config.core_synonyms),
            env: ordered_variations(&config.env_synonyms),
        }
    }

    /// Core variations, longest first.
    pub fn core(&self) -> &[Variation] {
        &self.core
    }

    /// Environment variations, longest first.
    pub fn env(&self) -> &[Variation] {
        &self.env
    }
}

impl Default for SynonymTable {
    fn default() -> Self {
        Self::from_config(&default_config())
    }
}

// Stable sort by length, longest first: equal-length variations stay in the
// order they are declared. A repeated spelling keeps its first position.
fn ordered_variations(groups: &SynonymGroups) -> Vec<Variation> {
    let mut seen = BTreeSet::new();
    let mut variations: Vec<Variation> = groups
        .iter()
        .flat_map(|(canonical, texts)| {
            texts.iter().map(move |text| Variation {
                text: text.clone(),
                canonical: canonical.to_string(),
            })
        })
        .filter(|variation| seen.insert(variation.text.clone()))
        .collect();
    variations.sort_by(|a, b| b.text.len().cmp(&a.text.len()));
    variations
}
