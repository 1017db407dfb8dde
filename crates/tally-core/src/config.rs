//! Insight rule configuration
//!
//! Rule sets are TOML. Resolution order:
//! 1. An explicit override path, when it exists
//! 2. `~/.local/share/tally/config/insights.toml` (platform data dir), when it exists
//! 3. The default rule set embedded in the binary

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::insights::{Band, InsightEngine, InsightKind, InsightRule, Metric, ThresholdRule};

/// Embedded default rule set
const DEFAULT_CONFIG: &str = include_str!("../../../config/insights.toml");

/// A parsed, validated rule set
#[derive(Debug, Clone, PartialEq)]
pub struct RuleConfig {
    pub rules: Vec<ThresholdRule>,
    /// Where the rules came from, `None` for the embedded default
    pub source: Option<PathBuf>,
}

impl RuleConfig {
    /// The embedded default rule set
    pub fn embedded() -> Result<Self> {
        parse_rules(DEFAULT_CONFIG)
    }

    /// Build an engine that evaluates these rules in file order
    pub fn engine(&self) -> InsightEngine {
        let rules: Vec<Box<dyn InsightRule>> = self
            .rules
            .iter()
            .cloned()
            .map(|rule| Box::new(rule) as Box<dyn InsightRule>)
            .collect();
        InsightEngine::with_rules(rules)
    }
}

/// Get the default override path for the rule file
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("tally").join("config").join("insights.toml"))
}

/// Load rules (override first, then the user data dir, then the embedded default)
pub fn load_rules(override_path: Option<&Path>) -> Result<RuleConfig> {
    let candidate = match override_path {
        Some(path) if path.exists() => Some(path.to_path_buf()),
        Some(path) => {
            tracing::warn!(
                path = %path.display(),
                "Rule file not found, using default rules"
            );
            None
        }
        None => default_config_path().filter(|p| p.exists()),
    };

    match candidate {
        Some(path) => {
            let content = fs::read_to_string(&path).map_err(|e| {
                Error::Config(format!("Failed to read {}: {}", path.display(), e))
            })?;
            let mut config = parse_rules(&content)?;
            tracing::debug!(path = %path.display(), rules = config.rules.len(), "Loaded insight rules");
            config.source = Some(path);
            Ok(config)
        }
        None => RuleConfig::embedded(),
    }
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    rules: Option<Vec<RawRule>>,
}

#[derive(Debug, Deserialize)]
struct RawRule {
    key: String,
    name: Option<String>,
    metric: String,
    bands: Option<Vec<RawBand>>,
}

#[derive(Debug, Deserialize)]
struct RawBand {
    above: Option<f64>,
    kind: String,
    title: String,
    message: String,
}

/// Parse and validate a TOML rule set
pub fn parse_rules(content: &str) -> Result<RuleConfig> {
    let raw: RawConfig = toml::from_str(content)?;

    let mut seen = HashSet::new();
    let mut rules = Vec::new();

    for raw_rule in raw.rules.unwrap_or_default() {
        let key = raw_rule.key.trim().to_string();
        if key.is_empty() {
            return Err(Error::Config("Rule with empty key".to_string()));
        }
        if !seen.insert(key.clone()) {
            return Err(Error::Config(format!("Duplicate rule key: {}", key)));
        }

        let metric: Metric = raw_rule
            .metric
            .parse()
            .map_err(|e: String| Error::Config(format!("Rule '{}': {}", key, e)))?;

        let raw_bands = raw_rule.bands.unwrap_or_default();
        if raw_bands.is_empty() {
            return Err(Error::Config(format!("Rule '{}' has no bands", key)));
        }

        let mut bands = Vec::with_capacity(raw_bands.len());
        for raw_band in raw_bands {
            if let Some(above) = raw_band.above {
                if !above.is_finite() {
                    return Err(Error::Config(format!(
                        "Rule '{}': threshold must be a finite number",
                        key
                    )));
                }
            }
            let kind: InsightKind = raw_band
                .kind
                .parse()
                .map_err(|e: String| Error::Config(format!("Rule '{}': {}", key, e)))?;
            bands.push(Band::new(raw_band.above, kind, raw_band.title, raw_band.message));
        }

        let name = raw_rule.name.unwrap_or_else(|| key.clone());
        rules.push(ThresholdRule {
            key,
            name,
            metric,
            bands,
        });
    }

    Ok(RuleConfig {
        rules,
        source: None,
    })
}
