//! Protocol configuration
//!
//! Loaded from TOML, then overridden from `ABHRS_`-prefixed environment
//! variables, then validated. Every section has defaults so a partial file is
//! enough.
//!
//! ```toml
//! [parameters]
//! target_ring_size = 4
//! decoy_ratio = 0.5
//!
//! [tuner]
//! cost_budget = 6.0
//! rounds = 4
//! ```

use crate::params::Theta;
use crate::{AbhrsError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable prefix for overrides
pub const ENV_PREFIX: &str = "ABHRS_";

/// Configuration validation trait
pub trait ConfigValidation {
    /// Validate the configuration
    fn validate(&self) -> Result<()>;
}

/// Initial parameter vector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParametersConfig {
    /// Initial target ring size
    pub target_ring_size: usize,
    /// Initial decoy ratio
    pub decoy_ratio: f64,
}

impl Default for ParametersConfig {
    fn default() -> Self {
        Self {
            target_ring_size: 4,
            decoy_ratio: 0.5,
        }
    }
}

/// Weights for the three leakage axes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeakageWeightsConfig {
    /// Attribute leakage weight
    pub attribute: f64,
    /// Policy leakage weight
    pub policy: f64,
    /// Anonymity-set leakage weight
    pub anonymity: f64,
}

impl Default for LeakageWeightsConfig {
    fn default() -> Self {
        Self {
            attribute: 0.4,
            policy: 0.3,
            anonymity: 0.3,
        }
    }
}

/// Co-design tuner settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TunerConfig {
    /// Cost budget C_max
    pub cost_budget: f64,
    /// Fixed round budget
    pub rounds: usize,
    /// Hard upper cap on the target ring size
    pub hard_max_ring_size: usize,
    /// Cost contributed by each ring member
    pub cost_per_member: f64,
    /// Minimum per-axis leakage score
    pub leakage_floor: f64,
    /// Leakage aggregation weights
    pub weights: LeakageWeightsConfig,
}

impl Default for TunerConfig {
    fn default() -> Self {
        Self {
            cost_budget: 6.0,
            rounds: 4,
            hard_max_ring_size: 64,
            cost_per_member: 1.0,
            leakage_floor: 0.01,
            weights: LeakageWeightsConfig::default(),
        }
    }
}

/// Randomness provider selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RandomnessMode {
    /// Operating-system entropy (production)
    Os,
    /// Seeded deterministic stream (tests and simulations)
    Seeded,
}

/// Randomness settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RandomnessConfig {
    /// Which provider to construct
    pub mode: RandomnessMode,
    /// Seed used when `mode = "seeded"`
    pub seed: u64,
}

impl Default for RandomnessConfig {
    fn default() -> Self {
        Self {
            mode: RandomnessMode::Os,
            seed: 0,
        }
    }
}

/// Attribute schema settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaConfig {
    /// Maximum attributes per credential
    pub max_attributes: usize,
    /// Maximum value length in bytes
    pub max_value_len: usize,
    /// Keys every credential must carry
    pub required_keys: Vec<String>,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            max_attributes: 64,
            max_value_len: 256,
            required_keys: Vec::new(),
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProtocolConfig {
    /// Initial parameter vector
    pub parameters: ParametersConfig,
    /// Tuner settings
    pub tuner: TunerConfig,
    /// Randomness settings
    pub randomness: RandomnessConfig,
    /// Attribute schema
    pub schema: SchemaConfig,
}

impl ProtocolConfig {
    /// Parse from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load from a TOML file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            AbhrsError::config(format!("Failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&text)
    }

    /// Load from file, apply environment overrides, validate
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = Self::load_from_file(path)?;
        config.merge_with_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `ABHRS_SECTION_FIELD` overrides from the process environment
    pub fn merge_with_env(&mut self) -> Result<()> {
        self.merge_with_vars(std::env::vars())
    }

    /// Apply overrides from an iterator of (name, value) pairs
    ///
    /// `ABHRS_TUNER_COST_BUDGET=8` maps to `tuner.cost_budget`. Unknown names
    /// under the prefix are rejected so typos do not pass silently.
    pub fn merge_with_vars<I>(&mut self, vars: I) -> Result<()>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (name, value) in vars {
            let Some(rest) = name.strip_prefix(ENV_PREFIX) else {
                continue;
            };
            let rest = rest.to_ascii_lowercase();
            let Some((section, field)) = rest.split_once('_') else {
                return Err(AbhrsError::config(format!("Unrecognized override {name}")));
            };
            self.set_from_string(&format!("{section}.{field}"), &value)?;
        }
        Ok(())
    }

    /// Set a single dotted key from its string form
    pub fn set_from_string(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "parameters.target_ring_size" => {
                self.parameters.target_ring_size = parse(key, value)?;
            }
            "parameters.decoy_ratio" => self.parameters.decoy_ratio = parse(key, value)?,
            "tuner.cost_budget" => self.tuner.cost_budget = parse(key, value)?,
            "tuner.rounds" => self.tuner.rounds = parse(key, value)?,
            "tuner.hard_max_ring_size" => self.tuner.hard_max_ring_size = parse(key, value)?,
            "tuner.cost_per_member" => self.tuner.cost_per_member = parse(key, value)?,
            "tuner.leakage_floor" => self.tuner.leakage_floor = parse(key, value)?,
            "randomness.mode" => {
                self.randomness.mode = match value.to_ascii_lowercase().as_str() {
                    "os" => RandomnessMode::Os,
                    "seeded" => RandomnessMode::Seeded,
                    other => {
                        return Err(AbhrsError::config(format!(
                            "randomness.mode must be os or seeded, got {other}"
                        )))
                    }
                };
            }
            "randomness.seed" => self.randomness.seed = parse(key, value)?,
            "schema.max_attributes" => self.schema.max_attributes = parse(key, value)?,
            "schema.max_value_len" => self.schema.max_value_len = parse(key, value)?,
            "schema.required_keys" => {
                self.schema.required_keys = value
                    .split(',')
                    .map(str::trim)
                    .filter(|k| !k.is_empty())
                    .map(str::to_string)
                    .collect();
            }
            _ => return Err(AbhrsError::config(format!("Unknown configuration key {key}"))),
        }
        Ok(())
    }

    /// Initial parameter vector described by this configuration
    pub fn initial_theta(&self) -> Theta {
        Theta::new(
            self.parameters.target_ring_size,
            self.parameters.decoy_ratio,
        )
    }
}

impl ConfigValidation for ProtocolConfig {
    fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();

        if let Err(e) = self.initial_theta().validate() {
            errors.push(format!("parameters: {e}"));
        }
        if self.tuner.hard_max_ring_size < self.parameters.target_ring_size {
            errors.push("tuner.hard_max_ring_size must be at least the initial ring size".into());
        }
        if !self.tuner.cost_budget.is_finite() || self.tuner.cost_budget < 0.0 {
            errors.push("tuner.cost_budget must be a non-negative number".into());
        }
        if !self.tuner.cost_per_member.is_finite() || self.tuner.cost_per_member <= 0.0 {
            errors.push("tuner.cost_per_member must be positive".into());
        }
        if !(0.0..=1.0).contains(&self.tuner.leakage_floor) {
            errors.push("tuner.leakage_floor must lie in [0, 1]".into());
        }
        let weights = &self.tuner.weights;
        let all = [weights.attribute, weights.policy, weights.anonymity];
        if all.iter().any(|w| !w.is_finite() || *w < 0.0) {
            errors.push("tuner.weights must be non-negative".into());
        } else if (all.iter().sum::<f64>() - 1.0).abs() > 1e-9 {
            errors.push("tuner.weights must sum to 1".into());
        }
        if self.schema.max_attributes == 0 || self.schema.max_value_len == 0 {
            errors.push("schema limits must be positive".into());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(AbhrsError::config(errors.join("; ")))
        }
    }
}

fn parse<T: std::str::FromStr>(key: &str, value: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| AbhrsError::config(format!("Invalid value {value:?} for {key}: {e}")))
}
