//! Attribute maps and the issuance schema

use crate::config::SchemaConfig;
use crate::hash::Hash32;
use crate::{serialization, AbhrsError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Attribute map of a user or credential
///
/// Ordered so the canonical encoding is independent of insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeSet(BTreeMap<String, String>);

impl AttributeSet {
    /// Create an empty attribute set
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert or replace an attribute
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Look up an attribute value
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Whether the attribute is present
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Number of attributes
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate attributes in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Digest of the canonical encoding
    pub fn digest(&self) -> Result<Hash32> {
        serialization::hash_canonical("abhrs/attributes/v1", self)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for AttributeSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Schema applied to attribute sets at issuance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeSchema {
    /// Maximum number of attributes per credential
    pub max_attributes: usize,
    /// Maximum byte length of a single value
    pub max_value_len: usize,
    /// Keys every credential must carry
    pub required_keys: Vec<String>,
}

impl AttributeSchema {
    /// Check an attribute set against the schema
    pub fn check(&self, attributes: &AttributeSet) -> Result<()> {
        if attributes.is_empty() {
            return Err(AbhrsError::malformed_attributes("attribute set is empty"));
        }
        if attributes.len() > self.max_attributes {
            return Err(AbhrsError::malformed_attributes(format!(
                "{} attributes exceeds the limit of {}",
                attributes.len(),
                self.max_attributes
            )));
        }
        for (key, value) in attributes.iter() {
            if !is_identifier(key) {
                return Err(AbhrsError::malformed_attributes(format!(
                    "attribute key {key:?} is not an identifier"
                )));
            }
            if value.is_empty() || value.len() > self.max_value_len {
                return Err(AbhrsError::malformed_attributes(format!(
                    "attribute {key} has a value of length {}",
                    value.len()
                )));
            }
        }
        if let Some(missing) = self
            .required_keys
            .iter()
            .find(|key| !attributes.contains_key(key))
        {
            return Err(AbhrsError::malformed_attributes(format!(
                "required attribute {missing} is missing"
            )));
        }
        Ok(())
    }
}

impl Default for AttributeSchema {
    fn default() -> Self {
        Self::from(&SchemaConfig::default())
    }
}

impl From<&SchemaConfig> for AttributeSchema {
    fn from(config: &SchemaConfig) -> Self {
        Self {
            max_attributes: config.max_attributes,
            max_value_len: config.max_value_len,
            required_keys: config.required_keys.clone(),
        }
    }
}

fn is_identifier(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.' || c == '-')
}
