//! Attribute policies

use abhrs_core::{AttributeSet, PolicyId};
use std::fmt;
use std::sync::Arc;

/// Pure predicate over an attribute map
pub type PolicyPredicate = Arc<dyn Fn(&AttributeSet) -> bool + Send + Sync>;

/// Named access policy
#[derive(Clone)]
pub struct Policy {
    /// Policy identifier, bound into every statement
    pub id: PolicyId,
    predicate: PolicyPredicate,
}

impl Policy {
    /// Wrap an arbitrary predicate
    pub fn new<F>(id: PolicyId, predicate: F) -> Self
    where
        F: Fn(&AttributeSet) -> bool + Send + Sync + 'static,
    {
        Self {
            id,
            predicate: Arc::new(predicate),
        }
    }

    /// Require `key == value`
    pub fn attribute_equals(
        id: PolicyId,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        let key = key.into();
        let value = value.into();
        Self::new(id, move |attributes| {
            attributes.get(&key) == Some(value.as_str())
        })
    }

    /// Require every `(key, value)` pair
    pub fn all_of<K, V>(id: PolicyId, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let pairs: Vec<(String, String)> = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self::new(id, move |attributes| {
            pairs
                .iter()
                .all(|(key, value)| attributes.get(key) == Some(value.as_str()))
        })
    }

    /// Evaluate the predicate
    pub fn evaluate(&self, attributes: &AttributeSet) -> bool {
        (self.predicate)(attributes)
    }
}

impl fmt::Debug for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Policy").field("id", &self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_equals() {
        let policy = Policy::attribute_equals(PolicyId::new("doctors"), "role", "doctor");
        assert!(policy.evaluate(&AttributeSet::new().with("role", "doctor")));
        assert!(!policy.evaluate(&AttributeSet::new().with("role", "nurse")));
        assert!(!policy.evaluate(&AttributeSet::new()));
    }

    #[test]
    fn test_all_of() {
        let policy = Policy::all_of(
            PolicyId::new("cardio-doctors"),
            [("role", "doctor"), ("dept", "cardio")],
        );
        let attrs = AttributeSet::new().with("role", "doctor").with("dept", "cardio");
        assert!(policy.evaluate(&attrs));
        assert!(!policy.evaluate(&AttributeSet::new().with("role", "doctor")));
    }
}
