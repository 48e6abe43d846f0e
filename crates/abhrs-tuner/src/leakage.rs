//! Leakage models and aggregation weights

use abhrs_core::config::LeakageWeightsConfig;
use abhrs_core::SignatureTranscript;
use serde::{Deserialize, Serialize};

/// Per-axis leakage of one transcript, each in `[0, 1]`
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LeakageScores {
    /// Attribute leakage
    pub attribute: f64,
    /// Policy leakage
    pub policy: f64,
    /// Anonymity-set leakage
    pub anonymity: f64,
}

impl LeakageScores {
    /// Component-wise mean; zero for an empty input
    pub fn mean<'a>(scores: impl IntoIterator<Item = &'a LeakageScores>) -> LeakageScores {
        let mut total = LeakageScores::default();
        let mut count = 0usize;
        for score in scores {
            total.attribute += score.attribute;
            total.policy += score.policy;
            total.anonymity += score.anonymity;
            count += 1;
        }
        if count == 0 {
            return total;
        }
        let n = count as f64;
        LeakageScores {
            attribute: total.attribute / n,
            policy: total.policy / n,
            anonymity: total.anonymity / n,
        }
    }
}

/// Adversary's view of what a transcript leaks
pub trait LeakageModel: Send + Sync {
    /// Score one transcript
    fn score(&self, transcript: &SignatureTranscript) -> LeakageScores;
}

/// Reference model: every axis falls with ring size, down to a floor
///
/// With `n` ring members:
/// - attribute: `1 / n`
/// - policy: `1 / (1 + ln n)`
/// - anonymity: `1 / log2(n + 1)`
///
/// Each axis is at most 1 and is clamped below by `floor`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceLeakageModel {
    floor: f64,
}

impl ReferenceLeakageModel {
    /// Create with a per-axis floor, clamped to `[0, 1]`
    pub fn new(floor: f64) -> Self {
        let floor = if floor.is_finite() {
            floor.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self { floor }
    }

    /// Score a ring of `size` members
    pub fn score_size(&self, size: usize) -> LeakageScores {
        let n = size.max(1) as f64;
        let clamp = |value: f64| value.clamp(self.floor, 1.0);
        LeakageScores {
            attribute: clamp(1.0 / n),
            policy: clamp(1.0 / (1.0 + n.ln())),
            anonymity: clamp(1.0 / (n + 1.0).log2()),
        }
    }
}

impl Default for ReferenceLeakageModel {
    fn default() -> Self {
        Self::new(0.01)
    }
}

impl LeakageModel for ReferenceLeakageModel {
    fn score(&self, transcript: &SignatureTranscript) -> LeakageScores {
        self.score_size(transcript.ring.len())
    }
}

/// Fixed weights for collapsing three axes into one number
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LeakageWeights {
    /// Attribute weight
    pub attribute: f64,
    /// Policy weight
    pub policy: f64,
    /// Anonymity-set weight
    pub anonymity: f64,
}

impl LeakageWeights {
    /// Weighted sum of the axes
    pub fn combine(&self, scores: &LeakageScores) -> f64 {
        self.attribute * scores.attribute
            + self.policy * scores.policy
            + self.anonymity * scores.anonymity
    }
}

impl Default for LeakageWeights {
    fn default() -> Self {
        Self::from(&LeakageWeightsConfig::default())
    }
}

impl From<&LeakageWeightsConfig> for LeakageWeights {
    fn from(config: &LeakageWeightsConfig) -> Self {
        Self {
            attribute: config.attribute,
            policy: config.policy,
            anonymity: config.anonymity,
        }
    }
}
