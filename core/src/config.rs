use crate::error::{Error, Result};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Rocchio weights used by relevance feedback.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackConfig {
    /// Weight of the original query vector.
    pub alpha: f64,
    /// Weight of the relevant-document centroid.
    pub beta: f64,
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self { alpha: 0.1, beta: 0.8 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingConfig {
    /// Share of a static document prior in a combined ranked score, in [0, 1].
    pub static_weight: f64,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self { static_weight: 0.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Total number of documents in the corpus (N in ln(N/df)).
    pub corpus_size: u32,
    /// Largest accepted offset delta between consecutive phrase terms.
    /// 1 means the terms must be directly adjacent.
    pub phrase_window: u32,
    pub feedback: FeedbackConfig,
    pub ranking: RankingConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            corpus_size: 1000,
            phrase_window: 1,
            feedback: FeedbackConfig::default(),
            ranking: RankingConfig::default(),
        }
    }
}

impl EngineConfig {
    pub fn with_corpus_size(corpus_size: u32) -> Self {
        Self { corpus_size, ..Self::default() }
    }

    pub fn validate(&self) -> Result<()> {
        if self.corpus_size == 0 {
            return Err(Error::InvalidConfig("corpus_size must be positive".into()));
        }
        if self.phrase_window == 0 {
            return Err(Error::InvalidConfig("phrase_window must be at least 1".into()));
        }
        let FeedbackConfig { alpha, beta } = self.feedback;
        if !(alpha >= 0.0 && beta >= 0.0) {
            return Err(Error::InvalidConfig(format!("feedback weights must be non-negative, got alpha={alpha} beta={beta}")));
        }
        let w = self.ranking.static_weight;
        if !(0.0..=1.0).contains(&w) {
            return Err(Error::InvalidConfig(format!("ranking.static_weight must be in [0, 1], got {w}")));
        }
        Ok(())
    }

    /// Read a JSON config file. Missing fields take their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let mut f = File::open(path).with_context(|| format!("opening config {}", path.display()))?;
        let mut buf = String::new();
        f.read_to_string(&mut buf)?;
        let config: EngineConfig = serde_json::from_str(&buf).with_context(|| format!("parsing config {}", path.display()))?;
        config.validate()?;
        tracing::debug!(path = %path.display(), corpus_size = config.corpus_size, "loaded engine config");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.phrase_window, 1);
        assert_eq!(config.feedback, FeedbackConfig { alpha: 0.1, beta: 0.8 });
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: EngineConfig = serde_json::from_str(r#"{"corpus_size": 3, "feedback": {"beta": 0.5}}"#).unwrap();
        assert_eq!(config.corpus_size, 3);
        assert_eq!(config.phrase_window, 1);
        assert_eq!(config.feedback.alpha, 0.1);
        assert_eq!(config.feedback.beta, 0.5);
    }

    #[test]
    fn rejects_zero_window_and_corpus() {
        let config = EngineConfig { phrase_window: 0, ..EngineConfig::default() };
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
        assert!(EngineConfig::with_corpus_size(0).validate().is_err());
    }

    #[test]
    fn rejects_out_of_range_static_weight() {
        let mut config = EngineConfig::default();
        config.ranking.static_weight = 1.5;
        assert!(config.validate().is_err());
    }
}
