use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::config::parse_or;

/// Blend weights for the five component scores (W1–W5).
/// They sum to 1.0 by default; nothing enforces that at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub role: f64,
    pub affinity: f64,
    pub readiness: f64,
    pub cluster: f64,
    pub quality: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            role: 0.50,
            affinity: 0.15,
            readiness: 0.10,
            cluster: 0.05,
            quality: 0.20,
        }
    }
}

impl ScoringWeights {
    /// Upper bound of a final score when every component sits at its maximum.
    pub fn sum(&self) -> f64 {
        self.role + self.affinity + self.readiness + self.cluster + self.quality
    }
}

/// Immutable tunables handed to the engine for one computation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub weights: ScoringWeights,
    /// How many of the most similar completed courses feed the affinity score.
    pub top_k_similar: usize,
    /// How many top role-scoring courses seed cluster inference.
    pub top_n_role: usize,
    /// Prior strength (pseudo-review count) for review smoothing.
    pub prior_m: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weights: ScoringWeights::default(),
            top_k_similar: 3,
            top_n_role: 5,
            prior_m: 5.0,
        }
    }
}

impl ScoringConfig {
    /// Builds a config from `REC_*` variables, keeping defaults for absent keys.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let d = Self::default();
        let role = parse_or("REC_W_ROLE", lookup("REC_W_ROLE"), d.weights.role)?;
        let affinity = parse_or("REC_W_AFFINITY", lookup("REC_W_AFFINITY"), d.weights.affinity)?;
        let readiness = parse_or(
            "REC_W_READINESS",
            lookup("REC_W_READINESS"),
            d.weights.readiness,
        )?;
        let cluster = parse_or("REC_W_CLUSTER", lookup("REC_W_CLUSTER"), d.weights.cluster)?;
        let quality = parse_or("REC_W_QUALITY", lookup("REC_W_QUALITY"), d.weights.quality)?;
        let top_k_similar = parse_or(
            "REC_TOP_K_SIMILAR",
            lookup("REC_TOP_K_SIMILAR"),
            d.top_k_similar,
        )?;
        let top_n_role = parse_or("REC_TOP_N_ROLE", lookup("REC_TOP_N_ROLE"), d.top_n_role)?;
        let prior_m = parse_or("REC_PRIOR_M", lookup("REC_PRIOR_M"), d.prior_m)?;

        Ok(Self {
            weights: ScoringWeights {
                role,
                affinity,
                readiness,
                cluster,
                quality,
            },
            top_k_similar,
            top_n_role,
            prior_m,
        })
    }
}
