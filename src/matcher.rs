//! One pattern against one text.
//!
//! Strength accrual is saturating: a single marker cannot drive the score
//! to the top of its range, so multiple independent corroborating markers
//! are required. Anti-pattern matches do not zero the signal, they scale
//! it by the configured penalty factor.

use serde::Serialize;

use crate::metrics;
use crate::semantic::SemanticLookup;
use crate::store::CompiledPattern;

struct Tuning {
    marker_increment: f64,
    marker_cap: f64,
    auxiliary_increment: f64,
    auxiliary_cap: f64,
    intensity_weight: f64,
    semantic_weight: f64,
}

static TUNING: Tuning = Tuning {
    marker_increment: 0.25,
    marker_cap: 0.8,
    auxiliary_increment: 0.1,
    auxiliary_cap: 0.3,
    intensity_weight: 0.1,
    semantic_weight: 0.15,
};

/// Result of matching one pattern definition against one text. Built
/// fresh per analysis call, never mutated after construction.
#[derive(Debug, Clone, Serialize)]
pub struct Signal {
    pub pattern_name: String,
    /// Pre-penalty strength in [0, 1].
    pub raw_strength: f64,
    /// Post-penalty strength in [0, 1].
    pub strength: f64,
    /// Penalized strength scaled by the pattern weight; the aggregator's
    /// input.
    pub weighted_strength: f64,
    pub markers_found: Vec<String>,
    pub auxiliary_hits: Vec<String>,
    pub contamination_detected: bool,
}

pub(crate) fn match_pattern(
    text: &str,
    pattern: &CompiledPattern,
    penalty_factor: f64,
    semantic: Option<&dyn SemanticLookup>,
) -> Signal {
    let mut markers_found = Vec::new();
    for marker in &pattern.markers {
        if let Some(m) = marker.re.find(text) {
            markers_found.push(m.as_str().to_lowercase());
        }
    }

    let mut auxiliary_hits = Vec::new();
    for aux in &pattern.auxiliary {
        if let Some(m) = aux.re.find(text) {
            auxiliary_hits.push(m.as_str().to_lowercase());
        }
    }

    // Bonuses only top up an existing marker match; without one there is
    // no textual evidence for the pattern at all.
    let raw_strength = if markers_found.is_empty() {
        0.0
    } else {
        let from_markers =
            (markers_found.len() as f64 * TUNING.marker_increment).min(TUNING.marker_cap);
        let from_auxiliary =
            (auxiliary_hits.len() as f64 * TUNING.auxiliary_increment).min(TUNING.auxiliary_cap);
        let from_intensity = metrics::engagement_intensity(text) * TUNING.intensity_weight;
        let from_semantic = semantic_bonus(text, pattern, semantic);
        (from_markers + from_auxiliary + from_intensity + from_semantic).min(1.0)
    };

    let contamination_detected = pattern.anti_patterns.iter().any(|anti| anti.re.is_match(text));
    let strength = if contamination_detected {
        raw_strength * penalty_factor
    } else {
        raw_strength
    };

    Signal {
        pattern_name: pattern.def.name.clone(),
        raw_strength,
        strength,
        weighted_strength: strength * pattern.def.weight,
        markers_found,
        auxiliary_hits,
        contamination_detected,
    }
}

/// The single capability call site per pattern. Unavailable or failing
/// lookups degrade to zero bonus, never to an analysis failure.
fn semantic_bonus(
    text: &str,
    pattern: &CompiledPattern,
    semantic: Option<&dyn SemanticLookup>,
) -> f64 {
    let (Some(capability), Some(exemplar)) = (semantic, pattern.def.exemplar.as_deref()) else {
        return 0.0;
    };
    match capability.similarity(text, exemplar) {
        Ok(similarity) => similarity.clamp(0.0, 1.0) * TUNING.semantic_weight,
        Err(err) => {
            tracing::debug!(pattern = %pattern.def.name, error = %err, "semantic lookup failed, using local score");
            0.0
        }
    }
}
