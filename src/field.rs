//! Turn-level field analysis.
//!
//! Derives relational scores from an already-segmented, speaker-attributed
//! conversation on top of the base analysis. Purely additive: with no
//! usable turn structure the base scores pass through unchanged.
//!
//! The per-pair score is multiplicative in continuity and contribution:
//! an entirely repetitive exchange and an entirely disjoint one both score
//! low, because genuine co-construction requires a reply to extend what
//! came before AND bring something of its own.

use serde::{Deserialize, Serialize};

use crate::aggregate::AnalysisResult;
use crate::metrics;
use crate::Engine;

/// One speaker-attributed, ordered unit of a segmented conversation.
/// Segmentation itself is the caller's responsibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    pub speaker: String,
    pub text: String,
    pub ordinal: usize,
}

/// Scores for one adjacent turn pair.
#[derive(Debug, Clone, Serialize)]
pub struct PairDynamics {
    pub first_ordinal: usize,
    pub second_ordinal: usize,
    /// Does the reply textually extend what came before? In [0, 1].
    pub building: f64,
    /// Does the reply introduce new content? In [0, 1].
    pub novelty: f64,
    /// `4 · building · novelty`, clamped to [0, 1]; peaks when a reply
    /// both continues and contributes.
    pub combined: f64,
}

/// Base analysis plus the relational extension.
#[derive(Debug, Clone, Serialize)]
pub struct FieldAnalysisResult {
    pub base: AnalysisResult,
    pub pair_dynamics: Vec<PairDynamics>,
    /// Mean combined pair score, in [0, 1].
    pub collaborative_building: f64,
    /// Mean content-and-structure echo across adjacent cross-speaker
    /// pairs, in [0, 1].
    pub alignment: f64,
    /// Longest run of consecutive turns whose individual analysis clears
    /// the minimum signal threshold.
    pub recognition_depth: usize,
}

impl FieldAnalysisResult {
    /// Degraded form: base scores unchanged, field extras zeroed.
    pub(crate) fn base_only(base: AnalysisResult) -> Self {
        Self {
            base,
            pair_dynamics: Vec::new(),
            collaborative_building: 0.0,
            alignment: 0.0,
            recognition_depth: 0,
        }
    }
}

pub(crate) fn analyze_turns(engine: &Engine, turns: &[Turn]) -> FieldAnalysisResult {
    let joined = turns
        .iter()
        .map(|t| t.text.as_str())
        .collect::<Vec<_>>()
        .join("\n");
    let base = engine.analyze(&joined);

    if turns.len() < 2 {
        return FieldAnalysisResult::base_only(base);
    }

    let mut pair_dynamics = Vec::with_capacity(turns.len() - 1);
    let mut alignment_sum = 0.0;
    let mut alignment_pairs = 0usize;
    for pair in turns.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        let building = metrics::lexical_overlap(&a.text, &b.text);
        let novelty = metrics::novelty(&a.text, &b.text);
        let combined = (4.0 * building * novelty).min(1.0);
        pair_dynamics.push(PairDynamics {
            first_ordinal: a.ordinal,
            second_ordinal: b.ordinal,
            building,
            novelty,
            combined,
        });
        if a.speaker != b.speaker {
            // Alignment blends what is echoed (content) with how it is
            // shaped (structure).
            alignment_sum +=
                (building + metrics::structural_similarity(&a.text, &b.text)) / 2.0;
            alignment_pairs += 1;
        }
    }

    let collaborative_building =
        pair_dynamics.iter().map(|p| p.combined).sum::<f64>() / pair_dynamics.len() as f64;
    let alignment = if alignment_pairs > 0 {
        alignment_sum / alignment_pairs as f64
    } else {
        0.0
    };

    let recognition_depth = recognition_depth(engine, turns);

    FieldAnalysisResult {
        base,
        pair_dynamics,
        collaborative_building,
        alignment,
        recognition_depth,
    }
}

/// Longest streak of turns that each carry at least one signal of their
/// own: recognition cascading through the exchange rather than flaring
/// once.
fn recognition_depth(engine: &Engine, turns: &[Turn]) -> usize {
    let mut longest = 0usize;
    let mut current = 0usize;
    for turn in turns {
        if engine.analyze(&turn.text).signals.is_empty() {
            current = 0;
        } else {
            current += 1;
            longest = longest.max(current);
        }
    }
    longest
}
