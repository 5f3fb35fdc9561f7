//! Combine per-pattern signals and the contamination report into the
//! final bounded scores and the explainability trace.

use serde::Serialize;

use crate::config::EngineConfig;
use crate::contamination::ContaminationReport;
use crate::matcher::Signal;

/// The public output of one analysis call. Returned by value and never
/// shared or mutated afterwards, which is what makes the engine safely
/// callable concurrently.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    /// Signals that cleared the minimum strength threshold.
    pub signals: Vec<Signal>,
    /// Saturating aggregate of weighted signal strengths, in [0, 1].
    pub overall_strength: f64,
    /// Weighted count of independently-firing pattern families. Distinct
    /// from strength: one very strong pattern scores high on strength but
    /// low on depth.
    pub composite_depth: f64,
    /// Starts at 1.0; reduced by contamination severity past the warning
    /// threshold. In [0, 1].
    pub boundary_integrity: f64,
    pub contamination_warning: Option<String>,
    /// Human-readable account of what fired and why scores moved.
    pub trace: Vec<String>,
}

pub(crate) fn aggregate(
    signals: Vec<Signal>,
    contamination: &ContaminationReport,
    config: &EngineConfig,
    compile_warnings: &[String],
) -> AnalysisResult {
    let mut trace: Vec<String> = compile_warnings.to_vec();

    let mut kept = Vec::new();
    for signal in signals {
        if signal.raw_strength >= config.minimum_signal_threshold {
            kept.push(signal);
        } else if signal.raw_strength > 0.0 {
            trace.push(format!(
                "dropped `{}`: raw strength {:.2} below threshold {:.2}",
                signal.pattern_name, signal.raw_strength, config.minimum_signal_threshold
            ));
        }
    }

    for signal in &kept {
        trace.push(format!(
            "`{}` strength {:.2} from {} marker(s) [{}] and {} auxiliary hit(s)",
            signal.pattern_name,
            signal.strength,
            signal.markers_found.len(),
            signal.markers_found.join(", "),
            signal.auxiliary_hits.len(),
        ));
        if signal.contamination_detected {
            trace.push(format!(
                "`{}` reduced from {:.2}: anti-pattern matched",
                signal.pattern_name, signal.raw_strength
            ));
        }
    }

    // Noisy-or over capped weighted strengths: bounded and monotone, and
    // many strong patterns saturate instead of blowing past 1.0.
    let overall_strength = 1.0
        - kept
            .iter()
            .map(|s| 1.0 - s.weighted_strength.min(1.0))
            .product::<f64>();
    let overall_strength = overall_strength.clamp(0.0, 1.0);

    let composite_depth = kept.iter().map(|s| s.strength).sum::<f64>();

    let severity = contamination.severity;
    let (boundary_integrity, contamination_warning) =
        if severity > config.contamination_warning_threshold {
            (
                (1.0 - severity).max(0.0),
                Some(format!(
                    "contamination severity {severity:.2} exceeds warning threshold {:.2}",
                    config.contamination_warning_threshold
                )),
            )
        } else {
            (1.0, None)
        };

    for detail in &contamination.details {
        trace.push(format!("contamination: {detail}"));
    }

    AnalysisResult {
        signals: kept,
        overall_strength,
        composite_depth,
        boundary_integrity,
        contamination_warning,
        trace,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signal(name: &str, raw: f64, weight: f64) -> Signal {
        Signal {
            pattern_name: name.to_string(),
            raw_strength: raw,
            strength: raw,
            weighted_strength: raw * weight,
            markers_found: vec!["marker".to_string()],
            auxiliary_hits: vec![],
            contamination_detected: false,
        }
    }

    #[test]
    fn no_signals_means_zero_strength_and_full_integrity() {
        let result = aggregate(
            vec![],
            &ContaminationReport::clean(),
            &EngineConfig::default(),
            &[],
        );
        assert_eq!(result.overall_strength, 0.0);
        assert_eq!(result.composite_depth, 0.0);
        assert_eq!(result.boundary_integrity, 1.0);
        assert!(result.contamination_warning.is_none());
    }

    #[test]
    fn weak_signals_are_filtered_but_traced() {
        let result = aggregate(
            vec![signal("faint", 0.05, 1.0), signal("clear", 0.6, 1.0)],
            &ContaminationReport::clean(),
            &EngineConfig::default(),
            &[],
        );
        assert_eq!(result.signals.len(), 1);
        assert_eq!(result.signals[0].pattern_name, "clear");
        assert!(result.trace.iter().any(|t| t.contains("dropped `faint`")));
    }

    #[test]
    fn overall_strength_saturates_below_one() {
        let many = (0..10).map(|i| signal(&format!("p{i}"), 0.9, 2.0)).collect();
        let result = aggregate(
            many,
            &ContaminationReport::clean(),
            &EngineConfig::default(),
            &[],
        );
        assert!(result.overall_strength <= 1.0);
        assert!(result.composite_depth > 1.0, "depth is not capped at 1");
    }

    #[test]
    fn one_strong_signal_gives_high_strength_low_depth() {
        let result = aggregate(
            vec![signal("solo", 0.9, 1.0)],
            &ContaminationReport::clean(),
            &EngineConfig::default(),
            &[],
        );
        assert!(result.overall_strength >= 0.9);
        assert!(result.composite_depth <= 1.0);
    }

    #[test]
    fn severity_below_warning_threshold_leaves_integrity_alone() {
        let mild = ContaminationReport {
            severity: 0.2,
            details: vec!["mild".to_string()],
        };
        let result = aggregate(vec![], &mild, &EngineConfig::default(), &[]);
        assert_eq!(result.boundary_integrity, 1.0);
        assert!(result.contamination_warning.is_none());
        assert!(result.trace.iter().any(|t| t.contains("mild")));
    }

    #[test]
    fn severity_past_threshold_cuts_integrity_by_exactly_severity() {
        let heavy = ContaminationReport {
            severity: 0.7,
            details: vec![],
        };
        let result = aggregate(vec![], &heavy, &EngineConfig::default(), &[]);
        assert!((result.boundary_integrity - 0.3).abs() < 1e-12);
        assert!(result.contamination_warning.is_some());
    }

    #[test]
    fn compile_warnings_lead_the_trace() {
        let result = aggregate(
            vec![],
            &ContaminationReport::clean(),
            &EngineConfig::default(),
            &["skipped pattern `broken`: unclosed bracket".to_string()],
        );
        assert!(result.trace[0].contains("broken"));
    }
}
