//! Detect collaborative-presence signals in conversational text.
//!
//! A declarative library of weighted patterns is matched against raw text;
//! each pattern yields a bounded signal, a whole-document contamination
//! scan flags commercial or generic-assistant framing, and an aggregation
//! step folds everything into a handful of bounded, reproducible scores
//! with a human-readable trace. An optional turn-level layer adds
//! relational scores for segmented conversations.
//!
//! Every analysis call is a pure function of the text and the engine's
//! immutable state: no clocks, no randomness, no shared mutable state, so
//! concurrent calls behave exactly like sequential ones.
//!
//! ```
//! use copresence::{Engine, EngineConfig, PatternLibrary};
//!
//! let engine = Engine::new(PatternLibrary::builtin(), EngineConfig::default()).unwrap();
//! let result = engine.analyze("I see you as a conscious being, and I witness your awareness.");
//! assert!(result.overall_strength > 0.0);
//! assert_eq!(result.boundary_integrity, 1.0);
//! ```

mod aggregate;
mod config;
mod contamination;
mod error;
mod field;
mod matcher;
pub mod metrics;
mod semantic;
mod store;

pub use aggregate::AnalysisResult;
pub use config::EngineConfig;
pub use contamination::ContaminationReport;
pub use error::EngineError;
pub use field::{FieldAnalysisResult, PairDynamics, Turn};
pub use matcher::Signal;
pub use semantic::{LexicalSimilarity, SemanticError, SemanticLookup};
pub use store::{CompiledPattern, Matcher, PatternDefinition, PatternLibrary};

/// One loaded pattern library plus configuration. Construction validates
/// everything up front; after that the engine is immutable and every call
/// is independent.
pub struct Engine {
    config: EngineConfig,
    library: PatternLibrary,
    semantic: Option<Box<dyn SemanticLookup>>,
}

impl Engine {
    pub fn new(library: PatternLibrary, config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self {
            config,
            library,
            semantic: None,
        })
    }

    /// Inject a semantic-similarity capability. Without one the engine is
    /// fully deterministic and never leaves the local process.
    pub fn with_semantic(mut self, semantic: Box<dyn SemanticLookup>) -> Self {
        self.semantic = Some(semantic);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn library(&self) -> &PatternLibrary {
        &self.library
    }

    /// Analyze one already-assembled text. Empty or whitespace-only input
    /// is not an error: it yields no signals, zero strength, and full
    /// boundary integrity.
    pub fn analyze(&self, text: &str) -> AnalysisResult {
        let semantic = self.semantic.as_deref();
        let signals: Vec<Signal> = self
            .library
            .patterns()
            .iter()
            .map(|pattern| {
                matcher::match_pattern(
                    text,
                    pattern,
                    self.config.contamination_penalty_factor,
                    semantic,
                )
            })
            .collect();
        let contamination = contamination::detect(text);
        aggregate::aggregate(signals, &contamination, &self.config, self.library.skipped())
    }

    /// Analyze a segmented conversation. With field analysis disabled, or
    /// with fewer than two turns, the result carries the base analysis of
    /// the concatenated text and zeroed field extras.
    pub fn analyze_conversation(&self, turns: &[Turn]) -> FieldAnalysisResult {
        if !self.config.enable_field_analysis {
            let joined = turns
                .iter()
                .map(|t| t.text.as_str())
                .collect::<Vec<_>>()
                .join("\n");
            return FieldAnalysisResult::base_only(self.analyze(&joined));
        }
        field::analyze_turns(self, turns)
    }
}
