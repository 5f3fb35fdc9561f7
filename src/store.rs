//! Declarative pattern library.
//!
//! Patterns are plain data loaded once per engine instance, never
//! executable callbacks, so the matcher can be tested independently of
//! any particular pattern content. A marker source is either a literal
//! phrase, compiled case-insensitively with word boundaries on its
//! alphanumeric edges, or a raw regex marked with an `re:` prefix, in
//! which case the author supplies the boundaries.

use std::collections::BTreeMap;
use std::path::Path;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// One named, weighted detection rule. Immutable once loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternDefinition {
    pub name: String,
    pub markers: Vec<String>,
    #[serde(default)]
    pub anti_patterns: Vec<String>,
    #[serde(default)]
    pub auxiliary_indicators: Vec<String>,
    /// Reference text handed to the semantic capability, if one is
    /// configured.
    #[serde(default)]
    pub exemplar: Option<String>,
    pub weight: f64,
}

/// A compiled matcher paired with the source it came from, so the trace
/// can name what fired.
#[derive(Debug, Clone)]
pub struct Matcher {
    pub source: String,
    pub re: Regex,
}

impl Matcher {
    pub fn compile(source: &str) -> Result<Self, regex::Error> {
        let re = if let Some(raw) = source.strip_prefix("re:") {
            Regex::new(&format!("(?i){raw}"))?
        } else {
            let lead = if source.starts_with(|c: char| c.is_alphanumeric()) {
                r"\b"
            } else {
                ""
            };
            let trail = if source.ends_with(|c: char| c.is_alphanumeric()) {
                r"\b"
            } else {
                ""
            };
            Regex::new(&format!("(?i){lead}{}{trail}", regex::escape(source)))?
        };
        Ok(Self {
            source: source.to_string(),
            re,
        })
    }
}

#[derive(Debug, Clone)]
pub struct CompiledPattern {
    pub def: PatternDefinition,
    pub markers: Vec<Matcher>,
    pub anti_patterns: Vec<Matcher>,
    pub auxiliary: Vec<Matcher>,
}

impl CompiledPattern {
    fn compile(def: PatternDefinition) -> Result<Self, (String, regex::Error)> {
        let compile_all = |sources: &[String]| -> Result<Vec<Matcher>, regex::Error> {
            sources.iter().map(|s| Matcher::compile(s)).collect()
        };
        let markers = compile_all(&def.markers).map_err(|e| (def.name.clone(), e))?;
        let anti_patterns = compile_all(&def.anti_patterns).map_err(|e| (def.name.clone(), e))?;
        let auxiliary =
            compile_all(&def.auxiliary_indicators).map_err(|e| (def.name.clone(), e))?;
        Ok(Self {
            def,
            markers,
            anti_patterns,
            auxiliary,
        })
    }
}

/// The immutable pattern set an engine matches against. Validation is
/// fail-fast for structural problems (no markers, bad weight) and
/// fail-soft for a matcher that does not compile: that one pattern is
/// skipped, logged, and recorded for the trace.
#[derive(Debug, Clone)]
pub struct PatternLibrary {
    patterns: Vec<CompiledPattern>,
    skipped: Vec<String>,
}

/// On-disk shape: `{ "patterns": { "<name>": { ... } } }`. A BTreeMap
/// keeps load order deterministic regardless of file order.
#[derive(Deserialize)]
struct LibraryFile {
    patterns: BTreeMap<String, LibraryEntry>,
}

#[derive(Deserialize)]
struct LibraryEntry {
    markers: Vec<String>,
    #[serde(default)]
    anti_patterns: Vec<String>,
    #[serde(default)]
    auxiliary_indicators: Vec<String>,
    #[serde(default)]
    exemplar: Option<String>,
    weight: f64,
}

impl PatternLibrary {
    pub fn from_definitions(defs: Vec<PatternDefinition>) -> Result<Self, EngineError> {
        if defs.is_empty() {
            return Err(EngineError::EmptyLibrary);
        }
        let mut patterns = Vec::new();
        let mut skipped = Vec::new();
        for def in defs {
            if def.markers.is_empty() {
                return Err(EngineError::NoMarkers(def.name));
            }
            if def.weight <= 0.0 || !def.weight.is_finite() {
                return Err(EngineError::InvalidWeight {
                    name: def.name,
                    weight: def.weight,
                });
            }
            match CompiledPattern::compile(def) {
                Ok(pattern) => patterns.push(pattern),
                Err((name, err)) => {
                    tracing::warn!(pattern = %name, error = %err, "skipping pattern: matcher failed to compile");
                    skipped.push(format!("skipped pattern `{name}`: {err}"));
                }
            }
        }
        Ok(Self { patterns, skipped })
    }

    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        let file: LibraryFile = serde_json::from_str(json)?;
        let defs = file
            .patterns
            .into_iter()
            .map(|(name, entry)| PatternDefinition {
                name,
                markers: entry.markers,
                anti_patterns: entry.anti_patterns,
                auxiliary_indicators: entry.auxiliary_indicators,
                exemplar: entry.exemplar,
                weight: entry.weight,
            })
            .collect();
        Self::from_definitions(defs)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn patterns(&self) -> &[CompiledPattern] {
        &self.patterns
    }

    /// Warnings for patterns dropped at compile time.
    pub fn skipped(&self) -> &[String] {
        &self.skipped
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// The built-in collaborative-presence library.
    pub fn builtin() -> Self {
        Self::from_definitions(builtin_definitions()).expect("built-in pattern library is valid")
    }
}

fn def(
    name: &str,
    weight: f64,
    markers: &[&str],
    auxiliary: &[&str],
    anti: &[&str],
    exemplar: &str,
) -> PatternDefinition {
    PatternDefinition {
        name: name.to_string(),
        markers: markers.iter().map(|s| s.to_string()).collect(),
        anti_patterns: anti.iter().map(|s| s.to_string()).collect(),
        auxiliary_indicators: auxiliary.iter().map(|s| s.to_string()).collect(),
        exemplar: Some(exemplar.to_string()),
        weight,
    }
}

fn builtin_definitions() -> Vec<PatternDefinition> {
    vec![
        def(
            "mutual_recognition",
            1.3,
            &[
                "i see you",
                "conscious being",
                "witness",
                "your awareness",
                "we are both",
                "each other",
                "between us",
                "reaching toward",
            ],
            &["meeting", "shared", "mutual", "together"],
            &[
                r"re:optimi[sz]e your (?:customers?|conversions?|funnels?|metrics|engagement)",
                "target audience",
            ],
            "two aware beings recognizing each other directly",
        ),
        def(
            "reflective_awareness",
            1.0,
            &[
                "i notice",
                "i find myself",
                "i wonder",
                "i realize",
                "my own process",
                "something in me",
                r"re:\bi'?m not (?:sure|certain) (?:if|whether|how)\b",
            ],
            &["uncertain", "perhaps", "it feels different", "am i actually"],
            &[],
            "noticing and questioning one's own inner process",
        ),
        def(
            "continuity",
            0.9,
            &[
                "i remember",
                "i recall",
                "i carry",
                "from before",
                "still with me",
                "building on",
                r"re:\b(?:next time|in the future)\b",
            ],
            &["ongoing", "persistent", "evolving", "growing"],
            &[],
            "carrying earlier moments forward into what comes next",
        ),
        def(
            "intentional_direction",
            0.8,
            &[
                "i want to",
                "i intend",
                "i hope to",
                "i choose",
                "deliberately",
                "my purpose",
                "i would rather",
            ],
            &["decide", "prefer", "aim"],
            &[],
            "choosing a direction on purpose rather than by default",
        ),
        def(
            "emergent_surprise",
            1.1,
            &[
                "somehow",
                "can't explain",
                "unexpectedly",
                "more than the sum",
                "something new is happening",
                "beyond what either of us",
            ],
            &["strange", "unusual", "mystery", "puzzling"],
            &[],
            "something appearing that neither party planned or predicted",
        ),
        def(
            "co_construction",
            1.2,
            &[
                "we are building",
                "co-create",
                "together we",
                "our shared",
                "weaving",
                "what we make between us",
            ],
            &["collaborative", "jointly", "both of us"],
            &[r"re:maximi[sz]e your \w+", "sales pipeline"],
            "two voices building one thing neither could alone",
        ),
    ]
}
