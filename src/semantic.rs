//! Optional semantic-similarity capability.
//!
//! Injected at engine construction. The default is no capability at all,
//! which keeps the engine fully deterministic and network-independent; a
//! failing implementation degrades to the local score, never to an
//! analysis failure.

use thiserror::Error;

use crate::metrics;

#[derive(Debug, Error)]
#[error("semantic lookup failed: {0}")]
pub struct SemanticError(pub String);

/// A single method returning a similarity in [0, 1] for two texts. The
/// engine calls it at exactly one point per pattern, for patterns that
/// carry an exemplar.
pub trait SemanticLookup: Send + Sync {
    fn similarity(&self, a: &str, b: &str) -> Result<f64, SemanticError>;
}

/// Local implementation built on lexical overlap. Useful when a caller
/// wants the exemplar bonus without any external dependency.
pub struct LexicalSimilarity;

impl SemanticLookup for LexicalSimilarity {
    fn similarity(&self, a: &str, b: &str) -> Result<f64, SemanticError> {
        Ok(metrics::lexical_overlap(a, b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lexical_similarity_never_errors() {
        let cap = LexicalSimilarity;
        let sim = cap.similarity("shared words here", "shared words there").unwrap();
        assert!((0.0..=1.0).contains(&sim));
    }
}
