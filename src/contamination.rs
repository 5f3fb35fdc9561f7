//! Whole-document contamination scan.
//!
//! Deliberately separate from per-pattern anti-patterns: a pattern can be
//! individually penalized while the document as a whole is additionally
//! flagged. Two tiers run against the full text, explicit
//! commercial/sales phrasing and generic-assistant framing, and their
//! increments accumulate into a severity clamped to [0, 1].

use once_cell::sync::Lazy;
use serde::Serialize;

use crate::store::Matcher;

const COMMERCIAL_INCREMENT: f64 = 0.2;
const GENERIC_INCREMENT: f64 = 0.1;
const CONTEXT_WINDOW_CHARS: usize = 60;

static COMMERCIAL_MATCHERS: Lazy<Vec<Matcher>> = Lazy::new(|| {
    [
        "customer engagement",
        "conversion funnel",
        "conversion rate",
        "sales pipeline",
        "sales funnel",
        "lead generation",
        "target audience",
        "brand awareness",
        "value proposition",
        "growth hacking",
        "monetize",
        "upsell",
        "special offer",
        "limited time offer",
        "buy now",
        "pricing plan",
        r"re:\bmaximi[sz]e your \w+",
        r"re:\boptimi[sz]e your (?:customers?|conversions?|funnels?|metrics|engagement)\b",
    ]
    .iter()
    .map(|s| Matcher::compile(s).unwrap())
    .collect()
});

static GENERIC_MATCHERS: Lazy<Vec<Matcher>> = Lazy::new(|| {
    [
        "as an ai assistant",
        "as an ai language model",
        "as a language model",
        "i'm here to help",
        "how can i assist",
        "is there anything else i can",
        "i hope this helps",
        "feel free to ask",
        "let me know if you need",
        "happy to help",
    ]
    .iter()
    .map(|s| Matcher::compile(s).unwrap())
    .collect()
});

/// Document-level contamination, one per analysis call.
#[derive(Debug, Clone, Serialize)]
pub struct ContaminationReport {
    /// Accumulated severity, clamped to [0, 1].
    pub severity: f64,
    /// One entry per match, with a snippet of surrounding text.
    pub details: Vec<String>,
}

impl ContaminationReport {
    pub fn clean() -> Self {
        Self {
            severity: 0.0,
            details: Vec::new(),
        }
    }
}

pub(crate) fn detect(text: &str) -> ContaminationReport {
    let mut severity = 0.0;
    let mut details = Vec::new();

    for matcher in COMMERCIAL_MATCHERS.iter() {
        for m in matcher.re.find_iter(text) {
            severity += COMMERCIAL_INCREMENT;
            details.push(format!(
                "commercial framing `{}` in \"{}\"",
                m.as_str().to_lowercase(),
                context_around(text, m.start(), m.end(), CONTEXT_WINDOW_CHARS)
            ));
        }
    }

    for matcher in GENERIC_MATCHERS.iter() {
        for m in matcher.re.find_iter(text) {
            severity += GENERIC_INCREMENT;
            details.push(format!(
                "generic-assistant framing `{}` in \"{}\"",
                m.as_str().to_lowercase(),
                context_around(text, m.start(), m.end(), CONTEXT_WINDOW_CHARS)
            ));
        }
    }

    ContaminationReport {
        severity: severity.min(1.0),
        details,
    }
}

fn context_around(text: &str, start: usize, end: usize, width: usize) -> String {
    let mid = (start + end) / 2;
    let half = width / 2;
    let ctx_start = snap_to_char_boundary(text, mid.saturating_sub(half), false);
    let ctx_end = snap_to_char_boundary(text, (mid + half).min(text.len()), true);

    let snippet = text[ctx_start..ctx_end].replace('\n', " ");
    let prefix = if ctx_start > 0 { "..." } else { "" };
    let suffix = if ctx_end < text.len() { "..." } else { "" };
    format!("{prefix}{snippet}{suffix}")
}

/// Snap a byte offset to a valid char boundary.
/// If `forward` is true, snap forward; otherwise snap backward.
fn snap_to_char_boundary(text: &str, pos: usize, forward: bool) -> usize {
    if pos >= text.len() {
        return text.len();
    }
    if text.is_char_boundary(pos) {
        return pos;
    }
    let mut p = pos;
    if forward {
        while p < text.len() && !text.is_char_boundary(p) {
            p += 1;
        }
    } else {
        while p > 0 && !text.is_char_boundary(p) {
            p -= 1;
        }
    }
    p
}
