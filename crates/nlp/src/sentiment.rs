//! Lexicon-based sentiment scoring (§4.6): a small valence lexicon, summed
//! and normalised into a compound score in `[-1, 1]`, then bucketed against
//! configurable thresholds.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

/// Thresholds on the compound score that decide the label (§4.6). Exposed as
/// configuration rather than hardcoded so an operator can retune without a
/// rebuild.
#[derive(Debug, Clone, Copy)]
pub struct SentimentThresholds {
    pub positive_at_or_above: f64,
    pub negative_at_or_below: f64,
}

impl Default for SentimentThresholds {
    fn default() -> Self {
        Self { positive_at_or_above: 0.3, negative_at_or_below: -0.3 }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SentimentResult {
    pub label: SentimentLabel,
    pub compound: f64,
    pub confidence: f64,
}

static LEXICON: Lazy<HashMap<&'static str, f64>> = Lazy::new(|| {
    HashMap::from([
        ("promising", 0.6),
        ("breakthrough", 0.8),
        ("effective", 0.5),
        ("hope", 0.5),
        ("hopeful", 0.6),
        ("improve", 0.4),
        ("improved", 0.4),
        ("improvement", 0.4),
        ("successful", 0.6),
        ("success", 0.6),
        ("survival", 0.3),
        ("remission", 0.7),
        ("cure", 0.7),
        ("benefit", 0.4),
        ("positive", 0.3),
        ("advance", 0.4),
        ("innovative", 0.5),
        ("deadly", -0.7),
        ("fatal", -0.8),
        ("aggressive", -0.4),
        ("risk", -0.3),
        ("risks", -0.3),
        ("death", -0.7),
        ("died", -0.7),
        ("decline", -0.4),
        ("worsen", -0.5),
        ("worsened", -0.5),
        ("failure", -0.5),
        ("failed", -0.5),
        ("concern", -0.3),
        ("concerning", -0.4),
        ("struggle", -0.4),
        ("crisis", -0.6),
        ("alarming", -0.6),
        ("delay", -0.3),
        ("delayed", -0.3),
        ("not", -0.2),
        ("no", -0.2),
    ])
});

static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Za-z']+").unwrap());

/// Scores `title + ". " + summary` (§4.6: title first, preserving context).
pub fn score(title: &str, summary: &str, thresholds: SentimentThresholds) -> SentimentResult {
    let text = format!("{}. {}", title, summary).to_lowercase();

    let mut total = 0.0;
    let mut matched = 0usize;

    for word_match in WORD_RE.find_iter(&text) {
        let word = word_match.as_str();
        if let Some(valence) = LEXICON.get(word) {
            total += valence;
            matched += 1;
        }
    }

    // Normalisation keeps the compound bounded in [-1, 1] regardless of how
    // many lexicon words were matched, approximating VADER's sqrt-damped sum.
    let compound = if matched == 0 {
        0.0
    } else {
        (total / (matched as f64).sqrt()).clamp(-1.0, 1.0)
    };

    let label = if compound >= thresholds.positive_at_or_above {
        SentimentLabel::Positive
    } else if compound <= thresholds.negative_at_or_below {
        SentimentLabel::Negative
    } else {
        SentimentLabel::Neutral
    };

    SentimentResult { label, compound, confidence: compound.abs() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn promising_breakthrough_scores_positive() {
        let result = score(
            "Breakthrough treatment shows promising results",
            "Researchers report a successful new therapy with hope for patients.",
            SentimentThresholds::default(),
        );
        assert_eq!(result.label, SentimentLabel::Positive);
        assert!(result.compound > 0.0);
    }

    #[test]
    fn fatal_decline_scores_negative() {
        let result = score(
            "Fatal complications reported",
            "Doctors warn of an alarming decline and rising death risk.",
            SentimentThresholds::default(),
        );
        assert_eq!(result.label, SentimentLabel::Negative);
    }

    #[test]
    fn text_with_no_lexicon_words_is_neutral() {
        let result = score(
            "Quarterly report published",
            "The committee released its annual summary on Tuesday.",
            SentimentThresholds::default(),
        );
        assert_eq!(result.label, SentimentLabel::Neutral);
        assert_eq!(result.compound, 0.0);
    }

    #[test]
    fn confidence_is_absolute_value_of_compound() {
        let result = score(
            "Breakthrough cure announced",
            "",
            SentimentThresholds::default(),
        );
        assert!((result.confidence - result.compound.abs()).abs() < f64::EPSILON);
    }
}
