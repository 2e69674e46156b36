//! Keyword extraction (§4.6): the topic phrases that matched, plus detected
//! medical named entities, ranked by normalised occurrence frequency.

use once_cell::sync::Lazy;
use regex::Regex;

const DEFAULT_TOP_N: usize = 15;

/// Medical named entities tracked alongside topic phrases — drug names,
/// gene names, and clinical terms that aren't tied to one topic.
const MEDICAL_ENTITIES: &[&str] = &[
    "tamoxifen",
    "herceptin",
    "trastuzumab",
    "brca1",
    "brca2",
    "her2",
    "estrogen receptor",
    "triple negative",
];

static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Za-z']+").unwrap());

/// `(keyword, relevance_score, keyword_type)` sorted by descending
/// relevance, truncated to `top_n`. `keyword_type` is `"topic"` for phrases
/// sourced from the topic lists, `"entity"` for medical named entities.
pub fn extract(text: &str, matched_topic_phrases: &[&str], top_n: Option<usize>) -> Vec<(String, f64, String)> {
    let top_n = top_n.unwrap_or(DEFAULT_TOP_N);
    let lower = text.to_lowercase();
    let total_words = WORD_RE.find_iter(&lower).count().max(1) as f64;

    let mut candidates: Vec<(String, f64, String)> = Vec::new();

    for phrase in matched_topic_phrases {
        let count = count_occurrences(&lower, phrase);
        if count > 0 {
            let relevance = (count as f64 / total_words).min(1.0);
            candidates.push((phrase.to_string(), relevance, "topic".to_string()));
        }
    }

    for entity in MEDICAL_ENTITIES {
        let count = count_occurrences(&lower, entity);
        if count > 0 {
            let relevance = (count as f64 / total_words).min(1.0);
            candidates.push((entity.to_string(), relevance, "entity".to_string()));
        }
    }

    candidates.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap().then_with(|| a.0.cmp(&b.0)));
    candidates.dedup_by(|a, b| a.0 == b.0);
    candidates.truncate(top_n);
    candidates
}

fn count_occurrences(haystack: &str, phrase: &str) -> usize {
    let pattern = format!(r"(?i)\b{}\b", regex::escape(phrase).replace(' ', r"\s+"));
    Regex::new(&pattern).map(|re| re.find_iter(haystack).count()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_matched_topic_phrases_with_relevance() {
        let text = "Mammogram screening mammogram detects early cancer";
        let result = extract(text, &["mammogram", "screening"], None);
        assert!(result.iter().any(|(k, _, t)| k == "mammogram" && t == "topic"));
    }

    #[test]
    fn detects_medical_entities() {
        let text = "Patients treated with tamoxifen showed improvement in HER2 status";
        let result = extract(text, &[], None);
        assert!(result.iter().any(|(k, _, t)| k == "tamoxifen" && t == "entity"));
        assert!(result.iter().any(|(k, _, t)| k == "her2" && t == "entity"));
    }

    #[test]
    fn truncates_to_top_n() {
        let text = "tamoxifen herceptin trastuzumab brca1 brca2 her2";
        let result = extract(text, &[], Some(2));
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn relevance_scores_stay_within_unit_interval() {
        let text = "cancer cancer cancer cancer cancer";
        let result = extract(text, &["cancer"], None);
        assert!(result.iter().all(|(_, score, _)| *score >= 0.0 && *score <= 1.0));
    }
}
