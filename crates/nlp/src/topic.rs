//! Rule-assisted topic classification (§4.6): each topic owns an ordered
//! phrase list; a topic's score is the weighted count of distinct matching
//! phrases, and the highest score wins with `TOPIC_SET` order as tie-break.

use once_cell::sync::Lazy;
use preventia_domain::TOPIC_SET;
use regex::Regex;
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct TopicResult {
    pub topic: &'static str,
    pub confidence: f64,
}

/// TOPIC_SET → ordered phrase list. Order within a list doesn't affect
/// scoring (each matching phrase counts once); it documents how the list was
/// built, longest/most-specific phrases first.
static TOPIC_PHRASES: Lazy<HashMap<&'static str, Vec<&'static str>>> = Lazy::new(|| {
    HashMap::from([
        ("treatment", vec!["chemotherapy", "radiation therapy", "targeted therapy", "hormone therapy", "treatment"]),
        ("research", vec!["clinical trial", "clinical trials", "study", "researchers", "research"]),
        ("surgery", vec!["mastectomy", "lumpectomy", "reconstructive surgery", "surgery", "surgical"]),
        ("diagnosis", vec!["biopsy", "diagnosed", "diagnosis", "staging", "tumor marker"]),
        ("genetics", vec!["brca1", "brca2", "genetic mutation", "hereditary", "genetics"]),
        ("prevention", vec!["risk reduction", "preventive", "prevention", "prophylactic"]),
        ("screening", vec!["mammogram", "mammography", "screening", "early detection"]),
        ("lifestyle", vec!["diet", "exercise", "lifestyle", "smoking", "alcohol"]),
        ("policy", vec!["insurance coverage", "healthcare policy", "legislation", "policy", "funding"]),
        ("general", vec![]),
    ])
});

fn phrase_regex(phrase: &str) -> Regex {
    let escaped = regex::escape(phrase);
    Regex::new(&format!(r"(?i)\b{}\b", escaped.replace(' ', r"\s+"))).expect("phrase pattern is always valid")
}

/// Classifies `title + ". " + summary` against the fixed topic set.
pub fn classify(title: &str, summary: &str) -> TopicResult {
    let text = format!("{}. {}", title, summary);

    let mut scores: HashMap<&'static str, f64> = HashMap::new();

    for topic in TOPIC_SET {
        if topic == "general" {
            continue;
        }
        let phrases = TOPIC_PHRASES.get(topic).expect("every non-general topic has a phrase list");
        let mut score = 0.0;
        for phrase in phrases {
            if phrase_regex(phrase).is_match(&text) {
                score += phrase.split_whitespace().count() as f64;
            }
        }
        scores.insert(topic, score);
    }

    let max_score = scores.values().cloned().fold(0.0_f64, f64::max);

    if max_score <= 0.0 {
        return TopicResult { topic: "general", confidence: 0.3 };
    }

    let winner = TOPIC_SET
        .iter()
        .find(|topic| scores.get(*topic).copied().unwrap_or(0.0) == max_score)
        .copied()
        .unwrap_or("general");

    TopicResult { topic: winner, confidence: (max_score / 5.0).min(1.0) }
}

/// Every phrase (from any topic's list) that matched, for keyword
/// extraction to rank alongside detected medical entities.
pub fn matched_phrases(title: &str, summary: &str) -> Vec<&'static str> {
    let text = format!("{}. {}", title, summary);
    TOPIC_PHRASES
        .values()
        .flatten()
        .filter(|phrase| phrase_regex(phrase).is_match(&text))
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mammogram_mention_classifies_as_screening() {
        let result = classify(
            "New mammogram guidelines released",
            "Health officials updated screening recommendations for early detection.",
        );
        assert_eq!(result.topic, "screening");
    }

    #[test]
    fn no_keyword_match_falls_back_to_general_with_low_confidence() {
        let result = classify("Weather report", "Sunny skies expected this weekend.");
        assert_eq!(result.topic, "general");
        assert_eq!(result.confidence, 0.3);
    }

    #[test]
    fn tie_breaks_toward_earlier_topic_set_entry() {
        // "treatment" (index 0) and "surgery" (index 2) both match once;
        // treatment must win the tie by TOPIC_SET priority order.
        let result = classify("Treatment and surgery options", "");
        assert_eq!(result.topic, "treatment");
    }

    #[test]
    fn confidence_caps_at_one() {
        let result = classify(
            "Chemotherapy radiation therapy targeted therapy hormone therapy treatment",
            "",
        );
        assert!(result.confidence <= 1.0);
    }
}
