//! Ties sentiment, topic, and keyword extraction into the single NLP pass
//! §4.6 describes: one deterministic function from title/summary to a
//! complete result, or a typed failure that leaves the Article untouched.

use crate::keywords;
use crate::sentiment::{self, SentimentResult, SentimentThresholds};
use crate::topic::{self, TopicResult};
use preventia_domain::{NlpResult, SentimentLabel as DomainSentimentLabel};

const MIN_CONTENT_LENGTH: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NlpFailure {
    #[error("no summary or title to analyze")]
    EmptyInput,
    #[error("content_too_short")]
    ContentTooShort,
}

#[derive(Debug, Clone)]
pub struct NlpOutcome {
    pub sentiment: SentimentResult,
    pub topic: TopicResult,
    pub keywords: Vec<(String, f64, String)>,
}

pub struct NlpPipeline {
    thresholds: SentimentThresholds,
    keyword_top_n: usize,
}

impl NlpPipeline {
    pub fn new(thresholds: SentimentThresholds, keyword_top_n: usize) -> Self {
        Self { thresholds, keyword_top_n }
    }

    /// Runs the full pass over `title` + `summary` (falling back to
    /// title-only when summary is absent, per §4.6's input contract).
    pub fn analyze(&self, title: &str, summary: Option<&str>) -> Result<NlpOutcome, NlpFailure> {
        let body = summary.unwrap_or("");
        let analyzed_text = if body.is_empty() { title } else { body };

        if title.trim().is_empty() && body.trim().is_empty() {
            return Err(NlpFailure::EmptyInput);
        }
        if analyzed_text.trim().chars().count() < MIN_CONTENT_LENGTH {
            return Err(NlpFailure::ContentTooShort);
        }

        let sentiment = sentiment::score(title, body, self.thresholds);
        let topic = topic::classify(title, body);

        let combined = format!("{}. {}", title, body);
        let matched_phrases: Vec<&str> = crate::topic::matched_phrases(title, body);
        let keywords = keywords::extract(&combined, &matched_phrases, Some(self.keyword_top_n));

        Ok(NlpOutcome { sentiment, topic, keywords })
    }
}

impl From<NlpOutcome> for NlpResult {
    fn from(outcome: NlpOutcome) -> Self {
        let sentiment_label = match outcome.sentiment.label {
            crate::sentiment::SentimentLabel::Positive => DomainSentimentLabel::Positive,
            crate::sentiment::SentimentLabel::Negative => DomainSentimentLabel::Negative,
            crate::sentiment::SentimentLabel::Neutral => DomainSentimentLabel::Neutral,
        };

        NlpResult {
            sentiment_label,
            sentiment_score: outcome.sentiment.compound,
            sentiment_confidence: outcome.sentiment.confidence,
            topic_category: outcome.topic.topic.to_string(),
            topic_confidence: outcome.topic.confidence,
            keywords: outcome.keywords,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pipeline() -> NlpPipeline {
        NlpPipeline::new(SentimentThresholds::default(), 15)
    }

    #[test]
    fn short_content_fails_with_content_too_short() {
        let result = pipeline().analyze("Too short", None);
        assert_eq!(result.unwrap_err(), NlpFailure::ContentTooShort);
    }

    #[test]
    fn empty_title_and_summary_fails_with_empty_input() {
        let result = pipeline().analyze("", Some(""));
        assert_eq!(result.unwrap_err(), NlpFailure::EmptyInput);
    }

    #[test]
    fn full_pass_produces_sentiment_and_topic() {
        let outcome = pipeline()
            .analyze(
                "Breakthrough mammogram screening reduces breast cancer deaths",
                Some("A new study finds early detection through screening improves survival rates significantly."),
            )
            .unwrap();
        assert_eq!(outcome.topic.topic, "screening");
        assert!(outcome.sentiment.compound > 0.0);
    }
}
