pub mod keywords;
pub mod pipeline;
pub mod processor;
pub mod sentiment;
pub mod topic;

pub use pipeline::{NlpFailure, NlpOutcome, NlpPipeline};
pub use processor::{NlpProcessor, ProcessorReport};
pub use sentiment::{SentimentLabel, SentimentResult, SentimentThresholds};
pub use topic::TopicResult;
