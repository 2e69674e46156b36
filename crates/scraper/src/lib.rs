pub mod extractor;
pub mod orchestrator;

pub use extractor::{ArticleRecord, CandidateLink, ExtractionFailure, Extractor, ExtractorRegistry, GenericExtractor};
pub use orchestrator::{retry_transient, RunReport, ScraperOrchestrator};
