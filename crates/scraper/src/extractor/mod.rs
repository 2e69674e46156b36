pub mod generic;
pub mod traits;

pub use generic::GenericExtractor;
pub use traits::{ArticleRecord, CandidateLink, ExtractResult, ExtractionFailure, Extractor};

use std::sync::Arc;

/// Holds every registered `Extractor` and picks the first whose
/// `can_handle` matches a Source's `base_url`, falling back to a bare
/// `GenericExtractor` built from the host (§4.4: "variants: per-domain
/// concrete extractors").
#[derive(Default)]
pub struct ExtractorRegistry {
    extractors: Vec<Arc<dyn Extractor>>,
}

impl ExtractorRegistry {
    pub fn new() -> Self {
        Self { extractors: Vec::new() }
    }

    pub fn register(&mut self, extractor: Arc<dyn Extractor>) {
        self.extractors.push(extractor);
    }

    pub fn resolve(&self, base_url: &str) -> Arc<dyn Extractor> {
        if let Some(extractor) = self.extractors.iter().find(|e| e.can_handle(base_url)) {
            return extractor.clone();
        }

        let domain = url::Url::parse(base_url)
            .ok()
            .and_then(|u| u.host_str().map(|h| h.to_string()))
            .unwrap_or_default();
        Arc::new(GenericExtractor::new(domain))
    }
}
