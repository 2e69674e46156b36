//! A generic, selector-configurable `Extractor` (§4.4) used for sources
//! without a bespoke per-domain implementation. Reads headline/article links
//! and article body via CSS selectors supplied at construction.

use super::traits::{ArticleRecord, CandidateLink, ExtractResult, ExtractionFailure, Extractor};
use chrono::Utc;
use scraper::{Html, Selector};
use sha2::{Digest, Sha256};

/// Medical-relevance keyword set (§4.4 content filter). An `ArticleRecord`
/// whose title+body match none of these is discarded as `NonMedical`.
const MEDICAL_KEYWORDS: &[&str] = &[
    "cancer",
    "breast",
    "oncology",
    "tumor",
    "tumour",
    "mammogram",
    "chemotherapy",
    "carcinoma",
    "biopsy",
    "metastasis",
];

pub struct GenericExtractor {
    pub domain: String,
    pub link_selector: String,
    pub title_selector: String,
    pub body_selector: String,
    pub author_selector: Option<String>,
}

impl GenericExtractor {
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            link_selector: "a[href]".to_string(),
            title_selector: "h1".to_string(),
            body_selector: "article, .article-body, .content".to_string(),
            author_selector: None,
        }
    }

    fn parse_selector(selector: &str) -> ExtractResult<Selector> {
        Selector::parse(selector).map_err(|_| ExtractionFailure::SelectorNotFound)
    }
}

impl Extractor for GenericExtractor {
    fn can_handle(&self, base_url: &str) -> bool {
        base_url.contains(&self.domain)
    }

    fn list_articles(&self, listing_html: &str, base_url: &str) -> ExtractResult<Vec<CandidateLink>> {
        let document = Html::parse_document(listing_html);
        let selector = Self::parse_selector(&self.link_selector)?;

        let base = url::Url::parse(base_url).map_err(|_| ExtractionFailure::MalformedHtml(
            "base_url is not a valid URL".to_string(),
        ))?;

        let mut links: Vec<CandidateLink> = document
            .select(&selector)
            .filter_map(|el| el.value().attr("href"))
            .filter_map(|href| base.join(href).ok())
            .map(|resolved| CandidateLink { url: resolved.to_string() })
            .collect();

        links.dedup_by(|a, b| a.url == b.url);

        if links.is_empty() {
            return Err(ExtractionFailure::SelectorNotFound);
        }

        Ok(links)
    }

    fn parse_article(&self, html: &str, url: &str) -> ExtractResult<ArticleRecord> {
        let document = Html::parse_document(html);

        let title_selector = Self::parse_selector(&self.title_selector)?;
        let title = document
            .select(&title_selector)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .filter(|t| t.len() >= 10)
            .ok_or(ExtractionFailure::SelectorNotFound)?;

        let body_selector = Self::parse_selector(&self.body_selector)?;
        let body = document
            .select(&body_selector)
            .next()
            .map(|el| el.text().collect::<Vec<_>>().join(" "))
            .ok_or(ExtractionFailure::SelectorNotFound)?;
        let body = body.split_whitespace().collect::<Vec<_>>().join(" ");

        let haystack = format!("{} {}", title, body).to_lowercase();
        if !MEDICAL_KEYWORDS.iter().any(|kw| haystack.contains(kw)) {
            return Err(ExtractionFailure::NonMedical);
        }

        let author = self.author_selector.as_ref().and_then(|sel| {
            Selector::parse(sel).ok().and_then(|selector| {
                document
                    .select(&selector)
                    .next()
                    .map(|el| el.text().collect::<String>().trim().to_string())
            })
        });

        let summary: String = body.chars().take(2000).collect();
        let word_count = body.split_whitespace().count() as i32;

        let mut hasher = Sha256::new();
        hasher.update(title.as_bytes());
        hasher.update(body.as_bytes());
        let content_hash = format!("{:x}", hasher.finalize());

        Ok(ArticleRecord {
            url: url.to_string(),
            title,
            summary,
            content: Some(body),
            published_at: Some(Utc::now()),
            author,
            language: "en".to_string(),
            content_hash,
            word_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING_HTML: &str = r#"<html><body>
        <a href="/articles/breast-cancer-research">Research</a>
        <a href="/about">About</a>
    </body></html>"#;

    const ARTICLE_HTML: &str = r#"<html><body>
        <h1>New breast cancer treatment shows promise</h1>
        <article>Researchers announced a new chemotherapy protocol for breast cancer patients
        that improves survival rates in early trials across several hospitals.</article>
    </body></html>"#;

    #[test]
    fn lists_links_resolved_against_base() {
        let extractor = GenericExtractor::new("example.com");
        let links = extractor
            .list_articles(LISTING_HTML, "https://example.com")
            .unwrap();
        assert_eq!(links.len(), 2);
        assert!(links[0].url.starts_with("https://example.com"));
    }

    #[test]
    fn parses_article_with_medical_keyword_match() {
        let extractor = GenericExtractor::new("example.com");
        let record = extractor
            .parse_article(ARTICLE_HTML, "https://example.com/a")
            .unwrap();
        assert!(record.title.len() >= 10);
        assert!(record.word_count > 0);
    }

    #[test]
    fn rejects_non_medical_content() {
        let html = r#"<html><body><h1>Local sports team wins championship</h1>
            <article>The home team celebrated a decisive victory last night in front of a
            record crowd at the downtown stadium.</article></body></html>"#;
        let extractor = GenericExtractor::new("example.com");
        let result = extractor.parse_article(html, "https://example.com/a");
        assert!(matches!(result, Err(ExtractionFailure::NonMedical)));
    }
}
