pub mod article;
pub mod source;

pub use article::model::{
    Article, ArticleKeyword, CopyrightStatus, LegalReviewStatus, NewArticle, NlpResult,
    ProcessingStatus, RobotsCompliantState, SentimentLabel, TOPIC_SET,
};
pub use article::repository::{ArticleRepository, InsertOutcome, PostgresArticleRepository};

pub use source::model::{
    ContentTypeColumn, CreateSourceRequest, ScrapingAllowed, Source, SourceStatusColumn,
    SourceType, UpdateSourceRequest,
};
pub use source::repository::{PostgresSourceRepository, SourceRepository};
pub use source::service::{DefaultSourceService, SourceService};
