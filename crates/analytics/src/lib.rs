//! Read-only aggregate queries over completed Articles (§4.8). Every
//! operation here ignores Articles with `processing_status != completed`;
//! nothing in this crate writes to the database.

pub mod dashboard;
pub mod geography;
pub mod search;
pub mod timeline;
pub mod topics;

pub use dashboard::{dashboard_summary, DashboardSummary};
pub use geography::{geographic_distribution, CountryBucket};
pub use search::{articles_search, Pagination, SearchFilters, SearchResultRow, SearchResults};
pub use timeline::{sentiment_timeline, Granularity, TimelineBucket};
pub use topics::{topic_distribution, topic_timeline, TopicBucket, TopicTimelinePoint};
