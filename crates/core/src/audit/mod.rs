pub mod event;
pub mod logger;
pub mod repository;
pub mod traits;

pub use event::{AuditAction, AuditEvent, AuditEventBuilder, EventOutcome, EventSeverity};
pub use logger::{AuditContext, AuditLogger};
pub use repository::DatabaseAuditRepository;
pub use traits::{AuditBackend, AuditFilter, Auditable, BackendHealth, SortOrder};
