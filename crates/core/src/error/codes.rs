use serde::{Deserialize, Serialize};
use std::fmt;

/// Standardized error codes. Business-agnostic technical categories, plus the
/// compliance/extraction/NLP families this domain adds to the general-system set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // General System Errors (1000-1999)
    InternalServerError = 1000,
    ConfigurationError = 1001,
    ServiceUnavailable = 1002,
    Timeout = 1003,
    ResourceExhausted = 1004,

    // Database Errors (2000-2999)
    DatabaseConnectionError = 2000,
    DatabaseConstraintViolation = 2001,
    DatabaseTransactionError = 2002,
    DatabaseQueryError = 2003,
    DatabaseMigrationError = 2004,

    // Network & Communication Errors (3000-3999)
    NetworkError = 3000,
    NetworkTimeout = 3001,
    NetworkConnectionRefused = 3002,
    ExternalServiceError = 3003,
    SerializationError = 3004,

    // Authorization Errors (4000-4999) — authentication itself lives in the
    // external wrapper (§6); the core only needs to reject a missing capability.
    AuthorizationFailed = 4005,
    PermissionDenied = 4006,
    SecurityPolicyViolation = 4007,

    // Input Validation Errors (5000-5999)
    ValidationFailed = 5000,
    InvalidInput = 5001,
    MissingRequiredField = 5002,
    InvalidFormat = 5003,
    ValueOutOfRange = 5004,
    DuplicateValue = 5005,

    // Resource Management Errors (6000-6999)
    ResourceNotFound = 6000,
    ResourceAlreadyExists = 6001,
    ResourceLocked = 6002,
    ResourceInUse = 6003,
    ResourceQuotaExceeded = 6004,
    NotFound = 6005,
    NotImplemented = 6006,

    // Rate Limiting & Throttling Errors (7000-7999)
    RateLimitExceeded = 7000,
    TooManyRequests = 7001,
    ConcurrencyLimitExceeded = 7002,

    // Cache & Storage Errors (8000-8999)
    CacheError = 8000,
    CacheMiss = 8001,
    StorageError = 8002,

    // Compliance Errors (10000-10999) — §7 ComplianceFail family
    RobotsDisallowed = 10000,
    RobotsUnavailable = 10001,
    SourceInactive = 10002,
    BlockedHost = 10003,
    LegalNoticeActive = 10004,

    // Extraction Errors (11000-11999) — §7 ExtractionFail family
    SelectorNotFound = 11000,
    JavascriptRequired = 11001,
    NonMedicalContent = 11002,
    MalformedHtml = 11003,

    // NLP Errors (12000-12999) — §7 NLPProcessingFail family
    ContentTooShort = 12000,
    NlpEncodingError = 12001,
}

impl ErrorCode {
    /// Get HTTP status code for this error
    pub fn http_status(&self) -> u16 {
        match self {
            ErrorCode::InternalServerError
            | ErrorCode::ConfigurationError
            | ErrorCode::DatabaseConnectionError
            | ErrorCode::DatabaseTransactionError
            | ErrorCode::DatabaseQueryError
            | ErrorCode::DatabaseMigrationError
            | ErrorCode::NetworkError
            | ErrorCode::ExternalServiceError
            | ErrorCode::SerializationError
            | ErrorCode::CacheError
            | ErrorCode::StorageError => 500,

            ErrorCode::ServiceUnavailable | ErrorCode::NetworkConnectionRefused => 503,

            ErrorCode::Timeout | ErrorCode::NetworkTimeout => 408,

            ErrorCode::AuthorizationFailed
            | ErrorCode::PermissionDenied
            | ErrorCode::SecurityPolicyViolation => 403,

            ErrorCode::ValidationFailed
            | ErrorCode::InvalidInput
            | ErrorCode::MissingRequiredField
            | ErrorCode::InvalidFormat
            | ErrorCode::ValueOutOfRange
            | ErrorCode::ContentTooShort
            | ErrorCode::NlpEncodingError => 400,

            ErrorCode::ResourceNotFound | ErrorCode::CacheMiss | ErrorCode::NotFound => 404,

            ErrorCode::ResourceAlreadyExists
            | ErrorCode::DuplicateValue
            | ErrorCode::DatabaseConstraintViolation => 409,

            ErrorCode::ResourceLocked => 423,

            ErrorCode::RateLimitExceeded
            | ErrorCode::TooManyRequests
            | ErrorCode::ConcurrencyLimitExceeded => 429,

            ErrorCode::ResourceExhausted | ErrorCode::ResourceQuotaExceeded => 507,

            ErrorCode::ResourceInUse => 422,

            ErrorCode::NotImplemented => 501,

            ErrorCode::RobotsDisallowed
            | ErrorCode::RobotsUnavailable
            | ErrorCode::SourceInactive
            | ErrorCode::BlockedHost
            | ErrorCode::LegalNoticeActive => 403,

            ErrorCode::SelectorNotFound
            | ErrorCode::JavascriptRequired
            | ErrorCode::NonMedicalContent
            | ErrorCode::MalformedHtml => 422,
        }
    }

    /// Get error category for metrics and logging
    pub fn category(&self) -> &'static str {
        match self {
            ErrorCode::InternalServerError
            | ErrorCode::ConfigurationError
            | ErrorCode::ServiceUnavailable
            | ErrorCode::Timeout
            | ErrorCode::ResourceExhausted => "system",

            ErrorCode::DatabaseConnectionError
            | ErrorCode::DatabaseConstraintViolation
            | ErrorCode::DatabaseTransactionError
            | ErrorCode::DatabaseQueryError
            | ErrorCode::DatabaseMigrationError => "database",

            ErrorCode::NetworkError
            | ErrorCode::NetworkTimeout
            | ErrorCode::NetworkConnectionRefused
            | ErrorCode::ExternalServiceError
            | ErrorCode::SerializationError => "network",

            ErrorCode::AuthorizationFailed
            | ErrorCode::PermissionDenied
            | ErrorCode::SecurityPolicyViolation => "security",

            ErrorCode::ValidationFailed
            | ErrorCode::InvalidInput
            | ErrorCode::MissingRequiredField
            | ErrorCode::InvalidFormat
            | ErrorCode::ValueOutOfRange
            | ErrorCode::DuplicateValue => "validation",

            ErrorCode::ResourceNotFound
            | ErrorCode::ResourceAlreadyExists
            | ErrorCode::ResourceLocked
            | ErrorCode::ResourceInUse
            | ErrorCode::ResourceQuotaExceeded
            | ErrorCode::NotFound => "resource",

            ErrorCode::RateLimitExceeded
            | ErrorCode::TooManyRequests
            | ErrorCode::ConcurrencyLimitExceeded => "rate_limit",

            ErrorCode::CacheError | ErrorCode::CacheMiss | ErrorCode::StorageError => "storage",

            ErrorCode::NotImplemented => "system",

            ErrorCode::RobotsDisallowed
            | ErrorCode::RobotsUnavailable
            | ErrorCode::SourceInactive
            | ErrorCode::BlockedHost
            | ErrorCode::LegalNoticeActive => "compliance",

            ErrorCode::SelectorNotFound
            | ErrorCode::JavascriptRequired
            | ErrorCode::NonMedicalContent
            | ErrorCode::MalformedHtml => "extraction",

            ErrorCode::ContentTooShort | ErrorCode::NlpEncodingError => "nlp",
        }
    }

    /// Check if error should be retried
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ErrorCode::NetworkTimeout
                | ErrorCode::NetworkConnectionRefused
                | ErrorCode::ServiceUnavailable
                | ErrorCode::DatabaseConnectionError
                | ErrorCode::CacheError
                | ErrorCode::ResourceExhausted
                | ErrorCode::RobotsUnavailable
        )
    }

    /// Check if error should be logged at error level
    pub fn should_log_as_error(&self) -> bool {
        !matches!(
            self,
            ErrorCode::ValidationFailed
                | ErrorCode::InvalidInput
                | ErrorCode::MissingRequiredField
                | ErrorCode::InvalidFormat
                | ErrorCode::ValueOutOfRange
                | ErrorCode::ResourceNotFound
                | ErrorCode::PermissionDenied
                | ErrorCode::RateLimitExceeded
                | ErrorCode::TooManyRequests
                | ErrorCode::RobotsDisallowed
                | ErrorCode::SourceInactive
                | ErrorCode::NonMedicalContent
        )
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}
