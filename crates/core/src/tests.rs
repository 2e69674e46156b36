#[cfg(test)]
mod tests {
    use crate::error::{Error, ErrorCode, ErrorMetrics};
    use crate::Permission;

    #[test]
    fn test_email_validation() {
        use crate::utils::validate_email;

        assert!(validate_email("user@example.com"));
        assert!(validate_email("test.email+tag@domain.co.uk"));

        assert!(!validate_email("invalid-email"));
        assert!(!validate_email("@domain.com"));
        assert!(!validate_email("user@"));
    }

    #[test]
    fn test_permission_creation() {
        let permission = Permission::new("sources", "create");
        assert_eq!(permission.resource, "sources");
        assert_eq!(permission.action, "create");
        assert_eq!(permission.to_string(), "sources:create");
    }

    #[test]
    fn test_error_category_matches_code_family() {
        let err = Error::new(ErrorCode::RobotsDisallowed, "blocked by robots.txt");
        assert_eq!(err.category(), crate::error::ErrorCategory::Compliance);
        assert_eq!(err.http_status(), 403);
    }

    #[tokio::test]
    async fn test_error_metrics_records_compliance_category() {
        let metrics = ErrorMetrics::new();
        let err = Error::new(ErrorCode::NonMedicalContent, "off-topic article");
        metrics.record_error(&err).await;

        let count = metrics.get_error_count(crate::error::ErrorCategory::Extraction).await;
        assert_eq!(count, 1);
    }
}
