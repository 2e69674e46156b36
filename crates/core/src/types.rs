use serde::{Deserialize, Serialize};

/// A `resource:action` capability, the unit the external auth wrapper checks
/// before a request reaches the core (`require_permission(user, "resource:action")`, §6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Permission {
    pub resource: String,
    pub action: String,
}

impl Permission {
    pub fn new(resource: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            action: action.into(),
        }
    }

    pub fn to_string(&self) -> String {
        format!("{}:{}", self.resource, self.action)
    }

    pub fn matches(&self, spec: &str) -> bool {
        self.to_string() == spec
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permission_formats_as_resource_colon_action() {
        let permission = Permission::new("sources", "override_content_type");
        assert_eq!(permission.to_string(), "sources:override_content_type");
        assert!(permission.matches("sources:override_content_type"));
    }
}
