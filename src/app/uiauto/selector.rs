use std::fmt;

/// Immutable `(package, resource-id)` query descriptor, equivalent to the
/// uiautomator `By.res(pkg, id)` form. Recomputed per query, never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    package: String,
    resource_id: String,
}

impl Selector {
    pub fn res(package: impl Into<String>, resource_id: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            resource_id: resource_id.into(),
        }
    }

    pub fn package(&self) -> &str {
        &self.package
    }

    pub fn resource_id(&self) -> &str {
        &self.resource_id
    }

    /// Fully-qualified form as it appears in a hierarchy dump,
    /// e.g. `com.android.settings:id/list`.
    pub fn qualified_id(&self) -> String {
        format!("{}:id/{}", self.package, self.resource_id)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.qualified_id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_android_qualified_form() {
        let selector = Selector::res("com.android.settings", "list");
        assert_eq!(selector.qualified_id(), "com.android.settings:id/list");
        assert_eq!(selector.to_string(), "com.android.settings:id/list");
    }
}
