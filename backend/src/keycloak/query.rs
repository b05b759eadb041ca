//! Translation of dashboard list queries into Keycloak admin API
//! pagination and filter parameters.

/// Parsed user-list query.
///
/// `page` is 1-based; the upstream API takes an offset (`first`) and a
/// page size (`max`).
#[derive(Debug, Clone)]
pub struct UserQuery {
    pub page: u32,
    pub limit: u32,
    pub search: Option<String>,
    pub email_verified: Option<bool>,
    pub enabled: Option<bool>,
    /// Attribute filters as (upstream attribute name, value) pairs.
    pub attributes: Vec<(String, String)>,
}

impl Default for UserQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 10,
            search: None,
            email_verified: None,
            enabled: None,
            attributes: Vec::new(),
        }
    }
}

impl UserQuery {
    /// Parameters for the user-list call: offset/limit plus every
    /// active filter, one `attribute.<name>` parameter per attribute.
    pub fn list_params(&self) -> Vec<(String, String)> {
        let offset = self.page.saturating_sub(1).saturating_mul(self.limit);
        let mut params = vec![
            ("first".to_string(), offset.to_string()),
            ("max".to_string(), self.limit.to_string()),
        ];

        if let Some(search) = &self.search {
            if !search.is_empty() {
                params.push(("search".to_string(), search.clone()));
            }
        }
        if let Some(verified) = self.email_verified {
            params.push(("emailVerified".to_string(), verified.to_string()));
        }
        if let Some(enabled) = self.enabled {
            params.push(("enabled".to_string(), enabled.to_string()));
        }
        for (name, value) in &self.attributes {
            if !value.is_empty() {
                params.push((format!("attribute.{}", name), value.clone()));
            }
        }

        params
    }

    /// Parameters for the count call. The count endpoint only honors
    /// the search and boolean filters.
    pub fn count_params(&self) -> Vec<(String, String)> {
        let mut params = vec![(
            "search".to_string(),
            self.search.clone().unwrap_or_default(),
        )];
        if let Some(verified) = self.email_verified {
            params.push(("emailVerified".to_string(), verified.to_string()));
        }
        if let Some(enabled) = self.enabled {
            params.push(("enabled".to_string(), enabled.to_string()));
        }
        params
    }
}
