use crate::models::user::UserRecord;

/// Exact-match filters over an in-memory user set.
///
/// Each named filter matches case-insensitively against a top-level
/// string field or, failing that, any value of the attribute with the
/// same name. The `emailVerified` filter takes the display values
/// `Verified` / `Not Verified`. The search term matches username or
/// first name exactly, case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    pub fields: Vec<(String, String)>,
    pub search: Option<String>,
}

impl UserFilter {
    pub fn is_empty(&self) -> bool {
        self.fields.iter().all(|(_, v)| v.is_empty())
            && self.search.as_deref().map_or(true, str::is_empty)
    }

    pub fn matches(&self, user: &UserRecord) -> bool {
        for (key, value) in &self.fields {
            if value.is_empty() {
                continue;
            }
            if key == "emailVerified" {
                let verified = user.email_verified.unwrap_or(false);
                match value.as_str() {
                    "Verified" if !verified => return false,
                    "Not Verified" if verified => return false,
                    _ => {}
                }
            } else if !Self::value_matches(user, key, value) {
                return false;
            }
        }

        if let Some(term) = &self.search {
            if !term.is_empty() {
                let term = term.to_lowercase();
                let username_hit = user
                    .username
                    .as_deref()
                    .is_some_and(|u| u.to_lowercase() == term);
                let first_name_hit = user
                    .first_name
                    .as_deref()
                    .is_some_and(|f| f.to_lowercase() == term);
                if !username_hit && !first_name_hit {
                    return false;
                }
            }
        }

        true
    }

    /// Records passing every filter, in their original order.
    pub fn apply(&self, users: &[UserRecord]) -> Vec<UserRecord> {
        users
            .iter()
            .filter(|user| self.matches(user))
            .cloned()
            .collect()
    }

    fn value_matches(user: &UserRecord, key: &str, wanted: &str) -> bool {
        let wanted = wanted.to_lowercase();
        match user.field(key) {
            Some(value) => value.to_lowercase() == wanted,
            None => user
                .attributes
                .get(key)
                .is_some_and(|values| values.iter().any(|v| v.to_lowercase() == wanted)),
        }
    }
}
