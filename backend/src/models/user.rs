use std::collections::BTreeMap;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Read-only copy of an identity-provider user record.
///
/// The provider owns the record; the relay holds it only transiently
/// (per request, or briefly in the per-user cache). Field names follow
/// the Keycloak admin API wire format.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_verified: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub totp: Option<bool>,
    /// Creation time in epoch milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_timestamp: Option<i64>,
    /// Last-update time in epoch milliseconds, used for the cache
    /// freshness check.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_timestamp: Option<i64>,
    #[serde(default)]
    pub required_actions: Vec<String>,
    /// Free-form provider attributes (utm_* acquisition fields,
    /// country, referral_id, ...), each holding a list of values.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, Vec<String>>,
}

impl UserRecord {
    /// First value of a named attribute, if present.
    pub fn attribute_first(&self, name: &str) -> Option<&str> {
        self.attributes
            .get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Top-level string field by wire name. Empty values are treated
    /// as absent so attribute lookups can take over.
    pub fn field(&self, name: &str) -> Option<&str> {
        let value = match name {
            "id" => Some(self.id.as_str()),
            "username" => self.username.as_deref(),
            "firstName" => self.first_name.as_deref(),
            "lastName" => self.last_name.as_deref(),
            "email" => self.email.as_deref(),
            _ => None,
        };
        value.filter(|v| !v.is_empty())
    }

    /// Creation time as a UTC datetime.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_timestamp
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
    }
}
