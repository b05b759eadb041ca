//! Canned Keycloak responses for wiremock-backed tests.

use serde_json::{json, Value};

/// Successful password-grant token response.
pub fn token_json() -> Value {
    json!({
        "access_token": "test-admin-token",
        "expires_in": 300,
        "refresh_expires_in": 1800,
        "token_type": "Bearer",
        "scope": "profile email"
    })
}

/// A single user in the admin API wire format.
pub fn user_json(id: &str, username: &str, verified: bool, enabled: bool) -> Value {
    json!({
        "id": id,
        "username": username,
        "firstName": capitalize(username),
        "lastName": "Tester",
        "email": format!("{}@example.com", username),
        "emailVerified": verified,
        "enabled": enabled,
        "totp": false,
        "createdTimestamp": 1700000000000i64,
        "updatedTimestamp": 1700000100000i64,
        "requiredActions": if verified { json!([]) } else { json!(["VERIFY_EMAIL"]) },
        "attributes": {
            "utm_source": ["google"],
            "country": ["DE"]
        }
    })
}

/// A small realistic user set: two verified users, one not.
pub fn users_json() -> Value {
    json!([
        user_json("u1", "jdoe", true, true),
        user_json("u2", "bsmith", true, false),
        user_json("u3", "pending", false, true),
    ])
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
