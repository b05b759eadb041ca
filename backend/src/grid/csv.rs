use std::collections::BTreeSet;
use std::fmt::Write;

use crate::models::user::UserRecord;

/// Identity columns present in every export.
const IDENTITY_HEADERS: [&str; 8] = [
    "ID",
    "Username",
    "First Name",
    "Last Name",
    "Email",
    "Email Verified",
    "Enabled",
    "Created",
];

/// Serialize a user set to CSV: one header line plus one line per
/// record. Identity columns come first, followed by one column per
/// attribute key seen anywhere in the set (alphabetical), carrying the
/// attribute's first value.
pub fn users_to_csv(users: &[UserRecord]) -> String {
    let attr_columns: BTreeSet<&str> = users
        .iter()
        .flat_map(|u| u.attributes.keys())
        .map(String::as_str)
        .collect();

    let mut csv = String::new();
    let header: Vec<String> = IDENTITY_HEADERS
        .iter()
        .copied()
        .chain(attr_columns.iter().copied())
        .map(escape_field)
        .collect();
    let _ = writeln!(csv, "{}", header.join(","));

    for user in users {
        let created = user
            .created_at()
            .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_default();
        let mut row = vec![
            escape_field(&user.id),
            escape_field(user.username.as_deref().unwrap_or_default()),
            escape_field(user.first_name.as_deref().unwrap_or_default()),
            escape_field(user.last_name.as_deref().unwrap_or_default()),
            escape_field(user.email.as_deref().unwrap_or_default()),
            user.email_verified.unwrap_or(false).to_string(),
            user.enabled.unwrap_or(false).to_string(),
            created,
        ];
        for column in &attr_columns {
            row.push(escape_field(user.attribute_first(column).unwrap_or_default()));
        }
        let _ = writeln!(csv, "{}", row.join(","));
    }

    csv
}

/// Quote a field when it contains a delimiter, quote or newline,
/// doubling embedded quotes.
fn escape_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
