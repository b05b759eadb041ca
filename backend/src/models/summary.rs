use serde::Serialize;

use crate::models::user::UserRecord;

/// A count with its share of the total, preformatted for display.
#[derive(Debug, Clone, Serialize)]
pub struct CountStat {
    pub count: usize,
    pub percentage: String,
}

impl CountStat {
    fn of(count: usize, total: usize) -> Self {
        let percentage = if total == 0 {
            "0.00%".to_string()
        } else {
            format!("{:.2}%", count as f64 / total as f64 * 100.0)
        };
        Self { count, percentage }
    }
}

/// Dashboard aggregate, recomputed from the full user set on every
/// request. Never persisted.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_users: usize,
    pub verified_emails: CountStat,
    pub unverified_emails: CountStat,
    pub enabled_accounts: CountStat,
    pub totp_enabled: CountStat,
    pub users_needing_verification: usize,
}

impl DashboardSummary {
    pub fn from_users(users: &[UserRecord]) -> Self {
        let total = users.len();
        let verified = users
            .iter()
            .filter(|u| u.email_verified.unwrap_or(false))
            .count();
        let enabled = users.iter().filter(|u| u.enabled.unwrap_or(false)).count();
        let totp = users.iter().filter(|u| u.totp.unwrap_or(false)).count();
        let needing_verification = users
            .iter()
            .filter(|u| u.required_actions.iter().any(|a| a == "VERIFY_EMAIL"))
            .count();

        Self {
            total_users: total,
            verified_emails: CountStat::of(verified, total),
            unverified_emails: CountStat::of(total - verified, total),
            enabled_accounts: CountStat::of(enabled, total),
            totp_enabled: CountStat::of(totp, total),
            users_needing_verification: needing_verification,
        }
    }
}
