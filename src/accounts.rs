//! Account export and detail lookup for the SentinelOne management API.
//!
//! This module covers the two "Accounts" endpoints the export action uses:
//!
//! - [`export_account_names`] — GET `/web/api/v2.1/export/accounts`, a CSV
//!   snapshot of every account; only the "Account Name" column is consumed.
//! - [`get_account`] — GET `/web/api/v2.1/accounts?name={name}`, a JSON
//!   lookup of account details filtered by exact name.
//!
//! The response type [`Account`] captures the account properties returned by
//! the management API. Fields use `Option` where the API may omit them
//! depending on account state or console version.
//!
//! ## Permissions
//!
//! Both endpoints require an API token with account-level viewer access.

use serde::{Deserialize, Serialize};

use crate::client::S1Client;

/// Header of the export column this action consumes.
const ACCOUNT_NAME_COLUMN: &str = "Account Name";

// ── Response types ─────────────────────────────────────────────────────

/// An account as returned by the management API.
///
/// Field names use camelCase to match the SentinelOne API contract exactly.
/// Optional fields are those the API may omit depending on account state or
/// console version; unknown fields are ignored so new API properties don't
/// break deserialization.
///
/// Reference: <https://usea1-partners.sentinelone.net/api-doc/api-details?category=accounts>
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Unique account identifier assigned by the console.
    #[serde(default)]
    pub id: Option<String>,

    /// Account display name. Assumed unique across the console — the
    /// export column and the `name` query filter both key on it.
    #[serde(default)]
    pub name: Option<String>,

    /// Number of agents in this account currently reporting as active.
    /// The action records 0 when the API omits this field.
    #[serde(default)]
    pub active_agents: Option<u64>,

    /// Total number of agents ever registered to this account.
    #[serde(default)]
    pub total_agents: Option<u64>,

    /// Account lifecycle state (e.g. `"active"`, `"expired"`, `"deleted"`).
    #[serde(default)]
    pub state: Option<String>,

    /// Account type (e.g. `"Trial"`, `"Paid"`).
    #[serde(default)]
    pub account_type: Option<String>,

    /// Number of sites defined under this account.
    #[serde(default)]
    pub number_of_sites: Option<u64>,

    /// ISO 8601 timestamp of account creation.
    #[serde(default)]
    pub created_at: Option<String>,

    /// ISO 8601 timestamp of account expiration, when set.
    #[serde(default)]
    pub expiration: Option<String>,
}

impl Account {
    /// The active-agent count to record for this account: the reported
    /// value, or 0 when the API omitted the field.
    pub fn active_agent_count(&self) -> u64 {
        self.active_agents.unwrap_or(0)
    }
}

/// Collection wrapper returned by the JSON list endpoints.
///
/// The SentinelOne API wraps collections in `{ "data": [...] }` with an
/// optional `pagination` metadata object. This wrapper is generic so it can
/// be reused by other list endpoints (sites, agents) if needed.
#[derive(Debug, Deserialize)]
pub struct DataList<T> {
    /// The array of result items. Empty when the filter matched nothing.
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

// ── Endpoint functions ─────────────────────────────────────────────────

/// Fetches the account export and returns the "Account Name" column values
/// in row order.
///
/// The export body is parsed as CSV with a header row. The reader is
/// flexible: rows shorter than the header (missing the name field entirely)
/// are skipped rather than failing the parse. A present-but-empty field is
/// still extracted — only absence of the column skips a row. When the
/// header itself has no "Account Name" column, no row can have the field
/// and the result is empty.
///
/// Uniqueness of the returned names is assumed but not enforced.
///
/// # Errors
///
/// - `S1Error::Api` — the export endpoint returned a non-success status
///   (e.g. 401 for an invalid token).
/// - `S1Error::Network` — transport-level failure.
/// - `S1Error::Csv` — the body was not parseable as CSV at all.
pub async fn export_account_names(client: &S1Client) -> crate::error::Result<Vec<String>> {
    let body = client.get_text("/web/api/v2.1/export/accounts").await?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(body.as_bytes());

    let name_index = reader
        .headers()?
        .iter()
        .position(|h| h == ACCOUNT_NAME_COLUMN);
    let Some(name_index) = name_index else {
        return Ok(Vec::new());
    };

    let mut names = Vec::new();
    for record in reader.records() {
        let record = record?;
        // Short rows return None here and are skipped.
        if let Some(name) = record.get(name_index) {
            names.push(name.to_string());
        }
    }

    Ok(names)
}

/// Looks up account details by exact name and returns the first match, or
/// `None` when no account carries that name.
///
/// The API returns a `data` array; account names are assumed unique, so
/// when the console does hold several accounts with the same name this
/// silently picks the first one the API listed. Callers treat `None` as
/// "skip this name", not as a failure.
///
/// # Errors
///
/// - `S1Error::Api` — the accounts endpoint returned a non-success status.
///   This aborts the caller's whole run; there is no per-name recovery.
/// - `S1Error::Parse` — the response body was not the expected JSON shape.
/// - `S1Error::Network` — transport-level failure.
pub async fn get_account(client: &S1Client, name: &str) -> crate::error::Result<Option<Account>> {
    let response: DataList<Account> = client
        .get_json("/web/api/v2.1/accounts", &[("name", name)])
        .await?;
    Ok(response.data.into_iter().next())
}
