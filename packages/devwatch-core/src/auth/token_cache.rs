//! Single-entry token cache with a 30-minute expiry.
//!
//! The cache file holds one record (`name,value,date` header, one `token`
//! row) and is overwritten whole on every refresh, never touched on a hit.

use crate::auth::Credential;
use crate::controller::{ControllerClient, ControllerError};
use crate::{probe, table};
use anyhow::{Context, Result, anyhow};
use chrono::{NaiveDateTime, Timelike, Utc};
use std::path::Path;

/// Tokens older than this (minute resolution) are regenerated.
pub const TOKEN_TTL_MINUTES: i64 = 30;

/// Stored timestamp format, minute resolution
const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M";

/// The single cached token with its issue time.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedToken {
    pub value: String,
    pub issued_at: NaiveDateTime,
}

impl CachedToken {
    /// Valid while `now - issued_at <= 30 minutes`, compared at minute
    /// resolution (matching the stored format).
    pub fn is_fresh(&self, now: NaiveDateTime) -> bool {
        let age = to_minute(now) - to_minute(self.issued_at);
        age.num_minutes() <= TOKEN_TTL_MINUTES
    }
}

fn to_minute(dt: NaiveDateTime) -> NaiveDateTime {
    dt.with_second(0)
        .and_then(|d| d.with_nanosecond(0))
        .unwrap_or(dt)
}

/// Read the cached token, if the cache file exists.
///
/// A present but malformed cache file is an error rather than a silent miss.
pub fn load(path: &Path) -> Result<Option<CachedToken>> {
    if !path.exists() {
        return Ok(None);
    }

    let records = table::read_records(path)
        .with_context(|| format!("Failed to parse token cache {:?}", path))?;
    let record = records
        .into_iter()
        .find(|r| r.get("name").map(String::as_str) == Some("token"))
        .ok_or_else(|| anyhow!("Token cache {:?} has no 'token' entry", path))?;

    let value = record
        .get("value")
        .cloned()
        .ok_or_else(|| anyhow!("Token cache {:?} is missing the 'value' column", path))?;
    let date = record
        .get("date")
        .ok_or_else(|| anyhow!("Token cache {:?} is missing the 'date' column", path))?;
    let issued_at = NaiveDateTime::parse_from_str(date, TIMESTAMP_FORMAT)
        .with_context(|| format!("Invalid token timestamp '{}' in {:?}", date, path))?;

    Ok(Some(CachedToken { value, issued_at }))
}

/// Overwrite the cache file with a fresh token and its issue time.
pub fn save(path: &Path, token: &CachedToken) -> Result<()> {
    let rows = vec![
        vec!["name".to_string(), "value".to_string(), "date".to_string()],
        vec![
            "token".to_string(),
            token.value.clone(),
            token.issued_at.format(TIMESTAMP_FORMAT).to_string(),
        ],
    ];
    table::write_rows(&rows, path)
        .with_context(|| format!("Failed to write token cache {:?}", path))
}

/// Return a token valid for use against the controller.
///
/// Reuses the cached token while it is fresh; otherwise probes the
/// controller's reachability, requests a fresh token, and persists it.
/// Authentication failure is fatal, with no retry.
pub async fn get_valid_token(
    client: &ControllerClient,
    cred: &Credential,
    cache_path: &Path,
) -> Result<String> {
    if let Some(cached) = load(cache_path)? {
        if cached.is_fresh(Utc::now().naive_utc()) {
            tracing::debug!("Reusing cached token from {:?}", cache_path);
            return Ok(cached.value);
        }
        tracing::info!("Cached token expired, requesting a fresh one");
    } else {
        tracing::info!("No token cache found, requesting a fresh token");
    }

    if !probe::host_is_reachable(&cred.host).await {
        return Err(ControllerError::Unreachable {
            host: cred.host.clone(),
        }
        .into());
    }

    let value = client
        .request_token(&cred.username, &cred.password)
        .await
        .context("Token request failed")?;

    let token = CachedToken {
        value,
        issued_at: Utc::now().naive_utc(),
    };
    save(cache_path, &token)?;
    tracing::info!("Fresh token cached at {:?}", cache_path);
    Ok(token.value)
}
