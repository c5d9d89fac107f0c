//! HTTP adapter for the controller's northbound REST API.

use super::DeviceFamily;
use crate::inventory::DeviceListResponse;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

const TOKEN_PATH: &str = "/dna/system/api/v1/auth/token";
const INTENT_BASE: &str = "/dna/intent/api/v1";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors talking to the controller, mirroring the run's failure modes:
/// unreachable host, rejected credentials, transport fault, bad payload.
#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("Controller {host} is unreachable")]
    Unreachable { host: String },

    #[error("Authentication failed: controller returned {status}")]
    AuthFailed { status: reqwest::StatusCode },

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected controller response: {0}")]
    BadResponse(String),
}

/// Token endpoint payload: `{"Token": "..."}`
#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(rename = "Token")]
    token: String,
}

#[derive(Debug, Clone)]
pub struct ControllerClient {
    base_url: String,
    http: reqwest::Client,
}

impl ControllerClient {
    /// Build a client for `https://host:port`.
    ///
    /// Controllers ship self-signed certificates, so TLS verification is
    /// disabled for this host.
    pub fn new(host: &str, port: u16) -> Result<Self, ControllerError> {
        let http = reqwest::Client::builder()
            .danger_accept_invalid_certs(true)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            base_url: format!("https://{}:{}", host, port),
            http,
        })
    }

    /// Request a fresh authentication token using basic auth.
    ///
    /// A non-2xx status is an authentication failure; no retry.
    pub async fn request_token(
        &self,
        username: &str,
        password: &str,
    ) -> Result<String, ControllerError> {
        let url = format!("{}{}", self.base_url, TOKEN_PATH);
        tracing::debug!("Requesting fresh token from {}", url);

        let resp = self
            .http
            .post(&url)
            .basic_auth(username, Some(password))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ControllerError::AuthFailed { status });
        }

        let body: TokenResponse = resp
            .json()
            .await
            .map_err(|e| ControllerError::BadResponse(format!("token payload: {}", e)))?;
        Ok(body.token)
    }

    /// Fetch the complete device list for one family.
    ///
    /// The controller returns the whole list in a single response; there is
    /// no pagination.
    pub async fn fetch_devices(
        &self,
        token: &str,
        family: DeviceFamily,
    ) -> Result<DeviceListResponse, ControllerError> {
        let url = format!("{}{}/network-device", self.base_url, INTENT_BASE);
        tracing::debug!("Fetching {} inventory from {}", family.label(), url);

        let resp = self
            .http
            .get(&url)
            .query(&[("family", family.filter())])
            .header("X-auth-token", token)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ControllerError::BadResponse(format!(
                "device list returned {}",
                status
            )));
        }

        resp.json::<DeviceListResponse>()
            .await
            .map_err(|e| ControllerError::BadResponse(format!("device list payload: {}", e)))
    }
}
