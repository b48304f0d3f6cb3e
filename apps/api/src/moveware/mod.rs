#![allow(dead_code)]

//! Moveware API client: the single point of entry for all upstream calls.
//!
//! ARCHITECTURAL RULE: no other module may talk to the Moveware API
//! directly. All upstream interactions go through a `MovewareClient`
//! obtained from `Moveware::client`, which binds one company id into every
//! request of a multi-tenant deployment.
//!
//! Each call is a single attempt: no retry, no backoff, no client-side
//! timeout. The hosting runtime's request timeout is the only bound.

use reqwest::{header, Client, Method};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

const HEADER_COMPANY_ID: &str = "mw-company-id";
const HEADER_USERNAME: &str = "mw-username";
const HEADER_PASSWORD: &str = "mw-password";

/// Opaque company identifier. Upstream tenant ids are not guaranteed to be
/// numeric, so the id is carried as a string everywhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyId(String);

impl CompanyId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CompanyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CompanyId {
    fn from(value: &str) -> Self {
        CompanyId(value.trim().to_string())
    }
}

impl From<String> for CompanyId {
    fn from(value: String) -> Self {
        CompanyId::from(value.as_str())
    }
}

/// Connection settings for the Moveware API, fixed at startup.
#[derive(Debug, Clone)]
pub struct MovewareConfig {
    pub base_url: String,
    pub username: String,
    pub password: String,
    /// API version path segment, e.g. `api`.
    pub version: String,
}

#[derive(Debug, Error)]
pub enum MovewareError {
    #[error("Missing required Moveware API configuration: {}", .missing.join(", "))]
    Config { missing: Vec<String> },

    #[error("Moveware API error (status {status}): {message}")]
    Api {
        status: u16,
        message: String,
        code: Option<String>,
        details: Option<Value>,
    },

    /// Transport failure (DNS, refused connection, interrupted body). The
    /// upstream never produced a status; this is the `NETWORK_ERROR` class.
    #[error("Network error calling Moveware API: {0}")]
    Network(#[from] reqwest::Error),
}

/// Error body shape the Moveware API uses for non-2xx responses.
#[derive(Debug, Deserialize)]
struct UpstreamErrorBody {
    message: Option<String>,
    code: Option<String>,
    details: Option<Value>,
}

/// Factory for per-company clients. Holds the process-wide configuration and
/// one shared HTTP connection pool.
#[derive(Clone)]
pub struct Moveware {
    http: Client,
    config: MovewareConfig,
}

impl Moveware {
    pub fn new(config: MovewareConfig) -> Self {
        Self {
            http: Client::new(),
            config,
        }
    }

    /// Binds a company id into a client. Validates that every required piece
    /// of configuration is present before any network call, collecting all
    /// missing names rather than reporting the first.
    pub fn client(&self, company_id: CompanyId) -> Result<MovewareClient, MovewareError> {
        let mut missing = Vec::new();
        if self.config.base_url.is_empty() {
            missing.push("MOVEWARE_API_URL");
        }
        if company_id.as_str().is_empty() {
            missing.push("companyId (from URL parameter)");
        }
        if self.config.username.is_empty() {
            missing.push("MOVEWARE_USERNAME");
        }
        if self.config.password.is_empty() {
            missing.push("MOVEWARE_PASSWORD");
        }
        if !missing.is_empty() {
            return Err(MovewareError::Config {
                missing: missing.into_iter().map(String::from).collect(),
            });
        }

        Ok(MovewareClient {
            http: self.http.clone(),
            config: self.config.clone(),
            company_id,
        })
    }
}

/// An authenticated Moveware API client bound to one company.
#[derive(Clone, Debug)]
pub struct MovewareClient {
    http: Client,
    config: MovewareConfig,
    company_id: CompanyId,
}

impl MovewareClient {
    /// The company id is part of the URL path:
    /// `https://rest.moveware-test.app/65700/api/jobs/...`
    fn endpoint_url(&self, path: &str) -> String {
        format!(
            "{}/{}/{}{}",
            self.config.base_url.trim_end_matches('/'),
            self.company_id,
            self.config.version,
            path
        )
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: Option<&[(&str, &str)]>,
        body: Option<&Value>,
    ) -> Result<T, MovewareError> {
        let url = self.endpoint_url(path);
        debug!("Moveware request: {method} {url}");

        let mut request = self
            .http
            .request(method, &url)
            .header(HEADER_COMPANY_ID, self.company_id.as_str())
            .header(HEADER_USERNAME, &self.config.username)
            .header(HEADER_PASSWORD, &self.config.password)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::ACCEPT, "application/json");
        if let Some(query) = query {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let parsed = serde_json::from_str::<UpstreamErrorBody>(&body).ok();
            let (message, code, details) = match parsed {
                Some(e) => (e.message, e.code, e.details),
                None => (None, None, None),
            };
            return Err(MovewareError::Api {
                status: status.as_u16(),
                message: message.unwrap_or_else(|| "An error occurred".to_string()),
                code,
                details,
            });
        }

        Ok(response.json::<T>().await?)
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Option<&[(&str, &str)]>,
    ) -> Result<T, MovewareError> {
        self.request(Method::GET, path, query, None).await
    }

    pub async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &Value,
    ) -> Result<T, MovewareError> {
        self.request(Method::POST, path, None, Some(body)).await
    }

    pub async fn put<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &Value,
    ) -> Result<T, MovewareError> {
        self.request(Method::PUT, path, None, Some(body)).await
    }

    pub async fn patch<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &Value,
    ) -> Result<T, MovewareError> {
        self.request(Method::PATCH, path, None, Some(body)).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, MovewareError> {
        self.request(Method::DELETE, path, None, None).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> MovewareConfig {
        MovewareConfig {
            base_url: "https://rest.moveware-test.app".to_string(),
            username: "portal".to_string(),
            password: "secret".to_string(),
            version: "api".to_string(),
        }
    }

    #[test]
    fn test_endpoint_url_includes_company_and_version() {
        let client = Moveware::new(config())
            .client(CompanyId::from("65700"))
            .unwrap();
        assert_eq!(
            client.endpoint_url("/jobs/111505"),
            "https://rest.moveware-test.app/65700/api/jobs/111505"
        );
    }

    #[test]
    fn test_endpoint_url_trims_trailing_slash() {
        let mut cfg = config();
        cfg.base_url = "https://rest.moveware-test.app/".to_string();
        let client = Moveware::new(cfg).client(CompanyId::from("65700")).unwrap();
        assert_eq!(
            client.endpoint_url("/jobs/1"),
            "https://rest.moveware-test.app/65700/api/jobs/1"
        );
    }

    #[test]
    fn test_client_collects_all_missing_configuration() {
        let moveware = Moveware::new(MovewareConfig {
            base_url: String::new(),
            username: String::new(),
            password: "secret".to_string(),
            version: "api".to_string(),
        });
        let err = moveware.client(CompanyId::from("")).unwrap_err();
        match err {
            MovewareError::Config { missing } => {
                assert_eq!(
                    missing,
                    vec![
                        "MOVEWARE_API_URL",
                        "companyId (from URL parameter)",
                        "MOVEWARE_USERNAME",
                    ]
                );
            }
            other => panic!("expected Config error, got {other:?}"),
        }
    }

    #[test]
    fn test_client_ok_with_full_configuration() {
        assert!(Moveware::new(config())
            .client(CompanyId::from("65700"))
            .is_ok());
    }

    #[test]
    fn test_company_id_trims_whitespace() {
        assert_eq!(CompanyId::from("  65700 ").as_str(), "65700");
    }
}
