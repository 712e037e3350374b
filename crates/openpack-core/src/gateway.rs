//! Document gateway: resolves a domain to its API description.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::{CoreError, CoreResult};
use crate::openapi::OpenApiDocument;

const USER_AGENT_VALUE: &str = concat!("openpack/", env!("CARGO_PKG_VERSION"));

/// Capability-typed collaborator that fetches an API description.
///
/// Absence is not an error: any transport failure, non-success status or
/// unparseable body yields `None`, which callers must treat identically to
/// "package does not exist". One attempt per call, no retries.
#[async_trait]
pub trait DescriptionFetcher: Send + Sync {
    async fn fetch(&self, domain: &str) -> Option<OpenApiDocument>;
}

/// HTTP implementation of [`DescriptionFetcher`].
///
/// The description URL is built by fixed convention:
/// `https://{host}/openapi.json`, where a bare name (no dot) is completed
/// with the default `.com` suffix first.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: reqwest::Client,
    base_override: Option<String>,
}

impl HttpGateway {
    pub fn new(timeout: Duration) -> CoreResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT_VALUE)
            .build()
            .map_err(|e| CoreError::Gateway {
                message: format!("failed to create HTTP client: {e}"),
            })?;
        Ok(Self {
            client,
            base_override: None,
        })
    }

    /// Route every domain to a fixed origin instead of `https://{host}`.
    ///
    /// Used by tests and by deployments that front a single upstream.
    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        self.base_override = Some(base.into().trim_end_matches('/').to_string());
        self
    }

    fn description_url(&self, host: &str) -> String {
        match &self.base_override {
            Some(base) => format!("{base}/openapi.json"),
            None => format!("https://{host}/openapi.json"),
        }
    }
}

/// Complete a bare name with the default top-level suffix; a dotted name is
/// already a hostname.
pub fn normalize_host(domain: &str) -> String {
    if domain.contains('.') {
        domain.to_string()
    } else {
        format!("{domain}.com")
    }
}

#[async_trait]
impl DescriptionFetcher for HttpGateway {
    async fn fetch(&self, domain: &str) -> Option<OpenApiDocument> {
        let host = normalize_host(domain);
        let url = self.description_url(&host);
        debug!(url = %url, "fetching API description");

        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(url = %url, error = %e, "description fetch failed");
                return None;
            }
        };

        let status = response.status();
        if !status.is_success() {
            debug!(url = %url, status = %status, "description fetch returned non-success");
            return None;
        }

        match response.json::<OpenApiDocument>().await {
            Ok(doc) => Some(doc),
            Err(e) => {
                debug!(url = %url, error = %e, "description body is not a usable document");
                None
            }
        }
    }
}
