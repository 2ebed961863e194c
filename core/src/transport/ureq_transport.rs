//! Blocking HTTP transport backed by `ureq`.

use tracing::{debug, warn};
use url::Url;

use crate::config::TransportConfig;
use crate::error::TransportError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

use super::{build_url, check_status, Query, Transport};

const ACCEPT: &str = "application/json";
const DEFAULT_USER_AGENT: &str = concat!("catalog-core/", env!("CARGO_PKG_VERSION"));

/// Reference [`Transport`] speaking JSON over HTTP.
///
/// Status codes never surface as `ureq` errors; every response is read in
/// full and classified by [`check_status`]. Cloning shares the underlying
/// agent and its connections.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    endpoint: Url,
    agent: ureq::Agent,
    user_agent: String,
}

impl UreqTransport {
    pub fn new(config: &TransportConfig) -> Result<Self, TransportError> {
        let endpoint = config.endpoint()?;
        let timeout = config.timeout()?;
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(timeout))
            .build()
            .new_agent();
        Ok(Self {
            endpoint,
            agent,
            user_agent: config
                .user_agent
                .clone()
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Execute `request` and return whatever the server answered, success
    /// or not.
    pub fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        debug!(
            method = %request.method,
            url = %request.url,
            body_len = request.body.as_ref().map_or(0, Vec::len),
            "sending request"
        );

        let HttpRequest {
            method,
            url,
            headers,
            body,
        } = request;

        let result = match (method, body) {
            (HttpMethod::Get, _) => self.decorate(self.agent.get(&url), &headers).call(),
            (HttpMethod::Delete, _) => self.decorate(self.agent.delete(&url), &headers).call(),
            (HttpMethod::Post, Some(body)) => self.decorate(self.agent.post(&url), &headers).send(&body[..]),
            (HttpMethod::Post, None) => self.decorate(self.agent.post(&url), &headers).send_empty(),
            (HttpMethod::Put, Some(body)) => self.decorate(self.agent.put(&url), &headers).send(&body[..]),
            (HttpMethod::Put, None) => self.decorate(self.agent.put(&url), &headers).send_empty(),
        };
        let mut response = result.map_err(classify)?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();
        let body = response.body_mut().read_to_vec().map_err(classify)?;

        debug!(%method, %url, status, body_len = body.len(), "received response");
        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }

    fn decorate<B>(&self, builder: ureq::RequestBuilder<B>, headers: &[(String, String)]) -> ureq::RequestBuilder<B> {
        headers.iter().fold(
            builder
                .header("accept", ACCEPT)
                .header("user-agent", self.user_agent.as_str()),
            |builder, (name, value)| builder.header(name.as_str(), value.as_str()),
        )
    }

    fn execute(&self, request: HttpRequest) -> Result<Vec<u8>, TransportError> {
        let method = request.method;
        let url = request.url.clone();
        check_status(self.send(request)?).inspect_err(|err| {
            if let Some(status) = err.status() {
                warn!(%method, %url, status, "request rejected");
            }
        })
    }
}

/// Sort a `ureq` failure into the transport taxonomy.
fn classify(err: ureq::Error) -> TransportError {
    match err {
        ureq::Error::Timeout(_) => TransportError::Timeout,
        ureq::Error::BodyExceedsLimit(limit) => TransportError::ResponseTooLarge { limit },
        ureq::Error::BadUri(msg) => TransportError::InvalidConfiguration(msg),
        other => TransportError::Network(Box::new(other)),
    }
}

impl Transport for UreqTransport {
    fn url(&self, resource_path: &str, query: &Query) -> Result<String, TransportError> {
        build_url(&self.endpoint, resource_path, query)
    }

    fn get(&self, url: &str) -> Result<Vec<u8>, TransportError> {
        self.execute(HttpRequest::get(url))
    }

    fn post(&self, url: &str, body: Vec<u8>) -> Result<(), TransportError> {
        self.execute(HttpRequest::post(url, body)).map(drop)
    }

    fn put(&self, url: &str, body: Vec<u8>) -> Result<(), TransportError> {
        self.execute(HttpRequest::put(url, body)).map(drop)
    }

    fn delete(&self, url: &str) -> Result<(), TransportError> {
        self.execute(HttpRequest::delete(url)).map(drop)
    }
}
