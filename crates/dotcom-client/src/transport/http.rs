use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use secrecy::ExposeSecret;
use url::Url;

use super::{GraphqlRequest, GraphqlResponseBody, GraphqlTransport, TransportError, TransportResult};
use crate::{config::DotcomConfig, error::DotcomError};

/// Posts GraphQL requests over HTTP with a bearer token attached.
pub struct ReqwestTransport {
    client: reqwest::Client,
    url: Url,
}

impl ReqwestTransport {
    /// Wraps an already configured HTTP client. Authentication headers are
    /// expected to be set on `client`.
    pub fn new(client: reqwest::Client, url: Url) -> Self {
        Self { client, url }
    }

    pub fn from_config(config: &DotcomConfig) -> Result<Self, DotcomError> {
        let mut headers = HeaderMap::new();

        if let Some(access_token) = &config.access_token {
            let mut bearer_token = HeaderValue::from_str(&format!("Bearer {}", access_token.expose_secret()))
                .map_err(|_| DotcomError::Configuration("the access token is not a valid header value".to_owned()))?;
            bearer_token.set_sensitive(true);
            headers.insert(AUTHORIZATION, bearer_token);
        }

        let mut builder = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(config.user_agent());

        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|err| DotcomError::Configuration(format!("could not build the HTTP client: {err}")))?;

        Ok(Self::new(client, config.url.clone()))
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_connect() {
            TransportError::Connection(error.to_string())
        } else if error.is_timeout() {
            TransportError::Timeout
        } else {
            TransportError::any(error)
        }
    }
}

fn error_body(text: Result<String, impl std::fmt::Display>) -> String {
    match text {
        Ok(body) => body,
        Err(error) => {
            tracing::debug!(%error, "could not read the error response body");
            format!("<unreadable body: {error}>")
        }
    }
}

#[async_trait::async_trait]
impl GraphqlTransport for ReqwestTransport {
    async fn execute(&self, request: GraphqlRequest<'_>) -> TransportResult<GraphqlResponseBody> {
        tracing::trace!(operation = request.operation_name, url = %self.url, "sending dotcom request");

        let response = self
            .client
            .post(self.url.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(request.json_body)
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let body = error_body(response.text().await);

            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;

        Ok(GraphqlResponseBody { bytes })
    }
}
