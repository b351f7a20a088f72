mod http;

use std::sync::Arc;

use bytes::Bytes;

pub use self::http::ReqwestTransport;

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// returned if no connection to the API could be established
    #[error("could not connect to the dotcom API: {0}")]
    Connection(String),

    /// returned if the transport gave up waiting for a response
    #[error("the request to the dotcom API timed out")]
    Timeout,

    /// returned if the API answered with a non-success HTTP status
    #[error("the dotcom API responded with status {status}: {body}")]
    Status { status: u16, body: String },

    /// any other failure while sending the request or reading the response
    #[error("could not complete a request: {0}")]
    Request(String),
}

impl TransportError {
    pub fn any(error: impl ToString) -> Self {
        TransportError::Request(error.to_string())
    }
}

pub type TransportResult<T> = Result<T, TransportError>;

pub struct GraphqlRequest<'a> {
    pub operation_name: &'a str,
    /// `{"query": ..., "variables": ..., "operationName": ...}`
    pub json_body: String,
}

#[derive(Clone, Debug)]
pub struct GraphqlResponseBody {
    pub bytes: Bytes,
}

/// Executes a single GraphQL request against the dotcom API.
///
/// Implementations own authentication and timeouts. They must not retry: every
/// call to [`GraphqlTransport::execute`] is one round trip.
#[async_trait::async_trait]
pub trait GraphqlTransport: Send + Sync {
    async fn execute(&self, request: GraphqlRequest<'_>) -> TransportResult<GraphqlResponseBody>;
}

#[derive(Clone)]
pub struct Transport {
    inner: Arc<dyn GraphqlTransport>,
}

impl Transport {
    pub fn new(transport: impl GraphqlTransport + 'static) -> Transport {
        Transport {
            inner: Arc::new(transport),
        }
    }
}

impl std::ops::Deref for Transport {
    type Target = dyn GraphqlTransport;

    fn deref(&self) -> &Self::Target {
        self.inner.as_ref()
    }
}
