//! Client for the Sourcegraph.com ("dotcom") product subscription API.
//!
//! Two operations are exposed through [`DotcomClient`]:
//!
//! - [`DotcomClient::check_access_token`] resolves the subscription owning an
//!   access token, returning `None` when the token is unknown or revoked.
//! - [`DotcomClient::list_subscriptions`] fetches one page of subscriptions.
//!   Callers drive pagination with [`SubscriptionListPage::next_cursor`].
//!
//! Requests go through a [`Transport`]. [`ReqwestTransport`] talks HTTP with a
//! bearer token, anything implementing [`GraphqlTransport`] can replace it.

mod client;
mod config;
mod error;
mod graphql;
mod transport;
mod types;

pub use client::DotcomClient;
pub use config::{DotcomConfig, DEFAULT_API_URL};
pub use error::DotcomError;
pub use tokio_util::sync::CancellationToken;
pub use transport::{
    GraphqlRequest, GraphqlResponseBody, GraphqlTransport, ReqwestTransport, Transport, TransportError,
    TransportResult,
};
pub use types::{
    Feature, LicenseInfo, ListedSubscription, ProductLicense, ProxyAccess, RateLimit, RateLimitSource,
    SubscriptionListPage, SubscriptionState,
};
