use cynic::QueryBuilder;
use serde::{de::DeserializeOwned, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::instrument;

use crate::{
    config::DotcomConfig,
    error::DotcomError,
    graphql::queries::{
        check_access_token::{CheckAccessToken, CheckAccessTokenArguments},
        list_product_subscriptions::{ListProductSubscriptions, ListProductSubscriptionsArguments},
    },
    transport::{GraphqlRequest, ReqwestTransport, Transport},
    types::{SubscriptionListPage, SubscriptionState},
};

const CHECK_ACCESS_TOKEN: &str = "CheckAccessToken";
const LIST_PRODUCT_SUBSCRIPTIONS: &str = "ListProductSubscriptions";

/// Client for the dotcom product subscription queries.
///
/// Every call is a single round trip through the [`Transport`]: nothing is
/// cached, retried or paginated on the caller's behalf. The client holds no
/// mutable state and can be cloned and shared freely.
#[derive(Clone)]
pub struct DotcomClient {
    transport: Transport,
    page_size: Option<u32>,
}

impl DotcomClient {
    pub fn new(transport: Transport) -> Self {
        Self {
            transport,
            page_size: None,
        }
    }

    /// Builds a client talking HTTP to the configured endpoint.
    pub fn from_config(config: &DotcomConfig) -> Result<Self, DotcomError> {
        let transport = ReqwestTransport::from_config(config)?;
        Ok(Self::new(Transport::new(transport)).with_page_size(config.page_size))
    }

    /// Number of subscriptions to request per page, `None` leaves it to the API.
    #[must_use]
    pub fn with_page_size(mut self, page_size: Option<u32>) -> Self {
        self.page_size = page_size;
        self
    }

    /// Resolves the product subscription owning `token`.
    ///
    /// Returns `Ok(None)` if the API does not know the token, which covers
    /// unknown and revoked tokens alike.
    #[instrument(skip_all, fields(operation = CHECK_ACCESS_TOKEN))]
    pub async fn check_access_token(
        &self,
        cancel: &CancellationToken,
        token: &str,
    ) -> Result<Option<SubscriptionState>, DotcomError> {
        if token.is_empty() {
            return Err(DotcomError::EmptyAccessToken);
        }

        let operation = CheckAccessToken::build(CheckAccessTokenArguments { token });
        let cynic::GraphQlResponse { data, errors } = self.run(cancel, CHECK_ACCESS_TOKEN, operation).await?;
        let data = into_data(CHECK_ACCESS_TOKEN, data, errors)?;

        let Some(subscription) = data.dotcom.product_subscription_by_access_token else {
            tracing::debug!("access token does not resolve to a subscription");
            return Ok(None);
        };

        let state =
            SubscriptionState::try_from(subscription).map_err(|error| error.into_error(CHECK_ACCESS_TOKEN))?;

        tracing::debug!(subscription = %state.uuid, archived = state.is_archived, "access token resolved");

        Ok(Some(state))
    }

    /// Fetches a single page of product subscriptions.
    ///
    /// Pass `None` for the first page, then the previous page's `end_cursor`
    /// for as long as `has_next_page` is true.
    #[instrument(skip_all, fields(operation = LIST_PRODUCT_SUBSCRIPTIONS, after = cursor))]
    pub async fn list_subscriptions(
        &self,
        cancel: &CancellationToken,
        cursor: Option<&str>,
    ) -> Result<SubscriptionListPage, DotcomError> {
        let first = self
            .page_size
            .map(|size| i32::try_from(size).unwrap_or(i32::MAX));

        let operation = ListProductSubscriptions::build(ListProductSubscriptionsArguments { first, after: cursor });
        let cynic::GraphQlResponse { data, errors } = self.run(cancel, LIST_PRODUCT_SUBSCRIPTIONS, operation).await?;
        let data = into_data(LIST_PRODUCT_SUBSCRIPTIONS, data, errors)?;

        let page = SubscriptionListPage::try_from(data.dotcom.product_subscriptions)
            .map_err(|error| error.into_error(LIST_PRODUCT_SUBSCRIPTIONS))?;

        tracing::debug!(
            nodes = page.nodes.len(),
            total = page.total_count,
            has_next_page = page.has_next_page,
            "product subscriptions page received"
        );

        Ok(page)
    }

    async fn run<ResponseData, Variables>(
        &self,
        cancel: &CancellationToken,
        operation_name: &'static str,
        operation: cynic::Operation<ResponseData, Variables>,
    ) -> Result<cynic::GraphQlResponse<ResponseData>, DotcomError>
    where
        ResponseData: DeserializeOwned,
        Variables: Serialize,
    {
        let json_body = serde_json::to_string(&operation).map_err(|source| DotcomError::Encode {
            operation: operation_name,
            source,
        })?;

        let execution = self.transport.execute(GraphqlRequest {
            operation_name,
            json_body,
        });

        let body = tokio::select! {
            biased;
            () = cancel.cancelled() => {
                tracing::debug!("cancelled before the response arrived");
                return Err(DotcomError::Cancelled { operation: operation_name });
            }
            result = execution => result?,
        };

        serde_json::from_slice(&body.bytes).map_err(|source| DotcomError::Decode {
            operation: operation_name,
            source,
        })
    }
}

/// Any GraphQL error fails the operation, even when partial data came with it.
fn into_data<ResponseData>(
    operation: &'static str,
    data: Option<ResponseData>,
    errors: Option<Vec<cynic::GraphQlError>>,
) -> Result<ResponseData, DotcomError> {
    match (data, errors.filter(|errors| !errors.is_empty())) {
        (_, Some(errors)) => {
            tracing::warn!(count = errors.len(), "dotcom API returned errors");
            Err(DotcomError::Graphql { operation, errors })
        }
        (Some(data), None) => Ok(data),
        (None, None) => Err(DotcomError::InvalidResponse {
            operation,
            reason: "neither data nor errors were returned".to_owned(),
        }),
    }
}
