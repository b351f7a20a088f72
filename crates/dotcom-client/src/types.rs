//! Read models decoded from dotcom responses.
//!
//! These are plain values built fresh from every response. Converting from the
//! wire fragments checks the invariants the API promises but the schema cannot
//! express, e.g. that a page announcing more results also carries a cursor.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{
    error::InvalidShape,
    graphql::queries::{
        fragments::{
            ActiveLicense, ListProductSubscriptionFields, LlmProxyAccessFields, LlmProxyRateLimitSource,
            ProductSubscriptionState, RateLimitFields,
        },
        list_product_subscriptions::ProductSubscriptionConnection,
    },
};

/// A product subscription as seen by the LLM proxy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionState {
    /// GraphQL node ID, never empty.
    pub id: String,
    /// Stable identifier, unlike `id` it does not encode the type.
    pub uuid: String,
    pub is_archived: bool,
    #[serde(rename = "llmProxyAccess")]
    pub proxy_access: ProxyAccess,
    /// Only present while a license is active.
    pub active_license: Option<ProductLicense>,
}

impl SubscriptionState {
    /// Tags of the active license, empty if there is none.
    pub fn tags(&self) -> &[String] {
        self.active_license.as_ref().map(ProductLicense::tags).unwrap_or_default()
    }

    /// Whether requests for this subscription may be served at all.
    pub fn is_usable(&self) -> bool {
        !self.is_archived && self.proxy_access.enabled
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductLicense {
    pub info: Option<LicenseInfo>,
}

impl ProductLicense {
    pub fn tags(&self) -> &[String] {
        self.info.as_ref().map(|info| info.tags.as_slice()).unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LicenseInfo {
    /// Plan and feature tags, in the order returned by the API.
    pub tags: Vec<String>,
}

/// Entitlements for the downstream LLM proxy.
///
/// A missing rate limit means the capability is unrestricted or not configured,
/// it does not deny access. Access is governed by `enabled` alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyAccess {
    pub enabled: bool,
    pub chat_completions_rate_limit: Option<RateLimit>,
    pub code_completions_rate_limit: Option<RateLimit>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    ChatCompletions,
    CodeCompletions,
}

impl ProxyAccess {
    pub fn rate_limit(&self, feature: Feature) -> Option<&RateLimit> {
        match feature {
            Feature::ChatCompletions => self.chat_completions_rate_limit.as_ref(),
            Feature::CodeCompletions => self.code_completions_rate_limit.as_ref(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLimit {
    /// Models this bucket applies to, never empty.
    pub allowed_models: Vec<String>,
    pub source: RateLimitSource,
    /// Requests allowed per interval.
    pub limit: u32,
    /// Always greater than zero.
    pub interval_seconds: u32,
}

impl RateLimit {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(u64::from(self.interval_seconds))
    }

    pub fn allows_model(&self, model: &str) -> bool {
        self.allowed_models.iter().any(|allowed| allowed == model)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RateLimitSource {
    /// Set manually on the subscription.
    Override,
    /// Inherited from the subscription's plan.
    Plan,
}

/// One page of `ListProductSubscriptions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionListPage {
    /// Count across all pages.
    pub total_count: u32,
    pub nodes: Vec<ListedSubscription>,
    pub end_cursor: Option<String>,
    pub has_next_page: bool,
}

impl SubscriptionListPage {
    /// The cursor to pass to the next call, if there is a next page.
    pub fn next_cursor(&self) -> Option<&str> {
        self.has_next_page.then_some(self.end_cursor.as_deref()).flatten()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListedSubscription {
    #[serde(flatten)]
    pub state: SubscriptionState,
    pub sourcegraph_access_tokens: Vec<String>,
}

impl TryFrom<ProductSubscriptionState> for SubscriptionState {
    type Error = InvalidShape;

    fn try_from(fragment: ProductSubscriptionState) -> Result<Self, Self::Error> {
        let id = fragment.id.into_inner();

        if id.is_empty() {
            return Err(InvalidShape("product subscription has an empty id".to_owned()));
        }

        Ok(Self {
            id,
            uuid: fragment.uuid,
            is_archived: fragment.is_archived,
            proxy_access: fragment.llm_proxy_access.try_into()?,
            active_license: fragment.active_license.map(Into::into),
        })
    }
}

impl From<ActiveLicense> for ProductLicense {
    fn from(license: ActiveLicense) -> Self {
        Self {
            info: license.info.map(|info| LicenseInfo { tags: info.tags }),
        }
    }
}

impl TryFrom<LlmProxyAccessFields> for ProxyAccess {
    type Error = InvalidShape;

    fn try_from(fields: LlmProxyAccessFields) -> Result<Self, Self::Error> {
        Ok(Self {
            enabled: fields.enabled,
            chat_completions_rate_limit: fields.chat_completions_rate_limit.map(TryInto::try_into).transpose()?,
            code_completions_rate_limit: fields.code_completions_rate_limit.map(TryInto::try_into).transpose()?,
        })
    }
}

impl TryFrom<RateLimitFields> for RateLimit {
    type Error = InvalidShape;

    fn try_from(fields: RateLimitFields) -> Result<Self, Self::Error> {
        if fields.allowed_models.is_empty() {
            return Err(InvalidShape("rate limit has no allowed models".to_owned()));
        }

        let limit = u32::try_from(fields.limit)
            .map_err(|_| InvalidShape(format!("rate limit has a negative limit of {}", fields.limit)))?;

        let interval_seconds = u32::try_from(fields.interval_seconds)
            .ok()
            .filter(|seconds| *seconds > 0)
            .ok_or_else(|| {
                InvalidShape(format!(
                    "rate limit interval must be positive, got {} seconds",
                    fields.interval_seconds
                ))
            })?;

        Ok(Self {
            allowed_models: fields.allowed_models,
            source: fields.source.into(),
            limit,
            interval_seconds,
        })
    }
}

impl From<LlmProxyRateLimitSource> for RateLimitSource {
    fn from(source: LlmProxyRateLimitSource) -> Self {
        match source {
            LlmProxyRateLimitSource::Override => RateLimitSource::Override,
            LlmProxyRateLimitSource::Plan => RateLimitSource::Plan,
        }
    }
}

impl TryFrom<ListProductSubscriptionFields> for ListedSubscription {
    type Error = InvalidShape;

    fn try_from(fields: ListProductSubscriptionFields) -> Result<Self, Self::Error> {
        Ok(Self {
            state: fields.state.try_into()?,
            sourcegraph_access_tokens: fields.sourcegraph_access_tokens,
        })
    }
}

impl TryFrom<ProductSubscriptionConnection> for SubscriptionListPage {
    type Error = InvalidShape;

    fn try_from(connection: ProductSubscriptionConnection) -> Result<Self, Self::Error> {
        let total_count = u32::try_from(connection.total_count).map_err(|_| {
            InvalidShape(format!(
                "product subscriptions have a negative total count of {}",
                connection.total_count
            ))
        })?;

        let page_info = connection.page_info;

        match (page_info.has_next_page, &page_info.end_cursor) {
            (true, None) => {
                return Err(InvalidShape("page announces a next page but has no end cursor".to_owned()));
            }
            (false, Some(cursor)) => {
                return Err(InvalidShape(format!("last page carries an end cursor `{cursor}`")));
            }
            _ => {}
        }

        let nodes = connection
            .nodes
            .into_iter()
            .map(ListedSubscription::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            total_count,
            nodes,
            end_cursor: page_info.end_cursor,
            has_next_page: page_info.has_next_page,
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn rate_limit_json() -> serde_json::Value {
        json!({
            "allowedModels": ["claude-v1", "claude-v1.3"],
            "source": "OVERRIDE",
            "limit": 50,
            "intervalSeconds": 60
        })
    }

    fn subscription_json() -> serde_json::Value {
        json!({
            "id": "UHJvZHVjdFN1YnNjcmlwdGlvbjox",
            "uuid": "0a5b5fc4-0b3c-4f7e-9d4b-1cf3f4d0f3a1",
            "isArchived": false,
            "llmProxyAccess": {
                "enabled": true,
                "chatCompletionsRateLimit": rate_limit_json(),
                "codeCompletionsRateLimit": null
            },
            "activeLicense": {
                "info": { "tags": ["plan:enterprise-1", "dev"] }
            }
        })
    }

    fn connection(page_info: serde_json::Value) -> ProductSubscriptionConnection {
        let mut node = subscription_json();
        node["sourcegraphAccessTokens"] = json!(["sgd_abc"]);

        serde_json::from_value(json!({
            "totalCount": 1,
            "pageInfo": page_info,
            "nodes": [node]
        }))
        .unwrap()
    }

    #[test]
    fn subscription_state_from_fragment() {
        let fragment: ProductSubscriptionState = serde_json::from_value(subscription_json()).unwrap();
        let state = SubscriptionState::try_from(fragment).unwrap();

        assert_eq!(state.id, "UHJvZHVjdFN1YnNjcmlwdGlvbjox");
        assert!(state.is_usable());
        assert_eq!(state.tags(), ["plan:enterprise-1", "dev"]);
        assert!(state.proxy_access.rate_limit(Feature::CodeCompletions).is_none());

        let chat = state.proxy_access.rate_limit(Feature::ChatCompletions).unwrap();
        assert_eq!(chat.source, RateLimitSource::Override);
        assert_eq!(chat.interval(), Duration::from_secs(60));
        assert!(chat.allows_model("claude-v1.3"));
        assert!(!chat.allows_model("claude-instant-v1"));
    }

    #[test]
    fn no_active_license_means_no_tags() {
        let mut json = subscription_json();
        json["activeLicense"] = serde_json::Value::Null;

        let fragment: ProductSubscriptionState = serde_json::from_value(json).unwrap();
        let state = SubscriptionState::try_from(fragment).unwrap();

        assert!(state.active_license.is_none());
        assert!(state.tags().is_empty());
    }

    #[test]
    fn license_without_info_has_no_tags() {
        let license = ProductLicense { info: None };
        assert!(license.tags().is_empty());
    }

    #[test]
    fn archived_subscriptions_are_not_usable() {
        let mut json = subscription_json();
        json["isArchived"] = json!(true);

        let fragment: ProductSubscriptionState = serde_json::from_value(json).unwrap();
        assert!(!SubscriptionState::try_from(fragment).unwrap().is_usable());
    }

    #[test]
    fn empty_id_is_rejected() {
        let mut json = subscription_json();
        json["id"] = json!("");

        let fragment: ProductSubscriptionState = serde_json::from_value(json).unwrap();
        let error = SubscriptionState::try_from(fragment).unwrap_err();

        assert_eq!(error.to_string(), "product subscription has an empty id");
    }

    #[test]
    fn rate_limit_source_values() {
        for (wire, expected) in [("OVERRIDE", RateLimitSource::Override), ("PLAN", RateLimitSource::Plan)] {
            let mut json = rate_limit_json();
            json["source"] = json!(wire);

            let fields: RateLimitFields = serde_json::from_value(json).unwrap();
            assert_eq!(RateLimit::try_from(fields).unwrap().source, expected);
        }
    }

    #[test]
    fn unknown_rate_limit_source_does_not_decode() {
        let mut json = rate_limit_json();
        json["source"] = json!("TRIAL");

        assert!(serde_json::from_value::<RateLimitFields>(json.clone()).is_err());
        assert!(serde_json::from_value::<RateLimit>(json).is_err());
    }

    #[test]
    fn rate_limit_without_models_is_rejected() {
        let mut json = rate_limit_json();
        json["allowedModels"] = json!([]);

        let fields: RateLimitFields = serde_json::from_value(json).unwrap();
        let error = RateLimit::try_from(fields).unwrap_err();

        assert_eq!(error.to_string(), "rate limit has no allowed models");
    }

    #[test]
    fn rate_limit_bounds() {
        let mut json = rate_limit_json();
        json["intervalSeconds"] = json!(0);
        let fields: RateLimitFields = serde_json::from_value(json).unwrap();
        assert_eq!(
            RateLimit::try_from(fields).unwrap_err().to_string(),
            "rate limit interval must be positive, got 0 seconds"
        );

        let mut json = rate_limit_json();
        json["limit"] = json!(-1);
        let fields: RateLimitFields = serde_json::from_value(json).unwrap();
        assert_eq!(
            RateLimit::try_from(fields).unwrap_err().to_string(),
            "rate limit has a negative limit of -1"
        );

        let mut json = rate_limit_json();
        json["limit"] = json!(0);
        let fields: RateLimitFields = serde_json::from_value(json).unwrap();
        assert_eq!(RateLimit::try_from(fields).unwrap().limit, 0);
    }

    #[test]
    fn page_with_next_page_and_cursor() {
        let page = SubscriptionListPage::try_from(connection(json!({
            "endCursor": "c3Vic2NyaXB0aW9uOjE=",
            "hasNextPage": true
        })))
        .unwrap();

        assert_eq!(page.total_count, 1);
        assert_eq!(page.nodes[0].sourcegraph_access_tokens, ["sgd_abc"]);
        assert_eq!(page.next_cursor(), Some("c3Vic2NyaXB0aW9uOjE="));
    }

    #[test]
    fn last_page_has_no_next_cursor() {
        let page = SubscriptionListPage::try_from(connection(json!({
            "endCursor": null,
            "hasNextPage": false
        })))
        .unwrap();

        assert!(!page.has_next_page);
        assert_eq!(page.next_cursor(), None);
    }

    #[test]
    fn last_page_with_cursor_is_rejected() {
        let error = SubscriptionListPage::try_from(connection(json!({
            "endCursor": "c3Vic2NyaXB0aW9uOjE=",
            "hasNextPage": false
        })))
        .unwrap_err();

        assert_eq!(error.to_string(), "last page carries an end cursor `c3Vic2NyaXB0aW9uOjE=`");
    }

    #[test]
    fn next_page_without_cursor_is_rejected() {
        let error = SubscriptionListPage::try_from(connection(json!({
            "endCursor": null,
            "hasNextPage": true
        })))
        .unwrap_err();

        assert_eq!(error.to_string(), "page announces a next page but has no end cursor");
    }

    #[test]
    fn list_page_json_round_trip() {
        let page = SubscriptionListPage::try_from(connection(json!({
            "endCursor": "c3Vic2NyaXB0aW9uOjE=",
            "hasNextPage": true
        })))
        .unwrap();

        let encoded = serde_json::to_string(&page).unwrap();
        let decoded: SubscriptionListPage = serde_json::from_str(&encoded).unwrap();

        assert_eq!(decoded, page);
    }

    #[test]
    fn rate_limit_serialization() {
        let rate_limit = RateLimit {
            allowed_models: vec!["claude-v1".to_owned()],
            source: RateLimitSource::Plan,
            limit: 100,
            interval_seconds: 3600,
        };

        insta::assert_json_snapshot!(rate_limit, @r#"
        {
          "allowedModels": [
            "claude-v1"
          ],
          "source": "PLAN",
          "limit": 100,
          "intervalSeconds": 3600
        }
        "#);
    }
}
