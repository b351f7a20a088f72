use super::super::schema;

#[derive(cynic::QueryFragment, Debug)]
#[cynic(graphql_type = "ProductSubscription")]
pub struct ProductSubscriptionState {
    pub id: cynic::Id,
    pub uuid: String,
    pub is_archived: bool,
    pub llm_proxy_access: LlmProxyAccessFields,
    pub active_license: Option<ActiveLicense>,
}

#[derive(cynic::QueryFragment, Debug)]
#[cynic(graphql_type = "ProductSubscription")]
pub struct ListProductSubscriptionFields {
    #[cynic(spread)]
    pub state: ProductSubscriptionState,
    pub sourcegraph_access_tokens: Vec<String>,
}

#[derive(cynic::QueryFragment, Debug)]
#[cynic(graphql_type = "LLMProxyAccess")]
pub struct LlmProxyAccessFields {
    pub enabled: bool,
    pub chat_completions_rate_limit: Option<RateLimitFields>,
    pub code_completions_rate_limit: Option<RateLimitFields>,
}

#[derive(cynic::QueryFragment, Debug)]
#[cynic(graphql_type = "LLMProxyRateLimit")]
pub struct RateLimitFields {
    pub allowed_models: Vec<String>,
    pub source: LlmProxyRateLimitSource,
    pub limit: i32,
    pub interval_seconds: i32,
}

#[derive(cynic::Enum, Clone, Copy, Debug, PartialEq, Eq)]
#[cynic(graphql_type = "LLMProxyRateLimitSource")]
pub enum LlmProxyRateLimitSource {
    Override,
    Plan,
}

#[derive(cynic::QueryFragment, Debug)]
#[cynic(graphql_type = "ProductLicense")]
pub struct ActiveLicense {
    pub info: Option<ProductLicenseInfo>,
}

#[derive(cynic::QueryFragment, Debug)]
pub struct ProductLicenseInfo {
    pub tags: Vec<String>,
}
