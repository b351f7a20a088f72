use super::{super::schema, fragments::ProductSubscriptionState};

#[derive(cynic::QueryVariables, Debug)]
pub struct CheckAccessTokenArguments<'a> {
    pub token: &'a str,
}

#[derive(cynic::QueryFragment, Debug)]
#[cynic(graphql_type = "Query", variables = "CheckAccessTokenArguments")]
pub struct CheckAccessToken {
    pub dotcom: CheckAccessTokenDotcom,
}

#[derive(cynic::QueryFragment, Debug)]
#[cynic(graphql_type = "DotcomQuery", variables = "CheckAccessTokenArguments")]
pub struct CheckAccessTokenDotcom {
    #[arguments(accessToken: $token)]
    pub product_subscription_by_access_token: Option<ProductSubscriptionState>,
}
