use super::{super::schema, fragments::ListProductSubscriptionFields};

#[derive(cynic::QueryVariables, Debug)]
pub struct ListProductSubscriptionsArguments<'a> {
    pub first: Option<i32>,
    pub after: Option<&'a str>,
}

#[derive(cynic::QueryFragment, Debug)]
#[cynic(graphql_type = "Query", variables = "ListProductSubscriptionsArguments")]
pub struct ListProductSubscriptions {
    pub dotcom: ListProductSubscriptionsDotcom,
}

#[derive(cynic::QueryFragment, Debug)]
#[cynic(graphql_type = "DotcomQuery", variables = "ListProductSubscriptionsArguments")]
pub struct ListProductSubscriptionsDotcom {
    #[arguments(first: $first, after: $after)]
    pub product_subscriptions: ProductSubscriptionConnection,
}

#[derive(cynic::QueryFragment, Debug)]
pub struct ProductSubscriptionConnection {
    pub total_count: i32,
    pub page_info: PageInfo,
    pub nodes: Vec<ListProductSubscriptionFields>,
}

#[derive(cynic::QueryFragment, Debug)]
pub struct PageInfo {
    pub end_cursor: Option<String>,
    pub has_next_page: bool,
}
