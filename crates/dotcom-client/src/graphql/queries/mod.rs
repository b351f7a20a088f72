pub(crate) mod check_access_token;
pub(crate) mod fragments;
pub(crate) mod list_product_subscriptions;
