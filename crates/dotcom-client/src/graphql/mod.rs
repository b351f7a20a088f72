pub(crate) mod queries;

#[cynic::schema("dotcom")]
pub(crate) mod schema {}
