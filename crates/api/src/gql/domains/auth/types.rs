use async_graphql::SimpleObject;

use crate::gql::domains::users::types::User;

#[derive(SimpleObject)]
pub struct AuthPayload {
    /// Bearer token for the `Authorization` header
    pub token: String,
    pub user: User,
}
