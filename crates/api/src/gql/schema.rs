use std::env;

use async_graphql::dataloader::DataLoader;
use async_graphql::Schema;

use super::loaders::{OrganizationLoader, PlayerLoader, TeamLoader};
use super::{MutationRoot, QueryRoot, SubscriptionRoot};
use crate::state::AppState;

pub type AppSchema = Schema<QueryRoot, MutationRoot, SubscriptionRoot>;

/// Build the GraphQL schema and inject shared state (AppState) into the context.
pub fn build_schema(state: AppState) -> AppSchema {
    let organization_loader =
        DataLoader::new(OrganizationLoader::new(state.db.clone()), tokio::spawn);
    let team_loader = DataLoader::new(TeamLoader::new(state.db.clone()), tokio::spawn);
    let player_loader = DataLoader::new(PlayerLoader::new(state.db.clone()), tokio::spawn);

    let introspection_enabled = env::var("GQL_INTROSPECTION")
        .map(|v| v == "true")
        .unwrap_or(false);

    let mut builder = Schema::build(
        QueryRoot::default(),
        MutationRoot::default(),
        SubscriptionRoot,
    )
    .data(state) // available in resolvers via ctx.data::<AppState>()
    .data(organization_loader)
    .data(team_loader)
    .data(player_loader)
    .limit_depth(15)
    .limit_complexity(200);

    if !introspection_enabled {
        builder = builder.disable_introspection();
    }

    builder.finish()
}
