use async_graphql::MergedObject;

use crate::gql::domains::auth::AuthQuery;
use crate::gql::domains::competitions::CompetitionQuery;
use crate::gql::domains::games::{GameClockQuery, GameQuery};
use crate::gql::domains::organizations::OrganizationQuery;
use crate::gql::domains::players::PlayerQuery;
use crate::gql::domains::rule_packs::RulePackQuery;
use crate::gql::domains::seasons::SeasonQuery;
use crate::gql::domains::teams::TeamQuery;
use crate::gql::domains::users::UserQuery;
use crate::gql::domains::venues::VenueQuery;

#[derive(MergedObject, Default)]
pub struct QueryRoot(
    AuthQuery,
    CompetitionQuery,
    GameClockQuery,
    GameQuery,
    OrganizationQuery,
    PlayerQuery,
    RulePackQuery,
    SeasonQuery,
    TeamQuery,
    UserQuery,
    VenueQuery,
);
