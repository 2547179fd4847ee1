use async_graphql::MergedObject;

use crate::gql::domains::auth::AuthMutation;
use crate::gql::domains::competitions::CompetitionMutation;
use crate::gql::domains::games::{GameClockMutation, GameMutation};
use crate::gql::domains::organizations::OrganizationMutation;
use crate::gql::domains::players::PlayerMutation;
use crate::gql::domains::rule_packs::RulePackMutation;
use crate::gql::domains::seasons::SeasonMutation;
use crate::gql::domains::teams::TeamMutation;
use crate::gql::domains::uploads::UploadMutation;
use crate::gql::domains::users::UserMutation;
use crate::gql::domains::venues::VenueMutation;

#[derive(MergedObject, Default)]
pub struct MutationRoot(
    AuthMutation,
    CompetitionMutation,
    GameClockMutation,
    GameMutation,
    OrganizationMutation,
    PlayerMutation,
    RulePackMutation,
    SeasonMutation,
    TeamMutation,
    UploadMutation,
    UserMutation,
    VenueMutation,
);
