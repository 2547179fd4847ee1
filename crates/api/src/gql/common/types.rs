use async_graphql::{Enum, InputObject, OutputType, SimpleObject};
use infra::pagination::LimitOffset;

use crate::gql::domains::competitions::types::Competition;
use crate::gql::domains::games::types::Game;
use crate::gql::domains::organizations::types::Organization;
use crate::gql::domains::players::types::Player;
use crate::gql::domains::rule_packs::types::RulePack;
use crate::gql::domains::seasons::types::Season;
use crate::gql::domains::teams::types::Team;
use crate::gql::domains::users::types::User;
use crate::gql::domains::venues::types::Venue;

#[derive(Enum, Copy, Clone, Eq, PartialEq, Debug, serde::Serialize, serde::Deserialize)]
pub enum Role {
    #[graphql(name = "ADMIN")]
    Admin,
    #[graphql(name = "MANAGER")]
    Manager,
    #[graphql(name = "VIEWER")]
    Viewer,
}

impl From<String> for Role {
    fn from(role: String) -> Self {
        match role.as_str() {
            "admin" => Role::Admin,
            "manager" => Role::Manager,
            _ => Role::Viewer, // Unknown roles get the least privilege
        }
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        match role {
            Role::Admin => "admin".to_string(),
            Role::Manager => "manager".to_string(),
            Role::Viewer => "viewer".to_string(),
        }
    }
}

#[derive(InputObject, Clone, Copy, Debug, Default)]
pub struct PaginationInput {
    pub limit: Option<i32>,
    pub offset: Option<i32>,
}

impl PaginationInput {
    pub fn to_limit_offset(self) -> LimitOffset {
        LimitOffset::new(self.limit.map(i64::from), self.offset.map(i64::from))
    }
}

#[derive(SimpleObject, Clone)]
#[graphql(concrete(name = "OrganizationPage", params(Organization)))]
#[graphql(concrete(name = "TeamPage", params(Team)))]
#[graphql(concrete(name = "PlayerPage", params(Player)))]
#[graphql(concrete(name = "CompetitionPage", params(Competition)))]
#[graphql(concrete(name = "SeasonPage", params(Season)))]
#[graphql(concrete(name = "VenuePage", params(Venue)))]
#[graphql(concrete(name = "RulePackPage", params(RulePack)))]
#[graphql(concrete(name = "GamePage", params(Game)))]
#[graphql(concrete(name = "UserPage", params(User)))]
pub struct PaginatedResponse<T: OutputType> {
    pub items: Vec<T>,
    pub total_count: i32,
    pub page_size: i32,
    pub offset: i32,
    pub has_next_page: bool,
}

impl<T: OutputType> PaginatedResponse<T> {
    pub fn new(items: Vec<T>, total_count: i64, page: LimitOffset) -> Self {
        let page_size = items.len() as i32;
        let offset = page.offset as i32;
        let total_count = total_count as i32;

        Self {
            items,
            total_count,
            page_size,
            offset,
            has_next_page: (offset + page_size) < total_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_roles_are_viewers() {
        assert_eq!(Role::from("admin".to_string()), Role::Admin);
        assert_eq!(Role::from("root".to_string()), Role::Viewer);
        assert_eq!(String::from(Role::Manager), "manager");
    }

    #[test]
    fn next_page_flag() {
        let page = LimitOffset::new(Some(2), Some(0));
        let first = PaginatedResponse::new(vec![1, 2], 3, page);
        assert!(first.has_next_page);
        assert_eq!(first.page_size, 2);

        let last = PaginatedResponse::new(vec![3], 3, LimitOffset::new(Some(2), Some(2)));
        assert!(!last.has_next_page);
        assert_eq!(last.offset, 2);
    }

    #[test]
    fn pagination_defaults() {
        let page = PaginationInput::default().to_limit_offset();
        assert_eq!(page.limit, 50);
        assert_eq!(page.offset, 0);
    }
}
