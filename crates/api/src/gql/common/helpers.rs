use uuid::Uuid;

use crate::gql::error::GqlError;

/// Owning organization of a game, for permission checks.
pub async fn organization_for_game(db: &infra::db::Db, game_id: Uuid) -> async_graphql::Result<Uuid> {
    let game = infra::repos::games::get_by_id(db, game_id)
        .await
        .map_err(GqlError::from)?
        .ok_or_else(|| GqlError::not_found("Game"))?;
    Ok(game.organization_id)
}

pub async fn organization_for_team(db: &infra::db::Db, team_id: Uuid) -> async_graphql::Result<Uuid> {
    let team = infra::repos::teams::get_by_id(db, team_id)
        .await
        .map_err(GqlError::from)?
        .ok_or_else(|| GqlError::not_found("Team"))?;
    Ok(team.organization_id)
}

pub async fn organization_for_rule_pack(
    db: &infra::db::Db,
    rule_pack_id: Uuid,
) -> async_graphql::Result<Uuid> {
    let rule_pack = infra::repos::rule_packs::get_by_id(db, rule_pack_id)
        .await
        .map_err(GqlError::from)?
        .ok_or_else(|| GqlError::not_found("Rule pack"))?;
    Ok(rule_pack.organization_id)
}

/// Empty or whitespace-only strings count as absent.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    })
}

pub fn require_non_blank(value: &str, field: &str) -> async_graphql::Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(GqlError::new(format!("{field} must not be empty")).into());
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_strings_are_dropped() {
        assert_eq!(non_blank(Some("  ".into())), None);
        assert_eq!(non_blank(Some(" Ice ".into())), Some("Ice".into()));
        assert_eq!(non_blank(None), None);
    }

    #[test]
    fn required_fields_are_trimmed() {
        assert_eq!(require_non_blank(" Hawks ", "name").unwrap(), "Hawks");
        assert!(require_non_blank("\t", "name").is_err());
    }
}
