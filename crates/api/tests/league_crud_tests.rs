mod common;

use api::gql::build_schema;
use async_graphql::Variables;
use common::*;
use serde_json::json;

#[tokio::test]
async fn test_teams_are_paginated_per_organization() {
    let Some(state) = setup_test_db().await else {
        return;
    };
    let schema = build_schema(state.clone());

    let organization_id = create_test_organization(&state).await;
    for name in ["Owls", "Otters", "Bears"] {
        create_test_team(&state, organization_id, name).await;
    }

    let query = r#"
        query Teams($org: UUID!) {
            teams(organizationId: $org, pagination: { limit: 2, offset: 0 }) {
                items { name }
                totalCount
                pageSize
                hasNextPage
            }
            searched: teams(organizationId: $org, search: "ot") {
                items { name }
            }
            wildcard: teams(organizationId: $org, search: "%") {
                totalCount
            }
        }
    "#;
    let variables = Variables::from_json(json!({ "org": organization_id.to_string() }));

    let response = execute_graphql(&schema, query, Some(variables), None).await;
    assert!(response.errors.is_empty(), "{:?}", response.errors);
    let data = response.data.into_json().unwrap();

    assert_eq!(data["teams"]["totalCount"], 3);
    assert_eq!(data["teams"]["pageSize"], 2);
    assert_eq!(data["teams"]["hasNextPage"], true);
    assert_eq!(data["searched"]["items"], json!([{ "name": "Otters" }]));
    assert_eq!(data["wildcard"]["totalCount"], 0);
}

#[tokio::test]
async fn test_teams_scheduled_in_games_cannot_be_deleted() {
    let Some(state) = setup_test_db().await else {
        return;
    };
    let schema = build_schema(state.clone());

    let organization_id = create_test_organization(&state).await;
    let (manager_id, claims) = create_test_user(&state, "manager").await;
    assign_manager(&state, organization_id, manager_id).await;
    let game_id = create_test_game(&state, organization_id, None).await;

    let host_team_id: uuid::Uuid =
        sqlx::query_scalar("SELECT host_team_id FROM games WHERE id = $1")
            .bind(game_id)
            .fetch_one(&state.db)
            .await
            .unwrap();

    let query = "mutation Delete($id: UUID!) { deleteTeam(id: $id) }";
    let variables = Variables::from_json(json!({ "id": host_team_id.to_string() }));

    let response = execute_graphql(&schema, query, Some(variables), Some(claims)).await;

    assert_eq!(response.errors.len(), 1);
    assert!(response.errors[0].message.contains("cannot be deleted"));
}

#[tokio::test]
async fn test_managers_only_manage_their_own_organization() {
    let Some(state) = setup_test_db().await else {
        return;
    };
    let schema = build_schema(state.clone());

    let own = create_test_organization(&state).await;
    let other = create_test_organization(&state).await;
    let (manager_id, claims) = create_test_user(&state, "manager").await;
    assign_manager(&state, own, manager_id).await;

    let query = r#"
        mutation Create($org: UUID!) {
            createCompetition(input: { organizationId: $org, name: "Cup" }) { id name }
        }
    "#;

    let allowed = execute_graphql(
        &schema,
        query,
        Some(Variables::from_json(json!({ "org": own.to_string() }))),
        Some(claims.clone()),
    )
    .await;
    assert!(allowed.errors.is_empty(), "{:?}", allowed.errors);

    let denied = execute_graphql(
        &schema,
        query,
        Some(Variables::from_json(json!({ "org": other.to_string() }))),
        Some(claims),
    )
    .await;
    assert_eq!(denied.errors.len(), 1);
    assert!(denied.errors[0].message.contains("not authorized"));
}

#[tokio::test]
async fn test_roster_rejects_players_from_other_organizations() {
    let Some(state) = setup_test_db().await else {
        return;
    };
    let schema = build_schema(state.clone());

    let organization_id = create_test_organization(&state).await;
    let other = create_test_organization(&state).await;
    let (_, claims) = create_test_user(&state, "admin").await;
    let team_id = create_test_team(&state, organization_id, "Falcons").await;

    let player_id: uuid::Uuid = sqlx::query_scalar(
        "INSERT INTO players (organization_id, first_name, last_name) VALUES ($1, 'Ada', 'Stone') RETURNING id",
    )
    .bind(other)
    .fetch_one(&state.db)
    .await
    .unwrap();

    let query = r#"
        mutation Add($team: UUID!, $player: UUID!) {
            addPlayerToTeam(input: { teamId: $team, playerId: $player, jersey: 9 }) { jersey }
        }
    "#;
    let variables = Variables::from_json(json!({
        "team": team_id.to_string(),
        "player": player_id.to_string(),
    }));

    let response = execute_graphql(&schema, query, Some(variables), Some(claims)).await;

    assert_eq!(response.errors.len(), 1);
    assert!(response.errors[0].message.contains("another organization"));
}

#[tokio::test]
async fn test_seasons_must_not_end_before_they_start() {
    let Some(state) = setup_test_db().await else {
        return;
    };
    let schema = build_schema(state.clone());

    let organization_id = create_test_organization(&state).await;
    let (_, claims) = create_test_user(&state, "admin").await;

    let query = r#"
        mutation Create($org: UUID!) {
            createSeason(input: {
                organizationId: $org,
                name: "2026",
                startDate: "2026-09-01",
                endDate: "2026-03-01"
            }) { id }
        }
    "#;
    let variables = Variables::from_json(json!({ "org": organization_id.to_string() }));

    let response = execute_graphql(&schema, query, Some(variables), Some(claims)).await;

    assert_eq!(response.errors.len(), 1);
}
