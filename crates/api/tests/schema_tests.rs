mod common;

use api::auth::Claims;
use api::gql::build_schema;
use async_graphql::Variables;
use common::*;
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn test_schema_exposes_league_operations() {
    let schema = build_schema(offline_state());
    let sdl = schema.sdl();

    for field in [
        "organizations(",
        "teams(",
        "games(",
        "gameResult(",
        "gameTime(",
        "remainingTime(",
        "periodAt(",
        "recordGameEvent(",
        "deleteGameEvent(",
        "rebuildGameResult(",
        "createGameClock(",
        "nextGamePeriod(",
        "setGameClock(",
        "createUploadUrl(",
        "gameClockUpdates(",
        "gameResultUpdates(",
    ] {
        assert!(sdl.contains(field), "schema is missing {field}");
    }
}

#[tokio::test]
async fn test_mutations_require_login() {
    let schema = build_schema(offline_state());

    let query = r#"
        mutation CreateOrganization {
            createOrganization(input: { name: "Northern League" }) {
                id
            }
        }
    "#;

    let response = execute_graphql(&schema, query, None, None).await;

    assert_eq!(response.errors.len(), 1);
    assert!(
        response.errors[0].message.contains("logged in"),
        "unexpected error: {:?}",
        response.errors
    );
}

#[tokio::test]
async fn test_viewers_cannot_schedule_games() {
    let schema = build_schema(offline_state());
    let claims = Claims::new(Uuid::new_v4(), "fan@test.local".into(), "viewer".into(), 60);

    let query = r#"
        mutation Create($org: UUID!, $host: UUID!, $guest: UUID!) {
            createGame(input: { organizationId: $org, name: "Derby", hostTeamId: $host, guestTeamId: $guest }) {
                id
            }
        }
    "#;
    let variables = Variables::from_json(json!({
        "org": Uuid::new_v4().to_string(),
        "host": Uuid::new_v4().to_string(),
        "guest": Uuid::new_v4().to_string(),
    }));

    let response = execute_graphql(&schema, query, Some(variables), Some(claims)).await;

    assert_eq!(response.errors.len(), 1);
    assert!(response.errors[0].message.contains("Access denied"));
}

#[tokio::test]
async fn test_viewers_cannot_request_upload_urls() {
    let schema = build_schema(offline_state());
    let claims = Claims::new(Uuid::new_v4(), "fan@test.local".into(), "viewer".into(), 60);

    let query = r#"
        mutation {
            createUploadUrl(folder: TEAMS, fileName: "logo.png", contentType: "image/png") {
                url
            }
        }
    "#;

    let response = execute_graphql(&schema, query, None, Some(claims)).await;

    assert_eq!(response.errors.len(), 1);
    assert!(response.errors[0].message.contains("Access denied"));
}

#[tokio::test]
async fn test_me_is_null_for_anonymous_callers() {
    let schema = build_schema(offline_state());

    let response = execute_graphql(&schema, "{ me { id } }", None, None).await;

    assert!(response.errors.is_empty(), "{:?}", response.errors);
    assert_eq!(response.data.into_json().unwrap(), json!({ "me": null }));
}

#[tokio::test]
async fn test_unknown_event_types_fail_validation() {
    let schema = build_schema(offline_state());

    let query = r#"
        mutation {
            recordGameEvent(input: { gameId: "00000000-0000-0000-0000-000000000000", eventType: TOUCHDOWN, side: HOST }) {
                id
            }
        }
    "#;

    let response = execute_graphql(&schema, query, None, None).await;

    assert!(!response.errors.is_empty());
    assert!(response.data.into_json().unwrap().is_null());
}
