mod common;

use std::time::Duration;

use api::auth::Claims;
use api::gql::build_schema;
use api::gql::schema::AppSchema;
use api::services::ClockService;
use async_graphql::{Request, Variables};
use common::*;
use futures_util::StreamExt;
use serde_json::{json, Value};
use uuid::Uuid;

struct Fixture {
    state: api::AppState,
    schema: AppSchema,
    claims: Claims,
    game_id: Uuid,
}

async fn setup_game() -> Option<Fixture> {
    let state = setup_test_db().await?;
    let schema = build_schema(state.clone());

    let organization_id = create_test_organization(&state).await;
    let (manager_id, claims) = create_test_user(&state, "manager").await;
    assign_manager(&state, organization_id, manager_id).await;
    let rule_pack_id = create_test_rule_pack(&state, organization_id).await;
    let game_id = create_test_game(&state, organization_id, Some(rule_pack_id)).await;

    Some(Fixture {
        state,
        schema,
        claims,
        game_id,
    })
}

impl Fixture {
    async fn run(&self, query: &str, variables: Value) -> async_graphql::Response {
        execute_graphql(
            &self.schema,
            query,
            Some(Variables::from_json(variables)),
            Some(self.claims.clone()),
        )
        .await
    }

    async fn run_ok(&self, query: &str, variables: Value) -> Value {
        let response = self.run(query, variables).await;
        assert!(response.errors.is_empty(), "{:?}", response.errors);
        response.data.into_json().unwrap()
    }

    async fn clock(&self, mutation: &str) -> Value {
        let query = format!(
            "mutation Clock($gameId: UUID!) {{ {mutation}(gameId: $gameId) {{ status period remaining gameTime }} }}"
        );
        let data = self
            .run_ok(&query, json!({ "gameId": self.game_id.to_string() }))
            .await;
        data[mutation].clone()
    }

    async fn result(&self) -> Value {
        let query = r#"
            query Result($gameId: UUID!) {
                gameResult(gameId: $gameId) {
                    status
                    totals { hostGoals guestGoals guestShots }
                    periods { period counters { hostGoals guestShots } }
                }
            }
        "#;
        let data = self
            .run_ok(query, json!({ "gameId": self.game_id.to_string() }))
            .await;
        data["gameResult"].clone()
    }
}

const RECORD: &str = r#"
    mutation Record($input: RecordGameEventInput!) {
        recordGameEvent(input: $input) { id period remainingTime gameTime eventType side }
    }
"#;

#[tokio::test]
async fn test_recording_and_deleting_events_updates_counters() {
    let Some(fx) = setup_game().await else {
        return;
    };

    let data = fx
        .run_ok(
            RECORD,
            json!({ "input": {
                "gameId": fx.game_id.to_string(),
                "eventType": "GOAL",
                "side": "HOST",
                "period": "2",
                "remainingTime": "05:00"
            }}),
        )
        .await;
    let event = &data["recordGameEvent"];
    assert_eq!(event["gameTime"], "35:00");
    assert_eq!(event["period"], "2");
    let event_id = event["id"].as_str().unwrap().to_string();

    fx.run_ok(
        RECORD,
        json!({ "input": {
            "gameId": fx.game_id.to_string(),
            "eventType": "SHOT",
            "side": "GUEST",
            "period": "1",
            "remainingTime": "12:30"
        }}),
    )
    .await;

    let result = fx.result().await;
    assert_eq!(result["totals"]["hostGoals"], 1);
    assert_eq!(result["totals"]["guestShots"], 1);
    let periods = result["periods"].as_array().unwrap();
    assert_eq!(periods.len(), 2);

    let delete = r#"
        mutation Delete($id: UUID!) {
            deleteGameEvent(id: $id) { totals { hostGoals guestShots } }
        }
    "#;
    let data = fx.run_ok(delete, json!({ "id": event_id })).await;
    assert_eq!(data["deleteGameEvent"]["totals"]["hostGoals"], 0);
    assert_eq!(data["deleteGameEvent"]["totals"]["guestShots"], 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_deletes_of_one_event_take_back_one_goal() {
    let Some(fx) = setup_game().await else {
        return;
    };

    let mut event_ids = Vec::new();
    for remaining in ["15:00", "10:00"] {
        let data = fx
            .run_ok(
                RECORD,
                json!({ "input": {
                    "gameId": fx.game_id.to_string(),
                    "eventType": "GOAL",
                    "side": "HOST",
                    "period": "1",
                    "remainingTime": remaining
                }}),
            )
            .await;
        event_ids.push(data["recordGameEvent"]["id"].as_str().unwrap().to_string());
    }

    let delete = "mutation Delete($id: UUID!) { deleteGameEvent(id: $id) { totals { hostGoals } } }";
    let attempts = (0..4).map(|_| fx.run(delete, json!({ "id": event_ids[0] })));
    let responses = futures_util::future::join_all(attempts).await;

    let succeeded = responses.iter().filter(|r| r.errors.is_empty()).count();
    assert_eq!(succeeded, 1);
    for failed in responses.iter().filter(|r| !r.errors.is_empty()) {
        assert!(failed.errors[0].message.contains("not found"), "{:?}", failed.errors);
    }

    let result = fx.result().await;
    assert_eq!(result["totals"]["hostGoals"], 1);
    assert_eq!(result["periods"][0]["counters"]["hostGoals"], 1);

    let events = fx
        .run_ok(
            "query E($gameId: UUID!) { gameEvents(gameId: $gameId) { id } }",
            json!({ "gameId": fx.game_id.to_string() }),
        )
        .await;
    assert_eq!(events["gameEvents"], json!([{ "id": event_ids[1] }]));
}

#[tokio::test]
async fn test_remaining_time_longer_than_the_period_is_stored_clamped() {
    let Some(fx) = setup_game().await else {
        return;
    };

    let data = fx
        .run_ok(
            RECORD,
            json!({ "input": {
                "gameId": fx.game_id.to_string(),
                "eventType": "SHOT",
                "side": "HOST",
                "period": "1",
                "remainingTime": "25:00"
            }}),
        )
        .await;

    assert_eq!(data["recordGameEvent"]["remainingTime"], "20:00");
    assert_eq!(data["recordGameEvent"]["gameTime"], "00:00");
}

#[tokio::test]
async fn test_subscriptions_to_unknown_games_are_refused() {
    let Some(fx) = setup_game().await else {
        return;
    };

    let query = format!(
        r#"subscription {{ gameResultUpdates(gameId: "{}") {{ gameId }} }}"#,
        Uuid::new_v4()
    );
    let mut stream = fx.schema.execute_stream(Request::new(query));
    let response = stream.next().await.expect("one response");

    assert_eq!(response.errors.len(), 1);
    assert!(response.errors[0].message.contains("Game not found"));
}

#[tokio::test]
async fn test_counters_never_go_negative_and_rebuild_discards_adjustments() {
    let Some(fx) = setup_game().await else {
        return;
    };

    let adjust = r#"
        mutation Adjust($input: AdjustGameCounterInput!) {
            adjustGameCounter(input: $input) { totals { hostGoals } }
        }
    "#;
    let data = fx
        .run_ok(
            adjust,
            json!({ "input": {
                "gameId": fx.game_id.to_string(),
                "period": "1",
                "eventType": "GOAL",
                "side": "HOST",
                "delta": -1
            }}),
        )
        .await;
    assert_eq!(data["adjustGameCounter"]["totals"]["hostGoals"], 0);

    fx.run_ok(
        RECORD,
        json!({ "input": {
            "gameId": fx.game_id.to_string(),
            "eventType": "GOAL",
            "side": "HOST",
            "period": "1",
            "remainingTime": "10:00"
        }}),
    )
    .await;
    let data = fx
        .run_ok(
            adjust,
            json!({ "input": {
                "gameId": fx.game_id.to_string(),
                "period": "1",
                "eventType": "GOAL",
                "side": "HOST",
                "delta": 4
            }}),
        )
        .await;
    assert_eq!(data["adjustGameCounter"]["totals"]["hostGoals"], 5);

    let rebuild = r#"
        mutation Rebuild($gameId: UUID!) {
            rebuildGameResult(gameId: $gameId) {
                totals { hostGoals }
                periods { period counters { hostGoals } }
            }
        }
    "#;
    let data = fx
        .run_ok(rebuild, json!({ "gameId": fx.game_id.to_string() }))
        .await;
    assert_eq!(data["rebuildGameResult"]["totals"]["hostGoals"], 1);
    assert_eq!(
        data["rebuildGameResult"]["periods"][0]["counters"]["hostGoals"],
        1
    );
}

#[tokio::test]
async fn test_events_in_unknown_periods_are_rejected() {
    let Some(fx) = setup_game().await else {
        return;
    };

    let response = fx
        .run(
            RECORD,
            json!({ "input": {
                "gameId": fx.game_id.to_string(),
                "eventType": "PENALTY",
                "side": "GUEST",
                "period": "OT",
                "remainingTime": "02:00"
            }}),
        )
        .await;

    assert_eq!(response.errors.len(), 1);
    assert!(response.errors[0].message.contains("Unknown period"));
}

#[tokio::test]
async fn test_malformed_remaining_time_is_rejected() {
    let Some(fx) = setup_game().await else {
        return;
    };

    let response = fx
        .run(
            RECORD,
            json!({ "input": {
                "gameId": fx.game_id.to_string(),
                "eventType": "GOAL",
                "side": "HOST",
                "period": "1",
                "remainingTime": "5:7"
            }}),
        )
        .await;

    assert_eq!(response.errors.len(), 1);
    assert!(response.errors[0].message.contains("MM:SS"));
}

#[tokio::test]
async fn test_game_time_conversions_use_the_rule_pack() {
    let Some(fx) = setup_game().await else {
        return;
    };

    let query = r#"
        query Convert($gameId: UUID!) {
            gameTime(gameId: $gameId, period: "2", remaining: "05:00")
            remainingTime(gameId: $gameId, period: "2", gameTime: "35:00")
            boundary: periodAt(gameId: $gameId, gameTime: "40:00")
            overtime: periodAt(gameId: $gameId, gameTime: "75:00")
        }
    "#;
    let data = fx
        .run_ok(query, json!({ "gameId": fx.game_id.to_string() }))
        .await;

    assert_eq!(data["gameTime"], "35:00");
    assert_eq!(data["remainingTime"], "05:00");
    assert_eq!(data["boundary"], "2");
    assert_eq!(data["overtime"], "3");
}

#[tokio::test]
async fn test_clock_lifecycle_moves_through_periods() {
    let Some(fx) = setup_game().await else {
        return;
    };

    let clock = fx.clock("createGameClock").await;
    assert_eq!(clock["status"], "STOPPED");
    assert_eq!(clock["period"], "1");
    assert_eq!(clock["remaining"], "20:00");
    assert_eq!(clock["gameTime"], "00:00");

    let duplicate = fx
        .run(
            "mutation Clock($gameId: UUID!) { createGameClock(gameId: $gameId) { period } }",
            json!({ "gameId": fx.game_id.to_string() }),
        )
        .await;
    assert_eq!(duplicate.errors.len(), 1);
    assert!(duplicate.errors[0].message.contains("already has a clock"));

    assert_eq!(fx.clock("startGameClock").await["status"], "RUNNING");
    assert_eq!(fx.clock("pauseGameClock").await["status"], "PAUSED");
    assert_eq!(fx.clock("resumeGameClock").await["status"], "RUNNING");

    let next = fx.clock("nextGamePeriod").await;
    assert_eq!(next["status"], "STOPPED");
    assert_eq!(next["period"], "2");
    assert_eq!(next["remaining"], "20:00");
    assert_eq!(next["gameTime"], "20:00");

    assert_eq!(fx.result().await.get("status").cloned(), Some(json!("NOT_STARTED")));
    let active = fx
        .run_ok(
            "query R($gameId: UUID!) { gameResult(gameId: $gameId) { periodActive } }",
            json!({ "gameId": fx.game_id.to_string() }),
        )
        .await;
    assert_eq!(active["gameResult"]["periodActive"], "2");

    assert_eq!(fx.clock("previousGamePeriod").await["period"], "1");
    let response = fx
        .run(
            "mutation Clock($gameId: UUID!) { previousGamePeriod(gameId: $gameId) { period } }",
            json!({ "gameId": fx.game_id.to_string() }),
        )
        .await;
    assert!(response.errors[0].message.contains("first period"));
}

#[tokio::test]
async fn test_set_clock_is_clamped_and_feeds_event_defaults() {
    let Some(fx) = setup_game().await else {
        return;
    };

    fx.clock("createGameClock").await;

    let set = r#"
        mutation Set($gameId: UUID!, $remaining: String!) {
            setGameClock(gameId: $gameId, remaining: $remaining) { remaining gameTime }
        }
    "#;
    let data = fx
        .run_ok(
            set,
            json!({ "gameId": fx.game_id.to_string(), "remaining": "25:00" }),
        )
        .await;
    assert_eq!(data["setGameClock"]["remaining"], "20:00");

    let data = fx
        .run_ok(
            set,
            json!({ "gameId": fx.game_id.to_string(), "remaining": "07:15" }),
        )
        .await;
    assert_eq!(data["setGameClock"]["gameTime"], "12:45");

    // Stopped clock: period and remaining time come from it.
    let data = fx
        .run_ok(
            RECORD,
            json!({ "input": {
                "gameId": fx.game_id.to_string(),
                "eventType": "SAVE",
                "side": "GUEST"
            }}),
        )
        .await;
    assert_eq!(data["recordGameEvent"]["period"], "1");
    assert_eq!(data["recordGameEvent"]["remainingTime"], "07:15");
    assert_eq!(data["recordGameEvent"]["gameTime"], "12:45");
}

#[tokio::test]
async fn test_sweeper_stops_expired_clocks() {
    let Some(fx) = setup_game().await else {
        return;
    };

    fx.clock("createGameClock").await;
    fx.clock("startGameClock").await;
    sqlx::query(
        "UPDATE game_clocks SET period_end_time = NOW() - INTERVAL '1 second' WHERE game_id = $1",
    )
    .bind(fx.game_id)
    .execute(&fx.state.db)
    .await
    .unwrap();

    let service = ClockService::new(fx.state.clone(), Duration::from_secs(1));
    let expired = service.expire_clocks().await.unwrap();
    assert!(expired >= 1);

    let data = fx
        .run_ok(
            "query C($gameId: UUID!) { gameClock(gameId: $gameId) { status remaining } }",
            json!({ "gameId": fx.game_id.to_string() }),
        )
        .await;
    assert_eq!(data["gameClock"]["status"], "STOPPED");
    assert_eq!(data["gameClock"]["remaining"], "00:00");
}
