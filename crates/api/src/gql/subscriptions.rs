use async_graphql::{Context, Result, Subscription, ID};
use futures_util::Stream;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio_stream::wrappers::{errors::BroadcastStreamRecvError, BroadcastStream};
use uuid::Uuid;

use crate::gql::domains::games::types::{GameClock, GameResult};
use crate::gql::error::{GqlError, ResultExt};
use crate::state::AppState;

/// Per-game channels for real-time updates
struct GameChannels {
    clock: broadcast::Sender<GameClock>,
    result: broadcast::Sender<GameResult>,
}

impl GameChannels {
    fn new() -> Self {
        Self {
            clock: broadcast::channel(100).0,
            result: broadcast::channel(100).0,
        }
    }
}

struct SubscriptionChannels {
    games: HashMap<Uuid, GameChannels>,
}

impl SubscriptionChannels {
    fn new() -> Self {
        Self {
            games: HashMap::new(),
        }
    }

    fn get_or_create_game(&mut self, game_id: Uuid) -> &GameChannels {
        self.games.entry(game_id).or_insert_with(GameChannels::new)
    }
}

static CHANNELS: Lazy<Arc<Mutex<SubscriptionChannels>>> =
    Lazy::new(|| Arc::new(Mutex::new(SubscriptionChannels::new())));

/// Channels are only opened for games that exist.
async fn existing_game(ctx: &Context<'_>, game_id: &ID) -> Result<Uuid> {
    let game_uuid = Uuid::parse_str(game_id.as_str()).gql_err("Invalid game ID")?;
    let state = ctx.data::<AppState>()?;
    infra::repos::games::get_by_id(&state.db, game_uuid)
        .await
        .map_err(GqlError::from)?
        .ok_or_else(|| GqlError::not_found("Game"))?;
    Ok(game_uuid)
}

pub struct SubscriptionRoot;

#[Subscription]
impl SubscriptionRoot {
    /// Clock changes of one game: start, pause, period switches and expiry
    async fn game_clock_updates(
        &self,
        ctx: &Context<'_>,
        game_id: ID,
    ) -> Result<impl Stream<Item = Result<GameClock, BroadcastStreamRecvError>>> {
        let game_uuid = existing_game(ctx, &game_id).await?;

        let receiver = {
            let mut channels = CHANNELS.lock();
            channels.get_or_create_game(game_uuid).clock.subscribe()
        };

        Ok(BroadcastStream::new(receiver))
    }

    /// Score and counter changes of one game
    async fn game_result_updates(
        &self,
        ctx: &Context<'_>,
        game_id: ID,
    ) -> Result<impl Stream<Item = Result<GameResult, BroadcastStreamRecvError>>> {
        let game_uuid = existing_game(ctx, &game_id).await?;

        let receiver = {
            let mut channels = CHANNELS.lock();
            channels.get_or_create_game(game_uuid).result.subscribe()
        };

        Ok(BroadcastStream::new(receiver))
    }
}

/// Publish a clock update to a game's channel, if anyone subscribed to it
pub fn publish_clock_update(game_id: Uuid, clock: GameClock) {
    if let Some(channels) = CHANNELS.lock().games.get(&game_id) {
        let _ = channels.clock.send(clock);
    }
}

/// Publish a result update to a game's channel, if anyone subscribed to it
pub fn publish_result_update(game_id: Uuid, result: GameResult) {
    if let Some(channels) = CHANNELS.lock().games.get(&game_id) {
        let _ = channels.result.send(result);
    }
}

/// Drop a game's channels once the game is deleted
pub fn cleanup_game_channels(game_id: Uuid) {
    let mut channels = CHANNELS.lock();
    channels.games.remove(&game_id);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn publishing_without_subscribers_opens_no_channel() {
        let game_id = Uuid::new_v4();
        publish_result_update(game_id, GameResult::empty(game_id));
        assert!(!CHANNELS.lock().games.contains_key(&game_id));
    }

    #[test]
    fn subscribers_receive_results_for_their_game_only() {
        use futures_util::StreamExt;

        let game_id = Uuid::new_v4();
        let other_id = Uuid::new_v4();
        let receiver = CHANNELS.lock().get_or_create_game(game_id).result.subscribe();
        let mut stream = BroadcastStream::new(receiver);

        publish_result_update(other_id, GameResult::empty(other_id));
        publish_result_update(game_id, GameResult::empty(game_id));

        let received = tokio_test::block_on(stream.next())
            .expect("stream open")
            .expect("no lag");
        assert_eq!(received.game_id, ID::from(game_id));

        cleanup_game_channels(game_id);
        cleanup_game_channels(other_id);
    }
}
