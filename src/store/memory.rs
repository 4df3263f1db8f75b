//! メモリ上のストア実装
//! スレッドセーフなDashMapでレコードを保持する。プロセス終了で内容は失われる。

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    GameRecord, GameResultRecord, GameStore, MoveRecord, MoveStore, SquareRecord, SquareStore,
    StoreResult, TurnRecord, TurnStore,
};
use crate::error::PersistenceError;
use crate::game::Turn;

#[derive(Debug, Default)]
pub struct MemoryStore {
    /// 開始順に並んだ対局
    games: RwLock<Vec<GameRecord>>,
    results: DashMap<Uuid, GameResultRecord>,
    turns: DashMap<(Uuid, u32), TurnRecord>,
    squares: DashMap<Uuid, Vec<SquareRecord>>,
    moves: DashMap<Uuid, MoveRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub(crate) fn turn_count(&self) -> usize {
        self.turns.len()
    }
}

#[async_trait]
impl GameStore for MemoryStore {
    async fn find_latest(&self) -> StoreResult<Option<GameRecord>> {
        Ok(self.games.read().await.last().cloned())
    }

    async fn insert(&self, started_at: DateTime<Utc>) -> StoreResult<GameRecord> {
        let record = GameRecord {
            id: Uuid::new_v4(),
            started_at,
        };
        self.games.write().await.push(record.clone());
        Ok(record)
    }

    async fn find_result(&self, game_id: Uuid) -> StoreResult<Option<GameResultRecord>> {
        Ok(self.results.get(&game_id).map(|entry| entry.value().clone()))
    }

    async fn insert_result(&self, record: GameResultRecord) -> StoreResult<()> {
        self.results.insert(record.game_id, record);
        Ok(())
    }
}

#[async_trait]
impl TurnStore for MemoryStore {
    async fn find_for_game_and_turn_count(
        &self,
        game_id: Uuid,
        turn_count: u32,
    ) -> StoreResult<Option<TurnRecord>> {
        Ok(self
            .turns
            .get(&(game_id, turn_count))
            .map(|entry| entry.value().clone()))
    }

    async fn append(&self, game_id: Uuid, turn: &Turn, end_at: DateTime<Utc>) -> StoreResult<TurnRecord> {
        let turn_count = turn.turn_count();
        match self.turns.entry((game_id, turn_count)) {
            Entry::Occupied(_) => Err(PersistenceError::DuplicateTurn { game_id, turn_count }),
            Entry::Vacant(slot) => {
                let record = TurnRecord::new(game_id, turn, end_at);

                // ターンが見える前にマスと着手を揃えておく
                self.squares
                    .insert(record.id, SquareRecord::decompose(record.id, turn.board()));
                if let Some(game_move) = turn.last_move() {
                    self.moves.insert(record.id, MoveRecord::new(record.id, game_move));
                }

                slot.insert(record.clone());
                Ok(record)
            }
        }
    }
}

#[async_trait]
impl SquareStore for MemoryStore {
    async fn find_for_turn(&self, turn_id: Uuid) -> StoreResult<Vec<SquareRecord>> {
        Ok(self
            .squares
            .get(&turn_id)
            .map(|entry| entry.value().clone())
            .unwrap_or_default())
    }
}

#[async_trait]
impl MoveStore for MemoryStore {
    async fn find_for_turn(&self, turn_id: Uuid) -> StoreResult<Option<MoveRecord>> {
        Ok(self.moves.get(&turn_id).map(|entry| entry.value().clone()))
    }
}
