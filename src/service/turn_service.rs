//! ターン取得・登録サービス
//! ストアから局面を復元してエンジンに渡し、生成された局面を保存する。
//! 同じ対局への着手は対局ごとの非同期Mutexで直列化する。
//! 対局の開始は `games` の書き込みロックを取り、進行中の着手と重ならないようにする。

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tokio::sync::{Mutex, RwLock};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::error::{PersistenceError, ServiceError, ServiceResult};
use crate::game::{BoardState, GameResult, Move, Player, Turn, TurnEngine, Winner};
use crate::store::{GameRecord, GameResultRecord, SquareRecord, Stores};

/// 指定ターンの取得結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnView {
    pub turn_count: u32,
    pub board: BoardState,
    pub next_disc: Option<Player>,
    /// 終局している場合のみ設定される
    pub winner: Option<Winner>,
}

pub struct TurnService {
    stores: Stores,
    /// 対局の開始と着手の順序付け（開始が書き込み側）
    games: RwLock<()>,
    /// 対局IDごとの書き込みロック
    locks: DashMap<Uuid, Arc<Mutex<()>>>,
}

impl std::fmt::Debug for TurnService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TurnService")
            .field("locked_games", &self.locks.len())
            .finish()
    }
}

impl TurnService {
    pub fn new(stores: Stores) -> Self {
        Self {
            stores,
            games: RwLock::new(()),
            locks: DashMap::new(),
        }
    }

    /// 新しい対局を開始し、0手目を保存する
    #[instrument(skip(self))]
    pub async fn start_game(&self) -> ServiceResult<Turn> {
        let _gate = self.games.write().await;
        // 着手できるのは最新の対局だけなので、古い対局のロックは不要になる
        self.locks.clear();

        let now = Utc::now();
        let game = self.stores.games.insert(now).await?;
        let turn = Turn::initial();
        self.save_turn(game.id, &turn, now).await?;

        info!(game_id = %game.id, "game started");
        Ok(turn)
    }

    /// 最新の対局から指定ターンの局面を取得する
    #[instrument(skip(self))]
    pub async fn find_latest_game_turn_by_turn_count(&self, turn_count: u32) -> ServiceResult<TurnView> {
        let game = self.latest_game().await?;
        let turn = self
            .load_turn(game.id, turn_count)
            .await?
            .ok_or(ServiceError::TurnNotFound { turn_count })?;

        let winner = if turn.is_terminal() {
            Some(self.winner_for(&game, &turn).await?)
        } else {
            None
        };

        Ok(TurnView {
            turn_count: turn.turn_count(),
            board: turn.board().clone(),
            next_disc: turn.next_mover(),
            winner,
        })
    }

    /// 最新の対局に `turn_count` 手目を登録する
    ///
    /// 直前 (`turn_count - 1`) の局面に着手を適用し、結果を保存する。
    /// エンジンがエラーを返した場合は何も保存しない。
    #[instrument(skip(self))]
    pub async fn register_turn(&self, turn_count: u32, game_move: Move) -> ServiceResult<Turn> {
        let _gate = self.games.read().await;
        let game = self.latest_game().await?;

        let lock = self.lock_for(game.id);
        let _guard = lock.lock().await;

        let previous_count = turn_count
            .checked_sub(1)
            .ok_or(ServiceError::TurnNotFound { turn_count })?;
        let previous = self
            .load_turn(game.id, previous_count)
            .await?
            .ok_or(ServiceError::TurnNotFound { turn_count: previous_count })?;

        if self
            .stores
            .turns
            .find_for_game_and_turn_count(game.id, turn_count)
            .await?
            .is_some()
        {
            warn!(turn_count, "turn already registered");
            return Err(ServiceError::TurnAlreadyExists { turn_count });
        }

        let next = TurnEngine::next_turn(&previous, game_move)?;

        let now = Utc::now();
        self.save_turn(game.id, &next, now).await?;

        if next.is_terminal() {
            let result = GameResult::winner(&next)?;
            self.stores
                .games
                .insert_result(GameResultRecord::new(game.id, result, now))
                .await?;
            self.locks.remove(&game.id);
            info!(game_id = %game.id, winner = ?result.winner, "game finished");
        }

        Ok(next)
    }

    async fn latest_game(&self) -> ServiceResult<GameRecord> {
        self.stores
            .games
            .find_latest()
            .await?
            .ok_or(ServiceError::GameNotFound)
    }

    fn lock_for(&self, game_id: Uuid) -> Arc<Mutex<()>> {
        self.locks.entry(game_id).or_default().clone()
    }

    /// ターン・マス・着手のレコードから局面を復元する
    async fn load_turn(&self, game_id: Uuid, turn_count: u32) -> ServiceResult<Option<Turn>> {
        let Some(record) = self
            .stores
            .turns
            .find_for_game_and_turn_count(game_id, turn_count)
            .await?
        else {
            return Ok(None);
        };

        let squares = self.stores.squares.find_for_turn(record.id).await?;
        let board = SquareRecord::reconstruct(&squares).map_err(PersistenceError::from)?;

        let last_move = if record.turn_count == 0 {
            None
        } else {
            let move_record = self
                .stores
                .moves
                .find_for_turn(record.id)
                .await?
                .ok_or(PersistenceError::MissingMove { turn_count })?;
            Some(move_record.to_move().map_err(PersistenceError::from)?)
        };

        Ok(Some(Turn::from_parts(
            record.turn_count,
            board,
            record.next_disc,
            last_move,
        )))
    }

    async fn save_turn(&self, game_id: Uuid, turn: &Turn, end_at: DateTime<Utc>) -> ServiceResult<()> {
        self.stores.turns.append(game_id, turn, end_at).await?;
        Ok(())
    }

    /// 保存済みの結果を優先し、なければ盤面から計算する
    async fn winner_for(&self, game: &GameRecord, turn: &Turn) -> ServiceResult<Winner> {
        if let Some(record) = self.stores.games.find_result(game.id).await? {
            return Ok(record.winner);
        }
        Ok(GameResult::winner(turn)?.winner)
    }
}
