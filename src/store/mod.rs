//! 永続化層の抽象化モジュール
//! 対局・ターン・マス・着手の各ストアをtraitとして定義し、
//! 実装（メモリ、JSONファイル）を統一したインターフェースで提供する。

pub mod records;
pub mod memory;
pub mod file;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::config::{StorageBackend, StorageConfig};
use crate::error::PersistenceError;
use crate::game::Turn;

pub use records::*;
pub use memory::MemoryStore;
pub use file::FileStore;

pub type StoreResult<T> = std::result::Result<T, PersistenceError>;

/// 対局レコードのストア
#[async_trait]
pub trait GameStore: Send + Sync {
    /// 最後に開始された対局を返す
    async fn find_latest(&self) -> StoreResult<Option<GameRecord>>;

    async fn insert(&self, started_at: DateTime<Utc>) -> StoreResult<GameRecord>;

    async fn find_result(&self, game_id: Uuid) -> StoreResult<Option<GameResultRecord>>;

    async fn insert_result(&self, record: GameResultRecord) -> StoreResult<()>;
}

/// ターンレコードのストア
///
/// ターン・マス・着手は `append` でまとめて書き込む。
/// 途中で失敗した場合はどのレコードも残らない。
#[async_trait]
pub trait TurnStore: Send + Sync {
    async fn find_for_game_and_turn_count(
        &self,
        game_id: Uuid,
        turn_count: u32,
    ) -> StoreResult<Option<TurnRecord>>;

    /// 局面をターン・64マス・着手のレコードとして1回で保存する
    /// 同じ (対局, ターン番号) が既にあれば `DuplicateTurn`
    async fn append(&self, game_id: Uuid, turn: &Turn, end_at: DateTime<Utc>) -> StoreResult<TurnRecord>;
}

/// マスレコードのストア
#[async_trait]
pub trait SquareStore: Send + Sync {
    async fn find_for_turn(&self, turn_id: Uuid) -> StoreResult<Vec<SquareRecord>>;
}

/// 着手レコードのストア
#[async_trait]
pub trait MoveStore: Send + Sync {
    async fn find_for_turn(&self, turn_id: Uuid) -> StoreResult<Option<MoveRecord>>;
}

/// サービス層に注入するストア一式
#[derive(Clone)]
pub struct Stores {
    pub games: Arc<dyn GameStore>,
    pub turns: Arc<dyn TurnStore>,
    pub squares: Arc<dyn SquareStore>,
    pub moves: Arc<dyn MoveStore>,
}

impl std::fmt::Debug for Stores {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stores").finish_non_exhaustive()
    }
}

impl Stores {
    /// 4種類すべてを実装したバックエンドから作成する
    pub fn from_backend<S>(backend: Arc<S>) -> Self
    where
        S: GameStore + TurnStore + SquareStore + MoveStore + 'static,
    {
        Self {
            games: backend.clone(),
            turns: backend.clone(),
            squares: backend.clone(),
            moves: backend,
        }
    }

    pub fn memory() -> Self {
        Self::from_backend(Arc::new(MemoryStore::new()))
    }

    /// 設定に基づいてバックエンドを選択する
    pub async fn from_config(config: &StorageConfig) -> StoreResult<Self> {
        match config.backend {
            StorageBackend::Memory => Ok(Self::memory()),
            StorageBackend::File => {
                let store = FileStore::open(&config.path).await?;
                Ok(Self::from_backend(Arc::new(store)))
            }
        }
    }
}
