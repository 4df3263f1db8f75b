//! JSONファイルによるストア実装
//! 全レコードを1つのJSONドキュメントとして保持し、更新のたびにファイルへ書き出す。

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use super::{
    GameRecord, GameResultRecord, GameStore, MoveRecord, MoveStore, SquareRecord, SquareStore,
    StoreResult, TurnRecord, TurnStore,
};
use crate::error::PersistenceError;
use crate::game::Turn;

/// ファイルに書き出すドキュメント全体
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StoreDocument {
    games: Vec<GameRecord>,
    results: Vec<GameResultRecord>,
    turns: Vec<TurnRecord>,
    squares: Vec<SquareRecord>,
    moves: Vec<MoveRecord>,
}

#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    document: Mutex<StoreDocument>,
}

impl FileStore {
    /// 指定したファイルを開く
    /// ファイルが存在しない場合は空のストアとして開始する
    pub async fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        let document = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => StoreDocument::default(),
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            path,
            document: Mutex::new(document),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// ドキュメントのコピーを変更して書き出し、成功した場合のみ反映する
    async fn update<T, F>(&self, change: F) -> StoreResult<T>
    where
        F: FnOnce(&mut StoreDocument) -> StoreResult<T>,
    {
        let mut document = self.document.lock().await;
        let mut draft = document.clone();
        let value = change(&mut draft)?;

        self.write(&draft).await?;
        *document = draft;
        Ok(value)
    }

    async fn write(&self, document: &StoreDocument) -> StoreResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let content = serde_json::to_vec_pretty(document)?;
        let staging = self.path.with_extension("json.tmp");
        tokio::fs::write(&staging, content).await?;
        tokio::fs::rename(&staging, &self.path).await?;

        debug!(path = %self.path.display(), "store document written");
        Ok(())
    }
}

#[async_trait]
impl GameStore for FileStore {
    async fn find_latest(&self) -> StoreResult<Option<GameRecord>> {
        Ok(self.document.lock().await.games.last().cloned())
    }

    async fn insert(&self, started_at: DateTime<Utc>) -> StoreResult<GameRecord> {
        let record = GameRecord {
            id: Uuid::new_v4(),
            started_at,
        };
        self.update(|document| {
            document.games.push(record.clone());
            Ok(record)
        })
        .await
    }

    async fn find_result(&self, game_id: Uuid) -> StoreResult<Option<GameResultRecord>> {
        let document = self.document.lock().await;
        Ok(document
            .results
            .iter()
            .find(|record| record.game_id == game_id)
            .cloned())
    }

    async fn insert_result(&self, record: GameResultRecord) -> StoreResult<()> {
        self.update(|document| {
            document.results.retain(|existing| existing.game_id != record.game_id);
            document.results.push(record);
            Ok(())
        })
        .await
    }
}

#[async_trait]
impl TurnStore for FileStore {
    async fn find_for_game_and_turn_count(
        &self,
        game_id: Uuid,
        turn_count: u32,
    ) -> StoreResult<Option<TurnRecord>> {
        let document = self.document.lock().await;
        Ok(document
            .turns
            .iter()
            .find(|record| record.game_id == game_id && record.turn_count == turn_count)
            .cloned())
    }

    async fn append(&self, game_id: Uuid, turn: &Turn, end_at: DateTime<Utc>) -> StoreResult<TurnRecord> {
        let record = TurnRecord::new(game_id, turn, end_at);
        let squares = SquareRecord::decompose(record.id, turn.board());
        let game_move = turn.last_move().map(|game_move| MoveRecord::new(record.id, game_move));

        self.update(|document| {
            let turn_count = record.turn_count;
            let exists = document
                .turns
                .iter()
                .any(|existing| existing.game_id == game_id && existing.turn_count == turn_count);
            if exists {
                return Err(PersistenceError::DuplicateTurn { game_id, turn_count });
            }

            document.turns.push(record.clone());
            document.squares.extend(squares);
            document.moves.extend(game_move);
            Ok(record)
        })
        .await
    }
}

#[async_trait]
impl SquareStore for FileStore {
    async fn find_for_turn(&self, turn_id: Uuid) -> StoreResult<Vec<SquareRecord>> {
        let document = self.document.lock().await;
        Ok(document
            .squares
            .iter()
            .filter(|record| record.turn_id == turn_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl MoveStore for FileStore {
    async fn find_for_turn(&self, turn_id: Uuid) -> StoreResult<Option<MoveRecord>> {
        let document = self.document.lock().await;
        Ok(document
            .moves
            .iter()
            .find(|record| record.turn_id == turn_id)
            .cloned())
    }
}
