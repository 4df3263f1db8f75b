//! アプリケーション全体のエラー定義モジュール
//! ゲームエンジン、永続化、サービス層のエラーを統一管理。

use thiserror::Error;

use crate::game::{BoardError, Player};

/// ゲームエンジンが返すエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("Invalid move: {reason}")]
    InvalidMove { reason: String },

    #[error("Out of turn: {actual:?} moved but {expected:?} is to move")]
    OutOfTurn { expected: Player, actual: Player },

    #[error("Game is already over")]
    GameOver,

    #[error("Game is not over yet")]
    NotTerminal,
}

/// データ永続化に関連するエラー
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("File I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },

    #[error("Stored board is corrupt: {source}")]
    CorruptBoard {
        #[from]
        source: BoardError,
    },

    #[error("Stored move for turn {turn_count} is missing")]
    MissingMove { turn_count: u32 },

    #[error("Turn {turn_count} is already stored for game {game_id}")]
    DuplicateTurn { game_id: uuid::Uuid, turn_count: u32 },
}

/// ターン取得・登録のサービス層エラー
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Latest game not found")]
    GameNotFound,

    #[error("Turn {turn_count} not found")]
    TurnNotFound { turn_count: u32 },

    #[error("Turn {turn_count} has already been registered")]
    TurnAlreadyExists { turn_count: u32 },

    #[error(transparent)]
    Game(#[from] GameError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

/// ゲームエラーをベースとした結果型
pub type Result<T> = std::result::Result<T, GameError>;

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;
