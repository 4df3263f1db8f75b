//! ターンAPI データ転送オブジェクト (DTO)

use axum::{http::StatusCode, response::Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{GameError, ServiceError};
use crate::game::{Disc, Move, Position};
use crate::service::TurnView;

/// `GET /api/games/latest/turns/:turnCount` のレスポンス
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TurnResponse {
    pub turn_count: u32,
    /// `board[y][x]` に石の数値コード
    pub board: [[u8; 8]; 8],
    pub next_disc: Option<u8>,
    pub winner_disc: Option<u8>,
}

impl From<TurnView> for TurnResponse {
    fn from(view: TurnView) -> Self {
        let mut board = [[0u8; 8]; 8];
        for (y, row) in view.board.to_rows().iter().enumerate() {
            for (x, disc) in row.iter().enumerate() {
                board[y][x] = disc.code();
            }
        }

        Self {
            turn_count: view.turn_count,
            board,
            next_disc: view.next_disc.map(|player| player.to_disc().code()),
            winner_disc: view.winner.map(|winner| winner.code()),
        }
    }
}

/// `POST /api/games/latest/turns` のリクエスト
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterTurnRequest {
    pub turn_count: u32,
    #[serde(rename = "move")]
    pub game_move: MoveBody,
}

#[derive(Debug, Deserialize)]
pub struct MoveBody {
    pub disc: i64,
    pub x: i64,
    pub y: i64,
}

impl MoveBody {
    /// 数値の石コードと座標をエンジンの着手に変換する
    /// 空マス・未知のコード・盤外の座標は無効な着手として扱う
    pub fn to_move(&self) -> Result<Move, GameError> {
        let mover = u8::try_from(self.disc)
            .ok()
            .and_then(Disc::from_code)
            .and_then(Disc::owner)
            .ok_or_else(|| GameError::InvalidMove {
                reason: format!("disc {} cannot move", self.disc),
            })?;

        let position = Position::from_signed(self.x, self.y).ok_or_else(|| GameError::InvalidMove {
            reason: format!("({}, {}) is outside the board", self.x, self.y),
        })?;

        Ok(Move::new(mover, position))
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub error_code: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            timestamp: Utc::now(),
            error_code: None,
        }
    }

    pub fn with_code(error: impl Into<String>, message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            error_code: Some(code.into()),
            ..Self::new(error, message)
        }
    }
}

impl ServiceError {
    pub fn error_code(&self) -> &'static str {
        match self {
            ServiceError::GameNotFound => "GAME_NOT_FOUND",
            ServiceError::TurnNotFound { .. } => "TURN_NOT_FOUND",
            ServiceError::TurnAlreadyExists { .. } => "TURN_ALREADY_EXISTS",
            ServiceError::Game(GameError::InvalidMove { .. }) => "INVALID_MOVE",
            ServiceError::Game(GameError::OutOfTurn { .. }) => "OUT_OF_TURN",
            ServiceError::Game(GameError::GameOver) => "GAME_OVER",
            ServiceError::Game(GameError::NotTerminal) => "NOT_TERMINAL",
            ServiceError::Persistence(_) => "PERSISTENCE_ERROR",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::GameNotFound => StatusCode::NOT_FOUND,
            ServiceError::TurnNotFound { .. } => StatusCode::NOT_FOUND,
            ServiceError::TurnAlreadyExists { .. } => StatusCode::CONFLICT,
            ServiceError::Game(GameError::InvalidMove { .. }) => StatusCode::BAD_REQUEST,
            ServiceError::Game(GameError::OutOfTurn { .. }) => StatusCode::CONFLICT,
            ServiceError::Game(GameError::GameOver) => StatusCode::CONFLICT,
            ServiceError::Game(GameError::NotTerminal) => StatusCode::CONFLICT,
            ServiceError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ServiceError> for (StatusCode, Json<ErrorResponse>) {
    fn from(err: ServiceError) -> Self {
        let status_code = err.status_code();
        let error_response = ErrorResponse::with_code(err.error_code(), err.to_string(), err.error_code());

        (status_code, Json(error_response))
    }
}
