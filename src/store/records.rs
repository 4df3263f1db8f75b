//! 永続化レコード定義モジュール
//! 盤面の64マスへの分解と、マス単位のレコードからの盤面復元もここで行う。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::game::{BoardError, BoardState, Disc, GameResult, Move, Player, Position, Turn, Winner};

/// 対局の記録
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
}

/// ターンの記録（盤面と着手は別レコード）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRecord {
    pub id: Uuid,
    pub game_id: Uuid,
    pub turn_count: u32,
    /// 終局後はNone
    pub next_disc: Option<Player>,
    pub end_at: DateTime<Utc>,
}

impl TurnRecord {
    /// 新しいIDを振ってターンのレコードを作る
    pub fn new(game_id: Uuid, turn: &Turn, end_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            game_id,
            turn_count: turn.turn_count(),
            next_disc: turn.next_mover(),
            end_at,
        }
    }
}

/// 1マス分の記録
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SquareRecord {
    pub turn_id: Uuid,
    pub x: u8,
    pub y: u8,
    pub disc: Disc,
}

impl SquareRecord {
    /// 盤面を64件のマスレコードに分解する
    pub fn decompose(turn_id: Uuid, board: &BoardState) -> Vec<SquareRecord> {
        board
            .squares()
            .map(|(position, disc)| SquareRecord {
                turn_id,
                x: position.x() as u8,
                y: position.y() as u8,
                disc,
            })
            .collect()
    }

    /// マスレコードから盤面を復元する
    /// レコードの順序は問わないが、64マスちょうど1件ずつ揃っている必要がある
    pub fn reconstruct(records: &[SquareRecord]) -> Result<BoardState, BoardError> {
        let squares = records
            .iter()
            .map(|record| {
                Position::new(record.x as usize, record.y as usize)
                    .map(|position| (position, record.disc))
                    .ok_or(BoardError::OutOfRange {
                        x: record.x as i64,
                        y: record.y as i64,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        BoardState::from_squares(squares)
    }
}

/// 着手の記録
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    pub turn_id: Uuid,
    pub disc: Player,
    pub x: u8,
    pub y: u8,
}

impl MoveRecord {
    pub fn new(turn_id: Uuid, game_move: Move) -> Self {
        Self {
            turn_id,
            disc: game_move.mover,
            x: game_move.position.x() as u8,
            y: game_move.position.y() as u8,
        }
    }

    pub fn to_move(&self) -> Result<Move, BoardError> {
        let position = Position::new(self.x as usize, self.y as usize).ok_or(BoardError::OutOfRange {
            x: self.x as i64,
            y: self.y as i64,
        })?;
        Ok(Move::new(self.disc, position))
    }
}

/// 終局結果の記録
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResultRecord {
    pub game_id: Uuid,
    pub winner: Winner,
    pub dark_count: u8,
    pub light_count: u8,
    pub end_at: DateTime<Utc>,
}

impl GameResultRecord {
    pub fn new(game_id: Uuid, result: GameResult, end_at: DateTime<Utc>) -> Self {
        Self {
            game_id,
            winner: result.winner,
            dark_count: result.dark_count,
            light_count: result.light_count,
            end_at,
        }
    }
}
