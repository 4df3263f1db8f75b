//! ターン進行モジュール
//! 1手ごとに合法性を検証して盤面を更新し、次の手番（パス・終局を含む）を決定する。

use tracing::{debug, instrument};

use super::board::BoardState;
use super::flip::FlipEngine;
use super::rules::MoveValidator;
use super::types::{Move, Player};
use crate::error::{GameError, Result};

/// 1手分の局面
///
/// `next_mover` が `None` のとき終局。`last_move` が `None` になるのは0手目のみ。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    turn_count: u32,
    board: BoardState,
    next_mover: Option<Player>,
    last_move: Option<Move>,
}

impl Turn {
    /// 0手目（標準初期配置、黒番）
    pub fn initial() -> Self {
        Self {
            turn_count: 0,
            board: BoardState::initial(),
            next_mover: Some(Player::Dark),
            last_move: None,
        }
    }

    /// 永続化された値から局面を復元する
    pub fn from_parts(
        turn_count: u32,
        board: BoardState,
        next_mover: Option<Player>,
        last_move: Option<Move>,
    ) -> Self {
        Self {
            turn_count,
            board,
            next_mover,
            last_move,
        }
    }

    pub fn turn_count(&self) -> u32 {
        self.turn_count
    }

    pub fn board(&self) -> &BoardState {
        &self.board
    }

    pub fn next_mover(&self) -> Option<Player> {
        self.next_mover
    }

    pub fn last_move(&self) -> Option<Move> {
        self.last_move
    }

    pub fn is_terminal(&self) -> bool {
        self.next_mover.is_none()
    }
}

impl Default for Turn {
    fn default() -> Self {
        Self::initial()
    }
}

/// 手番の状態遷移を管理する構造体
pub struct TurnEngine;

impl TurnEngine {
    /// 現在の局面に着手を適用し、次の局面を返す
    ///
    /// 終局後の着手は `GameOver`、手番違いは `OutOfTurn`、
    /// 挟めない・埋まっているマスへの着手は `InvalidMove` になる。
    #[instrument(level = "debug", skip(current), fields(turn_count = current.turn_count()))]
    pub fn next_turn(current: &Turn, game_move: Move) -> Result<Turn> {
        let expected = current.next_mover.ok_or(GameError::GameOver)?;

        if game_move.mover != expected {
            return Err(GameError::OutOfTurn {
                expected,
                actual: game_move.mover,
            });
        }

        if !MoveValidator::is_legal(&current.board, game_move.mover, game_move.position) {
            return Err(GameError::InvalidMove {
                reason: format!(
                    "({}, {}) is not a legal move for {:?}",
                    game_move.position.x(),
                    game_move.position.y(),
                    game_move.mover
                ),
            });
        }

        let board = FlipEngine::apply_move(&current.board, game_move.mover, game_move.position);
        let next_mover = Self::decide_next_mover(&board, game_move.mover);

        match next_mover {
            Some(player) if player == game_move.mover => {
                debug!(?player, "opponent has no legal move, same player moves again");
            }
            None => debug!("neither player has a legal move, game is over"),
            _ => {}
        }

        Ok(Turn {
            turn_count: current.turn_count + 1,
            board,
            next_mover,
            last_move: Some(game_move),
        })
    }

    /// 着手後の盤面から次の手番を決める
    /// 相手 → 自分（相手はパス） → なし（終局）の順に判定する
    fn decide_next_mover(board: &BoardState, mover: Player) -> Option<Player> {
        let opponent = mover.opposite();
        if MoveValidator::has_legal_move(board, opponent) {
            Some(opponent)
        } else if MoveValidator::has_legal_move(board, mover) {
            Some(mover)
        } else {
            None
        }
    }
}
