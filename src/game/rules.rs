//! 合法手判定モジュール
//! 8方向の走査による挟み判定と、合法手の列挙を担当する。

use super::board::BoardState;
use super::types::{Disc, Player, Position};

/// 盤面上の8方向への移動ベクトル (dx, dy)
pub(crate) const DIRECTIONS: [(i8, i8); 8] = [
    (-1, -1), (0, -1), (1, -1),  // 左上、上、右上
    (-1, 0),           (1, 0),   // 左、右
    (-1, 1),  (0, 1),  (1, 1),   // 左下、下、右下
];

/// 指定方向に連続する相手の石のうち、自分の石で挟まれているものを返す
/// 挟めない場合（長さ0、空マスや盤外で途切れる）は空のVecを返す
pub(crate) fn capture_run(
    board: &BoardState,
    mover: Player,
    origin: Position,
    direction: (i8, i8),
) -> Vec<Position> {
    let own = mover.to_disc();
    let opponent = mover.opposite().to_disc();
    let mut run = Vec::new();
    let mut cursor = origin.step(direction);

    while let Some(current) = cursor {
        match board.get(current) {
            disc if disc == opponent => run.push(current),
            disc if disc == own => return run,
            _ => break,
        }
        cursor = current.step(direction);
    }

    Vec::new()
}

/// 合法手の判定を行う構造体
/// スタティックメソッドのみを提供する
pub struct MoveValidator;

impl MoveValidator {
    /// 指定した位置に `mover` が置けるかチェックする
    /// 空マスで、かつ少なくとも1方向で相手の石を挟める必要がある
    pub fn is_legal(board: &BoardState, mover: Player, position: Position) -> bool {
        if board.get(position) != Disc::Empty {
            return false;
        }

        DIRECTIONS
            .iter()
            .any(|&direction| !capture_run(board, mover, position, direction).is_empty())
    }

    /// 合法手をすべて行優先 (y昇順、次にx昇順) で列挙する
    pub fn legal_moves(board: &BoardState, mover: Player) -> Vec<Position> {
        (0..8)
            .flat_map(|y| (0..8).filter_map(move |x| Position::new(x, y)))
            .filter(|&position| Self::is_legal(board, mover, position))
            .collect()
    }

    /// 合法手が1つでもあるかチェックする
    /// パス判定に使用される
    pub fn has_legal_move(board: &BoardState, mover: Player) -> bool {
        (0..64).any(|index| Self::is_legal(board, mover, Position::from_index(index)))
    }
}
