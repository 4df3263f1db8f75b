//! 石のフリップ処理モジュール
//! 合法手を適用した結果の盤面（着手 + 挟んだ石の反転）を計算する。

use super::board::BoardState;
use super::rules::{capture_run, MoveValidator, DIRECTIONS};
use super::types::{Player, Position};

pub struct FlipEngine;

impl FlipEngine {
    /// 指定した位置に置いた場合に反転する石を返す
    /// 8方向すべてを元の盤面に対して独立に走査する
    pub fn captures(board: &BoardState, mover: Player, position: Position) -> Vec<Position> {
        DIRECTIONS
            .iter()
            .flat_map(|&direction| capture_run(board, mover, position, direction))
            .collect()
    }

    /// 合法手を適用した新しい盤面を返す
    ///
    /// 呼び出し側は `MoveValidator::is_legal` が成り立つことを保証する必要がある。
    /// 違反の検出とエラー化は `TurnEngine` の責務。
    pub fn apply_move(board: &BoardState, mover: Player, position: Position) -> BoardState {
        debug_assert!(
            MoveValidator::is_legal(board, mover, position),
            "apply_move called with an illegal move {:?} at {:?}",
            mover,
            position
        );

        let captured = Self::captures(board, mover, position);
        board
            .with_all(captured, mover.to_disc())
            .with(position, mover.to_disc())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::types::Disc;

    fn pos(x: usize, y: usize) -> Position {
        Position::new(x, y).unwrap()
    }

    #[test]
    fn test_captures_opening_move() {
        let board = BoardState::initial();
        let captured = FlipEngine::captures(&board, Player::Dark, pos(2, 3));
        assert_eq!(captured, vec![pos(3, 3)]);
    }

    #[test]
    fn test_apply_move_opening() {
        let board = BoardState::initial();
        let next = FlipEngine::apply_move(&board, Player::Dark, pos(2, 3));

        assert_eq!(next.get(pos(2, 3)), Disc::Dark);
        assert_eq!(next.get(pos(3, 3)), Disc::Dark);
        let counts = next.count_discs();
        assert_eq!((counts.dark, counts.light), (4, 1));
        // 元の盤面は変わらない
        assert_eq!(board, BoardState::initial());
    }

    #[test]
    fn test_multiple_directions_flip_together() {
        // 中央(3,3)に黒を置くと、左右と上の3方向で白を挟む
        let board = BoardState::empty()
            .with(pos(1, 3), Disc::Dark)
            .with(pos(2, 3), Disc::Light)
            .with(pos(4, 3), Disc::Light)
            .with(pos(5, 3), Disc::Light)
            .with(pos(6, 3), Disc::Dark)
            .with(pos(3, 2), Disc::Light)
            .with(pos(3, 1), Disc::Dark)
            .with(pos(3, 4), Disc::Light);

        let mut captured = FlipEngine::captures(&board, Player::Dark, pos(3, 3));
        captured.sort();
        assert_eq!(captured, vec![pos(2, 3), pos(3, 2), pos(4, 3), pos(5, 3)]);

        let next = FlipEngine::apply_move(&board, Player::Dark, pos(3, 3));
        // 下方向は挟めていないので白のまま
        assert_eq!(next.get(pos(3, 4)), Disc::Light);
        assert_eq!(next.occupied(), board.occupied() + 1);
    }

    #[test]
    fn test_scan_uses_original_board() {
        // 片方向の反転結果が別方向の判定に影響しないこと
        let board = BoardState::empty()
            .with(pos(1, 0), Disc::Light)
            .with(pos(2, 0), Disc::Dark)
            .with(pos(0, 1), Disc::Light)
            .with(pos(1, 1), Disc::Light);

        let next = FlipEngine::apply_move(&board, Player::Dark, pos(0, 0));
        assert_eq!(next.get(pos(1, 0)), Disc::Dark);
        assert_eq!(next.get(pos(0, 1)), Disc::Light);
        assert_eq!(next.get(pos(1, 1)), Disc::Light);
    }
}
