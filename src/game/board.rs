//! リバーシの盤面状態を表すモジュール
//! 64マス固定の不変な盤面を提供し、変更は常に新しい盤面として返す。

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::types::{Disc, Position};

/// 盤面の全マス数
pub const SQUARE_COUNT: usize = 64;

/// 外部の64マス分の割り当てから盤面を組み立てる際のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("square ({x}, {y}) is outside the 8x8 board")]
    OutOfRange { x: i64, y: i64 },

    #[error("square ({x}, {y}) is assigned more than once")]
    DuplicateSquare { x: usize, y: usize },

    #[error("board is incomplete: {assigned} of 64 squares assigned")]
    Incomplete { assigned: usize },
}

/// 石の集計結果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscCounts {
    pub dark: u8,
    pub light: u8,
    pub empty: u8,
}

impl DiscCounts {
    /// 石が置かれているマスの数
    pub fn occupied(&self) -> u8 {
        self.dark + self.light
    }
}

/// 8x8リバーシ盤面
/// 行優先の固定長配列で保持する不変な値型。変更操作は新しい盤面を返す
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct BoardState {
    squares: [Disc; SQUARE_COUNT],
}

impl BoardState {
    /// 全マス空の盤面
    pub fn empty() -> Self {
        Self {
            squares: [Disc::Empty; SQUARE_COUNT],
        }
    }

    /// 標準の初期配置
    /// 黒: (4,3), (3,4) / 白: (3,3), (4,4)
    pub fn initial() -> Self {
        let mut squares = [Disc::Empty; SQUARE_COUNT];
        squares[3 * 8 + 3] = Disc::Light;
        squares[3 * 8 + 4] = Disc::Dark;
        squares[4 * 8 + 3] = Disc::Dark;
        squares[4 * 8 + 4] = Disc::Light;
        Self { squares }
    }

    /// `rows[y][x]` 形式の配列から盤面を作成する
    pub fn from_rows(rows: [[Disc; 8]; 8]) -> Self {
        let mut squares = [Disc::Empty; SQUARE_COUNT];
        for (y, row) in rows.iter().enumerate() {
            squares[y * 8..y * 8 + 8].copy_from_slice(row);
        }
        Self { squares }
    }

    /// 任意の順序の (座標, 石) の組から盤面を復元する
    /// 64マスすべてがちょうど1回ずつ割り当てられている必要がある
    pub fn from_squares<I>(squares: I) -> Result<Self, BoardError>
    where
        I: IntoIterator<Item = (Position, Disc)>,
    {
        let mut assigned: [Option<Disc>; SQUARE_COUNT] = [None; SQUARE_COUNT];
        let mut count = 0;

        for (position, disc) in squares {
            let slot = &mut assigned[position.index()];
            if slot.is_some() {
                return Err(BoardError::DuplicateSquare {
                    x: position.x(),
                    y: position.y(),
                });
            }
            *slot = Some(disc);
            count += 1;
        }

        if count != SQUARE_COUNT {
            return Err(BoardError::Incomplete { assigned: count });
        }

        let mut board = [Disc::Empty; SQUARE_COUNT];
        for (target, disc) in board.iter_mut().zip(assigned) {
            *target = disc.unwrap_or(Disc::Empty);
        }
        Ok(Self { squares: board })
    }

    /// 指定した位置の石を取得する
    pub fn get(&self, position: Position) -> Disc {
        self.squares[position.index()]
    }

    /// 指定した位置だけを差し替えた新しい盤面を返す
    /// 元の盤面は変更されない
    pub fn with(&self, position: Position, disc: Disc) -> Self {
        let mut squares = self.squares;
        squares[position.index()] = disc;
        Self { squares }
    }

    /// 複数の位置をまとめて差し替えた新しい盤面を返す
    pub(crate) fn with_all<I>(&self, positions: I, disc: Disc) -> Self
    where
        I: IntoIterator<Item = Position>,
    {
        let mut squares = self.squares;
        for position in positions {
            squares[position.index()] = disc;
        }
        Self { squares }
    }

    /// 黒石・白石・空マスの数を数える
    pub fn count_discs(&self) -> DiscCounts {
        let mut counts = DiscCounts {
            dark: 0,
            light: 0,
            empty: 0,
        };
        for disc in &self.squares {
            match disc {
                Disc::Dark => counts.dark += 1,
                Disc::Light => counts.light += 1,
                Disc::Empty => counts.empty += 1,
            }
        }
        counts
    }

    pub fn occupied(&self) -> u8 {
        self.count_discs().occupied()
    }

    pub fn is_full(&self) -> bool {
        self.count_discs().empty == 0
    }

    /// 全64マスを行優先で列挙する
    pub fn squares(&self) -> impl Iterator<Item = (Position, Disc)> + '_ {
        self.squares
            .iter()
            .enumerate()
            .map(|(index, disc)| (Position::from_index(index), *disc))
    }

    /// `rows[y][x]` 形式の配列に変換する
    pub fn to_rows(&self) -> [[Disc; 8]; 8] {
        let mut rows = [[Disc::Empty; 8]; 8];
        for (position, disc) in self.squares() {
            rows[position.y()][position.x()] = disc;
        }
        rows
    }

    /// デバッグ用の盤面表示文字列を生成する
    /// ●で黒、○で白、.で空マスを表現
    pub fn display(&self) -> String {
        let mut result = String::from("  0 1 2 3 4 5 6 7\n");
        for (y, row) in self.to_rows().iter().enumerate() {
            result.push_str(&format!("{} ", y));
            for disc in row {
                let symbol = match disc {
                    Disc::Empty => ".",
                    Disc::Dark => "●",
                    Disc::Light => "○",
                };
                result.push_str(symbol);
                result.push(' ');
            }
            result.push('\n');
        }
        result
    }
}

impl Default for BoardState {
    fn default() -> Self {
        Self::initial()
    }
}

impl std::fmt::Debug for BoardState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BoardState\n{}", self.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(x: usize, y: usize) -> Position {
        Position::new(x, y).unwrap()
    }

    #[test]
    fn test_board_initial_state() {
        let board = BoardState::initial();

        assert_eq!(board.get(pos(4, 3)), Disc::Dark);
        assert_eq!(board.get(pos(3, 4)), Disc::Dark);
        assert_eq!(board.get(pos(3, 3)), Disc::Light);
        assert_eq!(board.get(pos(4, 4)), Disc::Light);
        assert_eq!(board.get(pos(0, 0)), Disc::Empty);
        assert_eq!(board.get(pos(7, 7)), Disc::Empty);
    }

    #[test]
    fn test_with_leaves_receiver_unchanged() {
        let board = BoardState::initial();
        let changed = board.with(pos(0, 0), Disc::Dark);

        assert_eq!(board.get(pos(0, 0)), Disc::Empty);
        assert_eq!(changed.get(pos(0, 0)), Disc::Dark);
        assert_ne!(board, changed);
        assert_eq!(changed.with(pos(0, 0), Disc::Empty), board);
    }

    #[test]
    fn test_count_discs_sums_to_64() {
        let counts = BoardState::initial().count_discs();
        assert_eq!(counts.dark, 2);
        assert_eq!(counts.light, 2);
        assert_eq!(counts.empty, 60);
        assert_eq!(counts.occupied(), 4);
    }

    #[test]
    fn test_is_full() {
        assert!(!BoardState::initial().is_full());
        assert!(BoardState::from_rows([[Disc::Light; 8]; 8]).is_full());
    }

    #[test]
    fn test_rows_and_squares_agree() {
        let board = BoardState::initial().with(pos(6, 1), Disc::Dark);
        let rows = board.to_rows();

        assert_eq!(rows[1][6], Disc::Dark);
        assert_eq!(BoardState::from_rows(rows), board);
        assert_eq!(board.squares().count(), SQUARE_COUNT);
    }

    #[test]
    fn test_from_squares_accepts_any_order() {
        let board = BoardState::initial();
        let mut squares: Vec<_> = board.squares().collect();
        squares.reverse();

        assert_eq!(BoardState::from_squares(squares).unwrap(), board);
    }

    #[test]
    fn test_from_squares_rejects_incomplete() {
        let squares: Vec<_> = BoardState::initial().squares().skip(1).collect();
        assert_eq!(
            BoardState::from_squares(squares),
            Err(BoardError::Incomplete { assigned: 63 })
        );
    }

    #[test]
    fn test_from_squares_rejects_duplicates() {
        let mut squares: Vec<_> = BoardState::initial().squares().collect();
        squares[63] = (pos(0, 0), Disc::Dark);
        assert_eq!(
            BoardState::from_squares(squares),
            Err(BoardError::DuplicateSquare { x: 0, y: 0 })
        );
    }

    #[test]
    fn test_board_display() {
        let display = BoardState::initial().display();
        assert!(display.contains("0 1 2 3 4 5 6 7"));
        assert!(display.contains("●"));
        assert!(display.contains("○"));
    }
}
