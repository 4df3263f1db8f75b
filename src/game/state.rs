//! 対局全体の状態管理モジュール
//! 0手目から始まる局面の列を保持し、着手ごとに末尾へ新しい局面を追加する。

use super::result::GameResult;
use super::turn::{Turn, TurnEngine};
use super::types::Move;
use crate::error::Result;

/// 1局分の局面履歴
/// 過去の局面は外部から変更できない
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    turns: Vec<Turn>,
}

impl Game {
    /// 標準初期配置の0手目だけを持つ対局を作成する
    pub fn new() -> Self {
        Self {
            turns: vec![Turn::initial()],
        }
    }

    /// 最新の局面に着手を適用する
    /// 失敗した場合は履歴を変更しない
    pub fn play(&mut self, game_move: Move) -> Result<&Turn> {
        let next = TurnEngine::next_turn(self.latest(), game_move)?;
        self.turns.push(next);
        Ok(self.latest())
    }

    pub fn latest(&self) -> &Turn {
        // turns は常に0手目を含む
        &self.turns[self.turns.len() - 1]
    }

    pub fn turn(&self, turn_count: u32) -> Option<&Turn> {
        self.turns.get(turn_count as usize)
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn is_finished(&self) -> bool {
        self.latest().is_terminal()
    }

    /// 終局していれば勝敗を返す
    pub fn result(&self) -> Result<GameResult> {
        GameResult::winner(self.latest())
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}
