//! 勝敗判定モジュール

use serde::{Deserialize, Serialize};

use super::turn::Turn;
use super::types::Player;
use crate::error::{GameError, Result};

/// 対局の勝者（引き分けを含む）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Winner {
    Dark,
    Light,
    Draw,
}

impl Winner {
    /// APIで使う数値コード (0: 引き分け, 1: 黒, 2: 白)
    pub fn code(self) -> u8 {
        match self {
            Winner::Draw => 0,
            Winner::Dark => 1,
            Winner::Light => 2,
        }
    }
}

impl From<Player> for Winner {
    fn from(player: Player) -> Self {
        match player {
            Player::Dark => Winner::Dark,
            Player::Light => Winner::Light,
        }
    }
}

/// 終局時の勝者と石数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResult {
    pub winner: Winner,
    pub dark_count: u8,
    pub light_count: u8,
}

impl GameResult {
    /// 終局した局面から勝敗を決定する
    /// 石数が同じ場合は盤面が埋まっていなくても引き分け
    pub fn winner(terminal: &Turn) -> Result<GameResult> {
        if !terminal.is_terminal() {
            return Err(GameError::NotTerminal);
        }

        let counts = terminal.board().count_discs();
        let winner = if counts.dark > counts.light {
            Winner::Dark
        } else if counts.light > counts.dark {
            Winner::Light
        } else {
            Winner::Draw
        };

        Ok(GameResult {
            winner,
            dark_count: counts.dark,
            light_count: counts.light,
        })
    }
}
