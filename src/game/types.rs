//! ゲームの基本型定義モジュール
//! 石、プレイヤー、座標、着手といったリバーシの基本的な値型を定義する。

use serde::{Deserialize, Serialize};

/// 盤面の各マスの状態を表現するenum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Disc {
    Empty,
    Dark,
    Light,
}

impl Disc {
    /// 永続化・APIで使う数値コード (0: 空, 1: 黒, 2: 白)
    pub fn code(self) -> u8 {
        match self {
            Disc::Empty => 0,
            Disc::Dark => 1,
            Disc::Light => 2,
        }
    }

    /// 数値コードから石を復元する
    /// 未知のコードの場合はNoneを返す
    pub fn from_code(code: u8) -> Option<Disc> {
        match code {
            0 => Some(Disc::Empty),
            1 => Some(Disc::Dark),
            2 => Some(Disc::Light),
            _ => None,
        }
    }

    /// 石を置いたプレイヤーを返す（空マスはNone）
    pub fn owner(self) -> Option<Player> {
        match self {
            Disc::Empty => None,
            Disc::Dark => Some(Player::Dark),
            Disc::Light => Some(Player::Light),
        }
    }
}

/// 着手できるプレイヤー
/// 先手は黒(Dark)、後手は白(Light)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    Dark,
    Light,
}

impl Player {
    /// 相手プレイヤーを返す
    pub fn opposite(self) -> Player {
        match self {
            Player::Dark => Player::Light,
            Player::Light => Player::Dark,
        }
    }

    /// プレイヤーを対応する石に変換する
    pub fn to_disc(self) -> Disc {
        match self {
            Player::Dark => Disc::Dark,
            Player::Light => Disc::Light,
        }
    }
}

/// 8x8盤面上の座標 (x: 列, y: 行)
/// コンストラクタで範囲チェックを行うため、値が存在する時点で常に盤面内を指す
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Position {
    x: usize,
    y: usize,
}

impl Position {
    /// 範囲チェック付きのコンストラクタ
    /// 8x8盤面の範囲外の座標の場合はNoneを返す
    pub fn new(x: usize, y: usize) -> Option<Position> {
        if x < 8 && y < 8 {
            Some(Position { x, y })
        } else {
            None
        }
    }

    /// 符号付き座標からの変換（APIの入力値用）
    pub fn from_signed(x: i64, y: i64) -> Option<Position> {
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;
        Self::new(x, y)
    }

    pub fn x(&self) -> usize {
        self.x
    }

    pub fn y(&self) -> usize {
        self.y
    }

    /// 行優先 (y, x) の配列インデックス
    pub(crate) fn index(&self) -> usize {
        self.y * 8 + self.x
    }

    pub(crate) fn from_index(index: usize) -> Position {
        Position { x: index % 8, y: index / 8 }
    }

    /// 指定方向に1マス進んだ座標を返す
    /// 盤面の外に出る場合はNone
    pub(crate) fn step(&self, (dx, dy): (i8, i8)) -> Option<Position> {
        let x = self.x as i64 + dx as i64;
        let y = self.y as i64 + dy as i64;
        Self::from_signed(x, y)
    }
}

/// 着手（誰がどこに置いたか）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Move {
    pub mover: Player,
    pub position: Position,
}

impl Move {
    pub fn new(mover: Player, position: Position) -> Self {
        Self { mover, position }
    }
}
