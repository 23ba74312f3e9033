//! 棋盤與遊戲狀態快照
//!
//! 這些型別直接對應 Game Service 的 JSON 回應；快照每次往返後整份替換，
//! 不做欄位級的就地修改。

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::cards::Card;

pub type PlayerId = String;
pub type GameId = String;

/// 隊伍籌碼顏色
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChipColour {
    Blue,
    Green,
    Red,
}

/// 網格座標
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardSpace {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub col: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colour: Option<ChipColour>,
    /// `None` 為萬用格（四個角）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card: Option<Card>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part_of_sequence: Option<bool>,
}

impl BoardSpace {
    pub fn new(row: usize, col: usize, card: Option<Card>) -> Self {
        Self {
            row: Some(row as i32),
            col: Some(col as i32),
            colour: None,
            card,
            part_of_sequence: None,
        }
    }

    pub fn with_chip(mut self, colour: ChipColour) -> Self {
        self.colour = Some(colour);
        self
    }

    pub fn in_sequence(mut self) -> Self {
        self.part_of_sequence = Some(true);
        self
    }

    pub fn has_chip(&self) -> bool {
        self.colour.is_some()
    }

    pub fn is_wildcard(&self) -> bool {
        self.card.is_none()
    }

    pub fn is_part_of_sequence(&self) -> bool {
        self.part_of_sequence.unwrap_or(false)
    }

    /// 座標缺席或為負時無法被動作定址
    pub fn position(&self) -> Option<Position> {
        match (self.row, self.col) {
            (Some(row), Some(col)) if row >= 0 && col >= 0 => {
                Some(Position::new(row as usize, col as usize))
            }
            _ => None,
        }
    }

    /// 空的、非萬用格（一般出牌與雙眼 J 的候選）
    pub fn is_open(&self) -> bool {
        !self.is_wildcard() && !self.has_chip()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Board {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spaces: Option<Vec<BoardSpace>>,
}

impl Board {
    pub fn from_spaces(spaces: Vec<BoardSpace>) -> Self {
        Self {
            spaces: Some(spaces),
        }
    }

    pub fn spaces(&self) -> &[BoardSpace] {
        self.spaces.as_deref().unwrap_or(&[])
    }

    /// 可定址的格子（有座標）
    pub fn addressable(&self) -> impl Iterator<Item = (Position, &BoardSpace)> {
        self.spaces()
            .iter()
            .filter_map(|space| space.position().map(|pos| (pos, space)))
    }

    /// 網格大小 (rows, cols)，由最大座標 + 1 推得
    pub fn extent(&self) -> (usize, usize) {
        let (max_row, max_col) = self
            .addressable()
            .fold((0, 0), |(r, c), (pos, _)| (r.max(pos.row), c.max(pos.col)));
        (max_row + 1, max_col + 1)
    }

    pub fn space_at(&self, pos: Position) -> Option<&BoardSpace> {
        self.addressable()
            .find(|(p, _)| *p == pos)
            .map(|(_, space)| space)
    }

    /// 以座標建立索引（diff 用）
    pub fn by_position(&self) -> HashMap<Position, &BoardSpace> {
        self.addressable().collect()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameStatus {
    NotStarted,
    InProgress,
    Completed,
}

/// 伺服器權威狀態快照
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<GameId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<GameStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_player_turn: Option<PlayerId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub board: Option<Board>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_teams: Option<HashMap<PlayerId, ChipColour>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<PlayerId>,
}

impl GameState {
    pub fn is_completed(&self) -> bool {
        self.status == Some(GameStatus::Completed)
    }

    pub fn team_colour(&self, public_id: &str) -> Option<ChipColour> {
        self.player_teams
            .as_ref()
            .and_then(|teams| teams.get(public_id).copied())
    }
}

/// 手牌回應
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HandResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cards: Option<Vec<Card>>,
}

/// 建立遊戲回應（兩種伺服器版本的欄位名都接受）
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameCreated {
    #[serde(default, alias = "gameUuid")]
    pub uuid: Option<GameId>,
    #[serde(default, alias = "privatePlayerUuid")]
    pub host_player_uuid: Option<PlayerId>,
}

#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameJoined {
    #[serde(default)]
    pub game_uuid: Option<GameId>,
    #[serde(default)]
    pub public_player_uuid: Option<PlayerId>,
    #[serde(default)]
    pub private_player_uuid: Option<PlayerId>,
}

/// 出牌請求
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveAction {
    pub row: i32,
    pub column: i32,
    pub card: Card,
}
