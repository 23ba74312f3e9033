//! 卡牌定義
//!
//! 伺服器回傳的欄位都可能缺席，缺席與明確的 false/0 必須區分，
//! 因此所有欄位都以 `Option` 表示。

use serde::{Deserialize, Serialize};

use super::constants::{JACK_RANK, NO_CARD_CODE, RANK_COUNT};

/// 花色
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Suit {
    Spades,
    Clubs,
    Hearts,
    Diamonds,
}

impl Suit {
    /// 轉換為整數 ID (用於 observation 的 card code)
    pub fn to_index(self) -> i32 {
        match self {
            Suit::Spades => 0,
            Suit::Clubs => 1,
            Suit::Hearts => 2,
            Suit::Diamonds => 3,
        }
    }

    pub fn all() -> &'static [Suit] {
        &[Suit::Spades, Suit::Clubs, Suit::Hearts, Suit::Diamonds]
    }

    /// 單眼 J 的花色（黑桃、梅花）
    pub fn is_black(self) -> bool {
        matches!(self, Suit::Spades | Suit::Clubs)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suit: Option<Suit>,
    /// 1..=13 (Ace = 1)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub one_eyed_jack: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub two_eyed_jack: Option<bool>,
}

impl Card {
    pub fn new(value: u8, suit: Suit) -> Self {
        Self {
            suit: Some(suit),
            value: Some(value),
            one_eyed_jack: None,
            two_eyed_jack: None,
        }
    }

    /// 單眼 J：移除對手未鎖定的籌碼
    ///
    /// 伺服器明確提供的旗標優先；另一旗標明確為 true 時視為 false；
    /// 否則由花色與點數推導。
    pub fn is_one_eyed_jack(&self) -> bool {
        if let Some(flag) = self.one_eyed_jack {
            return flag;
        }
        if self.two_eyed_jack == Some(true) {
            return false;
        }
        match (self.suit, self.value) {
            (Some(suit), Some(value)) => value == JACK_RANK && suit.is_black(),
            _ => false,
        }
    }

    /// 雙眼 J：可放在任何空格
    pub fn is_two_eyed_jack(&self) -> bool {
        if let Some(flag) = self.two_eyed_jack {
            return flag;
        }
        if self.one_eyed_jack == Some(true) {
            return false;
        }
        match (self.suit, self.value) {
            (Some(suit), Some(value)) => value == JACK_RANK && !suit.is_black(),
            _ => false,
        }
    }

    /// 點數與花色皆相同；任一邊缺欄位即不相符
    pub fn matches(&self, other: &Card) -> bool {
        match (self.suit, self.value, other.suit, other.value) {
            (Some(a_suit), Some(a_value), Some(b_suit), Some(b_value)) => {
                a_suit == b_suit && a_value == b_value
            }
            _ => false,
        }
    }

    /// observation 編碼：`suit_index * 13 + rank`，0 保留給缺席
    pub fn code(&self) -> i32 {
        match (self.suit, self.value) {
            (Some(suit), Some(value)) if (1..=RANK_COUNT).contains(&value) => {
                suit.to_index() * RANK_COUNT as i32 + value as i32
            }
            _ => NO_CARD_CODE,
        }
    }
}

/// 棋盤格上的印刷卡與手牌是否相符（萬用格永遠不相符）
pub fn cards_match(space_card: Option<&Card>, hand_card: &Card) -> bool {
    space_card.map(|c| c.matches(hand_card)).unwrap_or(false)
}

/// 卡片編碼（`None` 為萬用格）
pub fn card_code(card: Option<&Card>) -> i32 {
    card.map(Card::code).unwrap_or(NO_CARD_CODE)
}
