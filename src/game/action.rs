//! 扁平動作空間
//!
//! 動作索引 = `card_index * rows * cols + row * cols + col`

use super::board::Position;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActionSpace {
    pub hand_size: usize,
    pub rows: usize,
    pub cols: usize,
}

/// 解碼後的動作
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecodedAction {
    pub card_index: usize,
    pub position: Position,
}

impl ActionSpace {
    pub fn new(hand_size: usize, rows: usize, cols: usize) -> Self {
        Self {
            hand_size: hand_size.max(1),
            rows: rows.max(1),
            cols: cols.max(1),
        }
    }

    pub fn cells(&self) -> usize {
        self.rows * self.cols
    }

    pub fn size(&self) -> usize {
        self.hand_size * self.cells()
    }

    /// 超出範圍時回傳 `None`
    pub fn encode(&self, card_index: usize, position: Position) -> Option<usize> {
        if card_index >= self.hand_size || position.row >= self.rows || position.col >= self.cols {
            return None;
        }
        Some(card_index * self.cells() + position.row * self.cols + position.col)
    }

    /// card_index 可能超過手牌數，由呼叫端以 `% hand_len` 包回
    pub fn decode(&self, action: usize) -> DecodedAction {
        let card_index = action / self.cells();
        let remainder = action % self.cells();
        DecodedAction {
            card_index,
            position: Position::new(remainder / self.cols, remainder % self.cols),
        }
    }
}
