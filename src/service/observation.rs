//! Observation 構建
//!
//! 三個固定形狀的整數張量：
//! - `board_cards`: rows × cols，印刷卡代碼（萬用格為 0）
//! - `board_chips`: rows × cols，籌碼代碼（空格為 0）
//! - `hand_cards`: hand_size，手牌代碼（不足補 0）

use std::collections::HashMap;

use crate::game::{card_code, ActionSpace, Board, Card, ChipColour, NO_CHIP_CODE};
use crate::proto::{Tensor, TensorSpec};

/// 每回合內的籌碼顏色代碼；第一次出現的顏色取下一個整數
#[derive(Clone, Debug, Default)]
pub struct ColourCodes {
    codes: HashMap<ChipColour, i32>,
}

impl ColourCodes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn code(&mut self, colour: Option<ChipColour>) -> i32 {
        let Some(colour) = colour else {
            return NO_CHIP_CODE;
        };
        let next = self.codes.len() as i32 + 1;
        *self.codes.entry(colour).or_insert(next)
    }

    pub fn clear(&mut self) {
        self.codes.clear();
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

/// 編碼後的觀測（row-major）
#[derive(Clone, Debug, PartialEq)]
pub struct Observation {
    pub rows: usize,
    pub cols: usize,
    pub hand_size: usize,
    pub board_cards: Vec<i32>,
    pub board_chips: Vec<i32>,
    pub hand_cards: Vec<i32>,
}

impl Observation {
    /// 全零觀測（沒有有效狀態時使用）
    pub fn zeros(space: ActionSpace) -> Self {
        Self {
            rows: space.rows,
            cols: space.cols,
            hand_size: space.hand_size,
            board_cards: vec![0; space.cells()],
            board_chips: vec![0; space.cells()],
            hand_cards: vec![0; space.hand_size],
        }
    }

    /// 格子外的座標回傳 `None`
    pub fn board_card(&self, row: usize, col: usize) -> Option<i32> {
        self.cell_index(row, col).map(|idx| self.board_cards[idx])
    }

    pub fn board_chip(&self, row: usize, col: usize) -> Option<i32> {
        self.cell_index(row, col).map(|idx| self.board_chips[idx])
    }

    fn cell_index(&self, row: usize, col: usize) -> Option<usize> {
        (row < self.rows && col < self.cols).then(|| row * self.cols + col)
    }

    pub fn to_proto(&self) -> crate::proto::Observation {
        let grid = vec![self.rows as i32, self.cols as i32];
        crate::proto::Observation {
            board_cards: Some(to_tensor(&self.board_cards, grid.clone())),
            board_chips: Some(to_tensor(&self.board_chips, grid)),
            hand_cards: Some(to_tensor(&self.hand_cards, vec![self.hand_size as i32])),
            action_mask: None,
        }
    }
}

fn to_tensor(values: &[i32], shape: Vec<i32>) -> Tensor {
    Tensor {
        data: values.iter().map(|&v| v as f32).collect(),
        shape,
    }
}

/// 以固定的動作空間形狀編碼盤面與手牌
///
/// 超出網格的格子略過；手牌超過 hand_size 的部分截斷。
pub fn encode_observation(
    board: &Board,
    hand: &[Card],
    space: ActionSpace,
    colours: &mut ColourCodes,
) -> Observation {
    let mut obs = Observation::zeros(space);

    for (pos, cell) in board.addressable() {
        if pos.row >= obs.rows || pos.col >= obs.cols {
            continue;
        }
        let idx = pos.row * obs.cols + pos.col;
        obs.board_cards[idx] = card_code(cell.card.as_ref());
        obs.board_chips[idx] = colours.code(cell.colour);
    }

    for (slot, card) in obs.hand_cards.iter_mut().zip(hand) {
        *slot = card.code();
    }

    obs
}

/// 張量形狀描述（GetSpec 用）
pub fn observation_spec(space: ActionSpace) -> (TensorSpec, TensorSpec, TensorSpec) {
    let grid = TensorSpec {
        shape: vec![space.rows as i32, space.cols as i32],
        dtype: "int32".to_string(),
    };
    let hand = TensorSpec {
        shape: vec![space.hand_size as i32],
        dtype: "int32".to_string(),
    };
    (grid.clone(), grid, hand)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::legality::tests::standard_board;
    use crate::game::{BoardSpace, Position, Suit};

    #[test]
    fn test_colour_codes_first_sight() {
        let mut colours = ColourCodes::new();
        assert_eq!(colours.code(None), 0);
        assert_eq!(colours.code(Some(ChipColour::Red)), 1);
        assert_eq!(colours.code(Some(ChipColour::Blue)), 2);
        assert_eq!(colours.code(Some(ChipColour::Red)), 1);
        assert_eq!(colours.len(), 2);
        colours.clear();
        assert_eq!(colours.code(Some(ChipColour::Blue)), 1);
    }

    #[test]
    fn test_encode_board_and_hand() {
        let mut board = standard_board();
        for cell in board.spaces.as_mut().unwrap() {
            if cell.position() == Some(Position::new(1, 2)) {
                cell.colour = Some(ChipColour::Green);
            }
        }
        let hand = vec![Card::new(5, Suit::Clubs), Card::new(11, Suit::Spades)];
        let space = ActionSpace::new(3, 10, 10);
        let mut colours = ColourCodes::new();

        let obs = encode_observation(&board, &hand, space, &mut colours);
        assert_eq!(obs.board_cards.len(), 100);
        assert_eq!(obs.board_card(0, 0), Some(0));
        // (0,1) 是第一張非 J 牌：A♠
        assert_eq!(obs.board_card(0, 1), Some(1));
        assert_eq!(obs.board_chip(1, 2), Some(1));
        assert_eq!(obs.board_chip(1, 3), Some(0));
        assert_eq!(obs.hand_cards, vec![13 + 5, 11, 0]);
    }

    #[test]
    fn test_encode_skips_out_of_grid_and_truncates_hand() {
        let board = Board::from_spaces(vec![
            BoardSpace::new(0, 0, Some(Card::new(2, Suit::Hearts))),
            BoardSpace::new(4, 4, Some(Card::new(3, Suit::Hearts))),
        ]);
        let hand = vec![Card::new(1, Suit::Spades), Card::new(2, Suit::Spades)];
        let space = ActionSpace::new(1, 2, 2);
        let obs = encode_observation(&board, &hand, space, &mut ColourCodes::new());
        assert_eq!(obs.board_cards, vec![28, 0, 0, 0]);
        assert_eq!(obs.hand_cards, vec![1]);
    }

    #[test]
    fn test_cell_lookup_outside_grid_is_none() {
        let obs = Observation::zeros(ActionSpace::new(1, 2, 3));
        assert_eq!(obs.board_card(1, 2), Some(0));
        // (0,3) 若不檢查欄數會讀到 (1,0)
        assert_eq!(obs.board_card(0, 3), None);
        assert_eq!(obs.board_chip(2, 0), None);
        assert_eq!(obs.board_chip(usize::MAX, 0), None);
    }

    #[test]
    fn test_to_proto_shapes() {
        let obs = Observation::zeros(ActionSpace::new(7, 10, 10));
        let proto = obs.to_proto();
        assert_eq!(proto.board_cards.unwrap().shape, vec![10, 10]);
        let hand = proto.hand_cards.unwrap();
        assert_eq!(hand.shape, vec![7]);
        assert_eq!(hand.data.len(), 7);
    }
}
