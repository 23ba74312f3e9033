//! Action Mask 構建
//!
//! 每個 (card_index, row, col) 一格；目前合法者為 true。
//! 完全沒有合法動作時退化為全部合法，避免策略網路卡死。

use crate::game::{legal_moves, ActionSpace, Board, Card, ChipColour};
use crate::proto::Tensor;

/// 全部合法（尚未 reset 或死鎖時使用）
pub fn all_legal(space: ActionSpace) -> Vec<bool> {
    vec![true; space.size()]
}

/// 依合法著手建立遮罩；只看手牌前 `hand_size` 張
///
/// 本回合已換過死牌時傳入 `allow_dead_discard = false`。
pub fn action_mask(
    hand: &[Card],
    board: &Board,
    team: Option<ChipColour>,
    allow_dead_discard: bool,
    space: ActionSpace,
) -> Vec<bool> {
    let visible = &hand[..hand.len().min(space.hand_size)];
    let mut mask = vec![false; space.size()];

    for legal in legal_moves(visible, board, team, allow_dead_discard) {
        if let Some(index) = space.encode(legal.hand_index, legal.position) {
            mask[index] = true;
        }
    }

    if !mask.iter().any(|&legal| legal) {
        return all_legal(space);
    }
    mask
}

/// 轉成 f32 張量（1.0 = 合法）
pub fn mask_to_tensor(mask: &[bool]) -> Tensor {
    Tensor {
        data: mask.iter().map(|&m| if m { 1.0 } else { 0.0 }).collect(),
        shape: vec![mask.len() as i32],
    }
}
