//! 遊戲核心模組
//!
//! 包含 Sequence 的規則核心（純函數，無 I/O）：
//! - `constants`: 遊戲常量與獎勵預設值
//! - `cards`: 花色、卡牌與 J 判定
//! - `board`: 棋盤格、棋盤、遊戲狀態快照（對應伺服器 JSON）
//! - `legality`: 合法著手計算
//! - `action`: 扁平動作空間編解碼
//! - `reward`: 盤面差異與獎勵計算
//!
//! 注意：權威的遊戲狀態在遠端伺服器，這裡只做預測與推導

pub mod constants;
pub mod cards;
pub mod board;
pub mod legality;
pub mod action;
pub mod reward;

// Re-export 常用類型
pub use constants::*;
pub use cards::{Card, Suit, card_code, cards_match};
pub use board::{
    Board, BoardSpace, ChipColour, GameCreated, GameId, GameJoined, GameState, GameStatus,
    HandResponse, MoveAction, PlayerId, Position,
};
pub use legality::{LegalMove, is_dead_card, legal_moves, legal_targets};
pub use action::{ActionSpace, DecodedAction};
pub use reward::{BoardDiff, RewardConfig, RewardShaper, StepReward, diff_boards, max_run_length};
