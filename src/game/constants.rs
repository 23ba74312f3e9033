//! 遊戲常量定義

// ============================================================================
// 棋盤與卡牌
// ============================================================================

pub const RANK_COUNT: u8 = 13;           // 每花色點數 1..=13
pub const JACK_RANK: u8 = 11;            // J
pub const SUIT_COUNT: u8 = 4;
pub const NO_CARD_CODE: i32 = 0;         // 萬用格 / 無卡
pub const MAX_CARD_CODE: i32 = SUIT_COUNT as i32 * RANK_COUNT as i32; // 52
pub const NO_CHIP_CODE: i32 = 0;         // 空格
pub const DEFAULT_BOARD_SIZE: usize = 10; // reset 前的預設網格
pub const DEFAULT_HAND_SIZE: usize = 7;   // reset 前的預設手牌數

// 連線方向：水平、垂直、兩條對角線
pub const RUN_DIRECTIONS: [(i64, i64); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

// ============================================================================
// 回合控制
// ============================================================================

pub const MAX_EPISODE_TURNS: u32 = 500;  // 回合上限（安全閥，非遊戲規則）
pub const LOG_EVERY_TURNS: u32 = 10;     // baseline 迴圈日誌間隔

// ============================================================================
// 獎勵預設值
// ============================================================================

pub const REWARD_STEP: f32 = -0.01;
pub const REWARD_PLACE_CHIP: f32 = 3.0;
pub const REWARD_REMOVE_CHIP: f32 = 2.0;
pub const REWARD_SEQUENCE: f32 = 25.0;
pub const REWARD_SEQUENCE_PROGRESS: f32 = 0.5;
pub const REWARD_DEAD_CARD: f32 = 1.0;
pub const REWARD_WIN: f32 = 50.0;
pub const REWARD_FAST_WIN_SCALE: f32 = 15.0;
pub const REWARD_INVALID: f32 = -1.0;
pub const REWARD_TIMEOUT: f32 = -10.0;
