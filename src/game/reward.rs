//! 獎勵計算系統
//!
//! 伺服器不會回報籌碼放置、移除或 sequence 形成等事件，
//! 這裡只靠比對前後兩份盤面快照重新推導。
//!
//! ## 每步獎勵組成
//!
//! | 項目                | 來源                                   |
//! |---------------------|----------------------------------------|
//! | step                | 固定小懲罰                              |
//! | place               | 新放置的己方籌碼數 × 權重               |
//! | remove              | 被清除的對手籌碼數 × 權重               |
//! | sequence            | 新標記為 sequence 的己方格數 × 權重     |
//! | progress            | 最長連線增量 × 權重（不為負）           |
//! | dead card           | 出牌後輪次未前進（死牌被消耗）          |
//!
//! 回合結束時另加勝利 + 速度獎勵，或逾時 / 無效懲罰。

use serde::{Deserialize, Serialize};

use super::board::{Board, ChipColour};
use super::constants::{
    REWARD_DEAD_CARD, REWARD_FAST_WIN_SCALE, REWARD_INVALID, REWARD_PLACE_CHIP,
    REWARD_REMOVE_CHIP, REWARD_SEQUENCE, REWARD_SEQUENCE_PROGRESS, REWARD_STEP, REWARD_TIMEOUT,
    REWARD_WIN, RUN_DIRECTIONS,
};

/// 獎勵權重
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardConfig {
    pub step: f32,
    pub place_chip: f32,
    pub remove_chip: f32,
    pub sequence: f32,
    pub sequence_progress: f32,
    pub dead_card: f32,
    pub win: f32,
    pub fast_win_scale: f32,
    pub invalid: f32,
    pub timeout: f32,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            step: REWARD_STEP,
            place_chip: REWARD_PLACE_CHIP,
            remove_chip: REWARD_REMOVE_CHIP,
            sequence: REWARD_SEQUENCE,
            sequence_progress: REWARD_SEQUENCE_PROGRESS,
            dead_card: REWARD_DEAD_CARD,
            win: REWARD_WIN,
            fast_win_scale: REWARD_FAST_WIN_SCALE,
            invalid: REWARD_INVALID,
            timeout: REWARD_TIMEOUT,
        }
    }
}

/// 兩份快照之間推導出的事件數
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BoardDiff {
    pub placed: u32,
    pub removed: u32,
    pub new_sequences: u32,
}

/// 以 (row, col) 對齊前後盤面並計數
///
/// - placed：原本無籌碼，之後為己方顏色
/// - removed：原本為對手籌碼，之後清空或變成己方顏色（同一格只計一次）
/// - new_sequences：新標記 part-of-sequence 的己方格，每格計一次
pub fn diff_boards(before: &Board, after: &Board, team: Option<ChipColour>) -> BoardDiff {
    let before_map = before.by_position();
    let mut diff = BoardDiff::default();

    for (pos, after_space) in after.addressable() {
        let Some(before_space) = before_map.get(&pos) else {
            continue;
        };

        let before_colour = before_space.colour;
        let after_colour = after_space.colour;
        let is_team = |colour: Option<ChipColour>| colour.is_some() && colour == team;

        if before_colour != after_colour {
            if before_colour.is_none() && is_team(after_colour) {
                diff.placed += 1;
            } else if before_colour.is_some()
                && !is_team(before_colour)
                && (after_colour.is_none() || is_team(after_colour))
            {
                diff.removed += 1;
            }
        }

        if !before_space.is_part_of_sequence()
            && after_space.is_part_of_sequence()
            && is_team(after_colour)
        {
            diff.new_sequences += 1;
        }
    }

    diff
}

/// 己方顏色在四個方向上的最長連續長度
pub fn max_run_length(board: &Board, team: Option<ChipColour>) -> u32 {
    let Some(team) = team else {
        return 0;
    };

    let (rows, cols) = board.extent();
    let mut grid = vec![false; rows * cols];
    for (pos, space) in board.addressable() {
        if space.colour == Some(team) {
            grid[pos.row * cols + pos.col] = true;
        }
    }

    let owned = |r: i64, c: i64| {
        r >= 0 && c >= 0 && (r as usize) < rows && (c as usize) < cols && grid[r as usize * cols + c as usize]
    };

    let mut best = 0;
    for row in 0..rows as i64 {
        for col in 0..cols as i64 {
            if !owned(row, col) {
                continue;
            }
            for (dr, dc) in RUN_DIRECTIONS {
                let (mut r, mut c, mut length) = (row, col, 0);
                while owned(r, c) {
                    length += 1;
                    r += dr;
                    c += dc;
                }
                best = best.max(length);
            }
        }
    }
    best
}

/// 單步獎勵明細
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StepReward {
    pub diff: BoardDiff,
    pub progress_bonus: f32,
    pub dead_card: bool,
    pub total: f32,
}

/// 獎勵引擎：持有權重設定，多個環境可各自使用不同設定
#[derive(Clone, Debug, Default)]
pub struct RewardShaper {
    config: RewardConfig,
}

impl RewardShaper {
    pub fn new(config: RewardConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RewardConfig {
        &self.config
    }

    /// `max(0, after − before) × progress 權重`
    pub fn progress_bonus(&self, before: &Board, after: &Board, team: Option<ChipColour>) -> f32 {
        let before_max = max_run_length(before, team);
        let after_max = max_run_length(after, team);
        after_max.saturating_sub(before_max) as f32 * self.config.sequence_progress
    }

    /// 成功出牌後的獎勵；`turn_advanced == false` 代表死牌被消耗
    pub fn step_reward(
        &self,
        before: &Board,
        after: &Board,
        team: Option<ChipColour>,
        turn_advanced: bool,
    ) -> StepReward {
        let diff = diff_boards(before, after, team);
        let progress_bonus = self.progress_bonus(before, after, team);
        let dead_card = !turn_advanced;

        let mut total = self.config.step
            + diff.placed as f32 * self.config.place_chip
            + diff.removed as f32 * self.config.remove_chip
            + diff.new_sequences as f32 * self.config.sequence
            + progress_bonus;
        if dead_card {
            total += self.config.dead_card;
        }

        StepReward {
            diff,
            progress_bonus,
            dead_card,
            total,
        }
    }

    /// 勝利獎勵 + 與步數成反比的速度獎勵
    pub fn win_bonus(&self, success_moves: u32, max_turns: u32) -> f32 {
        let max_turns = max_turns.max(1) as f32;
        let remaining = max_turns - success_moves as f32;
        self.config.win + self.config.fast_win_scale * (remaining / max_turns)
    }

    pub fn timeout_penalty(&self) -> f32 {
        self.config.timeout
    }

    pub fn invalid_penalty(&self) -> f32 {
        self.config.invalid
    }
}

// ============================================================================
// 單元測試
// ============================================================================
