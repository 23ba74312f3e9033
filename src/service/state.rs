//! 環境狀態管理
//!
//! 一個 `SequenceEnv` 一次只驅動一場伺服器端遊戲；並行訓練需要多個獨立實例。
//!
//! 狀態機：Unreset → Ready（reset 後）→ Stepping → Terminal

use super::action_mask::{action_mask, all_legal};
use super::client::GameService;
use super::observation::{encode_observation, ColourCodes, Observation};
use super::session::{Session, SessionOrchestrator};
use crate::error::{EnvError, SessionError};
use crate::game::{
    legal_moves, ActionSpace, Board, Card, ChipColour, PlayerId, RewardConfig, RewardShaper,
    DEFAULT_BOARD_SIZE, DEFAULT_HAND_SIZE,
};
use crate::proto::EnvInfo;

/// 環境階段
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnvPhase {
    Unreset,
    Ready,
    Stepping,
    Terminal,
}

/// 回合統計；只在結束的那一步回傳
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EpisodeInfo {
    pub turns: u32,
    pub invalid_moves: u32,
    pub success_moves: u32,
    pub error_moves: u32,
    pub placed_chips: u32,
    pub removed_chips: u32,
    pub timeout: bool,
}

impl EpisodeInfo {
    pub fn to_proto(&self) -> EnvInfo {
        EnvInfo {
            episode_turns: self.turns,
            invalid_moves: self.invalid_moves,
            success_moves: self.success_moves,
            timeout: self.timeout,
            placed_chips: self.placed_chips,
            removed_chips: self.removed_chips,
            error_moves: self.error_moves,
        }
    }
}

#[derive(Clone, Debug)]
pub struct StepResult {
    pub observation: Observation,
    pub reward: f32,
    pub terminated: bool,
    pub truncated: bool,
    pub info: Option<EpisodeInfo>,
}

/// 輪到誰、手上有什麼、盤面長怎樣
struct Turn {
    public_id: PlayerId,
    private_id: PlayerId,
    hand: Vec<Card>,
    board: Board,
    team: Option<ChipColour>,
}

/// RL 環境適配器
pub struct SequenceEnv<S> {
    orchestrator: SessionOrchestrator<S>,
    shaper: RewardShaper,
    max_turns: u32,
    session: Option<Session>,
    phase: EnvPhase,
    space: ActionSpace,
    colours: ColourCodes,
    stats: EpisodeInfo,
    /// 本回合已換過死牌的玩家；輪替後清除
    dead_discard_by: Option<PlayerId>,
}

impl<S: GameService> SequenceEnv<S> {
    pub fn new(service: S, reward: RewardConfig, max_turns: u32) -> Self {
        Self {
            orchestrator: SessionOrchestrator::new(service),
            shaper: RewardShaper::new(reward),
            max_turns: max_turns.max(1),
            session: None,
            phase: EnvPhase::Unreset,
            space: ActionSpace::new(DEFAULT_HAND_SIZE, DEFAULT_BOARD_SIZE, DEFAULT_BOARD_SIZE),
            colours: ColourCodes::new(),
            stats: EpisodeInfo::default(),
            dead_discard_by: None,
        }
    }

    pub fn phase(&self) -> EnvPhase {
        self.phase
    }

    pub fn action_space(&self) -> ActionSpace {
        self.space
    }

    pub fn stats(&self) -> &EpisodeInfo {
        &self.stats
    }

    /// 目前輪到的玩家本回合是否已換過死牌
    pub fn dead_discard_used(&self) -> bool {
        let current = self.session.as_ref().and_then(|s| s.current_player().ok());
        self.dead_discard_by.is_some() && self.dead_discard_by == current
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn orchestrator(&self) -> &SessionOrchestrator<S> {
        &self.orchestrator
    }

    // ========================================================================
    // reset
    // ========================================================================

    /// 開新遊戲，從實際盤面與手牌推得動作空間形狀
    pub fn reset(&mut self) -> Result<Observation, EnvError> {
        self.session = None;
        self.phase = EnvPhase::Unreset;
        self.colours.clear();
        self.stats = EpisodeInfo::default();
        self.dead_discard_by = None;

        let session = self.orchestrator.create_and_start()?;
        let (rows, cols) = session.board()?.extent();
        self.session = Some(session);

        let turn = self.current_turn()?;
        self.space = ActionSpace::new(turn.hand.len().max(1), rows, cols);
        self.phase = EnvPhase::Ready;
        log::debug!(
            "reset: {}x{} board, hand size {}",
            rows,
            cols,
            self.space.hand_size
        );

        Ok(self.encode(&turn))
    }

    // ========================================================================
    // step
    // ========================================================================

    pub fn step(&mut self, action: usize) -> Result<StepResult, EnvError> {
        match self.phase {
            EnvPhase::Unreset => return Err(EnvError::NotReset),
            EnvPhase::Terminal => return Err(EnvError::Terminated),
            EnvPhase::Ready | EnvPhase::Stepping => {}
        }
        self.phase = EnvPhase::Stepping;
        self.sync();

        self.stats.turns += 1;
        if self.stats.turns >= self.max_turns {
            self.stats.timeout = true;
            let reward = self.shaper.timeout_penalty();
            return Ok(self.finish(reward));
        }

        let turn = match self.current_turn() {
            Ok(turn) => turn,
            Err(err) => return Err(self.abort(err)),
        };

        let allow_dead_discard = self.allows_dead_discard(&turn);
        if turn.hand.is_empty()
            || legal_moves(&turn.hand, &turn.board, turn.team, allow_dead_discard).is_empty()
        {
            self.stats.invalid_moves += 1;
            let reward = self.shaper.invalid_penalty();
            return Ok(self.finish(reward));
        }

        let decoded = self.space.decode(action);
        let card = &turn.hand[decoded.card_index % turn.hand.len()];
        let target = match turn
            .board
            .space_at(decoded.position)
            .or_else(|| turn.board.spaces().first())
            .cloned()
        {
            Some(target) => target,
            None => return Err(self.abort(SessionError::missing("step", "board spaces"))),
        };

        let session = self.session.as_mut().ok_or(EnvError::NotReset)?;
        if let Err(err) = self
            .orchestrator
            .step(session, &turn.private_id, card, &target)
        {
            self.stats.invalid_moves += 1;
            self.stats.error_moves += 1;
            log::debug!(
                "move_error player={} card_index={} row={} col={} success_moves={} invalid_moves={}: {err}",
                turn.public_id,
                decoded.card_index,
                decoded.position.row,
                decoded.position.col,
                self.stats.success_moves,
                self.stats.invalid_moves,
            );
            return Ok(StepResult {
                observation: self.observe_lenient(),
                reward: self.shaper.invalid_penalty(),
                terminated: false,
                truncated: false,
                info: None,
            });
        }
        self.stats.success_moves += 1;

        let after = session.board().cloned();
        let next_player = session.current_player().ok();
        let done = session.is_done();
        let after = match after {
            Ok(after) => after,
            Err(err) => return Err(self.abort(err)),
        };

        // 同一位玩家繼續出手代表剛換掉一張死牌
        let turn_advanced = next_player.as_deref() != Some(turn.public_id.as_str());
        self.dead_discard_by = if turn_advanced {
            None
        } else {
            Some(turn.public_id.clone())
        };

        let step = self
            .shaper
            .step_reward(&turn.board, &after, turn.team, turn_advanced);
        self.stats.placed_chips += step.diff.placed;
        self.stats.removed_chips += step.diff.removed;

        if done {
            let reward = step.total + self.shaper.win_bonus(self.stats.success_moves, self.max_turns);
            log::info!(
                "episode won after {} turns ({} successful moves)",
                self.stats.turns,
                self.stats.success_moves
            );
            return Ok(self.finish(reward));
        }

        Ok(StepResult {
            observation: self.observe_lenient(),
            reward: step.total,
            terminated: false,
            truncated: false,
            info: None,
        })
    }

    /// 無法繼續的錯誤：回合結束，需要重新 reset
    fn abort(&mut self, err: impl Into<EnvError>) -> EnvError {
        self.phase = EnvPhase::Terminal;
        err.into()
    }

    /// 結束本回合並附上統計
    fn finish(&mut self, reward: f32) -> StepResult {
        self.phase = EnvPhase::Terminal;
        StepResult {
            observation: self.observe_lenient(),
            reward,
            terminated: true,
            truncated: false,
            info: Some(self.stats.clone()),
        }
    }

    // ========================================================================
    // action mask / observation
    // ========================================================================

    /// 尚未 reset 時回傳全部合法
    pub fn action_mask(&mut self) -> Result<Vec<bool>, EnvError> {
        if self.session.is_none() {
            return Ok(all_legal(self.space));
        }
        self.sync();
        let turn = self.current_turn()?;
        let allow_dead_discard = self.allows_dead_discard(&turn);
        Ok(action_mask(
            &turn.hand,
            &turn.board,
            turn.team,
            allow_dead_discard,
            self.space,
        ))
    }

    pub fn observe(&mut self) -> Result<Observation, EnvError> {
        if self.session.is_none() {
            return Err(EnvError::NotReset);
        }
        self.sync();
        let turn = self.current_turn()?;
        Ok(self.encode(&turn))
    }

    /// step 回傳用：拿不到手牌時只編碼盤面，沒有盤面時全零
    fn observe_lenient(&mut self) -> Observation {
        match self.current_turn() {
            Ok(turn) => self.encode(&turn),
            Err(err) => {
                log::debug!("observation without hand: {err}");
                let board = self
                    .session
                    .as_ref()
                    .and_then(|session| session.board().ok())
                    .cloned();
                match board {
                    Some(board) => {
                        encode_observation(&board, &[], self.space, &mut self.colours)
                    }
                    None => Observation::zeros(self.space),
                }
            }
        }
    }

    fn allows_dead_discard(&self, turn: &Turn) -> bool {
        self.dead_discard_by.as_deref() != Some(turn.public_id.as_str())
    }

    fn encode(&mut self, turn: &Turn) -> Observation {
        encode_observation(&turn.board, &turn.hand, self.space, &mut self.colours)
    }

    // ========================================================================
    // 伺服器互動
    // ========================================================================

    /// 刷新快照；失敗時保留上一份
    fn sync(&mut self) {
        if let Some(session) = self.session.as_mut() {
            if let Err(err) = self.orchestrator.refresh(session) {
                log::debug!("state sync failed, keeping last snapshot: {err}");
            }
        }
    }

    fn current_turn(&mut self) -> Result<Turn, EnvError> {
        let session = self.session.as_mut().ok_or(EnvError::NotReset)?;
        let public_id = session.current_player()?;
        let private_id = self
            .orchestrator
            .resolve_private_player(session, &public_id)?;
        let hand = self
            .orchestrator
            .fetch_hand(session, &public_id, &private_id)?;
        let board = session.board()?.clone();
        let team = session.team_colour(&public_id);
        Ok(Turn {
            public_id,
            private_id,
            hand,
            board,
            team,
        })
    }
}
