//! Baseline 對局迴圈
//!
//! 兩位玩家都由同一個策略出手，直到伺服器回報結束或觸及回合上限。

use super::client::GameService;
use super::policy::MovePolicy;
use super::session::{Session, SessionOrchestrator};
use crate::error::SessionError;
use crate::game::{legal_moves, GameId, GameStatus, PlayerId, LOG_EVERY_TURNS};

/// 對局結束原因
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameOutcome {
    /// 伺服器回報 COMPLETED
    Completed,
    /// 觸及回合上限（防護用，不是規則的一部分）
    TurnCeiling,
    /// 整手牌都沒有合法著手
    NoLegalMove,
    /// 中途的協定或身份錯誤
    Aborted(String),
}

#[derive(Clone, Debug)]
pub struct GameReport {
    pub game_id: GameId,
    pub turns: u32,
    pub outcome: GameOutcome,
    pub final_status: Option<GameStatus>,
}

impl GameReport {
    fn new(session: &Session, turns: u32, outcome: GameOutcome) -> Self {
        Self {
            game_id: session.game_id.clone(),
            turns,
            outcome,
            final_status: session.state().status,
        }
    }
}

/// 跑一場完整的隨機對局
///
/// 只有建立遊戲失敗會回傳 `Err`；之後的錯誤都收進 `GameOutcome::Aborted`。
pub fn run_random_game<S, P>(
    orchestrator: &SessionOrchestrator<S>,
    policy: &mut P,
    max_turns: u32,
) -> Result<GameReport, SessionError>
where
    S: GameService,
    P: MovePolicy,
{
    let mut session = orchestrator.create_and_start()?;
    log::info!("game {} created", session.game_id);

    let mut turns = 0u32;
    // 本回合已換過死牌的玩家
    let mut dead_discard_by: Option<PlayerId> = None;
    let outcome = loop {
        if session.is_done() {
            break GameOutcome::Completed;
        }
        if turns >= max_turns {
            log::warn!("game {}: stopping after {max_turns} turns", session.game_id);
            break GameOutcome::TurnCeiling;
        }
        turns += 1;

        match play_turn(orchestrator, &mut session, policy, dead_discard_by.as_ref()) {
            Ok((public_id, row, col)) => {
                if turns % LOG_EVERY_TURNS == 0 {
                    log::info!("turn {turns}: {public_id} played ({row}, {col})");
                }
                // 沒有輪替代表剛換掉一張死牌
                let same_player = session.current_player().ok().as_ref() == Some(&public_id);
                dead_discard_by = same_player.then_some(public_id);
            }
            Err(SessionError::NoLegalMove) => {
                log::info!("game {}: no valid moves found", session.game_id);
                break GameOutcome::NoLegalMove;
            }
            Err(err) => {
                log::warn!("game {}: {err}", session.game_id);
                break GameOutcome::Aborted(err.to_string());
            }
        }
    };

    let report = GameReport::new(&session, turns, outcome);
    log::info!(
        "game {} finished with status {:?} after {} turns ({:?})",
        report.game_id,
        report.final_status,
        report.turns,
        report.outcome
    );
    Ok(report)
}

/// 單回合；回傳出手的玩家與座標
///
/// `dead_discard_by` 是本回合已換過死牌的玩家，該玩家不能再換第二張。
fn play_turn<S, P>(
    orchestrator: &SessionOrchestrator<S>,
    session: &mut Session,
    policy: &mut P,
    dead_discard_by: Option<&PlayerId>,
) -> Result<(PlayerId, usize, usize), SessionError>
where
    S: GameService,
    P: MovePolicy,
{
    let public_id = session.current_player()?;
    let private_id = orchestrator.resolve_private_player(session, &public_id)?;
    let hand = orchestrator.fetch_hand(session, &public_id, &private_id)?;

    let team = session.team_colour(&public_id);
    let board = session.board()?;
    let allow_dead_discard = dead_discard_by != Some(&public_id);
    let chosen = policy
        .choose(&legal_moves(&hand, board, team, allow_dead_discard))
        .ok_or(SessionError::NoLegalMove)?;
    let space = board
        .space_at(chosen.position)
        .cloned()
        .ok_or_else(|| SessionError::missing("pick move", "target space"))?;

    orchestrator.step(session, &private_id, &chosen.card, &space)?;
    Ok((public_id, chosen.position.row, chosen.position.col))
}
