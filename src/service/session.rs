//! Session 協調器
//!
//! 狀態機：created → joined → started → in-progress → completed / aborted。
//! 失敗的呼叫不會覆寫最後一份有效的 `GameState`。

use std::collections::HashMap;

use super::client::GameService;
use crate::error::SessionError;
use crate::game::{Board, BoardSpace, Card, ChipColour, GameId, GameJoined, GameState, MoveAction, PlayerId};

/// 單場遊戲的客戶端狀態
#[derive(Clone, Debug)]
pub struct Session {
    pub game_id: GameId,
    pub host_private_id: PlayerId,
    join: Option<GameJoined>,
    /// public → private，只增不減
    public_to_private: HashMap<PlayerId, PlayerId>,
    state: GameState,
}

impl Session {
    pub fn new(
        game_id: GameId,
        host_private_id: PlayerId,
        join: Option<GameJoined>,
        state: GameState,
    ) -> Self {
        let mut session = Self {
            game_id,
            host_private_id,
            join,
            public_to_private: HashMap::new(),
            state,
        };
        session.ensure_player_map();
        session
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// 從加入回應與快照的 host 欄位補齊身份對應
    fn ensure_player_map(&mut self) {
        if let Some(joined) = &self.join {
            if let (Some(public), Some(private)) =
                (&joined.public_player_uuid, &joined.private_player_uuid)
            {
                self.public_to_private.insert(public.clone(), private.clone());
            }
        }
        if let Some(host) = &self.state.host {
            self.public_to_private
                .insert(host.clone(), self.host_private_id.clone());
        }
    }

    /// 整份替換快照
    fn replace_state(&mut self, state: GameState) {
        self.state = state;
        self.ensure_player_map();
    }

    pub fn private_id(&self, public_id: &str) -> Option<&PlayerId> {
        self.public_to_private.get(public_id)
    }

    pub fn known_players(&self) -> usize {
        self.public_to_private.len()
    }

    pub fn current_player(&self) -> Result<PlayerId, SessionError> {
        self.state
            .current_player_turn
            .clone()
            .ok_or_else(|| SessionError::missing("read game state", "currentPlayerTurn"))
    }

    pub fn board(&self) -> Result<&Board, SessionError> {
        match &self.state.board {
            Some(board) if board.spaces.is_some() => Ok(board),
            _ => Err(SessionError::missing("read game state", "board")),
        }
    }

    pub fn team_colour(&self, public_id: &str) -> Option<ChipColour> {
        self.state.team_colour(public_id)
    }

    pub fn is_done(&self) -> bool {
        self.state.is_completed()
    }
}

/// 透過 Game Service 驅動一場遊戲
pub struct SessionOrchestrator<S> {
    service: S,
}

impl<S: GameService> SessionOrchestrator<S> {
    pub fn new(service: S) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// 建立遊戲、加入第二位玩家並開始；任一步失敗即回報，不重試
    pub fn create_and_start(&self) -> Result<Session, SessionError> {
        let created = self.service.create_game()?.into_result("create game")?;
        let (Some(game_id), Some(host_private_id)) = (created.uuid, created.host_player_uuid)
        else {
            return Err(SessionError::missing("create game", "game/host id"));
        };

        let joined = self.service.join_game(&game_id)?.into_result("join game")?;
        if joined.private_player_uuid.is_none() {
            return Err(SessionError::missing("join game", "privatePlayerUuid"));
        }

        let state = self
            .service
            .start_game(&game_id, &host_private_id)?
            .into_result("start game")?;

        log::debug!("game {game_id} started");
        Ok(Session::new(game_id, host_private_id, Some(joined), state))
    }

    /// 重新抓取快照並補齊身份對應
    pub fn refresh(&self, session: &mut Session) -> Result<(), SessionError> {
        let state = self
            .service
            .get_game(&session.game_id)?
            .into_result("refresh game state")?;
        session.replace_state(state);
        Ok(())
    }

    /// 查表；未命中時刷新一次再查，仍未命中即失敗
    pub fn resolve_private_player(
        &self,
        session: &mut Session,
        public_id: &str,
    ) -> Result<PlayerId, SessionError> {
        if let Some(private) = session.private_id(public_id) {
            return Ok(private.clone());
        }
        self.refresh(session)?;
        session
            .private_id(public_id)
            .cloned()
            .ok_or_else(|| SessionError::IdentityResolution {
                public_id: public_id.to_string(),
            })
    }

    /// 先以 private id 查詢；無結果時以 public id 再試一次
    pub fn fetch_hand(
        &self,
        session: &Session,
        public_id: &str,
        private_id: &str,
    ) -> Result<Vec<Card>, SessionError> {
        let mut response = self.service.get_hand(&session.game_id, private_id)?;
        if let Some(cards) = response.body.as_mut().and_then(|hand| hand.cards.take()) {
            return Ok(cards);
        }

        if public_id != private_id {
            response = self.service.get_hand(&session.game_id, public_id)?;
            if let Some(cards) = response.body.as_mut().and_then(|hand| hand.cards.take()) {
                return Ok(cards);
            }
        }

        Err(SessionError::Protocol {
            operation: "fetch hand",
            status: Some(response.status),
            reason: format!("no hand for player {public_id}"),
        })
    }

    /// 送出著手；成功時整份替換快照，失敗時不改動狀態
    pub fn step(
        &self,
        session: &mut Session,
        private_id: &str,
        card: &Card,
        space: &BoardSpace,
    ) -> Result<(), SessionError> {
        let (Some(row), Some(column)) = (space.row, space.col) else {
            return Err(SessionError::Protocol {
                operation: "submit move",
                status: None,
                reason: "target space has no coordinates".into(),
            });
        };
        let action = MoveAction {
            row,
            column,
            card: card.clone(),
        };

        let state = self
            .service
            .submit_move(&session.game_id, private_id, &action)?
            .into_result("submit move")?;
        session.replace_state(state);
        Ok(())
    }
}
