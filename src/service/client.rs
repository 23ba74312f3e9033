//! Game Service 合約與 HTTP 實作

use std::time::Duration;

use reqwest::blocking::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::SessionError;
use crate::game::{GameCreated, GameJoined, GameState, HandResponse, MoveAction};

/// 單次呼叫結果
///
/// `body == None` 代表伺服器沒有可解析的結果（no result）。
#[derive(Clone, Debug, PartialEq)]
pub struct ApiResponse<T> {
    pub status: u16,
    pub body: Option<T>,
    /// 錯誤回應中的 `error` / `detail` 欄位
    pub detail: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(body: T) -> Self {
        Self {
            status: 200,
            body: Some(body),
            detail: None,
        }
    }

    pub fn empty(status: u16) -> Self {
        Self {
            status,
            body: None,
            detail: None,
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// 非成功狀態或無結果時轉為 ProtocolFailure
    pub fn into_result(self, operation: &'static str) -> Result<T, SessionError> {
        let status = self.status;
        if !self.is_success() {
            return Err(SessionError::Protocol {
                operation,
                status: Some(status),
                reason: self.detail.unwrap_or_else(|| "unexpected status".into()),
            });
        }
        self.body
            .ok_or_else(|| SessionError::no_result(operation, Some(status)))
    }
}

/// 遠端權威伺服器（阻塞式，一次呼叫一次往返）
pub trait GameService {
    fn create_game(&self) -> Result<ApiResponse<GameCreated>, SessionError>;

    fn join_game(&self, game_id: &str) -> Result<ApiResponse<GameJoined>, SessionError>;

    fn start_game(
        &self,
        game_id: &str,
        host_private_id: &str,
    ) -> Result<ApiResponse<GameState>, SessionError>;

    fn get_game(&self, game_id: &str) -> Result<ApiResponse<GameState>, SessionError>;

    fn get_hand(
        &self,
        game_id: &str,
        player_id: &str,
    ) -> Result<ApiResponse<HandResponse>, SessionError>;

    fn submit_move(
        &self,
        game_id: &str,
        private_id: &str,
        action: &MoveAction,
    ) -> Result<ApiResponse<GameState>, SessionError>;
}

/// REST/JSON 客戶端
pub struct HttpGameService {
    client: Client,
    base_url: String,
}

impl HttpGameService {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, SessionError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn get<T: DeserializeOwned>(&self, path: &str) -> Result<ApiResponse<T>, SessionError> {
        let response = self.client.get(self.url(path)).send()?;
        Ok(read_response(response))
    }

    fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: Option<&B>,
    ) -> Result<ApiResponse<T>, SessionError> {
        let mut request = self.client.post(self.url(path));
        if let Some(body) = body {
            request = request.json(body);
        }
        Ok(read_response(request.send()?))
    }
}

/// 讀取狀態碼與內容；內容無法解析時 body 為 `None`
fn read_response<T: DeserializeOwned>(response: Response) -> ApiResponse<T> {
    let status = response.status().as_u16();
    let text = response.text().unwrap_or_default();

    if !(200..300).contains(&status) {
        return ApiResponse {
            status,
            body: None,
            detail: error_detail(&text),
        };
    }

    match serde_json::from_str::<T>(&text) {
        Ok(body) => ApiResponse {
            status,
            body: Some(body),
            detail: None,
        },
        Err(err) => {
            log::debug!("unparseable response (status {status}): {err}");
            ApiResponse {
                status,
                body: None,
                detail: Some(err.to_string()),
            }
        }
    }
}

/// 錯誤內容中的 `error` 或 `detail`；非 JSON 則回傳原文
fn error_detail(text: &str) -> Option<String> {
    if text.trim().is_empty() {
        return None;
    }
    match serde_json::from_str::<serde_json::Value>(text) {
        Ok(value) => value
            .get("error")
            .or_else(|| value.get("detail"))
            .and_then(|v| v.as_str())
            .map(str::to_string),
        Err(_) => Some(text.to_string()),
    }
}

impl GameService for HttpGameService {
    fn create_game(&self) -> Result<ApiResponse<GameCreated>, SessionError> {
        self.post::<_, ()>("/game", None)
    }

    fn join_game(&self, game_id: &str) -> Result<ApiResponse<GameJoined>, SessionError> {
        self.post::<_, ()>(&format!("/game/join/{game_id}"), None)
    }

    fn start_game(
        &self,
        game_id: &str,
        host_private_id: &str,
    ) -> Result<ApiResponse<GameState>, SessionError> {
        self.post::<_, ()>(&format!("/game/{game_id}/start/{host_private_id}"), None)
    }

    fn get_game(&self, game_id: &str) -> Result<ApiResponse<GameState>, SessionError> {
        self.get(&format!("/game/{game_id}"))
    }

    fn get_hand(
        &self,
        game_id: &str,
        player_id: &str,
    ) -> Result<ApiResponse<HandResponse>, SessionError> {
        self.get(&format!("/game/{game_id}/player/{player_id}/hand"))
    }

    fn submit_move(
        &self,
        game_id: &str,
        private_id: &str,
        action: &MoveAction,
    ) -> Result<ApiResponse<GameState>, SessionError> {
        self.post(&format!("/game/{game_id}/move/{private_id}"), Some(action))
    }
}
