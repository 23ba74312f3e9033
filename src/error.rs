use std::path::PathBuf;

/// Game Service 互動失敗
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// 伺服器沒有可解析的回應，或狀態碼非成功
    #[error("{operation} failed (status {}): {reason}", display_status(.status))]
    Protocol {
        operation: &'static str,
        status: Option<u16>,
        reason: String,
    },

    /// 刷新一次後仍找不到 public id 對應的 private id
    #[error("failed to resolve private id for player {public_id}")]
    IdentityResolution { public_id: String },

    #[error("no legal move available for any card in hand")]
    NoLegalMove,

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl SessionError {
    pub fn no_result(operation: &'static str, status: Option<u16>) -> Self {
        SessionError::Protocol {
            operation,
            status,
            reason: "no result".into(),
        }
    }

    pub fn missing(operation: &'static str, field: &str) -> Self {
        SessionError::Protocol {
            operation,
            status: None,
            reason: format!("missing {field}"),
        }
    }

    /// 最後一次回應的狀態碼（若有）
    pub fn status(&self) -> Option<u16> {
        match self {
            SessionError::Protocol { status, .. } => *status,
            SessionError::Transport(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

fn display_status(status: &Option<u16>) -> String {
    status.map_or_else(|| "none".to_string(), |s| s.to_string())
}

/// Environment Adapter 的錯誤
#[derive(Debug, thiserror::Error)]
pub enum EnvError {
    #[error("environment not reset")]
    NotReset,

    #[error("episode already terminated, call reset")]
    Terminated,

    #[error(transparent)]
    Session(#[from] SessionError),
}

/// 設定檔載入錯誤
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Validation(String),
}
