//! Learning Agent 的 gRPC 訊息定義
//!
//! 訊息以 prost derive 手寫，服務端程式碼由 build.rs 透過 `tonic_build::manual` 生成。

/// 扁平化張量（row-major）
#[derive(Clone, PartialEq, prost::Message)]
pub struct Tensor {
    #[prost(float, repeated, tag = "1")]
    pub data: Vec<f32>,
    #[prost(int32, repeated, tag = "2")]
    pub shape: Vec<i32>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct TensorSpec {
    #[prost(int32, repeated, tag = "1")]
    pub shape: Vec<i32>,
    #[prost(string, tag = "2")]
    pub dtype: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct Observation {
    #[prost(message, optional, tag = "1")]
    pub board_cards: Option<Tensor>,
    #[prost(message, optional, tag = "2")]
    pub board_chips: Option<Tensor>,
    #[prost(message, optional, tag = "3")]
    pub hand_cards: Option<Tensor>,
    #[prost(message, optional, tag = "4")]
    pub action_mask: Option<Tensor>,
}

/// 回合結束時的統計（對應訓練指標）
#[derive(Clone, PartialEq, prost::Message)]
pub struct EnvInfo {
    #[prost(uint32, tag = "1")]
    pub episode_turns: u32,
    #[prost(uint32, tag = "2")]
    pub invalid_moves: u32,
    #[prost(uint32, tag = "3")]
    pub success_moves: u32,
    #[prost(bool, tag = "4")]
    pub timeout: bool,
    #[prost(uint32, tag = "5")]
    pub placed_chips: u32,
    #[prost(uint32, tag = "6")]
    pub removed_chips: u32,
    #[prost(uint32, tag = "7")]
    pub error_moves: u32,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ResetRequest {}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ResetResponse {
    #[prost(message, optional, tag = "1")]
    pub observation: Option<Observation>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct StepRequest {
    #[prost(uint32, tag = "1")]
    pub action: u32,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct StepResponse {
    #[prost(message, optional, tag = "1")]
    pub observation: Option<Observation>,
    #[prost(float, tag = "2")]
    pub reward: f32,
    #[prost(bool, tag = "3")]
    pub terminated: bool,
    #[prost(bool, tag = "4")]
    pub truncated: bool,
    #[prost(message, optional, tag = "5")]
    pub info: Option<EnvInfo>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ActionMaskRequest {}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ActionMaskResponse {
    #[prost(message, optional, tag = "1")]
    pub action_mask: Option<Tensor>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct GetSpecRequest {}

#[derive(Clone, PartialEq, prost::Message)]
pub struct GetSpecResponse {
    #[prost(message, optional, tag = "1")]
    pub board_cards: Option<TensorSpec>,
    #[prost(message, optional, tag = "2")]
    pub board_chips: Option<TensorSpec>,
    #[prost(message, optional, tag = "3")]
    pub hand_cards: Option<TensorSpec>,
    #[prost(int32, tag = "4")]
    pub action_space: i32,
}

include!(concat!(env!("OUT_DIR"), "/sequence_env.SequenceEnv.rs"));
