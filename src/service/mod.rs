//! 服務層模組
//!
//! Game Service 客戶端、Session 協調、baseline 對局，
//! 以及 gRPC 環境所需的狀態管理、觀測構建與動作遮罩

pub mod action_mask;
pub mod client;
pub mod observation;
pub mod play;
pub mod policy;
pub mod session;
pub mod state;

pub use action_mask::{action_mask, all_legal, mask_to_tensor};
pub use client::{ApiResponse, GameService, HttpGameService};
pub use observation::{encode_observation, observation_spec, ColourCodes, Observation};
pub use play::{run_random_game, GameOutcome, GameReport};
pub use policy::{MovePolicy, RandomMovePolicy};
pub use session::{Session, SessionOrchestrator};
pub use state::{EnvPhase, EpisodeInfo, SequenceEnv, StepResult};
