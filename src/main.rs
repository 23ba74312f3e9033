use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use tonic::{Request, Response, Status};

use sequence_env::config::AppConfig;
use sequence_env::error::EnvError;
use sequence_env::proto::sequence_env_server::{SequenceEnv as SequenceEnvRpc, SequenceEnvServer};
use sequence_env::proto::{
    ActionMaskRequest, ActionMaskResponse, GetSpecRequest, GetSpecResponse, ResetRequest,
    ResetResponse, StepRequest, StepResponse,
};
use sequence_env::service::{mask_to_tensor, observation_spec, HttpGameService, SequenceEnv};

type Env = SequenceEnv<HttpGameService>;

// ============================================================================
// gRPC 服務
// ============================================================================

/// Game Service 客戶端是阻塞式的，所有環境操作都丟到 blocking 執行緒
struct EnvService {
    env: Arc<Mutex<Env>>,
}

impl EnvService {
    async fn with_env<T, F>(&self, f: F) -> Result<T, Status>
    where
        T: Send + 'static,
        F: FnOnce(&mut Env) -> Result<T, EnvError> + Send + 'static,
    {
        let env = Arc::clone(&self.env);
        tokio::task::spawn_blocking(move || {
            let mut env = env.lock().map_err(|_| Status::internal("lock error"))?;
            f(&mut *env).map_err(to_status)
        })
        .await
        .map_err(|e| Status::internal(format!("environment task failed: {e}")))?
    }
}

fn to_status(err: EnvError) -> Status {
    match err {
        EnvError::NotReset | EnvError::Terminated => Status::failed_precondition(err.to_string()),
        EnvError::Session(err) => Status::unavailable(err.to_string()),
    }
}

#[tonic::async_trait]
impl SequenceEnvRpc for EnvService {
    async fn reset(
        &self,
        _request: Request<ResetRequest>,
    ) -> Result<Response<ResetResponse>, Status> {
        let observation = self
            .with_env(|env| {
                let obs = env.reset()?;
                let mut proto = obs.to_proto();
                proto.action_mask = Some(mask_to_tensor(&env.action_mask()?));
                Ok(proto)
            })
            .await?;

        Ok(Response::new(ResetResponse {
            observation: Some(observation),
        }))
    }

    async fn step(&self, request: Request<StepRequest>) -> Result<Response<StepResponse>, Status> {
        let StepRequest { action } = request.into_inner();

        let response = self
            .with_env(move |env| {
                let result = env.step(action as usize)?;
                let mut observation = result.observation.to_proto();
                if !result.terminated {
                    // 遮罩失敗不影響這一步的結果
                    observation.action_mask = env.action_mask().ok().map(|m| mask_to_tensor(&m));
                }
                Ok(StepResponse {
                    observation: Some(observation),
                    reward: result.reward,
                    terminated: result.terminated,
                    truncated: result.truncated,
                    info: result.info.map(|info| info.to_proto()),
                })
            })
            .await?;

        Ok(Response::new(response))
    }

    async fn action_mask(
        &self,
        _request: Request<ActionMaskRequest>,
    ) -> Result<Response<ActionMaskResponse>, Status> {
        let mask = self.with_env(|env| env.action_mask()).await?;
        Ok(Response::new(ActionMaskResponse {
            action_mask: Some(mask_to_tensor(&mask)),
        }))
    }

    async fn get_spec(
        &self,
        _request: Request<GetSpecRequest>,
    ) -> Result<Response<GetSpecResponse>, Status> {
        let space = self.with_env(|env| Ok(env.action_space())).await?;
        let (board_cards, board_chips, hand_cards) = observation_spec(space);

        Ok(Response::new(GetSpecResponse {
            board_cards: Some(board_cards),
            board_chips: Some(board_chips),
            hand_cards: Some(hand_cards),
            action_space: space.size() as i32,
        }))
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("sequence_env.toml"));
    let config = AppConfig::load_or_default(&config_path)?;
    let addr: std::net::SocketAddr = config.server.addr.parse()?;

    // blocking 客戶端不能在 async context 裡建立
    let env_config = config.clone();
    let env = tokio::task::spawn_blocking(move || {
        HttpGameService::new(&env_config.api.base_url, env_config.api.request_timeout()).map(
            |service| {
                SequenceEnv::new(
                    service,
                    env_config.reward.clone(),
                    env_config.env.max_episode_turns,
                )
            },
        )
    })
    .await??;

    log::info!(
        "SequenceEnv gRPC server listening on {addr} (game service at {})",
        config.api.base_url
    );

    tonic::transport::Server::builder()
        .add_service(SequenceEnvServer::new(EnvService {
            env: Arc::new(Mutex::new(env)),
        }))
        .serve(addr)
        .await?;

    Ok(())
}
