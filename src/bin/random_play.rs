//! 隨機 baseline：平行跑 N 場對局，每場各自建立 session
//!
//! 用法：`random_play [config.toml]`

use std::path::PathBuf;

use rayon::iter::{IntoParallelIterator, ParallelIterator};

use sequence_env::config::AppConfig;
use sequence_env::error::SessionError;
use sequence_env::service::{
    run_random_game, GameOutcome, GameReport, HttpGameService, RandomMovePolicy,
    SessionOrchestrator,
};

fn play_one(config: &AppConfig, index: u32) -> Result<GameReport, SessionError> {
    let service = HttpGameService::new(&config.api.base_url, config.api.request_timeout())?;
    let orchestrator = SessionOrchestrator::new(service);
    let mut policy = RandomMovePolicy::new(config.baseline.seed + index as u64);
    run_random_game(&orchestrator, &mut policy, config.baseline.max_turns)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("sequence_env.toml"));
    let config = AppConfig::load_or_default(&config_path)?;

    log::info!(
        "playing {} random game(s) against {}",
        config.baseline.games,
        config.api.base_url
    );

    let results: Vec<_> = (0..config.baseline.games)
        .into_par_iter()
        .map(|index| (index, play_one(&config, index)))
        .collect();

    let mut completed = 0;
    let mut failed = 0;
    for (index, result) in results {
        match result {
            Ok(report) => {
                if report.outcome == GameOutcome::Completed {
                    completed += 1;
                }
                log::info!(
                    "game #{index} ({}): {:?} after {} turns",
                    report.game_id,
                    report.outcome,
                    report.turns
                );
            }
            Err(err) => {
                failed += 1;
                log::error!("game #{index} could not start: {err}");
            }
        }
    }

    log::info!(
        "{completed}/{} games completed, {failed} failed to start",
        config.baseline.games
    );
    Ok(())
}
