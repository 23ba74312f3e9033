//! Sequence 棋盤遊戲的客戶端規則引擎與 RL 環境

pub mod config;
pub mod error;
pub mod game;
pub mod proto;
pub mod service;
