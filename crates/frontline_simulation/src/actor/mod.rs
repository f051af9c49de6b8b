//! Actor domain — участники боя
//!
//! Содержит:
//! - Actor (фракция, по ней AI выбирает цель)
//! - Health (damage ledger, две death policy)
//! - Player / Enemy / ScoreReward (маркеры для session tracker)

pub mod components;

pub use components::*;
