//! Session events — граница между core и scene collaborator

use bevy::prelude::*;

/// Core → движок: загрузить сегмент с индексом
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadSegment {
    pub index: usize,
}

/// Движок → core: сегмент загружен, враги заспавнены
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentStarted {
    pub index: usize,
}

/// Core → движок: пройден последний сегмент
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CampaignCompleted {
    pub total_score: u32,
}

/// Движок → core: игрок дошёл до выхода сегмента
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExitReached;

/// Итог сегмента
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelOutcome {
    Victory,
    GameOver,
}

/// Core → UI: сегмент завершён (ровно один раз на сегмент)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelEnded {
    pub segment: usize,
    pub outcome: LevelOutcome,
}
