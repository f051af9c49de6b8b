//! LevelProgress и GameOverCountdown — фазы сегмента и отложенные переходы
//!
//! Задержки — не корутины, а остаток времени, который тикает каждый кадр.
//! Терминальный исход сегмента выставляется один раз: повторные триггеры — no-op.

use bevy::prelude::*;

use crate::config::WinCondition;
use crate::session::LevelOutcome;

/// Фаза текущего сегмента
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LevelPhase {
    /// Ждём SegmentStarted от движка
    #[default]
    Loading,
    Playing,
    /// Победа показана, ждём перехода
    Victory,
    /// Поражение, идёт отсчёт до рестарта
    GameOver,
}

/// Запланированный переход к следующему сегменту
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingProgression {
    pub next_segment: usize,
    pub remaining: f32,
}

/// Прогресс текущего сегмента (resource)
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct LevelProgress {
    segment: usize,
    phase: LevelPhase,
    /// Остаток таймера (только для ScoreBeforeTimeout)
    time_remaining: Option<f32>,
    pending: Option<PendingProgression>,
}

impl LevelProgress {
    /// Сегмент загружен — начинаем играть
    pub fn begin_segment(&mut self, segment: usize, condition: &WinCondition) {
        self.segment = segment;
        self.phase = LevelPhase::Playing;
        self.pending = None;
        self.time_remaining = match condition {
            WinCondition::ScoreBeforeTimeout { time_limit, .. } => Some(*time_limit),
            WinCondition::KillAll | WinCondition::ReachExit => None,
        };
    }

    pub fn segment(&self) -> usize {
        self.segment
    }

    pub fn phase(&self) -> LevelPhase {
        self.phase
    }

    pub fn is_playing(&self) -> bool {
        self.phase == LevelPhase::Playing
    }

    pub fn time_remaining(&self) -> Option<f32> {
        self.time_remaining
    }

    /// Секунды для HUD (округление вверх)
    pub fn display_seconds(&self) -> Option<u32> {
        self.time_remaining.map(|remaining| remaining.max(0.0).ceil() as u32)
    }

    pub fn pending(&self) -> Option<PendingProgression> {
        self.pending
    }

    /// Завершить сегмент. false = исход уже был (или сегмент не идёт).
    ///
    /// Victory планирует переход к следующему сегменту через `victory_delay`.
    pub fn finish(&mut self, outcome: LevelOutcome, victory_delay: f32) -> bool {
        if self.phase != LevelPhase::Playing {
            return false;
        }

        self.time_remaining = None;
        match outcome {
            LevelOutcome::Victory => {
                self.phase = LevelPhase::Victory;
                self.pending = Some(PendingProgression {
                    next_segment: self.segment + 1,
                    remaining: victory_delay,
                });
            }
            LevelOutcome::GameOver => {
                self.phase = LevelPhase::GameOver;
                self.pending = None;
            }
        }
        true
    }

    /// Тик таймера ScoreBeforeTimeout. Возвращает исход, который надо применить.
    ///
    /// `finish_early`: победа, как только порог достигнут.
    /// По истечении: score ≥ required → Victory, иначе GameOver.
    pub fn tick_timer(
        &mut self,
        delta: f32,
        total_score: u32,
        required_score: u32,
        finish_early: bool,
    ) -> Option<LevelOutcome> {
        if self.phase != LevelPhase::Playing {
            return None;
        }

        let remaining = self.time_remaining.as_mut()?;

        if finish_early && total_score >= required_score {
            return Some(LevelOutcome::Victory);
        }

        *remaining = (*remaining - delta).max(0.0);
        if *remaining > 0.0 {
            return None;
        }

        if total_score >= required_score {
            Some(LevelOutcome::Victory)
        } else {
            Some(LevelOutcome::GameOver)
        }
    }

    /// Тик отложенного перехода. Some(next) — ровно один раз, фаза → Loading.
    pub fn tick_pending(&mut self, delta: f32) -> Option<usize> {
        let pending = self.pending.as_mut()?;
        pending.remaining -= delta;
        if pending.remaining > 0.0 {
            return None;
        }

        let next = pending.next_segment;
        self.pending = None;
        self.phase = LevelPhase::Loading;
        Some(next)
    }

    /// Рестарт кампании: сегмент 0, ждём загрузки
    pub fn restart(&mut self) {
        *self = Self::default();
    }
}

/// Отсчёт до рестарта после Game Over (wall-clock секунды)
///
/// Тикает по `Time<Real>`: виртуальное время на паузе, FixedUpdate стоит.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct GameOverCountdown {
    remaining: Option<f32>,
}

impl GameOverCountdown {
    /// Запустить отсчёт. false = уже идёт.
    pub fn start(&mut self, seconds: f32) -> bool {
        if self.remaining.is_some() {
            return false;
        }
        self.remaining = Some(seconds);
        true
    }

    pub fn is_running(&self) -> bool {
        self.remaining.is_some()
    }

    pub fn remaining(&self) -> Option<f32> {
        self.remaining
    }

    /// Секунды для экрана Game Over (округление вверх)
    pub fn display_seconds(&self) -> Option<u32> {
        self.remaining.map(|remaining| remaining.max(0.0).ceil() as u32)
    }

    /// true ровно один раз — когда отсчёт дошёл до нуля
    pub fn tick(&mut self, delta: f32) -> bool {
        let Some(remaining) = self.remaining.as_mut() else {
            return false;
        };

        *remaining -= delta;
        if *remaining > 0.0 {
            return false;
        }

        self.remaining = None;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timed() -> WinCondition {
        WinCondition::ScoreBeforeTimeout {
            required_score: 100,
            time_limit: 20.0,
            finish_early: false,
        }
    }

    /// Прогнать таймер до конца, вернуть все выданные исходы
    fn run_timer(progress: &mut LevelProgress, score: u32, finish_early: bool) -> Vec<LevelOutcome> {
        let mut outcomes = Vec::new();
        for _ in 0..(25 * 60) {
            if let Some(outcome) = progress.tick_timer(1.0 / 60.0, score, 100, finish_early) {
                if progress.finish(outcome, 2.0) {
                    outcomes.push(outcome);
                }
            }
        }
        outcomes
    }

    #[test]
    fn test_timeout_below_threshold_is_game_over_once() {
        let mut progress = LevelProgress::default();
        progress.begin_segment(0, &timed());

        assert_eq!(run_timer(&mut progress, 60, false), vec![LevelOutcome::GameOver]);
        assert_eq!(progress.phase(), LevelPhase::GameOver);
        assert_eq!(progress.pending(), None);
    }

    #[test]
    fn test_timeout_above_threshold_advances_once() {
        let mut progress = LevelProgress::default();
        progress.begin_segment(0, &timed());

        assert_eq!(run_timer(&mut progress, 120, false), vec![LevelOutcome::Victory]);
        assert_eq!(progress.phase(), LevelPhase::Victory);
        assert_eq!(progress.pending().map(|p| p.next_segment), Some(1));
    }

    #[test]
    fn test_timer_waits_for_timeout_without_finish_early() {
        let mut progress = LevelProgress::default();
        progress.begin_segment(0, &timed());

        assert_eq!(progress.tick_timer(1.0, 500, 100, false), None);
        assert_eq!(progress.display_seconds(), Some(19));
    }

    #[test]
    fn test_finish_early_wins_immediately() {
        let mut progress = LevelProgress::default();
        progress.begin_segment(0, &timed());

        assert_eq!(
            progress.tick_timer(1.0 / 60.0, 100, 100, true),
            Some(LevelOutcome::Victory)
        );
    }

    #[test]
    fn test_terminal_outcome_is_one_shot() {
        let mut progress = LevelProgress::default();
        // Не начатый сегмент нельзя завершить
        assert!(!progress.finish(LevelOutcome::Victory, 2.0));

        progress.begin_segment(1, &WinCondition::KillAll);
        assert!(progress.finish(LevelOutcome::Victory, 2.0));
        assert!(!progress.finish(LevelOutcome::GameOver, 2.0));
        assert!(!progress.finish(LevelOutcome::Victory, 2.0));
        assert_eq!(progress.phase(), LevelPhase::Victory);
    }

    #[test]
    fn test_pending_progression_fires_once() {
        let mut progress = LevelProgress::default();
        progress.begin_segment(0, &WinCondition::KillAll);
        progress.finish(LevelOutcome::Victory, 2.0);

        assert_eq!(progress.tick_pending(1.0), None);
        assert_eq!(progress.tick_pending(1.0), Some(1));
        assert_eq!(progress.tick_pending(1.0), None);
        assert_eq!(progress.phase(), LevelPhase::Loading);
    }

    #[test]
    fn test_game_over_countdown() {
        let mut countdown = GameOverCountdown::default();
        assert!(countdown.start(10.0));
        assert!(!countdown.start(10.0));
        assert_eq!(countdown.display_seconds(), Some(10));

        assert!(!countdown.tick(0.5));
        assert_eq!(countdown.display_seconds(), Some(10));
        assert!(!countdown.tick(0.6));
        assert_eq!(countdown.display_seconds(), Some(9));

        assert!(countdown.tick(9.0));
        assert!(!countdown.is_running());
        assert!(!countdown.tick(1.0));
    }
}
