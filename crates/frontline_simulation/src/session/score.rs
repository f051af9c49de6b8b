//! ScoreBoard и KillCounter — session resources

use bevy::prelude::*;

/// Очки по сегментам + общий счёт кампании
///
/// Сбрасывается только при рестарте кампании (Game Over → сегмент 0).
#[derive(Resource, Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreBoard {
    segment_scores: Vec<u32>,
    current_segment: usize,
}

impl ScoreBoard {
    pub fn new(segment_count: usize) -> Self {
        Self {
            segment_scores: vec![0; segment_count],
            current_segment: 0,
        }
    }

    pub fn set_segment(&mut self, segment: usize) {
        if segment >= self.segment_scores.len() {
            self.segment_scores.resize(segment + 1, 0);
        }
        self.current_segment = segment;
    }

    pub fn current_segment(&self) -> usize {
        self.current_segment
    }

    /// Начислить очки текущему сегменту
    pub fn add_score(&mut self, amount: u32) {
        self.set_segment(self.current_segment);
        let score = &mut self.segment_scores[self.current_segment];
        *score = score.saturating_add(amount);
        let segment_score = *score;

        crate::log(&format!(
            "🏆 Score +{} (segment {}: {}, total {})",
            amount,
            self.current_segment,
            segment_score,
            self.total_score()
        ));
    }

    pub fn segment_score(&self, segment: usize) -> u32 {
        self.segment_scores.get(segment).copied().unwrap_or(0)
    }

    pub fn total_score(&self) -> u32 {
        self.segment_scores
            .iter()
            .fold(0u32, |total, score| total.saturating_add(*score))
    }

    /// Обнулить все сегменты (рестарт кампании)
    pub fn reset_scores(&mut self) {
        self.segment_scores.iter_mut().for_each(|score| *score = 0);
        self.current_segment = 0;
        crate::log_info("🏆 Scores reset");
    }
}

/// Счётчик убийств текущего сегмента
///
/// Инвариант: enemies_killed ≤ total_enemies; cleared ⇔ killed == total.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KillCounter {
    total_enemies: u32,
    enemies_killed: u32,
}

impl KillCounter {
    pub fn new(total_enemies: u32) -> Self {
        Self {
            total_enemies,
            enemies_killed: 0,
        }
    }

    /// Новый враг в сегменте (спавнер)
    pub fn register_enemy(&mut self) {
        self.total_enemies += 1;
    }

    /// Засчитать убийство. false = счётчик уже полон (лишняя смерть не считается).
    pub fn enemy_killed(&mut self) -> bool {
        if self.enemies_killed >= self.total_enemies {
            crate::log_warning(&format!(
                "⚠️ KillCounter: kill beyond total ({}/{}), ignored",
                self.enemies_killed, self.total_enemies
            ));
            return false;
        }

        self.enemies_killed += 1;
        crate::log(&format!(
            "☠️ Enemies killed: {}/{}",
            self.enemies_killed, self.total_enemies
        ));
        true
    }

    pub fn total_enemies(&self) -> u32 {
        self.total_enemies
    }

    pub fn enemies_killed(&self) -> u32 {
        self.enemies_killed
    }

    pub fn remaining(&self) -> u32 {
        self.total_enemies - self.enemies_killed
    }

    pub fn is_cleared(&self) -> bool {
        self.enemies_killed == self.total_enemies
    }
}
