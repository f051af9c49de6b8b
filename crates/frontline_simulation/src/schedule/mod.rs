//! Отложенные действия entity (замах → удар, конец замаха)
//!
//! Вместо корутин: список `(due_time, action)` на entity, проверяется каждый тик.
//! Смерть entity очищает список целиком, поэтому удар мертвеца не прилетит.

use bevy::prelude::*;

/// Действие, выполняемое в момент due_time (simulation seconds)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DeferredAction {
    /// Нанести урон, если цель жива и всё ещё в радиусе
    Strike {
        target: Entity,
        damage: u32,
        range: f32,
    },
    /// Замах закончился, враг может сменить состояние
    EndSwing,
}

/// Очередь отложенных действий entity
#[derive(Component, Debug, Clone, Default)]
pub struct ScheduledActions {
    pending: Vec<(f32, DeferredAction)>,
}

impl ScheduledActions {
    pub fn schedule(&mut self, due_time: f32, action: DeferredAction) {
        self.pending.push((due_time, action));
    }

    /// Забрать все действия с due_time ≤ now (в порядке времени, при равенстве — порядке добавления)
    pub fn take_due(&mut self, now: f32) -> Vec<DeferredAction> {
        if self.pending.is_empty() {
            return Vec::new();
        }

        let (mut due, rest): (Vec<_>, Vec<_>) = self
            .pending
            .drain(..)
            .partition(|(due_time, _)| *due_time <= now);
        self.pending = rest;

        due.sort_by(|a, b| a.0.total_cmp(&b.0));
        due.into_iter().map(|(_, action)| action).collect()
    }

    /// Отменить всё (смерть). Возвращает число отменённых действий.
    pub fn cancel_all(&mut self) -> usize {
        let cancelled = self.pending.len();
        self.pending.clear();
        cancelled
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
