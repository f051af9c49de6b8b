//! Movement components

use bevy::prelude::*;

/// High-level команда движения (читается navigation agent движка)
///
/// AI пишет команду только при смене, чтобы `Changed<MovementCommand>`
/// не срабатывал каждый тик.
#[derive(Component, Debug, Clone, Copy, PartialEq, Default, Reflect)]
#[reflect(Component)]
pub enum MovementCommand {
    /// Нет цели, стоим
    #[default]
    Idle,
    /// Идти к точке (позиция цели на момент решения)
    MoveToPosition { target: Vec3 },
    /// Немедленно остановиться (атака, смерть)
    Stop,
}

impl MovementCommand {
    /// Обновить команду, если она отличается. true = команда сменилась.
    pub fn set_if_changed(&mut self, next: MovementCommand) -> bool {
        if *self == next {
            return false;
        }
        *self = next;
        true
    }
}
