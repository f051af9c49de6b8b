//! Presentation cues — fire-and-forget сигналы для анимаций и звука
//!
//! Core только сообщает "что произошло", проигрывание — забота движка.

use bevy::prelude::*;

/// Триггер анимации
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimationTrigger {
    Attack,
    Die,
}

/// Звуковой клип
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundClip {
    Attack,
    Death,
    Explosion,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    Animation(AnimationTrigger),
    Sound(SoundClip),
    /// Визуальный эффект взрыва в позиции entity
    Explosion,
}

/// Event: показать/проиграть cue для entity
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct PresentationCue {
    pub entity: Entity,
    pub cue: Cue,
}

impl PresentationCue {
    pub fn new(entity: Entity, cue: Cue) -> Self {
        Self { entity, cue }
    }
}
