//! Общие helpers для integration тестов: headless App с ручным временем,
//! запись событий, спавн через Commands.

#![allow(dead_code)]

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use frontline_simulation::*;

/// Все интересные события, накопленные за прогон
#[derive(Resource, Default)]
pub struct Recorded {
    pub damage: Vec<DamageDealt>,
    pub deaths: Vec<EntityDied>,
    pub ended: Vec<LevelEnded>,
    pub loads: Vec<LoadSegment>,
    pub completed: Vec<CampaignCompleted>,
    pub cues: Vec<PresentationCue>,
}

fn record_events(
    mut damage: EventReader<DamageDealt>,
    mut deaths: EventReader<EntityDied>,
    mut ended: EventReader<LevelEnded>,
    mut loads: EventReader<LoadSegment>,
    mut completed: EventReader<CampaignCompleted>,
    mut cues: EventReader<PresentationCue>,
    mut recorded: ResMut<Recorded>,
) {
    recorded.damage.extend(damage.read().copied());
    recorded.deaths.extend(deaths.read().copied());
    recorded.ended.extend(ended.read().copied());
    recorded.loads.extend(loads.read().copied());
    recorded.completed.extend(completed.read().copied());
    recorded.cues.extend(cues.read().copied());
}

/// Headless App: каждый `update()` = ровно один fixed tick (кроме первого кадра)
pub fn simulation_app(config: SimulationConfig) -> App {
    let mut app = create_headless_app(config.seed);
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
        1.0 / config.fixed_hz,
    )))
    .add_plugins(SimulationPlugin::new(config))
    .init_resource::<Recorded>()
    .add_systems(PostUpdate, record_events);

    // Первый кадр — нулевая delta, fixed tick не идёт
    app.update();
    app
}

/// Конфиг с одним набором сегментов и короткими задержками
pub fn config_with(segments: Vec<SegmentConfig>) -> SimulationConfig {
    SimulationConfig {
        segments,
        victory_display_delay: 0.5,
        game_over_countdown: 2.0,
        ..Default::default()
    }
}

pub fn kill_all_config() -> SimulationConfig {
    config_with(vec![
        SegmentConfig::new("first", WinCondition::KillAll),
        SegmentConfig::new("second", WinCondition::KillAll),
    ])
}

/// Спавн через Commands с немедленным применением
pub fn spawn_with(app: &mut App, spawn: impl FnOnce(&mut Commands) -> Entity) -> Entity {
    let entity = {
        let mut commands = app.world_mut().commands();
        spawn(&mut commands)
    };
    app.world_mut().flush();
    entity
}

pub fn spawn_test_player(app: &mut App, position: Vec3) -> Entity {
    spawn_with(app, |commands| spawn_player(commands, position, 100))
}

pub fn spawn_test_enemy(
    app: &mut App,
    profile: &EnemyProfile,
    position: Vec3,
    target: Option<Entity>,
) -> Entity {
    spawn_with(app, |commands| {
        spawn_enemy(commands, profile, Transform::from_translation(position), target)
    })
}

pub fn start_segment(app: &mut App, index: usize) {
    app.world_mut().send_event(SegmentStarted { index });
    app.update();
}

pub fn damage(app: &mut App, target: Entity, amount: u32) {
    app.world_mut()
        .send_event(DamageRequest::new(None, target, amount));
}

/// Прогнать `seconds` секунд (по кадру на fixed tick)
pub fn run_for(app: &mut App, seconds: f32) {
    let frames = (seconds * 60.0).round() as usize;
    for _ in 0..frames {
        app.update();
    }
}

pub fn recorded(app: &App) -> &Recorded {
    app.world().resource::<Recorded>()
}

pub fn health(app: &App, entity: Entity) -> Health {
    *app.world()
        .get::<Health>(entity)
        .expect("entity has Health")
}

pub fn state(app: &App, entity: Entity) -> AIState {
    *app.world()
        .get::<AIState>(entity)
        .expect("entity has AIState")
}

pub fn set_position(app: &mut App, entity: Entity, position: Vec3) {
    if let Some(mut transform) = app.world_mut().get_mut::<Transform>(entity) {
        transform.translation = position;
    }
}
