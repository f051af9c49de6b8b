//! Headless симуляция FRONTLINE
//!
//! Запускает Bevy App без рендера: демо-кампания, где игрок стоит в центре
//! и автоматически стреляет по ближайшей цели. Заглушки движка (сцены,
//! навигация, оружие игрока) живут только здесь.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use clap::Parser;

use frontline_simulation::{
    create_headless_app, log_info, set_log_level, spawn_enemy, spawn_player, CampaignCompleted,
    DamageRequest, Dead, EnemyProfile, EnemySpawner, Health, LevelEnded, LevelProgress,
    LoadSegment, LogLevel, MovementCommand, Player, ScoreBoard, SegmentStarted,
    SimulationConfig, SimulationPlugin, SimulationSet,
};

#[derive(Parser, Debug)]
#[command(name = "frontline_simulation", about = "Headless FRONTLINE combat simulation")]
struct Args {
    /// JSON конфиг (по умолчанию встроенный)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Переопределить seed из конфига
    #[arg(long)]
    seed: Option<u64>,

    /// Сколько кадров прогнать
    #[arg(long, default_value_t = 3600)]
    ticks: u32,

    /// debug | info | warn | error
    #[arg(long, default_value = "info")]
    log_level: String,
}

/// Маркер: entity демо-сцены без Health (спавнеры), удаляется при загрузке сегмента
#[derive(Component)]
struct SceneEntity;

/// Оружие игрока-заглушки
#[derive(Component)]
struct AutoFire {
    damage: u32,
    range: f32,
    interval: f32,
    next_shot: f32,
}

#[derive(Resource, Default)]
struct RunSummary {
    completed: Option<u32>,
    segments_ended: Vec<LevelEnded>,
}

const MOVE_SPEED: f32 = 3.5;

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let level = LogLevel::parse(&args.log_level)
        .with_context(|| format!("unknown log level '{}'", args.log_level))?;
    set_log_level(level);

    let mut config = match &args.config {
        Some(path) => SimulationConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => SimulationConfig::default().validate()?,
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }

    println!(
        "Starting FRONTLINE headless simulation (seed: {}, {} segments)",
        config.seed,
        config.segments.len()
    );

    let mut app = create_headless_app(config.seed);
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
        1.0 / config.fixed_hz,
    )))
    .init_resource::<RunSummary>()
    .add_plugins(SimulationPlugin::new(config))
    .add_systems(Startup, request_first_segment)
    .add_systems(Update, (load_demo_segment, record_outcomes))
    .add_systems(FixedUpdate, player_auto_fire.in_set(SimulationSet::Attack))
    .add_systems(FixedUpdate, steer_to_commands.after(SimulationSet::Cleanup));

    for tick in 0..args.ticks {
        app.update();

        if tick % 600 == 0 {
            let world = app.world();
            let progress = world.resource::<LevelProgress>();
            println!(
                "Tick {}: segment {} {:?}, score {}, {} entities",
                tick,
                progress.segment(),
                progress.phase(),
                world.resource::<ScoreBoard>().total_score(),
                world.entities().len()
            );
        }

        if app.world().resource::<RunSummary>().completed.is_some() {
            break;
        }
    }

    let summary = app.world().resource::<RunSummary>();
    for ended in &summary.segments_ended {
        println!("Segment {} → {:?}", ended.segment, ended.outcome);
    }
    match summary.completed {
        Some(score) => println!("Campaign completed! Total score: {}", score),
        None => println!("Simulation stopped after {} ticks", args.ticks),
    }

    Ok(())
}

fn request_first_segment(mut loads: EventWriter<LoadSegment>) {
    loads.write(LoadSegment { index: 0 });
}

/// Заглушка scene loader: пересобрать демо-сцену и подтвердить SegmentStarted
fn load_demo_segment(
    mut commands: Commands,
    mut loads: EventReader<LoadSegment>,
    scene: Query<Entity, Or<(With<SceneEntity>, With<Health>)>>,
    config: Res<SimulationConfig>,
    mut started: EventWriter<SegmentStarted>,
) {
    let Some(load) = loads.read().last().copied() else {
        return;
    };

    for entity in scene.iter() {
        commands.entity(entity).despawn();
    }

    let player = spawn_player(&mut commands, Vec3::ZERO, config.player_max_health);
    commands.entity(player).insert((
        SceneEntity,
        AutoFire {
            damage: 25,
            range: 30.0,
            interval: 0.4,
            next_shot: 0.0,
        },
    ));

    let profile = |name: &str, fallback: fn() -> EnemyProfile| {
        config.profile(name).cloned().unwrap_or_else(fallback)
    };

    let mut enemies: Vec<(EnemyProfile, Vec3)> = Vec::new();
    let mut spawners: Vec<EnemySpawner> = Vec::new();

    match load.index {
        0 => {
            enemies.push((profile("brute", EnemyProfile::brute), Vec3::new(6.0, 0.0, 0.0)));
            enemies.push((profile("brute", EnemyProfile::brute), Vec3::new(-8.0, 0.0, 3.0)));
            enemies.push((profile("turret", EnemyProfile::turret), Vec3::new(0.0, 0.0, -20.0)));
            enemies.push((profile("barrel", EnemyProfile::barrel), Vec3::new(5.0, 0.0, 2.0)));
            enemies.push((profile("barrel", EnemyProfile::barrel), Vec3::new(9.0, 0.0, 2.0)));
        }
        1 => {
            enemies.push((profile("mutant", EnemyProfile::mutant), Vec3::new(12.0, 0.0, 0.0)));
            spawners.push(EnemySpawner::new(
                profile("brute", EnemyProfile::brute),
                vec![Vec3::new(15.0, 0.0, 15.0), Vec3::new(-15.0, 0.0, 15.0)],
                3.0,
                Some(3),
            ));
        }
        _ => {
            for x in [-6.0, 0.0, 6.0] {
                enemies.push((profile("skeleton", EnemyProfile::skeleton), Vec3::new(x, 0.0, -9.0)));
            }
        }
    }

    for (enemy_profile, position) in &enemies {
        let enemy = spawn_enemy(
            &mut commands,
            enemy_profile,
            Transform::from_translation(*position),
            Some(player),
        );
        commands.entity(enemy).insert(SceneEntity);
    }
    for spawner in spawners {
        commands.spawn((SceneEntity, Transform::default(), spawner));
    }

    log_info(&format!("Demo scene for segment {} loaded", load.index));
    started.write(SegmentStarted { index: load.index });
}

/// Заглушка оружия игрока: стреляет по ближайшей живой цели в радиусе
fn player_auto_fire(
    mut shooters: Query<(Entity, &Transform, &Health, &mut AutoFire), With<Player>>,
    targets: Query<(Entity, &Transform), (With<Health>, Without<Player>, Without<Dead>)>,
    mut damage: EventWriter<DamageRequest>,
    time: Res<Time<Fixed>>,
) {
    let now = time.elapsed_secs();

    for (shooter, transform, health, mut weapon) in shooters.iter_mut() {
        if health.is_dead() || now < weapon.next_shot {
            continue;
        }

        let nearest = targets
            .iter()
            .map(|(entity, target_transform)| {
                (entity, transform.translation.distance(target_transform.translation))
            })
            .filter(|(_, distance)| *distance <= weapon.range)
            .min_by(|a, b| a.1.total_cmp(&b.1));

        if let Some((target, _)) = nearest {
            damage.write(DamageRequest::new(Some(shooter), target, weapon.damage));
            weapon.next_shot = now + weapon.interval;
        }
    }
}

/// Заглушка navigation agent: прямолинейно к MoveToPosition, лицом к цели
fn steer_to_commands(mut movers: Query<(&mut Transform, &MovementCommand)>, time: Res<Time<Fixed>>) {
    let step = MOVE_SPEED * time.delta_secs();

    for (mut transform, command) in movers.iter_mut() {
        let MovementCommand::MoveToPosition { target } = *command else {
            continue;
        };

        let offset = target - transform.translation;
        let distance = offset.length();
        if distance <= f32::EPSILON {
            continue;
        }

        transform.translation += offset / distance * step.min(distance);
        transform.look_at(target, Vec3::Y);
    }
}

fn record_outcomes(
    mut ended: EventReader<LevelEnded>,
    mut completed: EventReader<CampaignCompleted>,
    mut summary: ResMut<RunSummary>,
) {
    summary.segments_ended.extend(ended.read().copied());
    if let Some(done) = completed.read().last() {
        summary.completed = Some(done.total_score);
    }
}
