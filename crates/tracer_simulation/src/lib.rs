//! TRACER Simulation Core
//!
//! Пулинг и симуляция снарядов с trail визуалами на Bevy 0.16.
//!
//! HYBRID ARCHITECTURE:
//! - ECS = владелец пулов (`Projectiles` resource) и tick order (FixedUpdate)
//! - Host engine = рендер trail'ов (читает `ProjectileTrail` + `Transform`)
//! - Rapier = swept raycast'ы снарядов
//!
//! Core (`projectile::ProjectileSimulation`) не зависит от ECS: его можно
//! гонять вручную через `init()` / `step(dt, now)` из любого driver loop.

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod collision_layers;
pub mod config;
pub mod logger;
pub mod projectile;

pub use config::ProjectileConfig;
pub use logger::{init_logger, log, log_error, log_info, log_warning, set_log_level, set_logger, LogLevel, LogPrinter};
pub use projectile::{
    ChannelId, ChannelSlot, FireProjectileIntent, FireRequest, HitOutcome, HitPayload, ProjectileId,
    ProjectilePlugin, ProjectileResolved, ProjectileTrail, Projectiles, SetProjectileChannels,
    SurfaceTag,
};

/// Главный plugin симуляции
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app
            // Fixed timestep 60Hz для simulation tick
            .insert_resource(Time::<Fixed>::from_hz(60.0))
            .add_plugins(ProjectilePlugin::default());
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_hz(60.0)); // 60Hz FixedUpdate

    app
}

/// Snapshot пулов для сравнения детерминизма
///
/// Порядок arena + id + membership + позиции (через Debug, простейший способ).
pub fn pool_snapshot(projectiles: &Projectiles) -> Vec<u8> {
    let pool = projectiles.pool();
    let mut snapshot = Vec::new();

    for (index, record) in pool.iter() {
        snapshot.extend_from_slice(&(index.get() as u64).to_le_bytes());
        snapshot.extend_from_slice(
            format!(
                "{:?}|{:?}|{:?}|{}|{:?}",
                record.id,
                record.membership(),
                record.current_position,
                record.elapsed,
                record.visual_position
            )
            .as_bytes(),
        );
    }

    snapshot
}
