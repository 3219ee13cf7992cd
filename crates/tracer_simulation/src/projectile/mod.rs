//! Projectile domain — пулинг и симуляция снарядов с trail визуалами
//!
//! # Architecture
//!
//! - **trajectory**: pure model (elapsed → position), linear / ballistic
//! - **record**: identity + trajectory + visual handle одного снаряда
//! - **channel**: два pooling слота, привязанные к weapon channels
//! - **pool**: idle / active / cooldown пулы поверх arena
//! - **simulation**: per-tick driver (integrate → sweep → release → cooldown)
//! - **collision / visual**: внешние collaborators (traits + Bevy/Rapier impl)
//! - **systems**: FixedUpdate systems + `Projectiles` resource
//!
//! # Lifecycle
//!
//! `Idle → Active → Cooldown → Idle`, терминальное состояние — Destroyed
//! (канал не привязан при release/sweep, либо rebind слота).

use bevy::prelude::*;

use crate::config::ProjectileConfig;

pub mod channel;
pub mod collision;
pub mod events;
pub mod pool;
pub mod record;
pub mod simulation;
pub mod systems;
pub mod trajectory;
pub mod visual;

#[cfg(test)]
mod test_support;
#[cfg(test)]
mod simulation_tests;

pub use channel::{ChannelBinding, ChannelId, ChannelSlot};
pub use collision::{CollisionQuery, HitOutcome, NoCollision, RapierSweep, SurfaceTag, SweepHit};
pub use events::{FireProjectileIntent, ProjectileResolved, SetProjectileChannels};
pub use pool::{ProjectilePool, DEFAULT_GRACE_INTERVAL};
pub use record::{FireRequest, HitPayload, Membership, ProjectileId, ProjectileRecord, RecordIndex};
pub use simulation::{ProjectileOutcome, ProjectileSimulation, StepReport};
pub use systems::{Projectiles, ProjectileTrail, TrailVisuals};
pub use trajectory::{
    move_towards, BallisticTrajectory, LinearTrajectory, Trajectory, TrajectoryParams,
};
pub use visual::VisualProvider;

/// Projectile Plugin
///
/// Регистрирует события, `Projectiles` resource и системы в FixedUpdate.
///
/// Порядок выполнения (chain):
/// 1. apply_channel_bindings — смена оружия (rebind слотов)
/// 2. apply_fire_intents — новые выстрелы
/// 3. step_projectiles — integrate / collision / release / cooldown sweep
#[derive(Default)]
pub struct ProjectilePlugin {
    pub config: ProjectileConfig,
}

impl Plugin for ProjectilePlugin {
    fn build(&self, app: &mut App) {
        crate::log_info(&format!(
            "🎯 ProjectilePlugin: grace {}s, sweep skips layers {:?}",
            self.config.grace_interval,
            crate::collision_layers::skipped_layer_names(self.config.sweep_mask)
        ));

        app.add_event::<FireProjectileIntent>()
            .add_event::<SetProjectileChannels>()
            .add_event::<ProjectileResolved>()
            .insert_resource(Projectiles(ProjectileSimulation::init(self.config)));

        app.add_systems(
            FixedUpdate,
            (
                systems::apply_channel_bindings,
                systems::apply_fire_intents,
                systems::step_projectiles,
            )
                .chain(), // Последовательное выполнение
        );
    }
}
