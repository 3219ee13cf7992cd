//! Bevy integration: trail entities, Rapier sweep, FixedUpdate systems
//!
//! Архитектура:
//! - `Projectiles` resource владеет пулами (ECS не хранит record'ы как entities)
//! - Trail визуал = entity с `ProjectileTrail` + `Transform` (рендер-слой
//!   хоста читает `active` и позицию)
//! - Все мутации пулов — только через systems ниже, в FixedUpdate, по порядку

use bevy::prelude::*;
use bevy_rapier3d::prelude::ReadRapierContext;

use super::collision::{NoCollision, RapierSweep, SurfaceTag};
use super::events::{FireProjectileIntent, ProjectileResolved, SetProjectileChannels};
use super::simulation::ProjectileSimulation;
use super::visual::VisualProvider;

/// Trail визуал снаряда (рендер-слой хоста показывает, пока `active`)
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct ProjectileTrail {
    pub active: bool,
}

/// Пулы снарядов (visual handle = trail entity)
#[derive(Resource, Deref, DerefMut)]
pub struct Projectiles(pub ProjectileSimulation<Entity>);

/// VisualProvider поверх Commands
///
/// Все операции deferred: применяются на apply_deferred после системы.
pub struct TrailVisuals<'a, 'w, 's> {
    commands: &'a mut Commands<'w, 's>,
}

impl<'a, 'w, 's> TrailVisuals<'a, 'w, 's> {
    pub fn new(commands: &'a mut Commands<'w, 's>) -> Self {
        Self { commands }
    }
}

impl VisualProvider for TrailVisuals<'_, '_, '_> {
    type Handle = Entity;

    fn create(&mut self, position: Vec3) -> Entity {
        self.commands
            .spawn((
                ProjectileTrail { active: true },
                Transform::from_translation(position),
            ))
            .id()
    }

    fn set_active(&mut self, handle: Entity, active: bool) {
        self.commands
            .entity(handle)
            .try_insert(ProjectileTrail { active });
    }

    fn set_position(&mut self, handle: Entity, position: Vec3) {
        self.commands
            .entity(handle)
            .try_insert(Transform::from_translation(position));
    }

    fn destroy(&mut self, handle: Entity) {
        self.commands.entity(handle).despawn();
    }
}

// ============================================================================
// Systems
// ============================================================================

/// System: SetProjectileChannels → rebind слотов
pub fn apply_channel_bindings(
    mut commands: Commands,
    mut events: EventReader<SetProjectileChannels>,
    mut projectiles: ResMut<Projectiles>,
) {
    let mut visuals = TrailVisuals::new(&mut commands);

    for event in events.read() {
        projectiles.set_channels(event.first, event.second, &mut visuals);
    }
}

/// System: FireProjectileIntent → acquire-or-create
pub fn apply_fire_intents(
    mut commands: Commands,
    mut events: EventReader<FireProjectileIntent>,
    mut projectiles: ResMut<Projectiles>,
) {
    let mut visuals = TrailVisuals::new(&mut commands);

    for event in events.read() {
        projectiles.create_bullet(&event.request, event.payload, &mut visuals);
    }
}

/// System: один тик симуляции снарядов
///
/// Collision backend — Rapier, если physics context существует; иначе
/// снаряды летят сквозь мир (warning один раз).
pub fn step_projectiles(
    mut commands: Commands,
    time: Res<Time>,
    rapier_context: ReadRapierContext,
    surfaces: Query<&'static SurfaceTag>,
    mut projectiles: ResMut<Projectiles>,
    mut resolved_events: EventWriter<ProjectileResolved>,
    mut missing_physics_warned: Local<bool>,
) {
    if projectiles.pool().active().is_empty() && projectiles.pool().cooldown().is_empty() {
        return;
    }

    let dt = time.delta_secs();
    let now = time.elapsed_secs();
    let mut visuals = TrailVisuals::new(&mut commands);

    let report = match rapier_context.single() {
        Ok(context) => {
            let sweep = RapierSweep {
                context: &context,
                surfaces: &surfaces,
            };
            projectiles.step(dt, now, &sweep, &mut visuals)
        }
        Err(_) => {
            if !*missing_physics_warned {
                crate::log_warning("⚠️ No Rapier context: projectiles fly without collision");
                *missing_physics_warned = true;
            }
            projectiles.step(dt, now, &NoCollision, &mut visuals)
        }
    };

    if report.expired + report.collided + report.returned_to_idle > 0 {
        crate::log(&format!(
            "Projectile tick: {} expired, {} collided, {} back to idle (active: {}, cooldown: {})",
            report.expired,
            report.collided,
            report.returned_to_idle,
            projectiles.pool().active().len(),
            projectiles.pool().cooldown().len()
        ));
    }

    for outcome in report.outcomes {
        resolved_events.write(ProjectileResolved {
            id: outcome.id,
            payload: outcome.payload,
            outcome: outcome.outcome,
            point: outcome.point,
        });
    }
}
