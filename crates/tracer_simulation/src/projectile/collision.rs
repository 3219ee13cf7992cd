//! Collision query — swept raycast между last и current позицией снаряда
//!
//! Архитектура:
//! - Step вызывает `CollisionQuery::sweep_ray` (нет знания о physics engine)
//! - `RapierSweep` — backend поверх bevy_rapier3d (query pipeline `cast_ray`)
//! - `NoCollision` — fallback, когда physics context ещё не создан
//!
//! Классификация hit'а по `SurfaceTag`: step решает только Hit / Miss,
//! урон применяет внешний consumer (`ProjectileResolved` event).

use bevy::prelude::*;
use bevy_rapier3d::prelude::{CollisionGroups, Group, QueryFilter, RapierContext};
use serde::{Deserialize, Serialize};

/// Тег поверхности collider'а (classification для outcome)
///
/// Collider без компонента считается `Inert`.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
pub enum SurfaceTag {
    /// Может получать урон (actors, destructibles)
    Damageable,
    /// Стены, пол, всё остальное
    #[default]
    Inert,
}

/// Результат sweep'а
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepHit {
    pub point: Vec3,
    pub tag: SurfaceTag,
}

/// Исход попадания (отправляется damage consumer'у)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum HitOutcome {
    Hit,
    Miss,
}

impl HitOutcome {
    pub fn classify(tag: SurfaceTag, hit_tag: SurfaceTag) -> Self {
        if tag == hit_tag {
            HitOutcome::Hit
        } else {
            HitOutcome::Miss
        }
    }
}

/// Swept ray test: ближайший hit на отрезке `origin + direction * [0, max_distance]`
pub trait CollisionQuery {
    fn sweep_ray(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: u32,
    ) -> Option<SweepHit>;
}

/// Пустой мир (ничего не пересекает)
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCollision;

impl CollisionQuery for NoCollision {
    fn sweep_ray(&self, _: Vec3, _: Vec3, _: f32, _: u32) -> Option<SweepHit> {
        None
    }
}

/// Rapier backend
///
/// `mask` → `CollisionGroups` filter: collider участвует, если его
/// memberships пересекаются с mask.
pub struct RapierSweep<'a, 'c, 'w, 's> {
    pub context: &'a RapierContext<'c>,
    pub surfaces: &'a Query<'w, 's, &'static SurfaceTag>,
}

impl CollisionQuery for RapierSweep<'_, '_, '_, '_> {
    fn sweep_ray(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: u32,
    ) -> Option<SweepHit> {
        if direction == Vec3::ZERO {
            return None;
        }

        let filter = QueryFilter::new().groups(CollisionGroups::new(
            Group::ALL,
            Group::from_bits_truncate(mask),
        ));

        // rapier 0.27: query pipeline строится на время запроса
        let (entity, toi) = self.context.with_query_pipeline(filter, |pipeline| {
            pipeline.cast_ray(origin, direction, max_distance, true)
        })?;

        let tag = self.surfaces.get(entity).copied().unwrap_or_default();

        Some(SweepHit {
            point: origin + direction * toi,
            tag,
        })
    }
}
