//! Projectile events (weapon layer ↔ simulation ↔ damage consumer)
//!
//! Flow:
//! 1. Weapon layer → `SetProjectileChannels` (смена оружия)
//! 2. Weapon layer → `FireProjectileIntent` (выстрел)
//! 3. Simulation → `ProjectileResolved` (попадание / промах, fire-and-forget)

use bevy::prelude::*;

use super::channel::ChannelId;
use super::collision::HitOutcome;
use super::record::{FireRequest, HitPayload, ProjectileId};

/// Event: выстрел (обрабатывается в начале следующего fixed тика)
///
/// Канал вне обоих слотов → запрос молча отбрасывается.
#[derive(Event, Debug, Clone)]
pub struct FireProjectileIntent {
    pub request: FireRequest,
    /// Damage payload (None = визуальный снаряд без урона)
    pub payload: Option<HitPayload>,
}

/// Event: перепривязка слотов к weapon channels
///
/// `second: None` меняет только слот First (без инвалидации idle пула).
#[derive(Event, Debug, Clone)]
pub struct SetProjectileChannels {
    pub first: ChannelId,
    pub second: Option<ChannelId>,
}

/// Event: снаряд столкнулся с collider'ом
#[derive(Event, Debug, Clone)]
pub struct ProjectileResolved {
    pub id: ProjectileId,
    pub payload: Option<HitPayload>,
    pub outcome: HitOutcome,
    /// Точка попадания (world space)
    pub point: Vec3,
}
