//! Projectile record — identity + trajectory + visual binding одного снаряда
//!
//! Record живёт в arena `ProjectilePool` и переиспользуется: identity key
//! меняется при каждом reuse, visual handle остаётся тем же.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

use super::channel::ChannelId;
use super::trajectory::TrajectoryParams;

/// Identity key снаряда (выдаётся вызывающей стороной)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Reflect, Serialize, Deserialize)]
pub struct ProjectileId(pub u64);

/// Индекс record'а в arena (стабилен, пока record жив)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordIndex(pub(crate) usize);

impl RecordIndex {
    pub fn get(self) -> usize {
        self.0
    }
}

/// В каком из трёх пулов находится record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Membership {
    Idle(super::channel::ChannelSlot),
    Active,
    Cooldown,
}

/// Damage payload, прикрепляется при выстреле и уходит в outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitPayload {
    /// Кто выстрелил (damage attribution)
    pub shooter: Entity,
    /// Урон
    pub damage: u32,
}

/// Запрос на выстрел (weapon layer → pool)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FireRequest {
    pub id: ProjectileId,
    pub channel: ChannelId,
    pub trajectory: TrajectoryParams,
    /// Максимальное время жизни (секунды)
    pub max_lifetime: f32,
}

impl FireRequest {
    pub fn new(
        id: ProjectileId,
        channel: ChannelId,
        start_position: Vec3,
        origin_at_fire: Vec3,
        direction: Vec3,
        speed: f32,
        max_lifetime: f32,
    ) -> Self {
        Self {
            id,
            channel,
            trajectory: TrajectoryParams {
                start_position,
                origin_at_fire,
                direction: direction.normalize_or_zero(),
                speed,
            },
            max_lifetime,
        }
    }
}

/// Один снаряд
///
/// Equality/hash — только по `id`.
#[derive(Debug, Clone)]
pub struct ProjectileRecord<H> {
    pub id: ProjectileId,
    pub channel: ChannelId,
    pub trajectory: TrajectoryParams,
    /// Накопленное время полёта (растёт только в Active)
    pub elapsed: f32,
    pub max_lifetime: f32,
    pub last_position: Vec3,
    pub current_position: Vec3,
    /// Visual handle (trail), переживает reuse
    pub visual: H,
    /// Последняя позиция, записанная в visual
    pub visual_position: Vec3,
    pub payload: Option<HitPayload>,
    /// Время деактивации визуала (Some только в Cooldown)
    pub deactivate_at: Option<f32>,
    pub(crate) membership: Membership,
}

impl<H> ProjectileRecord<H> {
    pub(crate) fn new(
        request: &FireRequest,
        visual: H,
        payload: Option<HitPayload>,
    ) -> Self {
        let origin = request.trajectory.origin_at_fire;
        Self {
            id: request.id,
            channel: request.channel,
            trajectory: request.trajectory,
            elapsed: 0.0,
            max_lifetime: request.max_lifetime,
            last_position: origin,
            current_position: origin,
            visual,
            visual_position: request.trajectory.start_position,
            payload,
            deactivate_at: None,
            membership: Membership::Active,
        }
    }

    /// Перезаписывает trajectory/identity из нового запроса (reuse path)
    ///
    /// `visual` не трогаем. `last_position` остаётся от прошлого полёта:
    /// step перезаписывает его до первого sweep.
    pub fn copy_from(&mut self, request: &FireRequest) {
        self.id = request.id;
        self.channel = request.channel;
        self.trajectory = request.trajectory;
        self.current_position = request.trajectory.origin_at_fire;
        self.elapsed = 0.0;
        self.max_lifetime = request.max_lifetime;
    }

    pub fn membership(&self) -> Membership {
        self.membership
    }

    pub fn is_expired(&self) -> bool {
        self.elapsed > self.max_lifetime
    }
}

impl<H> PartialEq for ProjectileRecord<H> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<H> Eq for ProjectileRecord<H> {}

impl<H> Hash for ProjectileRecord<H> {
    fn hash<S: Hasher>(&self, state: &mut S) {
        self.id.hash(state);
    }
}
