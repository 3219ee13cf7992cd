//! Simulation step — per-tick driver для active снарядов
//!
//! Порядок за тик:
//! 1. Для каждого active record (в порядке active set):
//!    - `elapsed > max_lifetime` → expired (без движения и без sweep)
//!    - иначе integrate → bounded move визуала → swept raycast
//! 2. Batch release всех помеченных record'ов
//! 3. Cooldown sweep
//!
//! Mark и apply разделены: пулы не мутируются во время обхода active set.

use bevy::prelude::*;
use std::fmt::Debug;

use crate::config::ProjectileConfig;

use super::channel::ChannelId;
use super::collision::{CollisionQuery, HitOutcome};
use super::pool::ProjectilePool;
use super::record::{FireRequest, HitPayload, ProjectileId, RecordIndex};
use super::trajectory::{move_towards, LinearTrajectory, Trajectory};
use super::visual::VisualProvider;

/// Resolved collision (для damage consumer'а)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectileOutcome {
    pub id: ProjectileId,
    pub payload: Option<HitPayload>,
    pub outcome: HitOutcome,
    pub point: Vec3,
}

/// Итог одного тика
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepReport {
    pub outcomes: Vec<ProjectileOutcome>,
    pub expired: usize,
    pub collided: usize,
    pub returned_to_idle: usize,
}

/// Owner пулов + trajectory model + config
///
/// Внешний driver вызывает `create_bullet` / `set_channels` между тиками
/// и `step` раз в тик.
pub struct ProjectileSimulation<H> {
    pool: ProjectilePool<H>,
    trajectory: Box<dyn Trajectory>,
    config: ProjectileConfig,
}

impl<H: Copy + Eq + Debug> ProjectileSimulation<H> {
    pub fn init(config: ProjectileConfig) -> Self {
        Self {
            pool: ProjectilePool::new(config.grace_interval),
            trajectory: Box::new(LinearTrajectory),
            config,
        }
    }

    pub fn with_trajectory(mut self, trajectory: impl Trajectory + 'static) -> Self {
        self.trajectory = Box::new(trajectory);
        self
    }

    pub fn pool(&self) -> &ProjectilePool<H> {
        &self.pool
    }

    pub fn config(&self) -> &ProjectileConfig {
        &self.config
    }

    /// Выстрел: роутинг по каналу в слот, иначе игнор
    pub fn create_bullet<V>(
        &mut self,
        request: &FireRequest,
        payload: Option<HitPayload>,
        visuals: &mut V,
    ) -> Option<RecordIndex>
    where
        V: VisualProvider<Handle = H> + ?Sized,
    {
        let Some(slot) = self.pool.binding().slot_of(request.channel) else {
            crate::log(&format!(
                "Fire request {:?} ignored: channel {:?} is not bound",
                request.id, request.channel
            ));
            return None;
        };

        Some(self.pool.acquire_or_create(slot, request, payload, visuals))
    }

    pub fn set_channels<V>(&mut self, first: ChannelId, second: Option<ChannelId>, visuals: &mut V)
    where
        V: VisualProvider<Handle = H> + ?Sized,
    {
        self.pool.set_channels(first, second, visuals);
    }

    /// Один тик симуляции
    pub fn step<C, V>(&mut self, dt: f32, now: f32, collision: &C, visuals: &mut V) -> StepReport
    where
        C: CollisionQuery + ?Sized,
        V: VisualProvider<Handle = H> + ?Sized,
    {
        let mut report = StepReport::default();
        let mut removals: Vec<RecordIndex> = Vec::new();

        let active: Vec<RecordIndex> = self.pool.active().to_vec();
        for index in active {
            let Some(record) = self.pool.get_mut(index) else {
                continue;
            };

            if record.is_expired() {
                report.expired += 1;
                removals.push(index);
                continue;
            }

            record.elapsed += dt;
            let max_step = record.trajectory.speed * dt;
            let target = self.trajectory.position(record.elapsed, &record.trajectory);

            record.visual_position = move_towards(record.visual_position, target, max_step);
            visuals.set_position(record.visual, record.visual_position);

            record.last_position = record.current_position;
            record.current_position = target;

            let direction = (record.current_position - record.last_position).normalize_or_zero();
            let Some(hit) =
                collision.sweep_ray(record.last_position, direction, max_step, self.config.sweep_mask)
            else {
                continue;
            };

            record.visual_position = hit.point;
            visuals.set_position(record.visual, hit.point);

            let outcome = HitOutcome::classify(hit.tag, self.config.hit_tag);
            crate::log(&format!(
                "💥 Projectile {:?} {:?} at {:?} (tag {:?})",
                record.id, outcome, hit.point, hit.tag
            ));

            report.outcomes.push(ProjectileOutcome {
                id: record.id,
                payload: record.payload,
                outcome,
                point: hit.point,
            });
            report.collided += 1;
            removals.push(index);
        }

        if !removals.is_empty() {
            self.pool.release_batch(&removals, now, visuals);
        }

        report.returned_to_idle = self.pool.cooldown_sweep(now, visuals);
        report
    }

    /// Teardown: уничтожить все визуалы
    pub fn shutdown<V>(&mut self, visuals: &mut V)
    where
        V: VisualProvider<Handle = H> + ?Sized,
    {
        crate::log_info(&format!(
            "Projectile simulation shutdown ({} live records)",
            self.pool.live_count()
        ));
        self.pool.clear(visuals);
    }
}
