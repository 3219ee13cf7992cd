//! Test doubles: recording VisualProvider, plane-wall CollisionQuery

use bevy::prelude::*;
use std::cell::Cell;
use std::collections::HashMap;
use std::fmt::Debug;

use super::channel::{ChannelId, ChannelSlot};
use super::collision::{CollisionQuery, SurfaceTag, SweepHit};
use super::pool::ProjectilePool;
use super::record::{FireRequest, Membership, ProjectileId, RecordIndex};

/// Visual provider, который запоминает все вызовы
#[derive(Debug, Default)]
pub struct MockVisuals {
    next: u32,
    pub created: Vec<u32>,
    pub destroyed: Vec<u32>,
    pub positions: HashMap<u32, Vec3>,
    pub active: HashMap<u32, bool>,
    pub position_writes: Vec<(u32, Vec3)>,
}

impl MockVisuals {
    pub fn is_active(&self, handle: u32) -> bool {
        self.active.get(&handle).copied().unwrap_or(false)
    }

    pub fn alive(&self) -> usize {
        self.created.len() - self.destroyed.len()
    }
}

impl super::visual::VisualProvider for MockVisuals {
    type Handle = u32;

    fn create(&mut self, position: Vec3) -> u32 {
        let handle = self.next;
        self.next += 1;
        self.created.push(handle);
        self.positions.insert(handle, position);
        self.active.insert(handle, true);
        handle
    }

    fn set_active(&mut self, handle: u32, active: bool) {
        self.active.insert(handle, active);
    }

    fn set_position(&mut self, handle: u32, position: Vec3) {
        self.positions.insert(handle, position);
        self.position_writes.push((handle, position));
    }

    fn destroy(&mut self, handle: u32) {
        self.destroyed.push(handle);
        self.positions.remove(&handle);
        self.active.remove(&handle);
    }
}

/// Бесконечная стена в плоскости `z = wall_z`
///
/// Считает количество запросов (для проверки, что expired снаряд не
/// делает sweep).
#[derive(Debug)]
pub struct WallCollision {
    pub wall_z: f32,
    pub tag: SurfaceTag,
    pub queries: Cell<usize>,
    pub last_mask: Cell<u32>,
}

impl WallCollision {
    pub fn new(wall_z: f32, tag: SurfaceTag) -> Self {
        Self {
            wall_z,
            tag,
            queries: Cell::new(0),
            last_mask: Cell::new(0),
        }
    }
}

impl CollisionQuery for WallCollision {
    fn sweep_ray(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: u32,
    ) -> Option<SweepHit> {
        self.queries.set(self.queries.get() + 1);
        self.last_mask.set(mask);

        if direction.z.abs() <= f32::EPSILON {
            return None;
        }

        let distance = (self.wall_z - origin.z) / direction.z;
        if distance < 0.0 || distance > max_distance {
            return None;
        }

        Some(SweepHit {
            point: origin + direction * distance,
            tag: self.tag,
        })
    }
}

pub fn fire_request(id: u64, channel: u32) -> FireRequest {
    FireRequest::new(
        ProjectileId(id),
        ChannelId(channel),
        Vec3::new(0.2, 1.5, 0.0),
        Vec3::new(0.0, 1.7, 0.0),
        Vec3::Z,
        50.0,
        1.0,
    )
}

/// Проверка: каждый живой record ровно в одном пуле, membership совпадает
pub fn assert_pool_exclusive<H: Copy + Eq + Debug>(pool: &ProjectilePool<H>) {
    let mut seen: HashMap<RecordIndex, Membership> = HashMap::new();

    let mut visit = |index: RecordIndex, membership: Membership| {
        assert!(
            seen.insert(index, membership).is_none(),
            "record {:?} is in more than one pool",
            index
        );
        assert_eq!(
            pool.membership(index),
            Some(membership),
            "record {:?} membership mismatch (or dangling index)",
            index
        );
    };

    for slot in ChannelSlot::ALL {
        for &index in pool.idle(slot) {
            visit(index, Membership::Idle(slot));
        }
    }
    for &index in pool.active() {
        visit(index, Membership::Active);
    }
    for &index in pool.cooldown() {
        visit(index, Membership::Cooldown);
    }

    assert_eq!(seen.len(), pool.live_count(), "live record outside of every pool");
}
