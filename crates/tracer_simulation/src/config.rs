//! Projectile tuning (grace interval, collision mask, hit classification)
//!
//! Serde-совместим: host engine может грузить из любого формата,
//! отсутствующие поля берутся из `Default`.

use serde::{Deserialize, Serialize};

use crate::collision_layers::COLLISION_MASK_PROJECTILE_SWEEP;
use crate::projectile::{SurfaceTag, DEFAULT_GRACE_INTERVAL};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileConfig {
    /// Задержка (секунды) между release и деактивацией trail визуала
    pub grace_interval: f32,

    /// Layer mask для swept raycast
    pub sweep_mask: u32,

    /// Тег, который считается попаданием (остальные — промах)
    pub hit_tag: SurfaceTag,
}

impl Default for ProjectileConfig {
    fn default() -> Self {
        Self {
            grace_interval: DEFAULT_GRACE_INTERVAL,
            sweep_mask: COLLISION_MASK_PROJECTILE_SWEEP,
            hit_tag: SurfaceTag::Damageable,
        }
    }
}
