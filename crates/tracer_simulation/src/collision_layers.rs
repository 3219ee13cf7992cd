//! Collision Layers Constants
//!
//! Physics layers — centralised constants для swept raycast'ов снарядов.
//!
//! ## Архитектура:
//! - **Layers (битовая маска):** На каком слое находится collider
//! - **Mask (битовая маска):** Какие слои видит projectile sweep
//!
//! ## Layers (bit index → назначение):
//! - Bit 0: Default (world geometry)
//! - Bit 1: Actors (players, NPCs)
//! - Bit 2: Environment (walls, obstacles, terrain)
//! - Bit 10: Projectiles (trail nodes, не коллидируют между собой)
//! - Bit 11: Triggers (volume-only areas)
//! - Bit 12: Pickups (items lying on the ground)
//! - Bit 13: IgnoreRaycast (decor, vfx helpers)
//!
//! Биты 10–13 пропускаются снарядами насквозь.

// ============================================================================
// Layer Битовые Маски
// ============================================================================

/// Bit 0: Default (world geometry без отдельного слоя)
pub const COLLISION_LAYER_DEFAULT: u32 = 1 << 0;

/// Bit 1: Actors (players, NPCs)
pub const COLLISION_LAYER_ACTORS: u32 = 1 << 1;

/// Bit 2: Environment (static obstacles)
pub const COLLISION_LAYER_ENVIRONMENT: u32 = 1 << 2;

/// Bit 10: Projectiles
pub const COLLISION_LAYER_PROJECTILES: u32 = 1 << 10;

/// Bit 11: Triggers
pub const COLLISION_LAYER_TRIGGERS: u32 = 1 << 11;

/// Bit 12: Pickups
pub const COLLISION_LAYER_PICKUPS: u32 = 1 << 12;

/// Bit 13: IgnoreRaycast
pub const COLLISION_LAYER_IGNORE_RAYCAST: u32 = 1 << 13;

// ============================================================================
// Mask Битовые Маски
// ============================================================================

/// Слои, сквозь которые снаряд пролетает
pub const COLLISION_LAYERS_PASS_THROUGH: u32 = COLLISION_LAYER_PROJECTILES
    | COLLISION_LAYER_TRIGGERS
    | COLLISION_LAYER_PICKUPS
    | COLLISION_LAYER_IGNORE_RAYCAST;

/// Mask: projectile sweep видит всё, кроме pass-through слоёв
pub const COLLISION_MASK_PROJECTILE_SWEEP: u32 = !COLLISION_LAYERS_PASS_THROUGH;

// ============================================================================
// Helper Functions
// ============================================================================

/// Получить название слоя для debug логов
pub fn get_layer_name(layer_bits: u32) -> &'static str {
    match layer_bits {
        COLLISION_LAYER_DEFAULT => "Default",
        COLLISION_LAYER_ACTORS => "Actors",
        COLLISION_LAYER_ENVIRONMENT => "Environment",
        COLLISION_LAYER_PROJECTILES => "Projectiles",
        COLLISION_LAYER_TRIGGERS => "Triggers",
        COLLISION_LAYER_PICKUPS => "Pickups",
        COLLISION_LAYER_IGNORE_RAYCAST => "IgnoreRaycast",
        _ => "Unknown",
    }
}

/// Видит ли projectile sweep данный слой
pub fn sweep_hits_layer(mask: u32, layer_bits: u32) -> bool {
    mask & layer_bits != 0
}

const NAMED_LAYERS: [u32; 7] = [
    COLLISION_LAYER_DEFAULT,
    COLLISION_LAYER_ACTORS,
    COLLISION_LAYER_ENVIRONMENT,
    COLLISION_LAYER_PROJECTILES,
    COLLISION_LAYER_TRIGGERS,
    COLLISION_LAYER_PICKUPS,
    COLLISION_LAYER_IGNORE_RAYCAST,
];

/// Названия известных слоёв, которые mask пропускает (для startup лога)
pub fn skipped_layer_names(mask: u32) -> Vec<&'static str> {
    NAMED_LAYERS
        .iter()
        .filter(|&&layer| !sweep_hits_layer(mask, layer))
        .map(|&layer| get_layer_name(layer))
        .collect()
}
