//! Trajectory models — pure functions (elapsed time → world position)
//!
//! Pool/step логика не знает формулу полёта: `Trajectory` подменяется
//! (linear → ballistic) без изменений в pooling коде.

use bevy::prelude::*;

/// Параметры траектории, зафиксированные в момент выстрела
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct TrajectoryParams {
    /// Позиция spawn'а визуала (дуло оружия)
    pub start_position: Vec3,
    /// Точка выстрела (камера), от неё считается траектория
    pub origin_at_fire: Vec3,
    /// Направление полёта (unit vector)
    pub direction: Vec3,
    /// Скорость (м/с)
    pub speed: f32,
}

/// Trajectory model: (elapsed, params) → world position
pub trait Trajectory: Send + Sync {
    fn position(&self, elapsed: f32, params: &TrajectoryParams) -> Vec3;
}

/// Прямолинейный полёт
///
/// Формула: `direction + origin + direction * speed * elapsed`.
/// Лишний `direction` в начале — смещение на 1 юнит от камеры, сохранено
/// как есть (детерминированная аддитивная модель).
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearTrajectory;

impl Trajectory for LinearTrajectory {
    fn position(&self, elapsed: f32, params: &TrajectoryParams) -> Vec3 {
        params.direction
            + params.origin_at_fire
            + params.direction * params.speed * elapsed
    }
}

/// Linear модель + гравитация (дуга)
#[derive(Debug, Clone, Copy)]
pub struct BallisticTrajectory {
    pub gravity: Vec3,
}

impl Default for BallisticTrajectory {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -9.81, 0.0),
        }
    }
}

impl Trajectory for BallisticTrajectory {
    fn position(&self, elapsed: f32, params: &TrajectoryParams) -> Vec3 {
        LinearTrajectory.position(elapsed, params) + 0.5 * self.gravity * elapsed * elapsed
    }
}

/// Сдвигает `current` к `target` не более чем на `max_delta` (без overshoot)
pub fn move_towards(current: Vec3, target: Vec3, max_delta: f32) -> Vec3 {
    let delta = target - current;
    let distance = delta.length();

    if distance <= max_delta || distance <= f32::EPSILON {
        return target;
    }

    current + delta / distance * max_delta
}
