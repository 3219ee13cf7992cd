//! Tests for ProjectileSimulation::step.

#[cfg(test)]
mod tests {
    use bevy::prelude::*;

    use crate::config::ProjectileConfig;
    use crate::projectile::channel::{ChannelId, ChannelSlot};
    use crate::projectile::collision::{HitOutcome, NoCollision, SurfaceTag};
    use crate::projectile::record::{FireRequest, HitPayload, Membership, ProjectileId};
    use crate::projectile::simulation::ProjectileSimulation;
    use crate::projectile::test_support::{assert_pool_exclusive, fire_request, MockVisuals, WallCollision};
    use crate::projectile::trajectory::BallisticTrajectory;

    const DT: f32 = 0.25;

    fn simulation(visuals: &mut MockVisuals) -> ProjectileSimulation<u32> {
        let mut sim = ProjectileSimulation::init(ProjectileConfig::default());
        sim.set_channels(ChannelId(1), Some(ChannelId(2)), visuals);
        sim
    }

    /// speed 4, dt 0.25 → шаг ровно 1.0; z = 1 + 4t (точно в f32)
    fn slow_request(id: u64, channel: u32) -> FireRequest {
        FireRequest::new(
            ProjectileId(id),
            ChannelId(channel),
            Vec3::new(0.5, 0.0, 0.0),
            Vec3::ZERO,
            Vec3::Z,
            4.0,
            1.0,
        )
    }

    fn payload(damage: u32) -> HitPayload {
        HitPayload {
            shooter: Entity::from_raw(1),
            damage,
        }
    }

    #[test]
    fn test_three_bullets_expire_cool_down_and_return_to_idle() {
        let mut visuals = MockVisuals::default();
        let mut sim = simulation(&mut visuals);

        for id in 0..3 {
            sim.create_bullet(&slow_request(id, 1), None, &mut visuals);
        }
        assert_eq!(visuals.created.len(), 3);
        assert_eq!(sim.pool().active().len(), 3);

        let mut now = 0.0;
        let mut ticks = 0;
        while !sim.pool().active().is_empty() && ticks < 100 {
            now += DT;
            ticks += 1;
            sim.step(DT, now, &NoCollision, &mut visuals);
            assert_pool_exclusive(sim.pool());
        }

        // 5 тиков полёта (elapsed 1.25 > 1.0), expiry на 6-м
        assert_eq!(ticks, 6);
        assert_eq!(sim.pool().active().len(), 0);
        assert_eq!(sim.pool().cooldown().len(), 3);
        assert!(sim.pool().idle(ChannelSlot::First).is_empty());

        let report = sim.step(DT, now + sim.config().grace_interval, &NoCollision, &mut visuals);

        assert_eq!(report.returned_to_idle, 3);
        assert_eq!(sim.pool().idle(ChannelSlot::First).len(), 3);
        assert!(sim.pool().cooldown().is_empty());
        assert!(visuals.created.iter().all(|&h| !visuals.is_active(h)));
        assert!(visuals.destroyed.is_empty());

        // Повторный залп переиспользует те же визуалы
        for id in 10..13 {
            sim.create_bullet(&slow_request(id, 1), None, &mut visuals);
        }
        assert_eq!(visuals.created.len(), 3);
        assert!(visuals.created.iter().all(|&h| visuals.is_active(h)));
        assert_pool_exclusive(sim.pool());
    }

    #[test]
    fn test_visual_step_is_bounded() {
        let mut visuals = MockVisuals::default();
        let mut sim = simulation(&mut visuals);
        let request = fire_request(1, 1);
        let index = sim.create_bullet(&request, None, &mut visuals).unwrap();
        let handle = sim.pool().get(index).unwrap().visual;

        let dt = 0.02;
        let max_step = request.trajectory.speed * dt;
        let mut previous = visuals.positions[&handle];

        for tick in 1..=20 {
            sim.step(dt, tick as f32 * dt, &NoCollision, &mut visuals);

            let record = sim.pool().get(index).unwrap();
            let position = visuals.positions[&handle];
            assert!(
                position.distance(previous) <= max_step + 1e-4,
                "tick {}: moved {} > {}",
                tick,
                position.distance(previous),
                max_step
            );
            assert!(position.z <= record.current_position.z + 1e-4, "visual overshot target");
            assert_eq!(record.visual_position, position);
            previous = position;
        }
    }

    #[test]
    fn test_positions_follow_trajectory() {
        let mut visuals = MockVisuals::default();
        let mut sim = simulation(&mut visuals);
        let index = sim.create_bullet(&slow_request(1, 1), None, &mut visuals).unwrap();

        sim.step(DT, DT, &NoCollision, &mut visuals);
        let record = sim.pool().get(index).unwrap();
        assert_eq!(record.elapsed, 0.25);
        assert_eq!(record.last_position, Vec3::ZERO);
        assert_eq!(record.current_position, Vec3::new(0.0, 0.0, 2.0));

        sim.step(DT, 2.0 * DT, &NoCollision, &mut visuals);
        let record = sim.pool().get(index).unwrap();
        assert_eq!(record.last_position, Vec3::new(0.0, 0.0, 2.0));
        assert_eq!(record.current_position, Vec3::new(0.0, 0.0, 3.0));
    }

    #[test]
    fn test_expired_projectile_skips_collision_query() {
        let mut visuals = MockVisuals::default();
        let mut sim = simulation(&mut visuals);
        let wall = WallCollision::new(1000.0, SurfaceTag::Inert);
        let index = sim.create_bullet(&slow_request(1, 1), None, &mut visuals).unwrap();

        for tick in 1..=5 {
            let report = sim.step(DT, tick as f32 * DT, &wall, &mut visuals);
            assert_eq!(report.expired, 0);
        }
        assert_eq!(wall.queries.get(), 5);
        let before = sim.pool().get(index).unwrap().current_position;

        let report = sim.step(DT, 6.0 * DT, &wall, &mut visuals);

        assert_eq!(report.expired, 1);
        assert_eq!(wall.queries.get(), 5, "expired projectile must not sweep");
        let record = sim.pool().get(index).unwrap();
        assert_eq!(record.current_position, before);
        assert_eq!(record.membership(), Membership::Cooldown);
    }

    #[test]
    fn test_hit_on_damageable_surface() {
        let mut visuals = MockVisuals::default();
        let mut sim = simulation(&mut visuals);
        let wall = WallCollision::new(4.5, SurfaceTag::Damageable);
        let index = sim
            .create_bullet(&slow_request(7, 1), Some(payload(25)), &mut visuals)
            .unwrap();
        let handle = sim.pool().get(index).unwrap().visual;

        let mut outcomes = Vec::new();
        for tick in 1..=4 {
            let report = sim.step(DT, tick as f32 * DT, &wall, &mut visuals);
            outcomes.extend(report.outcomes);
        }

        assert_eq!(outcomes.len(), 1);
        let outcome = outcomes[0];
        assert_eq!(outcome.id, ProjectileId(7));
        assert_eq!(outcome.outcome, HitOutcome::Hit);
        assert_eq!(outcome.payload, Some(payload(25)));
        assert_eq!(outcome.point, Vec3::new(0.0, 0.0, 4.5));

        assert_eq!(visuals.positions[&handle], Vec3::new(0.0, 0.0, 4.5));
        assert_eq!(sim.pool().membership(index), Some(Membership::Cooldown));
        assert_eq!(wall.last_mask.get(), sim.config().sweep_mask);
    }

    #[test]
    fn test_inert_surface_is_a_miss() {
        let mut visuals = MockVisuals::default();
        let mut sim = simulation(&mut visuals);
        let wall = WallCollision::new(2.5, SurfaceTag::Inert);
        sim.create_bullet(&slow_request(1, 2), Some(payload(10)), &mut visuals);

        let first = sim.step(DT, DT, &wall, &mut visuals);
        assert!(first.outcomes.is_empty(), "first sweep covers z 0..1 only");

        let second = sim.step(DT, 2.0 * DT, &wall, &mut visuals);
        assert_eq!(second.collided, 1);
        assert_eq!(second.outcomes[0].outcome, HitOutcome::Miss);
        assert_eq!(second.outcomes[0].point, Vec3::new(0.0, 0.0, 2.5));
    }

    #[test]
    fn test_expiry_and_collision_in_same_tick_are_independent() {
        let mut visuals = MockVisuals::default();
        let mut sim = simulation(&mut visuals);
        let wall = WallCollision::new(3.5, SurfaceTag::Damageable);

        // Короткоживущий снаряд (max_lifetime 0.25) expire'ится на 3-м тике
        let mut short = slow_request(1, 1);
        short.max_lifetime = 0.25;
        short.trajectory.origin_at_fire = Vec3::new(0.0, 0.0, -100.0);
        let short_index = sim.create_bullet(&short, None, &mut visuals).unwrap();
        let long_index = sim.create_bullet(&slow_request(2, 2), None, &mut visuals).unwrap();

        sim.step(DT, DT, &wall, &mut visuals);
        sim.step(DT, 2.0 * DT, &wall, &mut visuals);
        let report = sim.step(DT, 3.0 * DT, &wall, &mut visuals);

        assert_eq!(report.expired, 1);
        assert_eq!(report.collided, 1);
        assert_eq!(report.outcomes[0].id, ProjectileId(2));
        assert!(sim.pool().active().is_empty());
        assert_eq!(sim.pool().cooldown(), &[short_index, long_index]);
    }

    #[test]
    fn test_unbound_fire_request_is_ignored() {
        let mut visuals = MockVisuals::default();
        let mut sim = simulation(&mut visuals);

        assert_eq!(sim.create_bullet(&slow_request(1, 9), None, &mut visuals), None);
        assert!(visuals.created.is_empty());
        assert!(sim.pool().active().is_empty());
    }

    #[test]
    fn test_unbound_channel_destroyed_on_collision() {
        let mut visuals = MockVisuals::default();
        let mut sim = simulation(&mut visuals);
        let wall = WallCollision::new(0.5, SurfaceTag::Damageable);
        let index = sim.create_bullet(&slow_request(1, 1), None, &mut visuals).unwrap();

        sim.set_channels(ChannelId(5), Some(ChannelId(2)), &mut visuals);
        let report = sim.step(DT, DT, &wall, &mut visuals);

        assert_eq!(report.collided, 1, "in-flight projectile still resolves");
        assert_eq!(sim.pool().get(index), None);
        assert_eq!(visuals.destroyed.len(), 1);
        assert_pool_exclusive(sim.pool());
    }

    #[test]
    fn test_empty_active_set_does_no_work() {
        let mut visuals = MockVisuals::default();
        let mut sim = simulation(&mut visuals);
        let wall = WallCollision::new(0.0, SurfaceTag::Damageable);

        let report = sim.step(DT, DT, &wall, &mut visuals);

        assert_eq!(report, Default::default());
        assert_eq!(wall.queries.get(), 0);
        assert!(visuals.position_writes.is_empty());
    }

    #[test]
    fn test_ballistic_trajectory_drops() {
        let mut visuals = MockVisuals::default();
        let mut sim = ProjectileSimulation::init(ProjectileConfig::default())
            .with_trajectory(BallisticTrajectory::default());
        sim.set_channels(ChannelId(1), None, &mut visuals);
        let index = sim.create_bullet(&slow_request(1, 1), None, &mut visuals).unwrap();

        sim.step(DT, DT, &NoCollision, &mut visuals);

        let record = sim.pool().get(index).unwrap();
        assert!(record.current_position.y < 0.0);
        assert_eq!(record.current_position.z, 2.0);
    }

    #[test]
    fn test_shutdown_destroys_all_visuals() {
        let mut visuals = MockVisuals::default();
        let mut sim = simulation(&mut visuals);
        for id in 0..4 {
            sim.create_bullet(&slow_request(id, 1 + (id % 2) as u32), None, &mut visuals);
        }
        sim.step(DT, DT, &NoCollision, &mut visuals);

        sim.shutdown(&mut visuals);

        assert_eq!(sim.pool().live_count(), 0);
        assert_eq!(visuals.alive(), 0);
    }
}
