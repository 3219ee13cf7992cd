//! Headless симуляция TRACER
//!
//! Два оружия стреляют очередями, на полпути второе меняется на другое.
//! Выводит размеры пулов каждые 100 тиков.

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use rand::Rng;
use tracer_simulation::*;

const RIFLE: ChannelId = ChannelId(1);
const PISTOL: ChannelId = ChannelId(2);
const SHOTGUN: ChannelId = ChannelId(3);

const TICKS: u64 = 1000;
const SWAP_TICK: u64 = 500;

#[derive(Resource, Default)]
struct DemoState {
    tick: u64,
    next_id: u64,
}

fn main() {
    let seed = 42;
    println!("Starting TRACER headless simulation (seed: {})", seed);

    let mut app = create_headless_app(seed);
    set_log_level(LogLevel::Info);

    app.add_plugins(SimulationPlugin)
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
            1.0 / 60.0,
        )))
        .init_resource::<DemoState>()
        .add_systems(Update, demo_weapons);

    for tick in 0..TICKS {
        app.update();

        if tick % 100 == 0 {
            let projectiles = app.world().resource::<Projectiles>();
            let pool = projectiles.pool();
            println!(
                "Tick {}: active={} cooldown={} idle=[{}, {}] live={}",
                tick,
                pool.active().len(),
                pool.cooldown().len(),
                pool.idle(ChannelSlot::First).len(),
                pool.idle(ChannelSlot::Second).len(),
                pool.live_count()
            );
        }
    }

    println!("Simulation complete!");
}

/// Weapon glue: бинды оружия + автоматическая стрельба
fn demo_weapons(
    mut state: ResMut<DemoState>,
    mut rng: ResMut<DeterministicRng>,
    mut channel_events: EventWriter<SetProjectileChannels>,
    mut fire_events: EventWriter<FireProjectileIntent>,
) {
    let tick = state.tick;
    state.tick += 1;

    let second = if tick < SWAP_TICK { PISTOL } else { SHOTGUN };
    if tick == 0 || tick == SWAP_TICK {
        channel_events.write(SetProjectileChannels {
            first: RIFLE,
            second: Some(second),
        });
    }

    let mut fire = |channel: ChannelId, speed: f32, state: &mut DemoState, rng: &mut DeterministicRng| {
        let spread = Vec3::new(
            rng.rng.gen_range(-0.02..0.02),
            rng.rng.gen_range(-0.02..0.02),
            0.0,
        );
        let id = ProjectileId(state.next_id);
        state.next_id += 1;

        fire_events.write(FireProjectileIntent {
            request: FireRequest::new(
                id,
                channel,
                Vec3::new(0.3, 1.4, 0.5),
                Vec3::new(0.0, 1.7, 0.0),
                Vec3::Z + spread,
                speed,
                0.5,
            ),
            payload: Some(HitPayload {
                shooter: Entity::PLACEHOLDER,
                damage: 10,
            }),
        });
    };

    if tick % 6 == 0 {
        fire(RIFLE, 120.0, &mut *state, &mut *rng);
    }
    if tick % 15 == 0 {
        fire(second, 60.0, &mut *state, &mut *rng);
    }
}
