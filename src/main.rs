//! Impulse 2D headless demo
//!
//! Drops a handful of input-spawned shapes onto a static floor, runs the
//! authority scene for a few seconds and logs where everything came to rest.
//!
//! Usage: `impulse-2d [scene.json]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use glam::Vec2;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    use impulse_2d::SceneConfig;
    use impulse_2d::replication::{CommandQueue, Role, SceneCommand, sync_commands};
    use impulse_2d::sim::{Scene, Shape, ShapeKind};

    /// Seconds of simulated time
    const RUN_SECONDS: f32 = 5.0;
    const DEMO_SEED: u64 = 0x5eed;

    env_logger::init();
    log::info!("Impulse 2D (native) starting...");

    let config = match std::env::args().nth(1) {
        Some(path) => SceneConfig::load(path),
        None => SceneConfig::default(),
    };

    let mut scene = Scene::new(config);
    let mut rng = Pcg32::seed_from_u64(DEMO_SEED);

    let floor = scene.add_body(Shape::boxed(20.0, 1.0), Vec2::new(0.0, -1.0));
    if let Some(body) = scene.body_mut(floor) {
        body.set_static();
    }

    // Stagger spawns so they land on each other
    let mut queue = CommandQueue::new();
    for i in 0..8 {
        let kind = if i % 2 == 0 {
            ShapeKind::Circle
        } else {
            ShapeKind::Polygon
        };
        queue.push(SceneCommand::Input {
            kind,
            position: Vec2::new((i as f32 - 3.5) * 0.7, 3.0 + i as f32 * 1.5),
        });
    }
    let spawned = queue.apply(&mut scene, Role::Authority, &mut rng);
    log::info!("Spawned {} bodies", spawned.len());

    let steps = (RUN_SECONDS / scene.config().dt).round() as u64;
    for _ in 0..steps {
        scene.step();
    }

    log::info!(
        "After {} ticks: {} contacts",
        scene.ticks,
        scene.manifolds().len()
    );
    for command in sync_commands(&scene) {
        if let SceneCommand::Sync {
            id,
            position,
            angle,
        } = command
        {
            log::info!(
                "body {id}: pos=({:.3}, {:.3}) angle={:.3}",
                position.x,
                position.y,
                angle
            );
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Library-only on the web; there is no headless demo to run
}
