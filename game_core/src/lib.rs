pub mod clock;
pub mod components;
pub mod config;
pub mod context;
pub mod error;
pub mod lifecycle;
pub mod map;
pub mod params;
pub mod resources;
pub mod rules;
pub mod simulation;
pub mod systems;

pub use clock::*;
pub use components::*;
pub use config::*;
pub use context::*;
pub use error::*;
pub use lifecycle::*;
pub use map::*;
pub use params::*;
pub use resources::*;
pub use rules::*;
pub use simulation::*;

use glam::Vec2;
use hecs::World;
use systems::*;

/// Run one deterministic simulation tick at `ctx.time.now_ms`
pub fn step(world: &mut World, ctx: &mut MatchContext) {
    let now = ctx.now();

    // Clear events at start of tick
    ctx.events.clear();

    // 1. Scheduled effects whose deadline has passed
    if ctx.mode.power_ups() {
        run_scheduled(world, ctx);
    }

    // 2. Held keys into paddle intents
    ingest_inputs(world, &ctx.input);

    // 3. Move paddles based on intents
    move_paddles(world, &ctx.field, now);

    // 4. Rally speed-up
    if ctx.mode.ramps_speed() {
        ramp_ball_speed(world, &ctx.config, &ctx.rally, now);
    }

    // 5. Collisions; a goal ends the tick
    check_collisions(
        world,
        &ctx.mode,
        &ctx.config,
        &ctx.field,
        &ctx.bonuses,
        &mut ctx.events,
    );
    if let Some(side) = ctx.events.goal {
        apply_goal(world, ctx, side);
        ctx.time.tick += 1;
        return;
    }
    move_ball(world);

    // 6. AI intents for the next tick
    run_ai(world, &ctx.config, &ctx.field, &ctx.bonuses, now);

    // 7. Bonuses
    if ctx.mode.power_ups() {
        collect_bonuses(world, ctx);
        spawn_bonuses(world, ctx);
    }

    ctx.time.tick += 1;
}

/// Helper to create the paddle for `seat`, centred on its side
pub fn create_paddle(
    world: &mut World,
    config: &Config,
    seat: u8,
    side: Side,
    controller: Controller,
) -> hecs::Entity {
    let field = config.field();
    let size = config.paddle_size(side.axis() == Axis::Vertical);
    let center = field.center();
    let pos = match side {
        Side::Left => Vec2::new(config.margin, center.y - size.y * 0.5),
        Side::Right => Vec2::new(
            field.size.x - config.margin - size.x,
            center.y - size.y * 0.5,
        ),
        Side::Top => Vec2::new(center.x - size.x * 0.5, config.margin),
        Side::Bottom => Vec2::new(
            center.x - size.x * 0.5,
            field.size.y - config.margin - size.y,
        ),
    };
    world.spawn((
        Paddle::new(seat, side, pos, size, config.paddle_speed),
        PaddleIntent::new(),
        controller,
    ))
}

/// Helper to create the ball entity centred on `center`
pub fn create_ball(world: &mut World, config: &Config, center: Vec2, dir: Vec2) -> hecs::Entity {
    let size = config.ball_extent();
    world.spawn((Ball::new(
        center - size * 0.5,
        size,
        dir,
        config.ball_base_speed,
    ),))
}
