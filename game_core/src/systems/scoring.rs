use crate::systems::bonus::clear_board;
use crate::{Ball, MatchContext, Side};
use hecs::World;

/// Settle a goal past `side`: credit the seat, re-serve, wipe bonus state and pause.
///
/// Returns the credited seat, if the edge credits anyone.
pub fn apply_goal(world: &mut World, ctx: &mut MatchContext, side: Side) -> Option<u8> {
    let now = ctx.now();
    let scorer = ctx.mode.credited_seat(side);
    if let Some(seat) = scorer {
        ctx.score.credit(seat);
        ctx.events.scorer = Some(seat);
    }
    log::info!(
        "goal past {:?} edge, credited seat {:?}, score {:?}",
        side,
        scorer,
        ctx.score.points
    );

    serve_ball(world, ctx);
    clear_board(world, ctx);
    ctx.rally.begin_pause(now, ctx.config.pause_ms);
    ctx.bonuses.restart_cycle(now);
    scorer
}

/// Put the ball back at the centre with a fresh random direction and base speed
pub fn serve_ball(world: &mut World, ctx: &mut MatchContext) {
    let center = ctx.field.center() + ctx.mode.serve_offset(&mut ctx.rng);
    let dir = ctx.mode.serve_direction(&mut ctx.rng);
    for (_entity, ball) in world.query_mut::<&mut Ball>() {
        ball.serve(center, dir);
    }
}
