use crate::{Aabb, Ball, BonusBoard, Config, Events, Field, Mode, Paddle, StaticWall};
use glam::Vec2;
use hecs::World;

/// Reflect a ball box off a wall box.
///
/// The axis with the smaller overlap is the face that was struck: velocity on
/// that axis is turned away from the wall and the box is moved `nudge` units
/// outside it. Returns the corrected top-left position and velocity.
pub fn wall_bounce(ball: &Aabb, vel: Vec2, wall: &Aabb, nudge: f32) -> Option<(Vec2, Vec2)> {
    if !ball.intersects(wall) {
        return None;
    }
    let overlap = ball.overlap(wall);
    let size = ball.size();
    let mut pos = ball.min;
    let mut vel = vel;
    let ball_center = ball.center();
    let wall_center = wall.center();

    if overlap.x < overlap.y {
        if ball_center.x < wall_center.x {
            pos.x = wall.min.x - size.x - nudge;
            vel.x = -vel.x.abs();
        } else {
            pos.x = wall.max.x + nudge;
            vel.x = vel.x.abs();
        }
    } else if ball_center.y < wall_center.y {
        pos.y = wall.min.y - size.y - nudge;
        vel.y = -vel.y.abs();
    } else {
        pos.y = wall.max.y + nudge;
        vel.y = vel.y.abs();
    }
    Some((pos, vel))
}

/// Send the ball away from a paddle, angled by where it struck
pub fn reflect_off_paddle(ball: &mut Ball, paddle: &Paddle, gain: f32) {
    let axis = paddle.axis();
    let half = paddle.half_length();
    let along = if half > f32::EPSILON {
        (axis.of(ball.center()) - paddle.axis_center()) / half * gain
    } else {
        0.0
    };
    ball.vel = axis.with(paddle.side.inward(), along);
    ball.last_touched_by = Some(paddle.seat);
}

/// Check ball against field edges, paddles and static walls, in that order.
///
/// A goal is only recorded in `events`; the caller settles it.
pub fn check_collisions(
    world: &mut World,
    mode: &Mode,
    config: &Config,
    field: &Field,
    board: &BonusBoard,
    events: &mut Events,
) {
    let Some((ball_entity, mut ball)) = world.query::<&Ball>().iter().next().map(|(e, b)| (e, *b))
    else {
        return;
    };

    // 1. Rails and goal edges
    if mode.has_rails() {
        let b = ball.bounds();
        if b.min.y <= field.rail_inset {
            ball.vel.y = ball.vel.y.abs();
            events.rail_bounce = true;
        } else if b.max.y >= field.size.y - field.rail_inset {
            ball.vel.y = -ball.vel.y.abs();
            events.rail_bounce = true;
        }
    }

    if let Some(side) = field
        .crossed_edge(&ball.bounds())
        .filter(|side| mode.is_goal(*side))
    {
        events.goal = Some(side);
        write_ball(world, ball_entity, ball);
        return;
    }

    // 2. Paddles, one test each in seat order
    let mut paddles: Vec<Paddle> = world.query::<&Paddle>().iter().map(|(_e, p)| *p).collect();
    paddles.sort_by_key(|p| p.seat);
    for paddle in &paddles {
        if ball.bounds().intersects(&paddle.bounds()) {
            reflect_off_paddle(&mut ball, paddle, config.deflection_gain);
            events.paddle_hit = Some(paddle.seat);
        }
    }

    // 3. Static walls, oldest first; only the first hit counts
    for wall_entity in &board.walls {
        let Ok(wall) = world.get::<&StaticWall>(*wall_entity).map(|w| w.bounds()) else {
            continue;
        };
        if let Some((pos, vel)) = wall_bounce(&ball.bounds(), ball.vel, &wall, crate::Params::WALL_NUDGE) {
            ball.pos = pos;
            ball.vel = vel;
            events.wall_hit = true;
            break;
        }
    }

    write_ball(world, ball_entity, ball);
}

fn write_ball(world: &mut World, entity: hecs::Entity, ball: Ball) {
    if let Ok(mut stored) = world.get::<&mut Ball>(entity) {
        *stored = ball;
    }
}
