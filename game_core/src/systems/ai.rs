use crate::systems::bonus::wall_boxes;
use crate::systems::collision::wall_bounce;
use crate::{Aabb, Ball, BonusBoard, Config, Controller, Field, Paddle, PaddleIntent, Params};
use hecs::World;

/// Project the ball forward until it reaches `paddle`'s face.
///
/// Returns the paddle-centre coordinate along the paddle's axis, clamped so
/// the paddle stays inside the margin. Pure: the same ball, paddle and walls
/// always give the same answer.
pub fn predict_intercept(
    ball: &Ball,
    paddle: &Paddle,
    field: &Field,
    walls: &[Aabb],
    margin: f32,
) -> f32 {
    let axis = paddle.axis();
    let cross = axis.cross();
    let half = ball.size * 0.5;
    let half_along = axis.of(half);
    let extent_along = field.extent(axis);
    let extent_cross = field.extent(cross);

    let mut center = ball.center();
    let mut dir = ball.vel.normalize_or_zero();
    let face = paddle.face();
    let inward = cross.of(paddle.side.inward());

    let reached = |c: glam::Vec2| {
        let leading = cross.of(c) - inward * cross.of(half);
        if inward > 0.0 {
            leading <= face
        } else {
            leading >= face
        }
    };

    if cross.of(dir).abs() > f32::EPSILON && ball.speed > 0.0 {
        for _ in 0..Params::AI_MAX_PREDICTION_STEPS {
            if reached(center) {
                break;
            }
            let c = cross.of(center);
            if c <= 0.0 || c >= extent_cross {
                break;
            }

            let bounds = Aabb::from_center_size(center, ball.size);
            for wall in walls {
                if let Some((pos, v)) = wall_bounce(&bounds, dir, wall, Params::WALL_NUDGE) {
                    center = pos + half;
                    dir = v;
                    break;
                }
            }

            center += dir * ball.speed;

            let along = axis.of(center);
            if along - half_along < 0.0 || along + half_along > extent_along {
                dir = axis.with(dir, -axis.of(dir));
                center = axis.with(center, along.clamp(half_along, extent_along - half_along));
            }
        }
    }

    clamp_target(axis.of(center), paddle.half_length(), extent_along, margin)
}

fn clamp_target(value: f32, half_length: f32, extent: f32, margin: f32) -> f32 {
    let lo = margin + half_length;
    let hi = (extent - margin - half_length).max(lo);
    value.clamp(lo, hi)
}

/// Pick a new target at a decision point; keeps the old one when idle
pub fn decide_target(
    ball: &Ball,
    paddle: &Paddle,
    field: &Field,
    walls: &[Aabb],
    config: &Config,
    previous: Option<f32>,
) -> Option<f32> {
    if paddle.side.is_approaching(ball.vel) {
        Some(predict_intercept(ball, paddle, field, walls, config.margin))
    } else if (paddle.axis_center() - paddle.centerline).abs() > config.ai_recenter_threshold {
        Some(paddle.centerline)
    } else {
        previous
    }
}

/// Deadzone controller: -1, 0 or 1 toward the target
pub fn steer(center: f32, target: Option<f32>, deadzone: f32) -> i8 {
    match target {
        Some(t) => {
            let diff = t - center;
            if diff > deadzone {
                1
            } else if diff < -deadzone {
                -1
            } else {
                0
            }
        }
        None => 0,
    }
}

/// Update every AI paddle's intent, re-deciding targets on their interval
pub fn run_ai(world: &mut World, config: &Config, field: &Field, board: &BonusBoard, now_ms: u64) {
    let Some(ball) = world.query::<&Ball>().iter().next().map(|(_e, b)| *b) else {
        return;
    };
    let walls = wall_boxes(world, board);

    for (_entity, (paddle, controller, intent)) in
        world.query_mut::<(&Paddle, &mut Controller, &mut PaddleIntent)>()
    {
        let Controller::Ai(brain) = controller else {
            continue;
        };
        if now_ms >= brain.next_decision_at {
            brain.target = decide_target(&ball, paddle, field, &walls, config, brain.target);
            brain.next_decision_at = now_ms + config.ai_decision_ms;
            log::trace!("seat {} AI target {:?}", paddle.seat, brain.target);
        }
        intent.dir = steer(paddle.axis_center(), brain.target, config.ai_deadzone);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{create_ball, create_paddle, AiBrain, Mode, PlayerCount, Side, StaticWall, Variant};
    use glam::Vec2;

    fn two_player() -> (Config, Field) {
        let config = Config::for_mode(Mode::default());
        let field = config.field();
        (config, field)
    }

    fn right_paddle(config: &Config) -> Paddle {
        let mut world = World::new();
        let e = create_paddle(&mut world, config, 1, Side::Right, Controller::Keyboard);
        let paddle = *world.get::<&Paddle>(e).unwrap();
        paddle
    }

    fn ball_at(config: &Config, center: Vec2, vel: Vec2) -> Ball {
        let mut ball = Ball::new(Vec2::ZERO, config.ball_extent(), vel, config.ball_base_speed);
        ball.pos = center - ball.size * 0.5;
        ball
    }

    #[test]
    fn test_straight_shot_predicts_same_height() {
        let (config, field) = two_player();
        let paddle = right_paddle(&config);
        let ball = ball_at(&config, Vec2::new(300.0, 150.0), Vec2::new(1.0, 0.0));
        let target = predict_intercept(&ball, &paddle, &field, &[], config.margin);
        assert_eq!(target, 150.0);
    }

    #[test]
    fn test_prediction_reflects_off_bottom() {
        let (config, field) = two_player();
        let paddle = right_paddle(&config);
        // 45 degrees down from y=300: would leave the field before reaching x=560
        let ball = ball_at(&config, Vec2::new(300.0, 300.0), Vec2::new(1.0, 1.0));
        let target = predict_intercept(&ball, &paddle, &field, &[], config.margin);
        assert!(target < 395.0 - 25.0, "Reflected path must come back up");
        assert!(target >= config.margin + 25.0);
    }

    #[test]
    fn test_prediction_is_deterministic() {
        let (config, field) = two_player();
        let paddle = right_paddle(&config);
        let walls = [StaticWall::centered(Vec2::new(420.0, 220.0), Vec2::splat(40.0)).bounds()];
        let ball = ball_at(&config, Vec2::new(150.0, 120.0), Vec2::new(1.0, 0.7));
        let a = predict_intercept(&ball, &paddle, &field, &walls, config.margin);
        let b = predict_intercept(&ball, &paddle, &field, &walls, config.margin);
        assert_eq!(a.to_bits(), b.to_bits(), "Identical inputs, identical target");
    }

    #[test]
    fn test_prediction_clamped_inside_margin() {
        let (config, field) = two_player();
        let paddle = right_paddle(&config);
        let ball = ball_at(&config, Vec2::new(300.0, 15.0), Vec2::new(1.0, 0.0));
        let target = predict_intercept(&ball, &paddle, &field, &[], config.margin);
        assert_eq!(target, config.margin + paddle.half_length());
    }

    #[test]
    fn test_prediction_zero_velocity_is_safe() {
        let (config, field) = two_player();
        let paddle = right_paddle(&config);
        let ball = ball_at(&config, Vec2::new(300.0, 200.0), Vec2::ZERO);
        let target = predict_intercept(&ball, &paddle, &field, &[], config.margin);
        assert_eq!(target, 200.0);
    }

    #[test]
    fn test_prediction_for_top_paddle_uses_x() {
        let mode = Mode::new(PlayerCount::Four, Variant::Classic);
        let config = Config::for_mode(mode);
        let field = config.field();
        let mut world = World::new();
        let e = create_paddle(&mut world, &config, 2, Side::Top, Controller::Keyboard);
        let paddle = *world.get::<&Paddle>(e).unwrap();
        let ball = ball_at(&config, Vec2::new(180.0, 300.0), Vec2::new(0.0, -1.0));
        let target = predict_intercept(&ball, &paddle, &field, &[], config.margin);
        assert_eq!(target, 180.0);
    }

    #[test]
    fn test_steer_deadzone() {
        assert_eq!(steer(100.0, Some(104.0), 5.0), 0, "Inside deadzone holds");
        assert_eq!(steer(100.0, Some(106.0), 5.0), 1);
        assert_eq!(steer(100.0, Some(90.0), 5.0), -1);
        assert_eq!(steer(100.0, None, 5.0), 0);
    }

    #[test]
    fn test_recenter_when_ball_moves_away() {
        let (config, field) = two_player();
        let mut paddle = right_paddle(&config);
        paddle.pos.y = config.margin; // parked at the top
        let ball = ball_at(&config, Vec2::new(300.0, 200.0), Vec2::new(-1.0, 0.0));
        let target = decide_target(&ball, &paddle, &field, &[], &config, None);
        assert_eq!(target, Some(paddle.centerline));
    }

    #[test]
    fn test_ai_decides_on_interval() {
        let (config, field) = two_player();
        let mut world = World::new();
        let e = create_paddle(&mut world, &config, 1, Side::Right, Controller::Ai(AiBrain::default()));
        create_ball(&mut world, &config, Vec2::new(300.0, 300.0), Vec2::new(1.0, 0.0));
        let board = BonusBoard::new();

        run_ai(&mut world, &config, &field, &board, 0);
        assert_eq!(world.get::<&PaddleIntent>(e).unwrap().dir, 1, "Heads down toward y=300");

        // Ball changes course, but no new decision until the interval passes
        for (_e, ball) in world.query_mut::<&mut Ball>() {
            ball.pos.y = 45.0;
        }
        run_ai(&mut world, &config, &field, &board, 999);
        assert_eq!(world.get::<&PaddleIntent>(e).unwrap().dir, 1);

        run_ai(&mut world, &config, &field, &board, 1_000);
        assert_eq!(world.get::<&PaddleIntent>(e).unwrap().dir, -1);
    }
}
