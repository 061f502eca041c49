use crate::{Ball, Config, Controller, Field, InputState, Paddle, PaddleIntent, Rally};
use hecs::World;

/// Copy held keys into the intents of keyboard-driven paddles
pub fn ingest_inputs(world: &mut World, input: &InputState) {
    for (_entity, (paddle, controller, intent)) in
        world.query_mut::<(&Paddle, &Controller, &mut PaddleIntent)>()
    {
        if let Controller::Keyboard = controller {
            intent.dir = input.dir(paddle.seat);
        }
    }
}

/// Apply paddle movement based on intents
pub fn move_paddles(world: &mut World, field: &Field, now_ms: u64) {
    for (_entity, (paddle, intent)) in world.query_mut::<(&mut Paddle, &PaddleIntent)>() {
        let mut dir = intent.dir.signum() as f32;
        if paddle.is_frozen(now_ms) {
            dir = 0.0;
        }
        if paddle.is_inverted(now_ms) {
            dir = -dir;
        }

        let axis = paddle.axis();
        let start = axis.of(paddle.pos) + dir * paddle.speed;
        let clamped = field.clamp_paddle(axis, start, paddle.length());
        paddle.pos = axis.with(paddle.pos, clamped);
    }
}

/// Move ball based on velocity
pub fn move_ball(world: &mut World) {
    for (_entity, ball) in world.query_mut::<&mut Ball>() {
        ball.pos += ball.step_delta();
    }
}

/// Raise ball speed in fixed steps once a rally has run long enough
pub fn ramp_ball_speed(world: &mut World, config: &Config, rally: &Rally, now_ms: u64) {
    let elapsed = rally.elapsed(now_ms);
    if elapsed < config.ramp_delay_ms {
        return;
    }
    let steps = 1 + (elapsed - config.ramp_delay_ms) / config.ramp_interval_ms.max(1);
    for (_entity, ball) in world.query_mut::<&mut Ball>() {
        let target = (ball.base_speed + config.ramp_step * steps as f32)
            .min(config.ball_ramp_max_speed)
            .min(config.ball_max_speed);
        ball.speed = ball.speed.max(target).min(config.ball_max_speed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{create_ball, create_paddle, Key, Mode, Side};
    use glam::Vec2;

    fn setup_world() -> (World, Config, Field) {
        let config = Config::for_mode(Mode::default());
        let field = config.field();
        (World::new(), config, field)
    }

    fn paddle_y(world: &World) -> f32 {
        world
            .query::<&Paddle>()
            .iter()
            .next()
            .map(|(_e, p)| p.pos.y)
            .unwrap()
    }

    #[test]
    fn test_paddle_moves_by_speed() {
        let (mut world, config, field) = setup_world();
        create_paddle(&mut world, &config, 0, Side::Left, Controller::Keyboard);
        let mut input = InputState::new();
        input.press(0, Key::Down);

        let before = paddle_y(&world);
        ingest_inputs(&mut world, &input);
        move_paddles(&mut world, &field, 0);
        assert_eq!(paddle_y(&world), before + config.paddle_speed);
    }

    #[test]
    fn test_paddle_clamped_to_margin() {
        let (mut world, config, field) = setup_world();
        create_paddle(&mut world, &config, 0, Side::Left, Controller::Keyboard);
        let mut input = InputState::new();
        input.press(0, Key::Up);
        ingest_inputs(&mut world, &input);
        for _ in 0..100 {
            move_paddles(&mut world, &field, 0);
        }
        assert_eq!(paddle_y(&world), config.margin, "Paddle stops at the margin");
    }

    #[test]
    fn test_frozen_paddle_holds() {
        let (mut world, config, field) = setup_world();
        let e = create_paddle(&mut world, &config, 0, Side::Left, Controller::Keyboard);
        world.get::<&mut Paddle>(e).unwrap().freeze_until(1_000);
        let mut input = InputState::new();
        input.press(0, Key::Down);
        ingest_inputs(&mut world, &input);

        let before = paddle_y(&world);
        move_paddles(&mut world, &field, 500);
        assert_eq!(paddle_y(&world), before, "Frozen paddle ignores intent");
        move_paddles(&mut world, &field, 1_000);
        assert_eq!(paddle_y(&world), before + config.paddle_speed, "Freeze expires");
    }

    #[test]
    fn test_inverted_paddle_moves_opposite() {
        let (mut world, config, field) = setup_world();
        let e = create_paddle(&mut world, &config, 0, Side::Left, Controller::Keyboard);
        world.get::<&mut Paddle>(e).unwrap().invert_until(1_000);
        let mut input = InputState::new();
        input.press(0, Key::Down);
        ingest_inputs(&mut world, &input);

        let before = paddle_y(&world);
        move_paddles(&mut world, &field, 10);
        assert_eq!(paddle_y(&world), before - config.paddle_speed);
    }

    #[test]
    fn test_ai_paddle_ignores_keys() {
        let (mut world, config, _field) = setup_world();
        let e = create_paddle(
            &mut world,
            &config,
            1,
            Side::Right,
            Controller::Ai(Default::default()),
        );
        let mut input = InputState::new();
        input.press(1, Key::Down);
        ingest_inputs(&mut world, &input);
        assert_eq!(world.get::<&PaddleIntent>(e).unwrap().dir, 0);
    }

    #[test]
    fn test_ball_moves_at_current_speed() {
        let (mut world, config, _field) = setup_world();
        create_ball(&mut world, &config, Vec2::new(300.0, 200.0), Vec2::new(1.0, 1.0));
        move_ball(&mut world);
        for (_e, ball) in world.query::<&Ball>().iter() {
            let moved = ball.center() - Vec2::new(300.0, 200.0);
            assert!((moved.length() - config.ball_base_speed).abs() < 1e-4);
        }
    }

    #[test]
    fn test_speed_ramp_steps_and_caps() {
        let (mut world, config, _field) = setup_world();
        create_ball(&mut world, &config, Vec2::new(300.0, 200.0), Vec2::X);
        let rally = Rally::new();

        ramp_ball_speed(&mut world, &config, &rally, 9_999);
        let speed = |w: &World| w.query::<&Ball>().iter().next().unwrap().1.speed;
        assert_eq!(speed(&world), 5.0, "No ramp before the delay");

        ramp_ball_speed(&mut world, &config, &rally, 10_000);
        assert_eq!(speed(&world), 5.5);

        ramp_ball_speed(&mut world, &config, &rally, 15_000);
        assert_eq!(speed(&world), 6.0);

        ramp_ball_speed(&mut world, &config, &rally, 1_000_000);
        assert_eq!(speed(&world), config.ball_ramp_max_speed, "Ramp tops out");
    }
}
