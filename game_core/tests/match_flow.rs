use game_core::*;
use glam::Vec2;

const FRAME_MS: u64 = 17;

fn players(n: usize) -> Vec<PlayerRef> {
    (0..n)
        .map(|i| PlayerRef::new(i as u64 + 1, format!("player{}", i + 1)))
        .collect()
}

fn new_sim(mode: Mode) -> Simulation {
    let config = Config::for_mode(mode);
    Simulation::new(mode, config, 7, players(mode.seats()), 99).unwrap()
}

fn place_ball(sim: &mut Simulation, pos: Vec2, vel: Vec2) {
    for (_e, ball) in sim.world.query_mut::<&mut Ball>() {
        ball.pos = pos;
        ball.vel = vel;
    }
}

/// Keep the ball parked at `pos` and feed frames until one tick runs
fn drive_tick(sim: &mut Simulation, now: &mut u64, pos: Vec2, vel: Vec2) -> FrameOutcome {
    for _ in 0..1_000 {
        *now += FRAME_MS;
        place_ball(sim, pos, vel);
        let outcome = sim.frame(*now);
        if matches!(outcome, FrameOutcome::Stepped | FrameOutcome::Finished(_)) {
            return outcome;
        }
    }
    panic!("no tick ran");
}

#[test]
fn test_two_player_first_to_five() {
    let mut sim = new_sim(Mode::new(PlayerCount::Two, Variant::Classic));
    let mut now = 0;
    assert!(sim.start(now).success);

    // Ball already past the right paddle: seat 0 scores
    let past_right = Vec2::new(595.0, 195.0);
    for expected in 1..5 {
        let outcome = drive_tick(&mut sim, &mut now, past_right, Vec2::X);
        assert_eq!(outcome, FrameOutcome::Stepped);
        assert_eq!(sim.score().points, vec![expected, 0]);
        assert!(sim.is_paused(now), "Every goal opens a pause");
    }

    let outcome = drive_tick(&mut sim, &mut now, past_right, Vec2::X);
    let FrameOutcome::Finished(result) = outcome else {
        panic!("fifth goal must finish the match, got {outcome:?}");
    };
    assert_eq!(result.scores, vec![5, 0]);
    assert_eq!(result.winner().map(|p| p.alias.as_str()), Some("player1"));
    assert_eq!(result.loser().map(|p| p.alias.as_str()), Some("player2"));
    assert!(sim.lifecycle().is_completed());

    assert_eq!(sim.frame(now + 10_000), FrameOutcome::Halted, "No ticks after completion");
    assert!(!sim.ctx.input.is_attached());
}

#[test]
fn test_four_player_edge_owner_credit() {
    let mut sim = new_sim(Mode::new(PlayerCount::Four, Variant::Classic));
    let mut now = 0;
    sim.start(now);

    let left = Vec2::new(-2.0, 100.0);
    let right = Vec2::new(495.0, 100.0);
    let top = Vec2::new(100.0, -2.0);
    let bottom = Vec2::new(100.0, 495.0);

    let mut script = vec![left, left, top, top, top, bottom];
    script.extend([right; 4]);
    for pos in script {
        assert_eq!(drive_tick(&mut sim, &mut now, pos, Vec2::ZERO), FrameOutcome::Stepped);
    }
    assert_eq!(sim.score().points, vec![2, 4, 3, 1]);

    let FrameOutcome::Finished(result) = drive_tick(&mut sim, &mut now, right, Vec2::ZERO) else {
        panic!("seat 1 reaching five must finish the match");
    };
    assert_eq!(result.scores, vec![2, 5, 3, 1]);
    assert_eq!(result.winner_seat, 1);
    assert!(result.loser().is_none(), "Four-player matches have no single loser");
}

#[test]
fn test_ice_freezes_everyone_but_last_toucher() {
    let mode = Mode::new(PlayerCount::Two, Variant::PowerUps);
    let mut sim = new_sim(mode);
    let mut now = 0;
    sim.start(now);

    let center = sim.ctx.field.center();
    for (_e, ball) in sim.world.query_mut::<&mut Ball>() {
        ball.pos = center - ball.size * 0.5;
        ball.vel = Vec2::Y;
        ball.last_touched_by = Some(1);
    }
    let size = Vec2::splat(sim.ctx.config.bonus.size);
    let bonus = sim.world.spawn((Bonus::new(center - size * 0.5, size, BonusKind::Ice),));
    sim.ctx.bonuses.bonuses.push_back(bonus);

    let collected_at = loop {
        now += FRAME_MS;
        if sim.frame(now) == FrameOutcome::Stepped {
            break now;
        }
    };
    assert_eq!(sim.ctx.events.bonus_collected, Some(BonusKind::Ice));
    assert!(sim.bonuses().is_empty());

    let paddles = sim.paddles();
    assert_eq!(paddles[0].frozen_until, collected_at + 1_250);
    assert_eq!(paddles[1].frozen_until, 0, "Last toucher is spared");

    let start_y = paddles[0].pos.y;
    sim.press(0, Key::Down);
    while now + FRAME_MS < collected_at + 1_250 {
        now += FRAME_MS;
        sim.frame(now);
        assert_eq!(sim.paddles()[0].pos.y, start_y, "Frozen paddle ignores input");
    }

    for _ in 0..5 {
        now += FRAME_MS;
        sim.frame(now);
    }
    assert!(sim.paddles()[0].pos.y > start_y, "Freeze lapses on its own");
}

#[test]
fn test_speed_ramps_during_long_classic_rally() {
    let mut sim = new_sim(Mode::new(PlayerCount::Two, Variant::Classic));
    sim.start(0);
    let center = sim.ctx.field.center();
    let mut now = 0;
    // Vertical rally between the rails never reaches a goal
    while now < 2_000 + 16_000 {
        now += FRAME_MS;
        if now < 2_100 {
            for (_e, ball) in sim.world.query_mut::<&mut Ball>() {
                ball.pos = center - ball.size * 0.5;
                ball.vel = Vec2::Y;
            }
        }
        sim.frame(now);
    }
    let ball = sim.ball().unwrap();
    assert!(ball.speed > sim.ctx.config.ball_base_speed);
    assert!(ball.speed <= sim.ctx.config.ball_ramp_max_speed);
    assert_eq!(sim.score().points, vec![0, 0]);
}
