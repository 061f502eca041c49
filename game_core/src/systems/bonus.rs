use crate::{
    Aabb, Ball, Bonus, BonusBoard, BonusKind, MatchContext, Paddle, ScheduledEffect, StaticWall,
};
use glam::Vec2;
use hecs::World;
use rand::Rng;

/// Wall boxes in spawn order
pub fn wall_boxes(world: &World, board: &BonusBoard) -> Vec<Aabb> {
    board
        .walls
        .iter()
        .filter_map(|e| world.get::<&StaticWall>(*e).ok().map(|w| w.bounds()))
        .collect()
}

/// Fire every scheduled effect whose deadline has passed
pub fn run_scheduled(world: &mut World, ctx: &mut MatchContext) {
    let now = ctx.now();
    for effect in ctx.schedule.take_due(now) {
        match effect {
            ScheduledEffect::SpawnWall { center } => spawn_wall(world, ctx, center),
        }
    }
}

/// Place a static wall centred on `center`, evicting the oldest past the cap
pub fn spawn_wall(world: &mut World, ctx: &mut MatchContext, center: Vec2) {
    let cfg = &ctx.config.bonus;
    if let Some(radius) = cfg.wall_safe_radius {
        let ball_center = world.query::<&Ball>().iter().next().map(|(_e, b)| b.center());
        if let Some(ball_center) = ball_center {
            let d = (ball_center - center).abs();
            if d.x <= radius && d.y <= radius {
                log::debug!("wall spawn at {center} skipped, ball too close");
                return;
            }
        }
    }

    while ctx.bonuses.walls.len() >= cfg.wall_cap.max(1) {
        if let Some(oldest) = ctx.bonuses.walls.pop_front() {
            let _ = world.despawn(oldest);
        }
    }
    let wall = world.spawn((StaticWall::centered(center, Vec2::splat(cfg.wall_size)),));
    ctx.bonuses.walls.push_back(wall);
    ctx.events.wall_spawned = true;
}

/// Spawn a bonus once the warm-up has passed and the interval has elapsed
pub fn spawn_bonuses(world: &mut World, ctx: &mut MatchContext) {
    let now = ctx.now();
    let cfg = ctx.config.bonus.clone();
    if now.saturating_sub(ctx.bonuses.cycle_start) <= cfg.warmup_ms {
        return;
    }
    if let Some(last) = ctx.bonuses.last_spawn {
        if now.saturating_sub(last) < cfg.interval_ms {
            return;
        }
    }

    while ctx.bonuses.bonuses.len() >= cfg.cap.max(1) {
        if let Some(oldest) = ctx.bonuses.bonuses.pop_front() {
            let _ = world.despawn(oldest);
        }
    }

    let field = ctx.field.size;
    let span_x = (field.x * 0.5 - cfg.size).max(0.0);
    let span_y = (field.y - 2.0 * cfg.spawn_band - cfg.size).max(0.0);
    let pos = Vec2::new(
        field.x * 0.25 + ctx.rng.0.gen::<f32>() * span_x,
        cfg.spawn_band + ctx.rng.0.gen::<f32>() * span_y,
    );
    let kind = BonusKind::random(&mut ctx.rng);
    let bonus = world.spawn((Bonus::new(pos, Vec2::splat(cfg.size), kind),));
    ctx.bonuses.bonuses.push_back(bonus);
    ctx.bonuses.last_spawn = Some(now);
    ctx.events.bonus_spawned = Some(kind);
    log::debug!("spawned {kind:?} bonus at {pos}");
}

/// Remove every bonus the ball overlaps and apply its effect
pub fn collect_bonuses(world: &mut World, ctx: &mut MatchContext) {
    let Some(ball) = world.query::<&Ball>().iter().next().map(|(_e, b)| *b) else {
        return;
    };
    let hits: Vec<(hecs::Entity, Bonus)> = ctx
        .bonuses
        .bonuses
        .iter()
        .filter_map(|e| world.get::<&Bonus>(*e).ok().map(|b| (*e, *b)))
        .filter(|(_e, b)| b.bounds().intersects(&ball.bounds()))
        .collect();

    for (entity, bonus) in hits {
        let _ = world.despawn(entity);
        ctx.bonuses.bonuses.retain(|e| *e != entity);
        apply_bonus(world, ctx, bonus.kind, bonus.bounds().center());
    }
}

/// Apply one collected bonus; the last toucher is spared Ice and Potion
pub fn apply_bonus(world: &mut World, ctx: &mut MatchContext, kind: BonusKind, at: Vec2) {
    let now = ctx.now();
    let cfg = &ctx.config.bonus;
    let spared = world
        .query::<&Ball>()
        .iter()
        .next()
        .and_then(|(_e, b)| b.last_touched_by);

    match kind {
        BonusKind::Wall => {
            ctx.schedule
                .push(now + cfg.wall_delay_ms, ScheduledEffect::SpawnWall { center: at });
        }
        BonusKind::Ice => {
            for (_entity, paddle) in world.query_mut::<&mut Paddle>() {
                if Some(paddle.seat) != spared {
                    paddle.freeze_until(now + cfg.freeze_ms);
                }
            }
        }
        BonusKind::Potion => {
            for (_entity, paddle) in world.query_mut::<&mut Paddle>() {
                if Some(paddle.seat) != spared {
                    paddle.invert_until(now + cfg.invert_ms);
                }
            }
        }
        BonusKind::Speed => {
            let cap = ctx.config.ball_max_speed;
            for (_entity, ball) in world.query_mut::<&mut Ball>() {
                ball.boost(cfg.speed_factor, cap);
            }
        }
    }
    ctx.events.bonus_collected = Some(kind);
    log::info!("{kind:?} bonus collected, last touched by {spared:?}");
}

/// Drop bonuses, walls, pending effects and paddle deadlines
pub fn clear_board(world: &mut World, ctx: &mut MatchContext) {
    for entity in ctx.bonuses.bonuses.drain(..).chain(ctx.bonuses.walls.drain(..)) {
        let _ = world.despawn(entity);
    }
    ctx.schedule.clear();
    for (_entity, paddle) in world.query_mut::<&mut Paddle>() {
        paddle.clear_effects();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{create_ball, create_paddle, Config, Controller, Mode, PlayerCount, Variant};

    fn setup(players: PlayerCount) -> (World, MatchContext) {
        let mode = Mode::new(players, Variant::PowerUps);
        let ctx = MatchContext::new(mode, Config::for_mode(mode), 7);
        let mut world = World::new();
        for (seat, side) in mode.sides().iter().enumerate() {
            create_paddle(&mut world, &ctx.config, seat as u8, *side, Controller::Keyboard);
        }
        create_ball(&mut world, &ctx.config, ctx.field.center(), Vec2::new(1.0, 0.0));
        (world, ctx)
    }

    fn live_bonuses(world: &World, board: &BonusBoard) -> Vec<hecs::Entity> {
        board
            .bonuses
            .iter()
            .copied()
            .filter(|e| world.contains(*e))
            .collect()
    }

    #[test]
    fn test_no_bonus_before_warmup() {
        let (mut world, mut ctx) = setup(PlayerCount::Two);
        ctx.time.now_ms = 7_000;
        spawn_bonuses(&mut world, &mut ctx);
        assert!(ctx.bonuses.bonuses.is_empty(), "Warm-up not yet exceeded");
        ctx.time.now_ms = 7_001;
        spawn_bonuses(&mut world, &mut ctx);
        assert_eq!(ctx.bonuses.bonuses.len(), 1);
    }

    #[test]
    fn test_bonus_interval_respected() {
        let (mut world, mut ctx) = setup(PlayerCount::Two);
        ctx.time.now_ms = 8_000;
        spawn_bonuses(&mut world, &mut ctx);
        ctx.time.now_ms = 11_999;
        spawn_bonuses(&mut world, &mut ctx);
        assert_eq!(ctx.bonuses.bonuses.len(), 1);
        ctx.time.now_ms = 12_000;
        spawn_bonuses(&mut world, &mut ctx);
        assert_eq!(ctx.bonuses.bonuses.len(), 2);
    }

    #[test]
    fn test_bonus_cap_evicts_oldest_first() {
        let (mut world, mut ctx) = setup(PlayerCount::Two);
        let mut spawned = Vec::new();
        for i in 0..5u64 {
            ctx.time.now_ms = 8_000 + i * 4_000;
            spawn_bonuses(&mut world, &mut ctx);
            spawned.push(*ctx.bonuses.bonuses.back().unwrap());
        }
        assert_eq!(ctx.bonuses.bonuses.len(), 3, "Never more than the cap");
        assert_eq!(live_bonuses(&world, &ctx.bonuses), spawned[2..].to_vec());
        assert!(!world.contains(spawned[0]) && !world.contains(spawned[1]));
    }

    #[test]
    fn test_bonus_spawns_inside_band() {
        let (mut world, mut ctx) = setup(PlayerCount::Four);
        for i in 0..20u64 {
            ctx.time.now_ms = 8_000 + i * 4_000;
            spawn_bonuses(&mut world, &mut ctx);
            let e = *ctx.bonuses.bonuses.back().unwrap();
            let b = world.get::<&Bonus>(e).unwrap().bounds();
            assert!(b.min.x >= 125.0 && b.max.x <= 375.0);
            assert!(b.min.y >= 60.0 && b.max.y <= 440.0);
        }
    }

    #[test]
    fn test_wall_cap_evicts_oldest_first() {
        let (mut world, mut ctx) = setup(PlayerCount::Two);
        let centers = [100.0, 200.0, 300.0, 400.0];
        for x in centers {
            spawn_wall(&mut world, &mut ctx, Vec2::new(x, 80.0));
        }
        let xs: Vec<f32> = wall_boxes(&world, &ctx.bonuses)
            .iter()
            .map(|b| b.center().x)
            .collect();
        assert_eq!(xs, vec![200.0, 300.0, 400.0], "First wall evicted");
    }

    #[test]
    fn test_wall_is_delayed_through_schedule() {
        let (mut world, mut ctx) = setup(PlayerCount::Two);
        ctx.time.now_ms = 10_000;
        apply_bonus(&mut world, &mut ctx, BonusKind::Wall, Vec2::new(150.0, 100.0));
        assert!(ctx.bonuses.walls.is_empty());

        ctx.time.now_ms = 10_299;
        run_scheduled(&mut world, &mut ctx);
        assert!(ctx.bonuses.walls.is_empty(), "Not due yet");

        ctx.time.now_ms = 10_300;
        run_scheduled(&mut world, &mut ctx);
        assert_eq!(ctx.bonuses.walls.len(), 1);
        assert!(ctx.events.wall_spawned);
    }

    #[test]
    fn test_four_player_wall_skipped_near_ball() {
        let (mut world, mut ctx) = setup(PlayerCount::Four);
        let ball_center = ctx.field.center();
        spawn_wall(&mut world, &mut ctx, ball_center + Vec2::new(10.0, -20.0));
        assert!(ctx.bonuses.walls.is_empty(), "Ball within the safety radius");
        spawn_wall(&mut world, &mut ctx, ball_center + Vec2::new(60.0, 0.0));
        assert_eq!(ctx.bonuses.walls.len(), 1);
    }

    #[test]
    fn test_ice_spares_last_toucher() {
        let (mut world, mut ctx) = setup(PlayerCount::Four);
        for (_e, ball) in world.query_mut::<&mut Ball>() {
            ball.last_touched_by = Some(2);
        }
        ctx.time.now_ms = 1_000;
        apply_bonus(&mut world, &mut ctx, BonusKind::Ice, Vec2::ZERO);
        for (_e, paddle) in world.query::<&Paddle>().iter() {
            if paddle.seat == 2 {
                assert!(!paddle.is_frozen(1_000));
            } else {
                assert_eq!(paddle.frozen_until, 3_000, "Four-player freeze lasts 2000 ms");
            }
        }
    }

    #[test]
    fn test_potion_inverts_others() {
        let (mut world, mut ctx) = setup(PlayerCount::Two);
        for (_e, ball) in world.query_mut::<&mut Ball>() {
            ball.last_touched_by = Some(0);
        }
        apply_bonus(&mut world, &mut ctx, BonusKind::Potion, Vec2::ZERO);
        for (_e, paddle) in world.query::<&Paddle>().iter() {
            assert_eq!(paddle.is_inverted(0), paddle.seat == 1);
        }
    }

    #[test]
    fn test_speed_bonus_capped() {
        let (mut world, mut ctx) = setup(PlayerCount::Two);
        for _ in 0..20 {
            apply_bonus(&mut world, &mut ctx, BonusKind::Speed, Vec2::ZERO);
        }
        for (_e, ball) in world.query::<&Ball>().iter() {
            assert_eq!(ball.speed, ctx.config.ball_max_speed);
        }
    }

    #[test]
    fn test_collecting_removes_bonus() {
        let (mut world, mut ctx) = setup(PlayerCount::Two);
        let center = ctx.field.center();
        let e = world.spawn((Bonus::new(center - Vec2::splat(10.0), Vec2::splat(20.0), BonusKind::Speed),));
        ctx.bonuses.bonuses.push_back(e);

        collect_bonuses(&mut world, &mut ctx);

        assert!(ctx.bonuses.bonuses.is_empty());
        assert!(!world.contains(e));
        assert_eq!(ctx.events.bonus_collected, Some(BonusKind::Speed));
    }

    #[test]
    fn test_clear_board_wipes_everything() {
        let (mut world, mut ctx) = setup(PlayerCount::Two);
        ctx.time.now_ms = 8_000;
        spawn_bonuses(&mut world, &mut ctx);
        spawn_wall(&mut world, &mut ctx, Vec2::new(100.0, 100.0));
        apply_bonus(&mut world, &mut ctx, BonusKind::Ice, Vec2::ZERO);
        apply_bonus(&mut world, &mut ctx, BonusKind::Wall, Vec2::new(200.0, 200.0));

        clear_board(&mut world, &mut ctx);

        assert!(ctx.bonuses.bonuses.is_empty() && ctx.bonuses.walls.is_empty());
        assert!(ctx.schedule.is_empty());
        assert_eq!(world.query::<&StaticWall>().iter().count(), 0);
        for (_e, paddle) in world.query::<&Paddle>().iter() {
            assert!(!paddle.is_frozen(8_000));
        }
    }
}
