//! Spawn placement: decides where new coins and enemies appear.
//!
//! Candidates are drawn uniformly from small hand-authored pools of spawn points and rejected
//! when they sit too close to the player or to other live entities. The draw is retried up to a
//! fixed ceiling; running out of attempts is a benign skip, the next timer cycle simply tries
//! again. All positions are gathered from tag queries each cycle, so this module maintains no
//! index of its own and the ECS remains the single owner of entity state.

use bevy::prelude::*;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::coin::{self, Coin};
use crate::effects;
use crate::enemy::{self, Enemy};
use crate::player::Player;
use crate::state::{GameSet, GameState};

/// Minimum distance between a fresh enemy and the player.
pub const MIN_PLAYER_DISTANCE: f32 = 200.0;
/// Minimum distance between a fresh enemy and any live enemy.
pub const MIN_ENEMY_DISTANCE: f32 = 120.0;
/// Minimum distance between a fresh coin and any live coin.
pub const MIN_COIN_DISTANCE: f32 = 80.0;
/// Clearance between a fresh coin and any live enemy. Historically half of
/// `MIN_ENEMY_DISTANCE`; kept as an independent tunable rather than a derived value.
pub const COIN_ENEMY_CLEARANCE: f32 = 60.0;

/// Candidate positions for coins, floating above the platforms.
pub const COIN_SPAWN_POINTS: [Vec2; 8] = [
    Vec2::new(130.0, 270.0),
    Vec2::new(410.0, 140.0),
    Vec2::new(660.0, 270.0),
    Vec2::new(210.0, 120.0),
    Vec2::new(510.0, 310.0),
    Vec2::new(750.0, 270.0),
    Vec2::new(600.0, 120.0),
    Vec2::new(300.0, 170.0),
];

/// An authored enemy spawn location: where the enemy stands and the interval of center
/// x positions it may patrol on that platform.
pub struct EnemySpawnPoint {
    pub pos: Vec2,
    pub patrol_min_x: f32,
    pub patrol_max_x: f32,
}

/// Candidate positions for enemies, one per patrollable surface.
pub const ENEMY_SPAWN_POINTS: [EnemySpawnPoint; 3] = [
    // Middle ledge.
    EnemySpawnPoint {
        pos: Vec2::new(450.0, 120.0),
        patrol_min_x: 370.0,
        patrol_max_x: 530.0,
    },
    // Ground.
    EnemySpawnPoint {
        pos: Vec2::new(250.0, 70.0),
        patrol_min_x: 120.0,
        patrol_max_x: 680.0,
    },
    // Right ledge.
    EnemySpawnPoint {
        pos: Vec2::new(700.0, 220.0),
        patrol_min_x: 620.0,
        patrol_max_x: 780.0,
    },
];

/// Registers the timed spawn systems and their supporting resources.
pub struct SpawnPlugin;

impl Plugin for SpawnPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SpawnSettings>()
            .init_resource::<SpawnTimers>()
            .init_resource::<SpawnRng>()
            .add_systems(OnEnter(GameState::Loading), reset_spawn_state)
            .add_systems(
                Update,
                (spawn_coins, spawn_enemies)
                    .in_set(GameSet::Effects)
                    .run_if(in_state(GameState::Playing)),
            );
    }
}

/// Orchestration knobs: how often each population is topped up, how large it may grow, and how
/// many rejected draws a single cycle tolerates before giving up.
#[derive(Resource)]
pub struct SpawnSettings {
    pub coin_interval: f32,
    pub enemy_interval: f32,
    pub max_coins: usize,
    pub max_enemies: usize,
    pub max_attempts: usize,
}

impl Default for SpawnSettings {
    fn default() -> Self {
        Self {
            coin_interval: 3.0,
            enemy_interval: 5.0,
            max_coins: 5,
            max_enemies: 5,
            max_attempts: 10,
        }
    }
}

/// Elapsed-time accumulators for the two spawn cycles. Repeating timers rewind themselves on
/// firing, which matches the contract that a cycle resets whether or not it produced an entity.
#[derive(Resource)]
pub struct SpawnTimers {
    pub coins: Timer,
    pub enemies: Timer,
}

impl SpawnTimers {
    fn from_settings(settings: &SpawnSettings) -> Self {
        Self {
            coins: Timer::from_seconds(settings.coin_interval, TimerMode::Repeating),
            enemies: Timer::from_seconds(settings.enemy_interval, TimerMode::Repeating),
        }
    }
}

impl Default for SpawnTimers {
    fn default() -> Self {
        Self::from_settings(&SpawnSettings::default())
    }
}

/// Source of randomness for candidate draws, seeded from OS entropy at startup. Tests construct
/// their own seeded instances instead, so placement logic stays deterministic under test.
#[derive(Resource)]
pub struct SpawnRng(pub SmallRng);

impl Default for SpawnRng {
    fn default() -> Self {
        Self(SmallRng::from_entropy())
    }
}

/// True when `candidate` is an acceptable enemy location: far enough from the player (when one
/// is alive) and from every live enemy. A candidate exactly at a threshold is accepted.
pub fn is_safe_enemy_position(candidate: Vec2, player: Option<Vec2>, enemies: &[Vec2]) -> bool {
    if let Some(player_pos) = player {
        if candidate.distance(player_pos) < MIN_PLAYER_DISTANCE {
            return false;
        }
    }

    enemies
        .iter()
        .all(|&enemy_pos| candidate.distance(enemy_pos) >= MIN_ENEMY_DISTANCE)
}

/// True when `candidate` is an acceptable coin location: far enough from every live coin and
/// clear of every live enemy.
pub fn is_safe_coin_position(candidate: Vec2, coins: &[Vec2], enemies: &[Vec2]) -> bool {
    coins
        .iter()
        .all(|&coin_pos| candidate.distance(coin_pos) >= MIN_COIN_DISTANCE)
        && enemies
            .iter()
            .all(|&enemy_pos| candidate.distance(enemy_pos) >= COIN_ENEMY_CLEARANCE)
}

/// Rejection sampling over a fixed pool: draw uniformly, return the first candidate the
/// predicate accepts, give up after `max_attempts` rejected draws. First fit, not best fit;
/// a `None` result means this cycle spawns nothing.
pub fn try_spawn<'a, T, R: Rng>(
    rng: &mut R,
    pool: &'a [T],
    max_attempts: usize,
    accepts: impl Fn(&T) -> bool,
) -> Option<&'a T> {
    if pool.is_empty() {
        return None;
    }

    for _ in 0..max_attempts {
        let candidate = &pool[rng.gen_range(0..pool.len())];
        if accepts(candidate) {
            return Some(candidate);
        }
    }

    None
}

/// Rewinds both spawn cycles and clears the previous round's populations.
fn reset_spawn_state(
    mut commands: Commands,
    settings: Res<SpawnSettings>,
    mut timers: ResMut<SpawnTimers>,
    coins: Query<Entity, With<Coin>>,
    enemies: Query<Entity, With<Enemy>>,
) {
    *timers = SpawnTimers::from_settings(&settings);

    for entity in coins.iter().chain(enemies.iter()) {
        commands.entity(entity).despawn_recursive();
    }
}

fn spawn_coins(
    mut commands: Commands,
    time: Res<Time>,
    settings: Res<SpawnSettings>,
    mut timers: ResMut<SpawnTimers>,
    mut rng: ResMut<SpawnRng>,
    coins: Query<&Transform, With<Coin>>,
    enemies: Query<&Transform, With<Enemy>>,
) {
    if !timers.coins.tick(time.delta()).just_finished() {
        return;
    }

    if coins.iter().count() >= settings.max_coins {
        return;
    }

    let coin_positions: Vec<Vec2> = coins.iter().map(|t| t.translation.truncate()).collect();
    let enemy_positions: Vec<Vec2> = enemies.iter().map(|t| t.translation.truncate()).collect();

    let placed = try_spawn(&mut rng.0, &COIN_SPAWN_POINTS, settings.max_attempts, |p| {
        is_safe_coin_position(*p, &coin_positions, &enemy_positions)
    });

    match placed {
        Some(&point) => {
            coin::spawn_coin(&mut commands, point);
            effects::spawn_flash(&mut commands, point);
        }
        None => debug!(
            "no safe coin position after {} attempts, deferring to next cycle",
            settings.max_attempts
        ),
    }
}

fn spawn_enemies(
    mut commands: Commands,
    time: Res<Time>,
    settings: Res<SpawnSettings>,
    mut timers: ResMut<SpawnTimers>,
    mut rng: ResMut<SpawnRng>,
    player: Query<&Transform, With<Player>>,
    enemies: Query<&Transform, With<Enemy>>,
) {
    if !timers.enemies.tick(time.delta()).just_finished() {
        return;
    }

    if enemies.iter().count() >= settings.max_enemies {
        return;
    }

    // A missing player is a valid steady state; the predicate then only has to
    // keep enemies apart from each other.
    let player_pos = player
        .get_single()
        .ok()
        .map(|t| t.translation.truncate());
    let enemy_positions: Vec<Vec2> = enemies.iter().map(|t| t.translation.truncate()).collect();

    let placed = try_spawn(&mut rng.0, &ENEMY_SPAWN_POINTS, settings.max_attempts, |p| {
        is_safe_enemy_position(p.pos, player_pos, &enemy_positions)
    });

    match placed {
        Some(point) => {
            enemy::spawn_enemy(&mut commands, point);
            effects::spawn_flash(&mut commands, point.pos);
        }
        None => debug!(
            "no safe enemy position after {} attempts, deferring to next cycle",
            settings.max_attempts
        ),
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::enemy::ENEMY_SIZE;
    use crate::level::{PLATFORMS, VIEW_HEIGHT, VIEW_WIDTH};

    fn seeded_rng() -> SmallRng {
        SmallRng::seed_from_u64(7)
    }

    #[test]
    fn enemy_position_safe_when_everything_is_far() {
        let candidate = Vec2::new(400.0, 100.0);
        let player = Some(Vec2::new(400.0, 300.0));
        let enemies = [Vec2::new(400.0, 220.0), Vec2::new(700.0, 100.0)];
        assert!(is_safe_enemy_position(candidate, player, &enemies));
    }

    #[test]
    fn enemy_position_rejected_near_player() {
        let candidate = Vec2::new(400.0, 100.0);
        let player = Some(Vec2::new(400.0, 299.0));
        assert!(!is_safe_enemy_position(candidate, player, &[]));
    }

    #[test]
    fn enemy_position_rejected_near_other_enemy() {
        let candidate = Vec2::new(400.0, 100.0);
        let enemies = [Vec2::new(400.0, 219.0)];
        assert!(!is_safe_enemy_position(candidate, None, &enemies));
    }

    #[test]
    fn enemy_position_accepts_exact_thresholds() {
        let candidate = Vec2::new(400.0, 100.0);
        let player = Some(Vec2::new(400.0, 100.0 + MIN_PLAYER_DISTANCE));
        let enemies = [Vec2::new(400.0 + MIN_ENEMY_DISTANCE, 100.0)];
        assert!(is_safe_enemy_position(candidate, player, &enemies));
    }

    #[test]
    fn missing_player_relaxes_the_player_constraint() {
        let candidate = Vec2::new(400.0, 100.0);
        assert!(is_safe_enemy_position(candidate, None, &[]));
    }

    #[test]
    fn coin_position_thresholds() {
        let candidate = Vec2::new(400.0, 100.0);

        let far_coins = [Vec2::new(400.0, 100.0 + MIN_COIN_DISTANCE)];
        let far_enemies = [Vec2::new(400.0 + COIN_ENEMY_CLEARANCE, 100.0)];
        assert!(is_safe_coin_position(candidate, &far_coins, &far_enemies));

        let near_coin = [Vec2::new(400.0, 100.0 + MIN_COIN_DISTANCE - 1.0)];
        assert!(!is_safe_coin_position(candidate, &near_coin, &[]));

        let near_enemy = [Vec2::new(400.0 + COIN_ENEMY_CLEARANCE - 1.0, 100.0)];
        assert!(!is_safe_coin_position(candidate, &[], &near_enemy));
    }

    #[test]
    fn try_spawn_returns_a_pool_member() {
        let mut rng = seeded_rng();
        let result = try_spawn(&mut rng, &COIN_SPAWN_POINTS, 10, |_| true);
        let point = result.expect("an always-true predicate must place on the first draw");
        assert!(COIN_SPAWN_POINTS.iter().any(|p| p == point));
    }

    #[test]
    fn try_spawn_gives_up_after_the_attempt_ceiling() {
        let mut rng = seeded_rng();
        let draws = Cell::new(0usize);
        let result = try_spawn(&mut rng, &COIN_SPAWN_POINTS, 10, |_| {
            draws.set(draws.get() + 1);
            false
        });
        assert!(result.is_none());
        assert_eq!(draws.get(), 10);
    }

    #[test]
    fn try_spawn_stops_at_first_accepted_candidate() {
        let mut rng = seeded_rng();
        let draws = Cell::new(0usize);
        let result = try_spawn(&mut rng, &COIN_SPAWN_POINTS, 10, |_| {
            draws.set(draws.get() + 1);
            true
        });
        assert!(result.is_some());
        assert_eq!(draws.get(), 1);
    }

    #[test]
    fn try_spawn_honours_the_predicate() {
        let mut rng = seeded_rng();
        let target = COIN_SPAWN_POINTS[3];
        let result = try_spawn(&mut rng, &COIN_SPAWN_POINTS, 1_000, |p| *p == target);
        assert_eq!(result.copied(), Some(target));
    }

    #[test]
    fn try_spawn_on_empty_pool_is_none() {
        let mut rng = seeded_rng();
        let empty: [Vec2; 0] = [];
        assert!(try_spawn(&mut rng, &empty, 10, |_| true).is_none());
    }

    #[test]
    fn coin_pool_is_mutually_spaced_and_on_screen() {
        for (i, a) in COIN_SPAWN_POINTS.iter().enumerate() {
            assert!(a.x >= 0.0 && a.x <= VIEW_WIDTH);
            assert!(a.y >= 0.0 && a.y <= VIEW_HEIGHT);
            for b in &COIN_SPAWN_POINTS[i + 1..] {
                assert!(
                    a.distance(*b) >= MIN_COIN_DISTANCE,
                    "coin points {a:?} and {b:?} could never coexist"
                );
            }
        }
    }

    #[test]
    fn enemy_pool_is_mutually_spaced() {
        for (i, a) in ENEMY_SPAWN_POINTS.iter().enumerate() {
            for b in &ENEMY_SPAWN_POINTS[i + 1..] {
                assert!(a.pos.distance(b.pos) >= MIN_ENEMY_DISTANCE);
            }
        }
    }

    #[test]
    fn enemy_points_stand_on_a_platform_inside_their_patrol() {
        for point in &ENEMY_SPAWN_POINTS {
            let standing = PLATFORMS.iter().any(|def| {
                let top = def.center.y + def.size.y * 0.5;
                let left = def.center.x - def.size.x * 0.5;
                let right = def.center.x + def.size.x * 0.5;
                (point.pos.y - (top + ENEMY_SIZE * 0.5)).abs() < 1e-4
                    && point.patrol_min_x >= left + ENEMY_SIZE * 0.5
                    && point.patrol_max_x <= right - ENEMY_SIZE * 0.5
            });
            assert!(standing, "enemy point {:?} is not on a platform", point.pos);
            assert!(point.patrol_min_x <= point.pos.x && point.pos.x <= point.patrol_max_x);
        }
    }
}
