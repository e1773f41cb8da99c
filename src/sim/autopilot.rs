//! Idle/demo steering
//!
//! Plans over a one-unit grid of player positions. Obstacles are inflated by
//! a clearance margin, then a breadth-first distance field grows out from
//! every free node that touches a target: the live resources while the level
//! minimum is unmet, otherwise the destination. Each tick the player heads for
//! the neighbouring node one step closer to a target.
//!
//! A planned node is at most 1.5 units from the player on each axis (half a
//! node of rounding plus one step), so a margin above that keeps every
//! position on the way clear of obstacles.

use std::collections::VecDeque;
use std::ops::RangeInclusive;

use glam::Vec2;

use super::collision::overlaps;
use super::state::GameState;
use crate::consts::PLAY_AREA;
use crate::input::{Direction, DirectionSet};
use crate::levels::LevelConfig;
use crate::tuning::Tuning;
use crate::{box_center, clamp_to_play_area};

/// Extra gap kept between planned nodes and every obstacle
const CLEARANCE: f32 = 1.75;

/// Widens the arrival dead zone past float drift in accumulated positions
const DEAD_ZONE_SLACK: f32 = 1e-3;

const NEIGHBOR_OFFSETS: [(i64, i64); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Choose the directions to hold this tick
pub fn steer(state: &GameState, level: &LevelConfig, tuning: &Tuning) -> DirectionSet {
    let targets = targets(state, level, tuning);
    let center = box_center(state.player, tuning.player_size);
    let goal = nearest_center(&targets, center);
    let dead_zone = tuning.player_speed / 2.0 + DEAD_ZONE_SLACK;

    let grid = NavGrid::build(state, tuning);
    let here = grid.nearest(state.player);
    let dist = grid.distance_field(&targets, tuning, here);

    if dist[here] == 0 {
        // On a node touching a target; close the last gap directly
        return head_for(center, goal, dead_zone);
    }

    let next = grid
        .neighbors(here)
        .filter(|&n| dist[n] < dist[here])
        .min_by_key(|&n| dist[n]);
    match next {
        Some(node) => head_for(state.player, grid.position(node), dead_zone),
        None => fallback(state, goal, tuning),
    }
}

/// Target boxes as (top-left, size)
fn targets(state: &GameState, level: &LevelConfig, tuning: &Tuning) -> Vec<(Vec2, f32)> {
    if state.score < level.min_resources_to_win && !state.resources.is_empty() {
        state.resources.iter().map(|r| (r.pos, r.size)).collect()
    } else {
        vec![(level.destination, tuning.destination_size)]
    }
}

fn nearest_center(targets: &[(Vec2, f32)], from: Vec2) -> Vec2 {
    targets
        .iter()
        .map(|&(pos, size)| box_center(pos, size))
        .min_by(|a, b| {
            a.distance_squared(from)
                .partial_cmp(&b.distance_squared(from))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .unwrap_or(from)
}

fn head_for(from: Vec2, to: Vec2, dead_zone: f32) -> DirectionSet {
    let delta = to - from;
    [
        axis(delta.x, dead_zone, Direction::Left, Direction::Right),
        axis(delta.y, dead_zone, Direction::Up, Direction::Down),
    ]
    .into_iter()
    .flatten()
    .fold(DirectionSet::new(), |set, d| set.with(d))
}

fn axis(delta: f32, dead_zone: f32, negative: Direction, positive: Direction) -> Option<Direction> {
    if delta > dead_zone {
        Some(positive)
    } else if delta < -dead_zone {
        Some(negative)
    } else {
        None
    }
}

/// Grid of candidate player positions at integer coordinates
struct NavGrid {
    /// Nodes per axis
    side: usize,
    free: Vec<bool>,
}

impl NavGrid {
    fn build(state: &GameState, tuning: &Tuning) -> Self {
        let side = (PLAY_AREA - tuning.player_size).max(0.0).floor() as usize + 1;
        let mut grid = Self {
            side,
            free: vec![true; side * side],
        };

        let inflated = tuning.collision_tolerance - CLEARANCE;
        let reach = tuning.player_size + CLEARANCE;
        for o in &state.obstacles {
            for y in grid.span(o.pos.y - reach, o.pos.y + o.size + CLEARANCE) {
                for x in grid.span(o.pos.x - reach, o.pos.x + o.size + CLEARANCE) {
                    let idx = y * side + x;
                    if overlaps(grid.position(idx), tuning.player_size, o.pos, o.size, inflated) {
                        grid.free[idx] = false;
                    }
                }
            }
        }
        grid
    }

    /// Node coordinates covering `[lo, hi]`, clipped to the grid
    fn span(&self, lo: f32, hi: f32) -> RangeInclusive<usize> {
        let max = self.side as i64 - 1;
        let lo = (lo.floor() as i64).max(0);
        let hi = (hi.ceil() as i64).min(max);
        if lo > hi {
            return 1..=0;
        }
        lo as usize..=hi as usize
    }

    fn position(&self, idx: usize) -> Vec2 {
        Vec2::new((idx % self.side) as f32, (idx / self.side) as f32)
    }

    fn nearest(&self, pos: Vec2) -> usize {
        let max = (self.side - 1) as f32;
        let x = pos.x.round().clamp(0.0, max) as usize;
        let y = pos.y.round().clamp(0.0, max) as usize;
        y * self.side + x
    }

    fn neighbors(&self, idx: usize) -> impl Iterator<Item = usize> + '_ {
        let side = self.side as i64;
        let (x, y) = (idx as i64 % side, idx as i64 / side);
        NEIGHBOR_OFFSETS.iter().filter_map(move |&(dx, dy)| {
            let (nx, ny) = (x + dx, y + dy);
            ((0..side).contains(&nx) && (0..side).contains(&ny)).then(|| (ny * side + nx) as usize)
        })
    }

    /// Breadth-first step counts from every free node that touches a target.
    /// Growth stops once `stop_at` is settled; nodes further out keep
    /// `u32::MAX`.
    fn distance_field(
        &self,
        targets: &[(Vec2, f32)],
        tuning: &Tuning,
        stop_at: usize,
    ) -> Vec<u32> {
        let mut dist = vec![u32::MAX; self.free.len()];
        let mut queue = VecDeque::new();

        let size = tuning.player_size;
        for &(pos, target_size) in targets {
            for y in self.span(pos.y - size, pos.y + target_size) {
                for x in self.span(pos.x - size, pos.x + target_size) {
                    let idx = y * self.side + x;
                    if self.free[idx]
                        && dist[idx] != 0
                        && overlaps(
                            self.position(idx),
                            size,
                            pos,
                            target_size,
                            tuning.collision_tolerance,
                        )
                    {
                        dist[idx] = 0;
                        queue.push_back(idx);
                    }
                }
            }
        }

        while let Some(current) = queue.pop_front() {
            if current == stop_at {
                break;
            }
            let next = dist[current] + 1;
            for n in self.neighbors(current) {
                if self.free[n] && dist[n] == u32::MAX {
                    dist[n] = next;
                    queue.push_back(n);
                }
            }
        }
        dist
    }
}

/// Local choice when no planned route exists: the open move that ends nearest
/// the goal, or failing that the move with the most room around it
fn fallback(state: &GameState, goal: Vec2, tuning: &Tuning) -> DirectionSet {
    let step = |held: DirectionSet| {
        clamp_to_play_area(
            state.player + held.velocity(tuning.player_speed),
            tuning.player_size,
        )
    };
    let center = |held: DirectionSet| box_center(step(held), tuning.player_size);
    let moves = all_moves();

    let open = moves
        .iter()
        .copied()
        .filter(|&held| !blocked(state, step(held), tuning))
        .min_by(|&a, &b| {
            center(a)
                .distance_squared(goal)
                .partial_cmp(&center(b).distance_squared(goal))
                .unwrap_or(std::cmp::Ordering::Equal)
        });
    if let Some(held) = open {
        return held;
    }

    moves
        .into_iter()
        .max_by(|&a, &b| {
            clearance(state, center(a))
                .partial_cmp(&clearance(state, center(b)))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .unwrap_or_default()
}

/// The eight non-empty direction combinations
fn all_moves() -> Vec<DirectionSet> {
    let horizontal = [None, Some(Direction::Left), Some(Direction::Right)];
    let vertical = [None, Some(Direction::Up), Some(Direction::Down)];
    horizontal
        .iter()
        .flat_map(|h| vertical.iter().map(move |v| [*h, *v]))
        .filter(|pair| pair.iter().any(Option::is_some))
        .map(|pair| {
            pair.into_iter()
                .flatten()
                .fold(DirectionSet::new(), |set, d| set.with(d))
        })
        .collect()
}

/// Distance from `center` to the nearest obstacle center
fn clearance(state: &GameState, center: Vec2) -> f32 {
    state
        .obstacles
        .iter()
        .map(|o| box_center(o.pos, o.size).distance(center))
        .fold(f32::INFINITY, f32::min)
}

/// True when a player at `next` would touch an obstacle
fn blocked(state: &GameState, next: Vec2, tuning: &Tuning) -> bool {
    state.obstacles.iter().any(|o| {
        overlaps(
            next,
            tuning.player_size,
            o.pos,
            o.size,
            tuning.collision_tolerance,
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::levels::LevelCatalog;
    use crate::sim::state::Entity;

    fn level() -> LevelConfig {
        LevelCatalog::default().level(0).clone()
    }

    fn moved(state: &GameState, held: DirectionSet, tuning: &Tuning) -> Vec2 {
        clamp_to_play_area(
            state.player + held.velocity(tuning.player_speed),
            tuning.player_size,
        )
    }

    #[test]
    fn heads_for_nearest_resource_when_short() {
        let mut state = GameState::new();
        state.player = Vec2::new(50.0, 50.0);
        state.resources = vec![
            Entity::resource(0, Vec2::new(80.0, 80.0), 3.0),
            Entity::resource(1, Vec2::new(30.0, 50.5), 3.0),
        ];
        let held = steer(&state, &level(), &Tuning::default());
        assert!(held.contains(Direction::Left));
        assert!(!held.contains(Direction::Right));
    }

    #[test]
    fn heads_for_destination_once_minimum_met() {
        let mut state = GameState::new();
        state.player = Vec2::new(10.0, 85.0);
        state.score = 3;
        state.resources = vec![Entity::resource(0, Vec2::new(5.0, 90.0), 3.0)];
        let held = steer(&state, &level(), &Tuning::default());
        assert!(held.contains(Direction::Right));
        assert!(held.contains(Direction::Up));
    }

    #[test]
    fn crowded_spot_steps_clear_of_obstacle() {
        let mut state = GameState::new();
        state.player = Vec2::new(40.0, 60.0);
        state.score = 3;
        // Just up-right of the player, blocking the diagonal
        state.obstacles = vec![Entity::obstacle(0, Vec2::new(43.7, 55.3), 5.0)];
        let tuning = Tuning::default();

        assert!(blocked(
            &state,
            moved(&state, DirectionSet::new().with(Direction::Up).with(Direction::Right), &tuning),
            &tuning
        ));
        let held = steer(&state, &level(), &tuning);
        assert!(!held.is_empty());
        assert!(!blocked(&state, moved(&state, held, &tuning), &tuning));
    }

    #[test]
    fn boxed_in_player_moves_toward_open_space() {
        let mut state = GameState::new();
        state.player = Vec2::new(50.0, 50.0);
        state.score = 3;
        // Every step overlaps; the left side is the least crowded
        state.obstacles = vec![
            Entity::obstacle(0, Vec2::new(50.0, 50.0), 5.0),
            Entity::obstacle(1, Vec2::new(53.0, 47.0), 5.0),
            Entity::obstacle(2, Vec2::new(53.0, 53.0), 5.0),
        ];
        let tuning = Tuning::default();
        let held = steer(&state, &level(), &tuning);
        assert!(held.contains(Direction::Left));
        assert!(!held.contains(Direction::Right));
    }

    #[test]
    fn routes_around_wall_without_touching_it() {
        let tuning = Tuning::default();
        let level = level();
        let mut state = GameState::new();
        state.player = level.start;
        state.score = level.min_resources_to_win;
        // Solid wall between start and destination, open only near the top
        state.obstacles = (0..16)
            .map(|i| Entity::obstacle(i, Vec2::new(50.0, 20.0 + 5.0 * i as f32), 5.0))
            .collect();

        let mut arrived = false;
        for _ in 0..2000 {
            let held = steer(&state, &level, &tuning);
            state.player = moved(&state, held, &tuning);
            assert!(
                !blocked(&state, state.player, &tuning),
                "touched a guard at {:?}",
                state.player
            );
            if overlaps(
                state.player,
                tuning.player_size,
                level.destination,
                tuning.destination_size,
                tuning.collision_tolerance,
            ) {
                arrived = true;
                break;
            }
        }
        assert!(arrived, "stalled at {:?}", state.player);
    }
}
