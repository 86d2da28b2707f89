//! Obstacles, the ground row, and the manager that keeps a fixed number of
//! obstacles scrolling toward the player.
//!
//! Culling is two-phase: survivors are partitioned out first, then one
//! replacement is spawned per removed obstacle. Replacements are placed a
//! random gap past `max(screen_width, rightmost survivor)`, so several
//! obstacles leaving in the same tick never land on top of each other.

use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::collision::{Body, Sprite};
use crate::config::GameConfig;

/// Leftward speed in pixels per tick for the given score. The integer
/// division in the first term is intentional.
pub fn speed_for_score(score: u32) -> f32 {
    -(((score + 30) / 10) as f32) - score as f32 / 10.0
}

#[derive(Debug, Clone)]
pub struct Obstacle {
    pub body: Body,
    pub speed: f32,
    pub seen: bool,
    pub collided: bool,
}

impl Obstacle {
    pub fn new(sprite: Sprite, x: i32, y: i32, speed: f32) -> Self {
        Self {
            body: Body::new(sprite, x, y),
            speed,
            seen: false,
            collided: false,
        }
    }

    pub fn advance(&mut self) {
        self.body.move_by(self.speed, 0.0);
    }

    /// True the first time the masks overlap, false on every later call.
    pub fn check_collision(&mut self, character: &Body) -> bool {
        if self.collided || !self.body.overlaps(character) {
            return false;
        }
        self.collided = true;
        true
    }
}

#[derive(Debug, Clone)]
pub struct GroundSegment {
    pub body: Body,
}

/// Tile the ground sprite from x = 0 across the screen width.
pub fn tile_ground(sprite: &Sprite, config: &GameConfig) -> Vec<GroundSegment> {
    let step = config.ground_block_size.max(1) as usize;
    (0..config.screen_width)
        .step_by(step)
        .map(|x| GroundSegment {
            body: Body::new(sprite.clone(), x, config.ground_y()),
        })
        .collect()
}

pub struct ObstacleField {
    obstacles: Vec<Obstacle>,
    sprite: Sprite,
    rng: Pcg32,
    screen_width: i32,
    rest_y: i32,
    min_gap: i32,
    max_gap: i32,
    cull_x: i32,
    count: usize,
    /// Obstacles removed since the last reset.
    pub despawned: u64,
}

impl ObstacleField {
    pub fn new(config: &GameConfig, sprite: Sprite, seed: u64) -> Self {
        let rest_y = config.ground_y() - sprite.height();
        let mut field = Self {
            obstacles: Vec::with_capacity(config.obstacle_count),
            sprite,
            rng: Pcg32::seed_from_u64(seed),
            screen_width: config.screen_width,
            rest_y,
            min_gap: config.obstacle_min_gap,
            max_gap: config.obstacle_max_gap,
            cull_x: config.obstacle_cull_x,
            count: config.obstacle_count.max(1),
            despawned: 0,
        };
        field.reset();
        field
    }

    /// First obstacle at the right screen edge, each following one a random
    /// gap further right.
    pub fn reset(&mut self) {
        self.obstacles.clear();
        self.despawned = 0;
        let mut x = self.screen_width;
        for i in 0..self.count {
            if i > 0 {
                x += self.random_gap();
            }
            let obstacle = self.make_obstacle(x);
            self.obstacles.push(obstacle);
        }
        log::debug!(
            "Obstacles reset at x = {:?}",
            self.obstacles.iter().map(|o| o.body.rect().x).collect::<Vec<_>>()
        );
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn obstacles_mut(&mut self) -> &mut [Obstacle] {
        &mut self.obstacles
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn current_speed(&self) -> f32 {
        self.obstacles.first().map_or(0.0, |o| o.speed)
    }

    pub fn random_gap(&mut self) -> i32 {
        self.rng.random_range(self.min_gap..=self.max_gap)
    }

    /// x for a new obstacle placed a random gap beyond `anchor_x`.
    pub fn spawn_x(&mut self, anchor_x: i32) -> i32 {
        anchor_x + self.random_gap()
    }

    /// Replace every obstacle whose right edge is past the cull line.
    /// Returns how many were replaced.
    pub fn cull_and_spawn(&mut self) -> usize {
        let cull_x = self.cull_x;
        let speed = self.current_speed();
        let (survivors, culled): (Vec<Obstacle>, Vec<Obstacle>) = self
            .obstacles
            .drain(..)
            .partition(|o| o.body.rect().right() >= cull_x);
        self.obstacles = survivors;

        for _ in &culled {
            let anchor = self
                .obstacles
                .iter()
                .map(|o| o.body.rect().x)
                .max()
                .map_or(self.screen_width, |x| x.max(self.screen_width));
            let x = self.spawn_x(anchor);
            log::debug!("Spawning obstacle at x = {} (anchor {})", x, anchor);
            let mut obstacle = self.make_obstacle(x);
            obstacle.speed = speed;
            self.obstacles.push(obstacle);
        }
        self.despawned += culled.len() as u64;
        culled.len()
    }

    pub fn advance(&mut self, speed: f32) {
        for obstacle in &mut self.obstacles {
            obstacle.speed = speed;
            obstacle.advance();
        }
    }

    /// Runs every obstacle's latched check (none is skipped) and reports
    /// whether any of them hit.
    pub fn check_collisions(&mut self, character: &Body) -> bool {
        self.obstacles
            .iter_mut()
            .fold(false, |hit, o| o.check_collision(character) || hit)
    }

    fn make_obstacle(&self, x: i32) -> Obstacle {
        Obstacle::new(self.sprite.clone(), x, self.rest_y, speed_for_score(0))
    }
}
