//! Player character: 1D vertical kinematics over a scrolling world.
//!
//! Each tick runs jump-check, fast-fall, gravity, integration and ground
//! resolution in that order. Resolution has to come after integration so it
//! can cancel the penetration the move produced.
//!
//! Gravity is a per-tick ramp, not Newtonian: the velocity added each tick is
//! `fall_frames / tick_rate * gravity`, clamped to `max_gravity_step`. Landing
//! resets `fall_frames` but keeps `vy`, so a grounded character keeps sinking
//! into the ground by `vy` and getting snapped back every tick. That contact
//! is what keeps `falling` false between ticks.

use runner_core::animation::{AnimationClip, AnimationState};

use crate::capabilities::{AudioSink, TickInput};
use crate::collision::{Body, Sprite};
use crate::config::{CharacterConfig, GameConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    Run,
    Jump,
    Fall,
}

impl Motion {
    pub fn clip_name(self) -> &'static str {
        match self {
            Self::Run => "run",
            Self::Jump => "jump",
            Self::Fall => "fall",
        }
    }
}

/// Animation frames for each motion. Every list is non-empty.
#[derive(Debug, Clone)]
pub struct CharacterFrames {
    run: Vec<Sprite>,
    jump: Vec<Sprite>,
    fall: Vec<Sprite>,
}

impl CharacterFrames {
    pub fn new(run: Vec<Sprite>, jump: Vec<Sprite>, fall: Vec<Sprite>) -> Result<Self, String> {
        for (name, frames) in [("run", &run), ("jump", &jump), ("fall", &fall)] {
            if frames.is_empty() {
                return Err(format!("Character animation '{name}' has no frames"));
            }
        }
        Ok(Self { run, jump, fall })
    }

    pub fn frames(&self, motion: Motion) -> &[Sprite] {
        match motion {
            Motion::Run => &self.run,
            Motion::Jump => &self.jump,
            Motion::Fall => &self.fall,
        }
    }

    pub fn all(&self) -> impl Iterator<Item = &Sprite> {
        self.run.iter().chain(&self.jump).chain(&self.fall)
    }
}

struct MotionClips {
    run: AnimationClip,
    jump: AnimationClip,
    fall: AnimationClip,
}

impl MotionClips {
    fn build(frames: &CharacterFrames, frame_us: u64) -> Self {
        let clip = |motion| {
            AnimationClip::uniform(
                frames.frames(motion).iter().map(|s| s.key().to_string()),
                frame_us,
                true,
            )
        };
        Self {
            run: clip(Motion::Run),
            jump: clip(Motion::Jump),
            fall: clip(Motion::Fall),
        }
    }

    fn get(&self, motion: Motion) -> &AnimationClip {
        match motion {
            Motion::Run => &self.run,
            Motion::Jump => &self.jump,
            Motion::Fall => &self.fall,
        }
    }
}

pub struct Character {
    pub body: Body,
    pub vx: f32,
    pub vy: f32,
    /// Ticks since the character last touched the ground.
    pub fall_frames: u32,
    /// True while airborne.
    pub falling: bool,
    pub motion: Motion,
    animation: AnimationState,
    clips: MotionClips,
    frames: CharacterFrames,
    config: CharacterConfig,
    tick_rate: u32,
    tick_us: u64,
    start: (i32, i32),
}

impl Character {
    pub fn new(config: &GameConfig, frames: CharacterFrames) -> Self {
        let tick_us = config.tick_us();
        let frame_us = tick_us * u64::from(config.character.animation_delay_ticks.max(1));
        let clips = MotionClips::build(&frames, frame_us);
        let first = frames.run[0].clone();
        Self {
            body: Body::new(first, config.player_start_x, config.player_start_y),
            vx: config.character.run_speed,
            vy: 0.0,
            fall_frames: 0,
            falling: true,
            motion: Motion::Run,
            animation: AnimationState::new(Motion::Run.clip_name()),
            clips,
            frames,
            config: config.character.clone(),
            tick_rate: config.tick_rate.max(1),
            tick_us,
            start: (config.player_start_x, config.player_start_y),
        }
    }

    /// Back to the start position, airborne, with no vertical motion.
    pub fn reset(&mut self) {
        self.vy = 0.0;
        self.fall_frames = 0;
        self.falling = true;
        self.body.set_position(self.start.0, self.start.1);
        self.set_motion(Motion::Run);
    }

    /// Returns true if the impulse was applied. Never fires while airborne.
    pub fn jump(&mut self, held: bool, audio: &mut dyn AudioSink, sound: &str) -> bool {
        if !held || self.falling {
            return false;
        }
        self.vy = -self.config.gravity * self.config.jump_multiplier;
        audio.play_sound(sound);
        true
    }

    pub fn apply_descend_input(&mut self, held: bool) {
        if held {
            self.vy += self.config.descend_boost;
        }
    }

    pub fn apply_gravity(&mut self, tick_rate: u32) {
        let ramp = self.fall_frames as f32 / tick_rate.max(1) as f32 * self.config.gravity;
        self.vy += ramp.min(self.config.max_gravity_step);
        self.fall_frames = self.fall_frames.saturating_add(1);
        self.falling = true;
    }

    pub fn move_by(&mut self, dx: f32, dy: f32) {
        self.body.move_by(dx, dy);
    }

    /// Snap onto every overlapping surface in order; the last one wins.
    /// Returns true if any surface was touched.
    pub fn resolve_ground_collision<'a>(
        &mut self,
        surfaces: impl IntoIterator<Item = &'a Body>,
    ) -> bool {
        let mut landed = false;
        for surface in surfaces {
            if self.body.overlaps(surface) {
                self.body.set_bottom(surface.rect().y);
                self.fall_frames = 0;
                self.falling = false;
                landed = true;
            }
        }
        landed
    }

    pub fn tick<'a>(
        &mut self,
        input: &TickInput,
        surfaces: impl IntoIterator<Item = &'a Body>,
        audio: &mut dyn AudioSink,
        jump_sound: &str,
    ) {
        self.jump(input.jump, audio, jump_sound);
        self.apply_descend_input(input.descend);
        self.apply_gravity(self.tick_rate);
        self.move_by(self.vx, self.vy);
        self.resolve_ground_collision(surfaces);
        self.animate();
    }

    /// Pick the clip for the current physics state and advance it one tick.
    pub fn animate(&mut self) {
        let motion = if self.falling && self.vy < 0.0 {
            Motion::Jump
        } else if self.falling {
            Motion::Fall
        } else {
            Motion::Run
        };
        if motion != self.motion {
            self.set_motion(motion);
        }

        let sprite_id = self
            .animation
            .tick(self.tick_us, self.clips.get(self.motion))
            .to_string();
        self.show_frame(&sprite_id);
    }

    fn set_motion(&mut self, motion: Motion) {
        self.motion = motion;
        self.animation = AnimationState::new(motion.clip_name());
        let first = self.frames.frames(motion)[0].key().to_string();
        self.show_frame(&first);
    }

    fn show_frame(&mut self, sprite_id: &str) {
        if self.body.sprite().key() == sprite_id {
            return;
        }
        match self.frames.all().find(|s| s.key() == sprite_id) {
            Some(sprite) => self.body.set_sprite(sprite.clone()),
            None => log::warn!("Character frame '{}' not found", sprite_id),
        }
    }
}
