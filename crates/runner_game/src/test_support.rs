//! Fakes shared by the unit tests: solid-colour sprites, an in-memory asset
//! provider and recording audio/render/clock sinks.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use image::{Rgba, RgbaImage};

use crate::assets::GameAssets;
use crate::capabilities::{AssetProvider, AudioSink, Clock, RenderSink, TextAnchor};
use crate::collision::{Body, Sprite};
use crate::config::GameConfig;
use crate::controller::CharacterFrames;
use crate::obstacle::tile_ground;

pub fn solid_sprite(key: &str, width: u32, height: u32) -> Sprite {
    Sprite::new(key, RgbaImage::from_pixel(width, height, Rgba([90, 160, 60, 255])))
}

/// Fully transparent: drawable, but its mask never overlaps anything.
pub fn ghost_sprite(key: &str, width: u32, height: u32) -> Sprite {
    Sprite::new(key, RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 0])))
}

pub fn character_frames() -> CharacterFrames {
    let frames = |name: &str, count: usize| {
        (0..count)
            .map(|i| solid_sprite(&format!("{name}#{i}"), 64, 64))
            .collect::<Vec<_>>()
    };
    CharacterFrames::new(frames("run", 3), frames("jump", 1), frames("fall", 1))
        .expect("test frames are non-empty")
}

pub fn ground_bodies(config: &GameConfig) -> Vec<Body> {
    tile_ground(&solid_sprite("ground", 96, 96), config)
        .into_iter()
        .map(|g| g.body)
        .collect()
}

pub fn test_assets(obstacle: Sprite) -> GameAssets {
    GameAssets {
        character: character_frames(),
        ground: solid_sprite("ground", 96, 96),
        obstacle,
        background: solid_sprite("background", 400, 540),
        spacebar: solid_sprite("spacebar", 318, 120),
    }
}

#[derive(Debug, Default)]
pub struct RecordingAudio {
    pub sounds: Vec<String>,
    pub music: Vec<(String, i32, f32)>,
    pub music_stops: usize,
}

impl AudioSink for RecordingAudio {
    fn play_sound(&mut self, name: &str) {
        self.sounds.push(name.to_string());
    }

    fn play_music(&mut self, name: &str, loops: i32, volume: f32) {
        self.music.push((name.to_string(), loops, volume));
    }

    fn stop_music(&mut self) {
        self.music_stops += 1;
    }
}

/// Clock that advances only when slept on.
#[derive(Debug)]
pub struct FakeClock {
    now: Instant,
    pub slept: Vec<Duration>,
}

impl Default for FakeClock {
    fn default() -> Self {
        Self {
            now: Instant::now(),
            slept: Vec::new(),
        }
    }
}

impl Clock for FakeClock {
    fn now(&self) -> Instant {
        self.now
    }

    fn sleep(&mut self, duration: Duration) {
        self.now += duration;
        self.slept.push(duration);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Drawn {
    Sprite { key: String, x: i32, y: i32 },
    Text { text: String, x: i32, y: i32, anchor: TextAnchor },
}

#[derive(Debug, Default)]
pub struct RecordingRender {
    pub drawn: Vec<Drawn>,
}

impl RecordingRender {
    pub fn texts(&self) -> Vec<&str> {
        self.drawn
            .iter()
            .filter_map(|d| match d {
                Drawn::Text { text, .. } => Some(text.as_str()),
                Drawn::Sprite { .. } => None,
            })
            .collect()
    }

    pub fn sprite_keys(&self) -> Vec<&str> {
        self.drawn
            .iter()
            .filter_map(|d| match d {
                Drawn::Sprite { key, .. } => Some(key.as_str()),
                Drawn::Text { .. } => None,
            })
            .collect()
    }
}

impl RenderSink for RecordingRender {
    fn draw_sprite(&mut self, sprite: &Sprite, x: i32, y: i32) {
        self.drawn.push(Drawn::Sprite {
            key: sprite.key().to_string(),
            x,
            y,
        });
    }

    fn draw_text(&mut self, text: &str, x: i32, y: i32, anchor: TextAnchor) {
        self.drawn.push(Drawn::Text {
            text: text.to_string(),
            x,
            y,
            anchor,
        });
    }
}

#[derive(Debug, Default)]
pub struct MemoryAssets {
    pub images: HashMap<String, RgbaImage>,
}

impl MemoryAssets {
    pub fn with(mut self, name: &str, image: RgbaImage) -> Self {
        self.images.insert(name.to_string(), image);
        self
    }
}

impl AssetProvider for MemoryAssets {
    fn image(&self, name: &str) -> Result<RgbaImage, String> {
        self.images
            .get(name)
            .cloned()
            .ok_or_else(|| format!("Failed to read image {name}: not found"))
    }
}
