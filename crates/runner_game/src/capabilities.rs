//! The narrow interfaces the simulation talks to the outside world through.
//!
//! `Game` never touches the window, the GPU or the sound device directly; the
//! frontend in `main.rs` implements these traits over winit/egui/rodio and the
//! tests implement them with recording fakes.

use image::RgbaImage;
use runner_core::input::{InputState, Key};
use std::time::{Duration, Instant};

pub use runner_render::TextAnchor;

use crate::collision::Sprite;

/// Per-tick input snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Jump key held (Space or Up).
    pub jump: bool,
    /// Space went down since the last consumed tick.
    pub jump_pressed: bool,
    pub descend: bool,
    pub quit: bool,
}

impl TickInput {
    pub fn from_input_state(input: &InputState) -> Self {
        Self {
            jump: input.is_held(Key::Space) || input.is_held(Key::Up),
            jump_pressed: input.is_just_pressed(Key::Space),
            descend: input.is_held(Key::Down),
            quit: input.is_just_pressed(Key::Escape),
        }
    }
}

#[cfg(test)]
impl TickInput {
    /// A tick where the jump key was just pressed and is still held.
    pub fn jump() -> Self {
        Self {
            jump: true,
            jump_pressed: true,
            ..Default::default()
        }
    }
}

pub trait RenderSink {
    fn draw_sprite(&mut self, sprite: &Sprite, x: i32, y: i32);
    fn draw_text(&mut self, text: &str, x: i32, y: i32, anchor: TextAnchor);
}

/// Fire-and-forget audio. Implementations log and swallow playback failures.
pub trait AudioSink {
    fn play_sound(&mut self, name: &str);
    /// `loops < 0` repeats forever; otherwise the track plays `loops + 1` times.
    fn play_music(&mut self, name: &str, loops: i32, volume: f32);
    fn stop_music(&mut self);
}

pub trait Clock {
    fn now(&self) -> Instant;
    fn sleep(&mut self, duration: Duration);
}

/// Source of raw images by logical name (a path relative to the asset root).
pub trait AssetProvider {
    fn image(&self, name: &str) -> Result<RgbaImage, String>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Audio sink used when no output device could be opened.
#[derive(Debug, Default)]
pub struct SilentAudio;

impl AudioSink for SilentAudio {
    fn play_sound(&mut self, name: &str) {
        log::trace!("(silent) sound '{}'", name);
    }

    fn play_music(&mut self, name: &str, _loops: i32, _volume: f32) {
        log::trace!("(silent) music '{}'", name);
    }

    fn stop_music(&mut self) {}
}
