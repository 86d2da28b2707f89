//! Frame-based sprite animation with deterministic tick logic.
//!
//! Clips are sequences of sprite ids with per-frame durations. Timing uses
//! integer microseconds so that advancing by one fixed step always lands on
//! the same frame regardless of platform float behaviour.

/// A single frame in an animation clip.
#[derive(Debug, Clone)]
pub struct AnimationFrame {
    pub sprite_id: String,
    pub duration_us: u64,
}

/// A named sequence of frames that can loop or play once.
#[derive(Debug, Clone)]
pub struct AnimationClip {
    pub frames: Vec<AnimationFrame>,
    pub looping: bool,
}

impl AnimationClip {
    /// Build a clip where every frame is shown for the same duration.
    pub fn uniform<I, S>(sprite_ids: I, frame_us: u64, looping: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            frames: sprite_ids
                .into_iter()
                .map(|id| AnimationFrame {
                    sprite_id: id.into(),
                    duration_us: frame_us,
                })
                .collect(),
            looping,
        }
    }
}

/// Runtime state for one active animation instance.
#[derive(Debug, Clone)]
pub struct AnimationState {
    pub clip_name: String,
    pub frame_index: usize,
    pub elapsed_us: u64,
    pub finished: bool,
}

impl AnimationState {
    pub fn new(clip_name: &str) -> Self {
        Self {
            clip_name: clip_name.to_string(),
            frame_index: 0,
            elapsed_us: 0,
            finished: false,
        }
    }

    /// Advance the animation by `dt_us` microseconds and return the current
    /// frame's sprite id.
    pub fn tick<'a>(&mut self, dt_us: u64, clip: &'a AnimationClip) -> &'a str {
        if clip.frames.is_empty() || self.finished {
            return if let Some(frame) = clip.frames.get(self.frame_index) {
                &frame.sprite_id
            } else if let Some(frame) = clip.frames.last() {
                &frame.sprite_id
            } else {
                ""
            };
        }

        self.elapsed_us += dt_us;

        loop {
            let current_frame = &clip.frames[self.frame_index];
            if self.elapsed_us < current_frame.duration_us {
                break;
            }

            self.elapsed_us -= current_frame.duration_us;
            self.frame_index += 1;

            if self.frame_index >= clip.frames.len() {
                if clip.looping {
                    self.frame_index = 0;
                } else {
                    self.frame_index = clip.frames.len() - 1;
                    self.elapsed_us = 0;
                    self.finished = true;
                    break;
                }
            }
        }

        &clip.frames[self.frame_index].sprite_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_clip(durations_ms: &[u64], looping: bool) -> AnimationClip {
        AnimationClip {
            frames: durations_ms
                .iter()
                .enumerate()
                .map(|(i, &d)| AnimationFrame {
                    sprite_id: format!("sprite_{}", i),
                    duration_us: d * 1000,
                })
                .collect(),
            looping,
        }
    }

    #[test]
    fn tick_advances_through_frames() {
        let clip = make_clip(&[100, 100, 100], true);
        let mut state = AnimationState::new("run");

        assert_eq!(state.tick(0, &clip), "sprite_0");
        assert_eq!(state.tick(50_000, &clip), "sprite_0");
        assert_eq!(state.tick(60_000, &clip), "sprite_1");
    }

    #[test]
    fn looping_wraps_around() {
        let clip = make_clip(&[100, 100], true);
        let mut state = AnimationState::new("run");

        assert_eq!(state.tick(250_000, &clip), "sprite_0");
        assert!(!state.finished);
    }

    #[test]
    fn non_looping_stops_on_last_frame() {
        let clip = make_clip(&[100, 100], false);
        let mut state = AnimationState::new("jump");

        assert_eq!(state.tick(300_000, &clip), "sprite_1");
        assert!(state.finished);
        assert_eq!(state.tick(100_000, &clip), "sprite_1");
    }

    #[test]
    fn uniform_clip_steps_every_third_tick_at_sixty_hz() {
        let frame_us = 3 * 16_667;
        let clip = AnimationClip::uniform(["a", "b", "c"], frame_us, true);
        let mut state = AnimationState::new("run");

        let seen: Vec<&str> = (0..9).map(|_| state.tick(16_667, &clip)).collect();
        assert_eq!(seen, ["a", "a", "b", "b", "b", "c", "c", "c", "a"]);
    }

    #[test]
    fn empty_clip_yields_empty_id() {
        let clip = AnimationClip::uniform(Vec::<String>::new(), 1000, true);
        let mut state = AnimationState::new("none");
        assert_eq!(state.tick(5000, &clip), "");
    }
}
