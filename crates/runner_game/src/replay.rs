use crate::capabilities::TickInput;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Recorded per-tick input, stored run-length encoded.
#[derive(Debug, Deserialize, Clone)]
pub struct ReplaySequence {
    #[serde(default = "default_tick_rate")]
    pub tick_rate: u32,
    #[serde(default)]
    pub seed: u64,
    pub frames: Vec<ReplayFrame>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReplayFrame {
    #[serde(default)]
    pub jump: bool,
    #[serde(default)]
    pub jump_pressed: bool,
    #[serde(default)]
    pub descend: bool,
    #[serde(default = "default_repeat")]
    pub repeat: u32,
}

impl ReplaySequence {
    /// One `TickInput` per tick. A press only lands on the first tick of a
    /// repeated frame; the rest see the key as held.
    pub fn expanded_inputs(&self) -> Vec<TickInput> {
        let mut out = Vec::new();
        for frame in &self.frames {
            for i in 0..frame.repeat.max(1) {
                out.push(TickInput {
                    jump: frame.jump || frame.jump_pressed,
                    jump_pressed: frame.jump_pressed && i == 0,
                    descend: frame.descend,
                    quit: false,
                });
            }
        }
        out
    }
}

pub fn load_replay_from_path(path: &Path) -> Result<ReplaySequence, String> {
    let raw =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    let replay: ReplaySequence = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse replay JSON {}: {e}", path.display()))?;
    validate_replay(&replay)?;
    Ok(replay)
}

fn validate_replay(replay: &ReplaySequence) -> Result<(), String> {
    if replay.tick_rate == 0 {
        return Err("Replay validation failed: tick_rate must be > 0".to_string());
    }
    if replay.frames.is_empty() {
        return Err("Replay validation failed: frames list is empty".to_string());
    }
    Ok(())
}

const fn default_tick_rate() -> u32 {
    60
}

const fn default_repeat() -> u32 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::game::{Game, GameState};
    use crate::test_support::{ghost_sprite, solid_sprite, test_assets, FakeClock, RecordingAudio};
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_file_path(name_hint: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "runner_replay_test_{}_{}_{}.json",
            name_hint,
            std::process::id(),
            nanos
        ))
    }

    #[derive(Debug, PartialEq)]
    struct Snapshot {
        state: GameState,
        score: u32,
        character: (i32, i32),
        vy: f32,
        fall_frames: u32,
        obstacles: Vec<(i32, bool, bool)>,
        despawned: u64,
        sounds: Vec<String>,
        slept: usize,
    }

    fn run(replay: &ReplaySequence, obstacle_solid: bool) -> Snapshot {
        let config = GameConfig {
            tick_rate: replay.tick_rate,
            ..GameConfig::default()
        };
        let obstacle = if obstacle_solid {
            solid_sprite("obstacle", 16, 48)
        } else {
            ghost_sprite("obstacle", 16, 48)
        };
        let mut game = Game::new(config, test_assets(obstacle), replay.seed);
        let mut audio = RecordingAudio::default();
        let mut clock = FakeClock::default();
        for input in replay.expanded_inputs() {
            game.tick(&input, &mut audio, &mut clock);
        }
        let rect = game.character.body.rect();
        Snapshot {
            state: game.state,
            score: game.scoreboard.score(),
            character: (rect.x, rect.y),
            vy: game.character.vy,
            fall_frames: game.character.fall_frames,
            obstacles: game
                .obstacles
                .obstacles()
                .iter()
                .map(|o| (o.body.rect().x, o.seen, o.collided))
                .collect(),
            despawned: game.obstacles.despawned,
            sounds: audio.sounds,
            slept: clock.slept.len(),
        }
    }

    const JUMPY_REPLAY: &str = r#"{
      "seed": 42,
      "frames": [
        { "jump_pressed": true },
        { "repeat": 90 },
        { "jump": true, "repeat": 20 },
        { "repeat": 200 },
        { "descend": true, "repeat": 30 },
        { "jump": true, "repeat": 400 },
        { "jump_pressed": true },
        { "repeat": 600 }
      ]
    }"#;

    #[test]
    fn replay_file_parses_and_expands() {
        let path = temp_file_path("parse");
        fs::write(
            &path,
            r#"{
              "frames": [
                { "jump_pressed": true, "repeat": 3 },
                { "descend": true, "repeat": 2 }
              ]
            }"#,
        )
        .expect("write replay file");

        let replay = load_replay_from_path(&path).expect("replay should load");
        assert_eq!(replay.tick_rate, 60);
        assert_eq!(replay.seed, 0);
        let expanded = replay.expanded_inputs();
        assert_eq!(expanded.len(), 5);
        assert!(expanded[0].jump_pressed && expanded[0].jump);
        assert!(!expanded[1].jump_pressed && expanded[1].jump);
        assert!(expanded[4].descend && !expanded[4].jump);

        let _ = fs::remove_file(path);
    }

    #[test]
    fn empty_replay_is_rejected() {
        let path = temp_file_path("empty");
        fs::write(&path, r#"{ "frames": [] }"#).expect("write replay file");
        let err = load_replay_from_path(&path).expect_err("no frames");
        assert!(err.contains("frames list is empty"));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn replay_run_is_deterministic() {
        let path = temp_file_path("deterministic");
        fs::write(&path, JUMPY_REPLAY).expect("write replay file");
        let replay = load_replay_from_path(&path).expect("replay should load");

        let run_a = run(&replay, true);
        let run_b = run(&replay, true);
        assert_eq!(run_a, run_b);
        assert_ne!(run_a.state, GameState::Start);

        let _ = fs::remove_file(path);
    }

    #[test]
    fn seed_changes_the_obstacle_layout() {
        let mut replay: ReplaySequence =
            serde_json::from_str(JUMPY_REPLAY).expect("replay should parse");
        let first = run(&replay, false);
        replay.seed = 43;
        let second = run(&replay, false);

        assert_eq!(first.state, GameState::Playing);
        assert!(first.despawned > 0 && second.despawned > 0);
        assert_ne!(first.obstacles, second.obstacles);
    }
}
