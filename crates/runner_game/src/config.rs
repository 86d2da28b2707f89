//! Game tuning loaded from JSON. Every field has a default, so a partial file
//! (or no file at all) yields the stock 960x540 arcade setup.

use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct CharacterConfig {
    pub gravity: f32,
    /// Jump impulse is `-gravity * jump_multiplier`.
    pub jump_multiplier: f32,
    /// Upper bound on velocity added by gravity in a single tick.
    pub max_gravity_step: f32,
    pub descend_boost: f32,
    pub run_speed: f32,
    pub animation_delay_ticks: u32,
}

impl Default for CharacterConfig {
    fn default() -> Self {
        Self {
            gravity: 1.0,
            jump_multiplier: 6.0,
            max_gravity_step: 1.0,
            descend_boost: 1.25,
            run_speed: 0.0,
            animation_delay_ticks: 3,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    pub screen_width: i32,
    pub screen_height: i32,
    pub tick_rate: u32,
    pub ground_block_size: i32,
    pub player_start_x: i32,
    pub player_start_y: i32,
    pub obstacle_min_gap: i32,
    pub obstacle_max_gap: i32,
    pub obstacle_count: usize,
    /// Obstacles whose right edge drops below this x are replaced.
    pub obstacle_cull_x: i32,
    /// Scoreboard sits this many pixels left of the right screen edge.
    pub scoreboard_right_margin: i32,
    pub scoreboard_y: i32,
    pub font_size: f32,
    pub point_interval: u32,
    pub game_over_pause_ms: u64,
    pub lobby_music: String,
    pub lobby_music_volume: f32,
    pub jump_sound: String,
    pub die_sound: String,
    pub point_sound: String,
    pub asset_root: String,
    pub seed: Option<u64>,
    pub character: CharacterConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            screen_width: 960,
            screen_height: 540,
            tick_rate: 60,
            ground_block_size: 96,
            player_start_x: 100,
            player_start_y: 200,
            obstacle_min_gap: 250,
            obstacle_max_gap: 500,
            obstacle_count: 2,
            obstacle_cull_x: -100,
            scoreboard_right_margin: 200,
            scoreboard_y: 35,
            font_size: 20.0,
            point_interval: 10,
            game_over_pause_ms: 500,
            lobby_music: "runner_game_music".to_string(),
            lobby_music_volume: 0.1,
            jump_sound: "jump.wav".to_string(),
            die_sound: "die.wav".to_string(),
            point_sound: "point.wav".to_string(),
            asset_root: "assets".to_string(),
            seed: None,
            character: CharacterConfig::default(),
        }
    }
}

impl GameConfig {
    /// Top edge of the ground row; obstacles rest on it.
    pub fn ground_y(&self) -> i32 {
        self.screen_height - self.ground_block_size
    }

    pub fn scoreboard_position(&self) -> (i32, i32) {
        (
            self.screen_width - self.scoreboard_right_margin,
            self.scoreboard_y,
        )
    }

    /// Length of one fixed tick in whole microseconds.
    pub fn tick_us(&self) -> u64 {
        (1_000_000.0 / f64::from(self.tick_rate.max(1))).round() as u64
    }

    pub fn sound_names(&self) -> [&str; 3] {
        [
            self.jump_sound.as_str(),
            self.die_sound.as_str(),
            self.point_sound.as_str(),
        ]
    }
}

pub fn load_config_from_path(path: &Path) -> Result<GameConfig, String> {
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config file {}: {e}", path.display()))?;
    let config: GameConfig = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse config JSON {}: {e}", path.display()))?;
    validate_config(&config)?;
    Ok(config)
}

pub fn validate_config(config: &GameConfig) -> Result<(), String> {
    if config.screen_width <= 0 || config.screen_height <= 0 {
        return Err(format!(
            "Config validation failed: screen size {}x{} must be positive",
            config.screen_width, config.screen_height
        ));
    }
    if config.tick_rate == 0 {
        return Err("Config validation failed: tick_rate must be > 0".to_string());
    }
    if config.ground_block_size <= 0 || config.ground_block_size >= config.screen_height {
        return Err(format!(
            "Config validation failed: ground_block_size {} must be in 1..{}",
            config.ground_block_size, config.screen_height
        ));
    }
    if config.obstacle_min_gap < 0 || config.obstacle_min_gap > config.obstacle_max_gap {
        return Err(format!(
            "Config validation failed: obstacle gap range [{}, {}] is invalid",
            config.obstacle_min_gap, config.obstacle_max_gap
        ));
    }
    if config.obstacle_count == 0 {
        return Err("Config validation failed: obstacle_count must be >= 1".to_string());
    }
    if config.point_interval == 0 {
        return Err("Config validation failed: point_interval must be >= 1".to_string());
    }
    if config.character.animation_delay_ticks == 0 {
        return Err(
            "Config validation failed: character.animation_delay_ticks must be >= 1".to_string(),
        );
    }
    if !(0.0..=1.0).contains(&config.lobby_music_volume) {
        return Err(format!(
            "Config validation failed: lobby_music_volume {} must be within 0..=1",
            config.lobby_music_volume
        ));
    }
    Ok(())
}
