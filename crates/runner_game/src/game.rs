//! Game state machine: Start -> Playing -> GameOver -> Playing.
//!
//! `Game::tick` is one fixed 60 Hz step. While playing it runs, in order:
//! collision check on last tick's positions, scoring, obstacle cull/spawn,
//! obstacle motion, the character loop, and a second collision check on the
//! new positions. Game over freezes everything until jump is pressed again.

use std::time::Duration;

use crate::assets::GameAssets;
use crate::capabilities::{AudioSink, Clock, RenderSink, TextAnchor, TickInput};
use crate::collision::Sprite;
use crate::config::GameConfig;
use crate::controller::Character;
use crate::obstacle::{speed_for_score, tile_ground, GroundSegment, ObstacleField};
use crate::score::Scoreboard;

const START_PROMPT: &str = "Press Space to Start";
const PLAY_AGAIN_PROMPT: &str = "Press the Spacebar to play again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Start,
    Playing,
    GameOver,
}

impl GameState {
    pub fn label(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Playing => "playing",
            Self::GameOver => "game over",
        }
    }
}

/// State change produced by a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Started,
    Crashed,
    /// Restart after the blocking game-over pause; the caller should resync
    /// its frame clock.
    Restarted,
}

pub struct Game {
    pub config: GameConfig,
    pub state: GameState,
    pub character: Character,
    pub obstacles: ObstacleField,
    pub ground: Vec<GroundSegment>,
    pub scoreboard: Scoreboard,
    background: Sprite,
    spacebar: Sprite,
}

impl Game {
    pub fn new(config: GameConfig, assets: GameAssets, seed: u64) -> Self {
        let ground = tile_ground(&assets.ground, &config);
        let obstacles = ObstacleField::new(&config, assets.obstacle, seed);
        let character = Character::new(&config, assets.character);
        let (score_x, score_y) = config.scoreboard_position();
        let scoreboard = Scoreboard::new(score_x, score_y, config.point_interval);
        log::info!(
            "Game ready: {}x{} screen, {} ground tiles, {} obstacles, seed {}",
            config.screen_width,
            config.screen_height,
            ground.len(),
            obstacles.len(),
            seed
        );
        Self {
            config,
            state: GameState::Start,
            character,
            obstacles,
            ground,
            scoreboard,
            background: assets.background,
            spacebar: assets.spacebar,
        }
    }

    /// Loop the lobby track until the first jump.
    pub fn start_lobby(&self, audio: &mut dyn AudioSink) {
        audio.play_music(&self.config.lobby_music, -1, self.config.lobby_music_volume);
    }

    pub fn tick(
        &mut self,
        input: &TickInput,
        audio: &mut dyn AudioSink,
        clock: &mut dyn Clock,
    ) -> Option<Transition> {
        let mut transition = None;
        match self.state {
            GameState::Start => {
                if !input.jump_pressed {
                    return None;
                }
                audio.stop_music();
                self.set_state(GameState::Playing);
                transition = Some(Transition::Started);
            }
            GameState::GameOver => {
                if !input.jump_pressed {
                    return None;
                }
                let started = clock.now();
                clock.sleep(Duration::from_millis(self.config.game_over_pause_ms));
                log::debug!("Game over pause took {:?}", clock.now() - started);
                self.reset();
                self.set_state(GameState::Playing);
                return Some(Transition::Restarted);
            }
            GameState::Playing => {
                if self.check_crash(audio) {
                    return Some(Transition::Crashed);
                }
            }
        }

        self.step_playing(input, audio);
        if self.check_crash(audio) {
            return Some(Transition::Crashed);
        }
        transition
    }

    fn step_playing(&mut self, input: &TickInput, audio: &mut dyn AudioSink) {
        for obstacle in self.obstacles.obstacles_mut() {
            self.scoreboard.on_obstacle_pass(
                obstacle,
                &self.character.body,
                audio,
                &self.config.point_sound,
            );
        }
        self.obstacles.cull_and_spawn();
        self.obstacles.advance(speed_for_score(self.scoreboard.score()));
        self.character.tick(
            input,
            self.ground.iter().map(|g| &g.body),
            audio,
            &self.config.jump_sound,
        );
    }

    /// Every obstacle is checked so each one latches; the transition happens
    /// once no matter how many report a hit.
    fn check_crash(&mut self, audio: &mut dyn AudioSink) -> bool {
        if !self.obstacles.check_collisions(&self.character.body) {
            return false;
        }
        if self.state != GameState::Playing {
            return false;
        }
        audio.play_sound(&self.config.die_sound);
        self.set_state(GameState::GameOver);
        log::info!("Crashed with score {}", self.scoreboard.score());
        true
    }

    /// Character to the start, score to zero, fresh obstacles. Leaves the
    /// state alone.
    pub fn reset(&mut self) {
        self.character.reset();
        self.scoreboard.reset();
        self.obstacles.reset();
        log::info!("Game reset");
    }

    fn set_state(&mut self, next: GameState) {
        if self.state != next {
            log::info!("Game state: {} -> {}", self.state.label(), next.label());
            self.state = next;
        }
    }

    pub fn draw(&self, sink: &mut dyn RenderSink) {
        let width = self.config.screen_width;
        let height = self.config.screen_height;

        let tile_width = self.background.width().max(1);
        let tiles = (width + tile_width - 1) / tile_width + 1;
        for i in 0..tiles {
            sink.draw_sprite(&self.background, i * tile_width, 0);
        }

        for segment in &self.ground {
            let rect = segment.body.rect();
            sink.draw_sprite(segment.body.sprite(), rect.x, rect.y);
        }

        if self.state == GameState::Start {
            sink.draw_text(START_PROMPT, width / 2, height / 2 - 140, TextAnchor::Center);
            sink.draw_sprite(
                &self.spacebar,
                width / 2 - self.spacebar.width() / 2,
                height / 2 - 50 - self.spacebar.height() / 2,
            );
            return;
        }

        let rect = self.character.body.rect();
        sink.draw_sprite(self.character.body.sprite(), rect.x, rect.y);
        sink.draw_text(
            self.scoreboard.text(),
            self.scoreboard.x,
            self.scoreboard.y,
            TextAnchor::TopLeft,
        );
        for obstacle in self.obstacles.obstacles() {
            let rect = obstacle.body.rect();
            sink.draw_sprite(obstacle.body.sprite(), rect.x, rect.y);
        }

        if self.state == GameState::GameOver {
            let final_score = format!("You Scored: {}", self.scoreboard.score());
            sink.draw_text(&final_score, width / 2, height / 2 - 60, TextAnchor::Center);
            sink.draw_text(PLAY_AGAIN_PROMPT, width / 2, height / 2, TextAnchor::Center);
        }
    }
}
