use crate::capabilities::AudioSink;
use crate::collision::Body;
use crate::obstacle::Obstacle;

/// Obstacles dodged this run. The display text is rebuilt on every change,
/// so a draw never sees a stale count.
#[derive(Debug, Clone)]
pub struct Scoreboard {
    score: u32,
    text: String,
    pub x: i32,
    pub y: i32,
    point_interval: u32,
}

impl Scoreboard {
    pub fn new(x: i32, y: i32, point_interval: u32) -> Self {
        Self {
            score: 0,
            text: display_text(0),
            x,
            y,
            point_interval: point_interval.max(1),
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Count `obstacle` once its right edge is left of the character's left
    /// edge. Returns true when the score went up.
    pub fn on_obstacle_pass(
        &mut self,
        obstacle: &mut Obstacle,
        character: &Body,
        audio: &mut dyn AudioSink,
        point_sound: &str,
    ) -> bool {
        if obstacle.seen || obstacle.body.rect().right() >= character.rect().x {
            return false;
        }
        obstacle.seen = true;
        self.score += 1;
        self.text = display_text(self.score);
        if self.score % self.point_interval == 0 {
            log::info!("Score milestone: {}", self.score);
            audio.play_sound(point_sound);
        }
        true
    }

    pub fn reset(&mut self) {
        self.score = 0;
        self.text = display_text(0);
    }
}

fn display_text(score: u32) -> String {
    format!("Dodged: {score}")
}
