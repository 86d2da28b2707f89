//! Per-frame list of screen-space draw commands.
//!
//! The game fills a `DrawList` in painter's order (first command is drawn
//! first); `ScenePainter` replays it into egui shapes. Coordinates are
//! logical pixels with the origin at the top-left of the window.

use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAnchor {
    #[default]
    TopLeft,
    Center,
}

impl TextAnchor {
    pub fn align(self) -> egui::Align2 {
        match self {
            Self::TopLeft => egui::Align2::LEFT_TOP,
            Self::Center => egui::Align2::CENTER_CENTER,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Sprite {
        texture_key: Arc<str>,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
    Text {
        text: String,
        x: f32,
        y: f32,
        anchor: TextAnchor,
        size: f32,
    },
}

#[derive(Debug, Clone, Default)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_sprite(&mut self, texture_key: Arc<str>, x: f32, y: f32, width: f32, height: f32) {
        self.commands.push(DrawCommand::Sprite {
            texture_key,
            x,
            y,
            width,
            height,
        });
    }

    pub fn push_text(&mut self, text: impl Into<String>, x: f32, y: f32, anchor: TextAnchor, size: f32) {
        self.commands.push(DrawCommand::Text {
            text: text.into(),
            x,
            y,
            anchor,
            size,
        });
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Sprites drawn this frame, shown in the debug overlay.
    pub fn sprite_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Sprite { .. }))
            .count()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }
}
