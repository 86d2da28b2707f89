//! Scene and debug overlay rendering through egui.
//!
//! Every frame the game's `DrawList` is replayed onto egui's background layer
//! (textured quads for sprites, egui fonts for text). The optional debug
//! window is drawn in the same egui pass on top.
//!
//! egui needs a three-phase render split because
//! `egui_wgpu::Renderer::render()` wants a `RenderPass<'static>` while
//! `begin_render_pass` borrows the encoder:
//!
//!   1. `prepare()` -- run egui, produce tessellated primitives
//!   2. `upload()`  -- upload textures and update GPU buffers
//!   3. `paint()`   -- render into a pass created with `forget_lifetime()`
//!   4. `cleanup()` -- free textures egui no longer references

use std::collections::HashMap;
use std::sync::Arc;

use image::RgbaImage;
use runner_core::time::TimeState;
use winit::window::Window;

use crate::draw_list::{DrawCommand, DrawList};

const TEXT_COLOR: egui::Color32 = egui::Color32::BLACK;

#[derive(Debug, Clone, Default)]
pub struct OverlayStats {
    /// Current game state label (e.g. "playing")
    pub state_label: String,
    pub score: u32,
    /// Leftward obstacle speed in pixels per tick
    pub obstacle_speed: f32,
    pub obstacle_count: usize,
    /// Obstacles culled since the last reset.
    pub despawned: u64,
    pub sprite_count: usize,
    pub seed: u64,
}

pub struct ScenePainter {
    pub egui_ctx: egui::Context,
    pub egui_winit_state: egui_winit::State,
    pub egui_renderer: egui_wgpu::Renderer,
    textures: HashMap<Arc<str>, egui::TextureHandle>,
    pub overlay_visible: bool,
}

impl ScenePainter {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        window: &Window,
    ) -> Self {
        let egui_ctx = egui::Context::default();
        let egui_winit_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui_ctx.viewport_id(),
            window,
            None,
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(device, surface_format, None, 1, false);

        Self {
            egui_ctx,
            egui_winit_state,
            egui_renderer,
            textures: HashMap::new(),
            overlay_visible: false,
        }
    }

    pub fn handle_window_event(
        &mut self,
        window: &Window,
        event: &winit::event::WindowEvent,
    ) -> bool {
        let response = self.egui_winit_state.on_window_event(window, event);
        response.consumed
    }

    pub fn toggle_overlay(&mut self) {
        self.overlay_visible = !self.overlay_visible;
        log::info!(
            "Debug overlay: {}",
            if self.overlay_visible { "ON" } else { "OFF" }
        );
    }

    /// Make an image drawable under `key`. Registering the same key twice
    /// replaces the previous texture.
    pub fn register_texture(&mut self, key: &str, image: &RgbaImage) {
        let size = [image.width() as usize, image.height() as usize];
        let color_image = egui::ColorImage::from_rgba_unmultiplied(size, image.as_raw());
        let handle = self
            .egui_ctx
            .load_texture(key, color_image, egui::TextureOptions::NEAREST);
        self.textures.insert(Arc::from(key), handle);
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    pub fn prepare(
        &mut self,
        window: &Window,
        scene: &DrawList,
        time: &TimeState,
        stats: Option<&OverlayStats>,
    ) -> (Vec<egui::ClippedPrimitive>, egui::TexturesDelta) {
        let raw_input = self.egui_winit_state.take_egui_input(window);
        let textures = &self.textures;
        let overlay_visible = self.overlay_visible;
        let full_uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));

        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            let painter = ctx.layer_painter(egui::LayerId::background());
            for command in scene.commands() {
                match command {
                    DrawCommand::Sprite {
                        texture_key,
                        x,
                        y,
                        width,
                        height,
                    } => {
                        let Some(texture) = textures.get(texture_key) else {
                            log::debug!("No texture registered for '{}'", texture_key);
                            continue;
                        };
                        let rect = egui::Rect::from_min_size(
                            egui::pos2(*x, *y),
                            egui::vec2(*width, *height),
                        );
                        painter.image(texture.id(), rect, full_uv, egui::Color32::WHITE);
                    }
                    DrawCommand::Text {
                        text,
                        x,
                        y,
                        anchor,
                        size,
                    } => {
                        painter.text(
                            egui::pos2(*x, *y),
                            anchor.align(),
                            text,
                            egui::FontId::proportional(*size),
                            TEXT_COLOR,
                        );
                    }
                }
            }

            if overlay_visible {
                egui::Window::new("Debug")
                    .default_pos([10.0, 10.0])
                    .show(ctx, |ui| {
                        ui.label(format!("FPS: {:.1}", time.smoothed_fps));
                        ui.label(format!("Frame time: {:.2} ms", time.smoothed_frame_time_ms));
                        ui.label(format!("Steps this frame: {}", time.steps_this_frame));
                        ui.label(format!("Total steps: {}", time.fixed_step_count));
                        ui.label(format!("Frames: {}", time.frame_count));
                        ui.label(format!("Sim time: {:.1} s", time.total_time));
                        if let Some(stats) = stats {
                            ui.separator();
                            ui.label(format!("State: {}", stats.state_label));
                            ui.label(format!("Score: {}", stats.score));
                            ui.label(format!("Obstacle speed: {:.2} px/tick", stats.obstacle_speed));
                            ui.label(format!("Obstacles: {}", stats.obstacle_count));
                            ui.label(format!("Despawned: {}", stats.despawned));
                            ui.label(format!("Sprites: {}", stats.sprite_count));
                            ui.label(format!("Seed: {}", stats.seed));
                        }
                    });
            }
        });

        self.egui_winit_state
            .handle_platform_output(window, full_output.platform_output);

        let primitives = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        (primitives, full_output.textures_delta)
    }

    /// Upload textures and update buffers. Call before creating the egui render pass.
    pub fn upload(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        primitives: &[egui::ClippedPrimitive],
        textures_delta: &egui::TexturesDelta,
        screen_descriptor: &egui_wgpu::ScreenDescriptor,
    ) {
        for (id, image_delta) in &textures_delta.set {
            self.egui_renderer
                .update_texture(device, queue, *id, image_delta);
        }

        self.egui_renderer
            .update_buffers(device, queue, encoder, primitives, screen_descriptor);
    }

    /// Render into an existing render pass. Call after `upload()`.
    pub fn paint(
        &self,
        render_pass: &mut wgpu::RenderPass<'static>,
        primitives: &[egui::ClippedPrimitive],
        screen_descriptor: &egui_wgpu::ScreenDescriptor,
    ) {
        self.egui_renderer
            .render(render_pass, primitives, screen_descriptor);
    }

    /// Free textures that egui no longer needs. Call after rendering.
    pub fn cleanup(&mut self, textures_delta: &egui::TexturesDelta) {
        for id in &textures_delta.free {
            self.egui_renderer.free_texture(id);
        }
    }
}
