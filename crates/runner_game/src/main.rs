//! Endless runner: window, event loop and the fixed-tick game loop.
//!
//! winit drives the event loop via `ApplicationHandler`. All simulation runs
//! inside `RedrawRequested` using a fixed-timestep model (see `TimeState`):
//!
//!   1. `begin_frame()` -- measure wall-clock delta, feed accumulator
//!   2. `while should_step()` -- run whole game ticks
//!   3. Record the frame into a `DrawList` through `RenderSink`
//!   4. Paint the draw list and the optional debug overlay with egui
//!
//! Between frames the loop sleeps until the next tick is due.

mod assets;
mod audio;
mod capabilities;
mod collision;
mod config;
mod controller;
mod game;
mod obstacle;
#[cfg(test)]
mod replay;
mod score;
#[cfg(test)]
mod test_support;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use winit::application::ApplicationHandler;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use assets::{FileAssets, GameAssets};
use audio::{open_audio, SoundBank};
use capabilities::{AudioSink, RenderSink, SystemClock, TextAnchor, TickInput};
use collision::Sprite;
use config::{load_config_from_path, GameConfig};
use game::{Game, Transition};
use runner_core::input::{InputState, Key};
use runner_core::time::TimeState;
use runner_platform::window::PlatformConfig;
use runner_render::{DrawList, GpuContext, OverlayStats, ScenePainter};

const CONFIG_PATH: &str = "assets/config/game.json";

/// Records game draw calls into the frame's draw list.
struct SceneSink<'a> {
    list: &'a mut DrawList,
    font_size: f32,
}

impl RenderSink for SceneSink<'_> {
    fn draw_sprite(&mut self, sprite: &Sprite, x: i32, y: i32) {
        self.list.push_sprite(
            sprite.shared_key(),
            x as f32,
            y as f32,
            sprite.width() as f32,
            sprite.height() as f32,
        );
    }

    fn draw_text(&mut self, text: &str, x: i32, y: i32, anchor: TextAnchor) {
        self.list
            .push_text(text, x as f32, y as f32, anchor, self.font_size);
    }
}

struct GameSession {
    window: Arc<Window>,
    gpu: GpuContext,
    painter: ScenePainter,
    time: TimeState,
    input: InputState,
    game: Game,
    audio: Box<dyn AudioSink>,
    clock: SystemClock,
    draw_list: DrawList,
    seed: u64,
}

impl GameSession {
    fn new(window: Arc<Window>, config: &GameConfig) -> Self {
        let gpu = GpuContext::new(window.clone())
            .unwrap_or_else(|err| panic!("Failed to initialise GPU: {}", err));
        let mut painter = ScenePainter::new(&gpu.device, gpu.surface_format, &window);

        let asset_root = PathBuf::from(&config.asset_root);
        let assets = GameAssets::load(&FileAssets::new(&asset_root)).unwrap_or_else(|err| {
            panic!(
                "Failed to load game assets from '{}': {}",
                asset_root.display(),
                err
            );
        });
        for sprite in assets.all_sprites() {
            painter.register_texture(sprite.key(), sprite.image());
        }
        log::info!("Registered {} textures", painter.texture_count());

        let bank = SoundBank::load(&asset_root, &config.sound_names()).unwrap_or_else(|err| {
            panic!(
                "Failed to load sounds from '{}': {}",
                asset_root.display(),
                err
            );
        });
        let mut audio = open_audio(bank, &asset_root);

        let seed = config.seed.unwrap_or_else(seed_from_clock);
        log::info!("RNG seed: {}", seed);

        let game = Game::new(config.clone(), assets, seed);
        game.start_lobby(audio.as_mut());

        Self {
            window,
            gpu,
            painter,
            time: TimeState::new(config.tick_rate),
            input: InputState::new(),
            game,
            audio,
            clock: SystemClock,
            draw_list: DrawList::new(),
            seed,
        }
    }

    /// Run every tick that is due. Returns false when the player quit.
    fn run_ticks(&mut self) -> bool {
        self.time.begin_frame();
        let mut tick = TickInput::from_input_state(&self.input);
        while self.time.should_step() {
            if tick.quit {
                return false;
            }
            let transition = self
                .game
                .tick(&tick, self.audio.as_mut(), &mut self.clock);
            // A press drives one tick only, however many run this frame.
            tick.jump_pressed = false;
            if transition == Some(Transition::Restarted) {
                self.time.resync();
                break;
            }
        }

        // Only clear edge-triggered input after at least one fixed step
        // consumed it. Otherwise a press on a frame with 0 steps is lost.
        if self.time.steps_this_frame > 0 {
            self.input.end_frame();
        }
        true
    }

    fn overlay_stats(&self) -> OverlayStats {
        OverlayStats {
            state_label: self.game.state.label().to_string(),
            score: self.game.scoreboard.score(),
            obstacle_speed: self.game.obstacles.current_speed(),
            obstacle_count: self.game.obstacles.len(),
            despawned: self.game.obstacles.despawned,
            sprite_count: self.draw_list.sprite_count(),
            seed: self.seed,
        }
    }

    fn render(&mut self) {
        self.draw_list.clear();
        self.game.draw(&mut SceneSink {
            list: &mut self.draw_list,
            font_size: self.game.config.font_size,
        });

        let Some((output, view)) = self.gpu.begin_frame() else {
            return;
        };

        let stats = self.overlay_stats();
        let (primitives, textures_delta) =
            self.painter
                .prepare(&self.window, &self.draw_list, &self.time, Some(&stats));
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.gpu.size.0, self.gpu.size.1],
            pixels_per_point: self.window.scale_factor() as f32,
        };

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        // Clear pass; everything visible is drawn by egui on top.
        {
            let _clear_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Clear Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                ..Default::default()
            });
        }

        self.painter.upload(
            &self.gpu.device,
            &self.gpu.queue,
            &mut encoder,
            &primitives,
            &textures_delta,
            &screen_descriptor,
        );

        {
            let mut egui_pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui Render Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();

            self.painter
                .paint(&mut egui_pass, &primitives, &screen_descriptor);
        }

        self.painter.cleanup(&textures_delta);

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
    }
}

struct App {
    config: GameConfig,
    platform: PlatformConfig,
    session: Option<GameSession>,
}

impl App {
    fn new(config: GameConfig) -> Self {
        let platform = PlatformConfig {
            width: config.screen_width as u32,
            height: config.screen_height as u32,
            ..PlatformConfig::default()
        };
        Self {
            config,
            platform,
            session: None,
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.session.is_some() {
            return;
        }
        let window = runner_platform::window::create_window(event_loop, &self.platform)
            .unwrap_or_else(|err| panic!("{}", err));
        self.session = Some(GameSession::new(window, &self.config));
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(session) = &self.session {
            let deadline = session.time.next_step_deadline();
            if Instant::now() >= deadline {
                session.window.request_redraw();
            } else {
                event_loop.set_control_flow(ControlFlow::WaitUntil(deadline));
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let session = match self.session.as_mut() {
            Some(s) => s,
            None => return,
        };

        let egui_consumed = session.painter.handle_window_event(&session.window, &event);

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting.");
                event_loop.exit();
            }

            WindowEvent::Resized(physical_size) => {
                let w = physical_size.width;
                let h = physical_size.height;
                if w > 0 && h > 0 {
                    session.gpu.resize(w, h);
                    log::info!("Resized to {}x{}", w, h);
                }
            }

            WindowEvent::Focused(focused) => on_focus_changed(&mut session.input, focused),

            WindowEvent::KeyboardInput { event, .. } if !egui_consumed => {
                if let PhysicalKey::Code(key_code) = event.physical_key {
                    if let Some(game_key) = map_key(key_code) {
                        match event.state {
                            ElementState::Pressed => {
                                if game_key == Key::F3 && !event.repeat {
                                    session.painter.toggle_overlay();
                                }
                                session.input.key_down(game_key);
                            }
                            ElementState::Released => session.input.key_up(game_key),
                        }
                    }
                }
            }

            WindowEvent::RedrawRequested => {
                if session.gpu.size.0 == 0 || session.gpu.size.1 == 0 {
                    return;
                }
                if !session.run_ticks() {
                    log::info!("Escape pressed, exiting.");
                    event_loop.exit();
                    return;
                }
                session.render();
            }

            _ => {}
        }
    }
}

/// Key-up events may never arrive while unfocused, so drop every held key.
fn on_focus_changed(input: &mut InputState, focused: bool) {
    if !focused {
        log::debug!("Window lost focus, releasing held keys");
        input.clear();
    }
}

fn map_key(key_code: KeyCode) -> Option<Key> {
    match key_code {
        KeyCode::Space => Some(Key::Space),
        KeyCode::ArrowUp => Some(Key::Up),
        KeyCode::ArrowDown => Some(Key::Down),
        KeyCode::Escape => Some(Key::Escape),
        KeyCode::F3 => Some(Key::F3),
        _ => None,
    }
}

fn seed_from_clock() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

fn load_config(path: &Path) -> GameConfig {
    if !path.exists() {
        log::info!("No config at '{}', using defaults", path.display());
        return GameConfig::default();
    }
    let config = load_config_from_path(path).unwrap_or_else(|err| panic!("{}", err));
    log::info!("Loaded config from '{}'", path.display());
    config
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Endless Runner starting...");

    let config = load_config(Path::new(CONFIG_PATH));

    let event_loop = EventLoop::new().expect("Failed to create event loop");

    let mut app = App::new(config);
    event_loop.run_app(&mut app).expect("Event loop error");
}
