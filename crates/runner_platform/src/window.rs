use std::sync::Arc;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Window, WindowAttributes};

pub struct PlatformConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub resizable: bool,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            title: "Endless Runner".to_string(),
            width: 960,
            height: 540,
            resizable: false,
        }
    }
}

/// The game draws in logical pixels, so the window is sized in logical units
/// and stays fixed unless the config says otherwise.
pub fn create_window(
    event_loop: &ActiveEventLoop,
    config: &PlatformConfig,
) -> Result<Arc<Window>, String> {
    let attrs = WindowAttributes::default()
        .with_title(&config.title)
        .with_resizable(config.resizable)
        .with_inner_size(winit::dpi::LogicalSize::new(config.width, config.height));

    let window = event_loop
        .create_window(attrs)
        .map_err(|e| format!("Failed to create window '{}': {e}", config.title))?;
    log::info!(
        "Window '{}' created at {}x{} (scale {:.2})",
        config.title,
        config.width,
        config.height,
        window.scale_factor()
    );
    Ok(Arc::new(window))
}
