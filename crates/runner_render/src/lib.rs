pub mod draw_list;
pub mod gpu_context;
pub mod painter;

pub use draw_list::{DrawCommand, DrawList, TextAnchor};
pub use gpu_context::GpuContext;
pub use painter::{OverlayStats, ScenePainter};
