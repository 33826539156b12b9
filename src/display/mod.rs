mod pixel_buffer;
#[cfg(feature = "window")]
mod window;

pub use pixel_buffer::{BlendMode, PixelBuffer};
#[cfg(feature = "window")]
pub use window::{Display, InputEvent, MouseButtonKind, RenderTarget};

/// Internal low-resolution render target
pub const DEFAULT_RENDER_WIDTH: u32 = 150;
pub const DEFAULT_RENDER_HEIGHT: u32 = 150;

/// On-screen size the render target is scaled up to
pub const DEFAULT_WINDOW_WIDTH: u32 = 450;
pub const DEFAULT_WINDOW_HEIGHT: u32 = 450;
