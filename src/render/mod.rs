//! CPU frame rasterization.

/// vello_cpu frame and caption rasterizers.
pub mod cpu;

pub use cpu::{BackgroundPaint, FrameRGBA, FrameRenderer};
