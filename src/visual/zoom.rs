use crate::foundation::core::{Affine, Canvas};
use crate::foundation::error::{ReelError, ReelResult};
use crate::script::model::ZoomStyle;

/// Scale held after the voice line ends in [`ZoomStyle::Snap`] scenes.
pub const SNAP_ZOOM: f64 = 1.15;

/// Extra scale reached at the end of a slow push-in.
pub const PUSH_IN_GAIN: f64 = 0.04;

/// Background scale as a function of scene time.
///
/// Evaluated for every output frame; never cached as a constant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoomCurve {
    style: ZoomStyle,
    voice_duration: f64,
    total_duration: f64,
}

impl ZoomCurve {
    /// Curve for a scene whose voice ends at `voice_duration` and which lasts `total_duration`.
    pub fn new(style: ZoomStyle, voice_duration: f64, total_duration: f64) -> ReelResult<Self> {
        if !total_duration.is_finite() || total_duration <= 0.0 {
            return Err(ReelError::composition(format!(
                "scene duration must be finite and > 0, got {total_duration}"
            )));
        }
        if !voice_duration.is_finite() || voice_duration < 0.0 {
            return Err(ReelError::composition(format!(
                "voice duration must be finite and >= 0, got {voice_duration}"
            )));
        }
        Ok(Self {
            style,
            voice_duration,
            total_duration,
        })
    }

    /// Zoom style driving this curve.
    pub fn style(&self) -> ZoomStyle {
        self.style
    }

    /// Scale factor at scene time `t` (seconds).
    ///
    /// Snap scenes hold 1.0 while the voice plays and jump to [`SNAP_ZOOM`] strictly after it
    /// ends; every other scene pushes in linearly from 1.0 to `1.0 + PUSH_IN_GAIN`.
    pub fn scale_at(&self, t: f64) -> f64 {
        match self.style {
            ZoomStyle::Snap if t > self.voice_duration => SNAP_ZOOM,
            ZoomStyle::Snap => 1.0,
            ZoomStyle::None => 1.0 + PUSH_IN_GAIN * t / self.total_duration,
        }
    }

    /// Transform that scales the canvas-sized background about the canvas center.
    pub fn transform_at(&self, t: f64, canvas: Canvas) -> Affine {
        let c = canvas.center();
        Affine::translate(c) * Affine::scale(self.scale_at(t)) * Affine::translate(-c)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/visual/zoom.rs"]
mod tests;
