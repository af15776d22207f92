//! Background normalization and the time-varying zoom applied to it.

/// Cover-fit of arbitrary images onto the output canvas.
pub mod cover;
/// Per-frame zoom factor.
pub mod zoom;
