//! Script model: the JSON input that drives a reel.

/// Script, scene and comedy-timing types plus JSON loading.
pub mod model;
