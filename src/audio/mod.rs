/// Sequence-wide audio plan in sample space.
pub mod manifest;
/// PCM mixing of planned segments.
pub mod mix;
/// Per-scene track placement.
pub mod timeline;
