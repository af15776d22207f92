//! Encoding sinks.
//!
//! Sinks consume rendered frames in output order; the sequencer drives them.

/// `ffmpeg`-based MP4 sink.
pub mod ffmpeg;
/// Frame sink trait and the in-memory sink.
pub mod sink;

pub use ffmpeg::{EncodeOpts, FfmpegSink, is_ffmpeg_on_path};
pub use sink::{AudioInputConfig, FrameSink, InMemorySink, SinkConfig};
