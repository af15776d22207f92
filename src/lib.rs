//! reelsmith composes short vertical comedy reels from a scene script.
//!
//! Each scene's voice line, optional sound effect and laugh stinger are laid out on an audio
//! timeline; the timeline length drives a zooming, captioned background; scenes are concatenated
//! in script order and encoded to a 1080x1920, 24 fps H.264 MP4 through the system `ffmpeg`.
//!
//! - Load a [`Script`]
//! - Acquire per-scene media with [`providers::acquire_media`] (or reuse files on disk)
//! - Assemble and render with a [`Sequencer`] into a [`FrameSink`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Media handles, sound-effect lookup and image decoding.
pub mod assets;
/// Per-scene audio timelines and the reel soundtrack.
pub mod audio;
/// Caption styling and rasterization.
pub mod caption;
/// Frame sinks and the `ffmpeg` encoder.
pub mod encode;
/// Voice and image providers.
pub mod providers;
/// CPU frame rasterization.
pub mod render;
/// Scene assembly.
pub mod scene;
/// Script model.
pub mod script;
/// Scene concatenation and output.
pub mod sequence;
/// Background cover-fit and zoom.
pub mod visual;
/// Working-directory layout.
pub mod workspace;

pub use crate::foundation::core::{
    Affine, Canvas, Fps, FrameIndex, FrameRange, OUTPUT_CANVAS, OUTPUT_FPS, Vec2,
};
pub use crate::foundation::error::{ReelError, ReelResult};

pub use crate::assets::locator::SfxLibrary;
pub use crate::assets::media::{AudioAsset, ImageAsset};
pub use crate::audio::timeline::{AuxAudioSource, NoAuxAudio, Timeline, compose_timeline};
pub use crate::caption::{CaptionRenderer, CaptionSpec, CaptionStyle, select_caption};
pub use crate::encode::ffmpeg::{EncodeOpts, FfmpegSink};
pub use crate::encode::sink::{AudioInputConfig, FrameSink, InMemorySink, SinkConfig};
pub use crate::render::cpu::FrameRGBA;
pub use crate::scene::{SceneUnit, assemble_scene};
pub use crate::script::model::{ComedyMeta, Scene, Script, ZoomStyle};
pub use crate::sequence::{RenderConfig, RenderSummary, SceneMedia, Sequencer};
pub use crate::visual::zoom::ZoomCurve;
pub use crate::workspace::Workspace;
