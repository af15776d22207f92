/// Image decoding into premultiplied RGBA8.
pub mod decode;
/// Sound-effect library lookup by file-name prefix.
pub mod locator;
/// Audio/image asset handles and `ffprobe`/`ffmpeg` helpers.
pub mod media;
