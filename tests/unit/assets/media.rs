use std::io::Cursor;

use super::*;

fn scratch_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "reelsmith_media_{tag}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn image_probe_reads_dimensions() {
    let dir = scratch_dir("image");
    let path = dir.join("scene_1.png");
    let img = image::RgbaImage::from_pixel(7, 5, image::Rgba([1, 2, 3, 255]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    std::fs::write(&path, &buf).unwrap();

    let asset = ImageAsset::probe(&path).unwrap();
    assert_eq!((asset.width, asset.height), (7, 5));
    assert_eq!(asset.path, path);

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn missing_audio_is_a_composition_error() {
    let missing = std::env::temp_dir().join("reelsmith_missing_voice_0.mp3");
    assert!(matches!(
        AudioAsset::probe(&missing),
        Err(ReelError::Composition(_))
    ));
}

#[test]
fn pcm_frames_counts_per_channel() {
    let pcm = AudioPcm {
        sample_rate: 4,
        channels: 2,
        interleaved_f32: vec![0.0; 10],
    };
    assert_eq!(pcm.frames(), 5);
}

// Probing real audio shells out to `ffprobe`/`ffmpeg`; see tests/media_probe.rs.
