use super::*;
use crate::audio::timeline::NoAuxAudio;
use crate::foundation::core::OUTPUT_CANVAS;
use crate::script::model::{ComedyMeta, ZoomStyle};

fn local_font_bytes() -> Option<Vec<u8>> {
    [
        "assets/font.ttf",
        "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    ]
    .iter()
    .find_map(|p| std::fs::read(p).ok())
}

fn write_test_image(name: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!("reelsmith_scene_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    image::RgbaImage::from_pixel(512, 768, image::Rgba([200, 40, 40, 255]))
        .save(&path)
        .unwrap();
    path
}

fn scene(zoom: ZoomStyle) -> Scene {
    Scene {
        index: 2,
        speech_text: "Boss bola weekend pe bhi kaam".to_owned(),
        visual_prompt: "tired employee at desk".to_owned(),
        caption: "Boss ka burnout".to_owned(),
        meta: ComedyMeta {
            punchline_beat: 0.5,
            zoom_style: zoom,
            highlight_word: Some("burnout".to_owned()),
            ..ComedyMeta::default()
        },
    }
}

#[test]
fn fade_ramps_from_black_over_first_three_tenths() {
    assert_eq!(fade_in_factor(0.0), 0.0);
    assert!((fade_in_factor(0.15) - 0.5).abs() < 1e-6);
    assert_eq!(fade_in_factor(0.3), 1.0);
    assert_eq!(fade_in_factor(5.0), 1.0);
}

#[test]
fn assembled_scene_matches_timeline_and_renders_if_font_present() {
    let Some(font) = local_font_bytes() else {
        return;
    };
    let image = write_test_image("bg.png");
    let mut captions = CaptionRenderer::from_font_bytes(font).unwrap();
    let voice = AudioAsset::new("voice_2.mp3", 2.7);

    let unit = assemble_scene(
        &scene(ZoomStyle::Snap),
        voice,
        &image,
        &NoAuxAudio,
        &mut captions,
        OUTPUT_CANVAS,
    )
    .unwrap();

    let fps = Fps::new(24, 1).unwrap();
    assert_eq!(unit.index(), 2);
    assert!((unit.duration() - 3.2).abs() < 1e-9);
    assert_eq!(unit.frame_count(fps), 77);
    assert!(unit.caption_spec().is_punchline);

    let mut renderer = FrameRenderer::new(OUTPUT_CANVAS).unwrap();
    let first = unit.render_frame(0, fps, &mut renderer).unwrap();
    assert!(first.data.iter().all(|&b| b == 0));

    let later = unit.render_frame(30, fps, &mut renderer).unwrap();
    assert_eq!(later.width, 1080);
    assert_eq!(later.height, 1920);
    let top_left = &later.data[..4];
    assert_eq!(top_left[3], 255);
    assert!(top_left[0] > 150);
}

#[test]
fn missing_image_fails_assembly() {
    let Some(font) = local_font_bytes() else {
        return;
    };
    let mut captions = CaptionRenderer::from_font_bytes(font).unwrap();
    let err = assemble_scene(
        &scene(ZoomStyle::None),
        AudioAsset::new("voice.mp3", 1.0),
        Path::new("/definitely/not/here.jpg"),
        &NoAuxAudio,
        &mut captions,
        OUTPUT_CANVAS,
    )
    .unwrap_err();
    assert!(matches!(err, crate::foundation::error::ReelError::Composition(_)));
    assert!(err.to_string().contains("here.jpg"));
}
