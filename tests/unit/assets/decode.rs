use super::*;

fn scratch_path(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("reelsmith_decode_{}_{name}", std::process::id()))
}

#[test]
fn loaded_png_premultiplies_to_expected_bytes() {
    let src_rgba = vec![100u8, 50u8, 200u8, 128u8];
    let img = image::RgbaImage::from_raw(1, 1, src_rgba).unwrap();
    let path = scratch_path("one_px.png");
    img.save(&path).unwrap();

    let loaded = load_image(&path).unwrap();
    let _ = std::fs::remove_file(&path);
    let prepared = prepare_rgba8(loaded.to_rgba8());
    assert_eq!(prepared.width, 1);
    assert_eq!(prepared.height, 1);
    assert_eq!(
        prepared.rgba8_premul.as_slice(),
        &[
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128u8
        ]
    );
}

#[test]
fn garbage_file_fails_to_decode() {
    let path = scratch_path("garbage.png");
    std::fs::write(&path, b"not an image").unwrap();
    let err = load_image(&path).unwrap_err();
    let _ = std::fs::remove_file(&path);
    assert!(matches!(err, ReelError::Composition(_)));
}

#[test]
fn missing_image_file_is_an_error() {
    let missing = std::env::temp_dir().join("reelsmith_definitely_missing_image.png");
    assert!(load_image(&missing).is_err());
}
