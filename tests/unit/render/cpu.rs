use super::*;

fn solid(width: u32, height: u32, rgba: [u8; 4]) -> PreparedImage {
    PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(rgba.repeat((width * height) as usize)),
    }
}

fn canvas(width: u32, height: u32) -> Canvas {
    Canvas { width, height }
}

#[test]
fn opaque_background_fills_every_pixel() {
    let bg = BackgroundPaint::from_prepared(&solid(8, 8, [200, 10, 10, 255])).unwrap();
    let mut r = FrameRenderer::new(canvas(8, 8)).unwrap();
    let frame = r.render(&bg, Affine::IDENTITY, None, 1.0).unwrap();

    assert!(frame.premultiplied);
    assert_eq!(frame.data.len(), 8 * 8 * 4);
    for px in frame.data.chunks_exact(4) {
        assert_eq!(px[3], 255);
        assert!(px[0] >= 190);
    }
}

#[test]
fn zoom_about_center_keeps_canvas_covered() {
    let c = canvas(8, 8);
    let bg = BackgroundPaint::from_prepared(&solid(8, 8, [0, 0, 255, 255])).unwrap();
    let mut r = FrameRenderer::new(c).unwrap();
    let center = c.center();
    let zoom = Affine::translate(center) * Affine::scale(1.15) * Affine::translate(-center);
    let frame = r.render(&bg, zoom, None, 1.0).unwrap();
    assert!(frame.data.chunks_exact(4).all(|px| px[3] == 255));
}

#[test]
fn fade_scales_towards_transparent() {
    let bg = BackgroundPaint::from_prepared(&solid(4, 4, [255, 255, 255, 255])).unwrap();
    let mut r = FrameRenderer::new(canvas(4, 4)).unwrap();

    let black = r.render(&bg, Affine::IDENTITY, None, 0.0).unwrap();
    assert!(black.data.iter().all(|&b| b == 0));

    let half = r.render(&bg, Affine::IDENTITY, None, 0.5).unwrap();
    for px in half.data.chunks_exact(4) {
        assert!((120..=135).contains(&px[3]));
    }
}

#[test]
fn caption_layer_is_composited_over_background() {
    let c = canvas(4, 4);
    let bg = BackgroundPaint::from_prepared(&solid(4, 4, [0, 0, 0, 255])).unwrap();
    let layer = CaptionLayer {
        left: 1,
        top: 1,
        image: solid(2, 2, [255, 255, 0, 255]),
    };
    let mut r = FrameRenderer::new(c).unwrap();
    let frame = r.render(&bg, Affine::IDENTITY, Some(&layer), 1.0).unwrap();

    let px = |x: usize, y: usize| &frame.data[(y * 4 + x) * 4..(y * 4 + x) * 4 + 4];
    assert_eq!(px(1, 1), &[255, 255, 0, 255]);
    assert_eq!(px(2, 2), &[255, 255, 0, 255]);
    assert_eq!(px(0, 0)[0], 0);
    assert_eq!(px(3, 3)[1], 0);
}

#[test]
fn renderer_rejects_oversized_canvas() {
    assert!(FrameRenderer::new(canvas(70_000, 10)).is_err());
    assert!(FrameRenderer::new(canvas(0, 10)).is_err());
}

#[test]
fn premul_bytes_must_match_dimensions() {
    assert!(pixmap_from_premul_bytes(&[0u8; 12], 2, 2).is_err());
}
