use super::*;

#[test]
fn frame_range_contains_boundaries() {
    let r = FrameRange::new(FrameIndex(2), FrameIndex(5)).unwrap();
    assert!(!r.contains(FrameIndex(1)));
    assert!(r.contains(FrameIndex(2)));
    assert!(r.contains(FrameIndex(4)));
    assert!(!r.contains(FrameIndex(5)));
    assert!(FrameRange::new(FrameIndex(5), FrameIndex(2)).is_err());
}

#[test]
fn frame_range_chunks_cover_range_in_order() {
    let r = FrameRange::new(FrameIndex(3), FrameIndex(13)).unwrap();
    let chunks: Vec<_> = r.chunks(4).collect();
    assert_eq!(chunks.len(), 3);
    assert_eq!(chunks[0].start, FrameIndex(3));
    assert_eq!(chunks[2].end, FrameIndex(13));
    assert_eq!(chunks.iter().map(|c| c.len_frames()).sum::<u64>(), 10);
}

#[test]
fn secs_to_frames_ceil_handles_exact_multiples() {
    let fps = Fps::new(24, 1).unwrap();
    assert_eq!(fps.secs_to_frames_ceil(3.2), 77);
    assert_eq!(fps.secs_to_frames_ceil(1.0), 24);
    assert_eq!(fps.secs_to_frames_ceil(1.01), 25);
    assert_eq!(fps.secs_to_frames_ceil(0.0), 1);
}

#[test]
fn output_constants_are_portrait_24fps() {
    assert_eq!(OUTPUT_CANVAS.width, 1080);
    assert_eq!(OUTPUT_CANVAS.height, 1920);
    assert_eq!(OUTPUT_FPS.as_f64(), 24.0);
    assert_eq!(OUTPUT_CANVAS.rgba8_len(), 1080 * 1920 * 4);
}
