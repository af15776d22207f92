use std::sync::Arc;

use super::*;

fn seg(start: u64, end: u64, volume: f32, samples: Vec<f32>) -> AudioSegment {
    AudioSegment {
        timeline_start_sample: start,
        timeline_end_sample: end,
        volume,
        source_sample_rate: 4,
        source_channels: 2,
        source_interleaved_f32: Arc::new(samples),
    }
}

#[test]
fn frame_to_sample_at_output_rate() {
    let fps = Fps::new(24, 1).unwrap();
    assert_eq!(frame_to_sample(0, fps, 48_000), 0);
    assert_eq!(frame_to_sample(1, fps, 48_000), 2_000);
    assert_eq!(frame_to_sample(77, fps, 48_000), 154_000);
}

#[test]
fn mix_applies_overlap_and_volume() {
    let voice = seg(0, 4, 1.0, vec![0.25; 8]);
    let laugh = seg(2, 4, 0.7, vec![0.5; 8]);

    let manifest = AudioManifest {
        sample_rate: 4,
        channels: 2,
        total_samples: 4,
        segments: vec![voice, laugh],
    };
    let out = mix_manifest(&manifest);
    assert_eq!(out.len(), 8);
    assert!((out[0] - 0.25).abs() < 1e-6);
    assert!((out[4] - (0.25 + 0.35)).abs() < 1e-6);
    assert!((out[7] - (0.25 + 0.35)).abs() < 1e-6);
}

#[test]
fn mix_truncates_at_segment_end_and_clamps() {
    let loud = seg(0, 2, 1.0, vec![0.9; 8]);
    let louder = seg(0, 4, 1.0, vec![0.9; 8]);
    let manifest = AudioManifest {
        sample_rate: 4,
        channels: 2,
        total_samples: 4,
        segments: vec![loud, louder],
    };
    let out = mix_manifest(&manifest);
    assert_eq!(out[0], 1.0);
    assert!((out[4] - 0.9).abs() < 1e-6);
}

#[test]
fn short_source_leaves_silence() {
    let blip = seg(0, 4, 1.0, vec![0.5; 2]);
    let manifest = AudioManifest {
        sample_rate: 4,
        channels: 2,
        total_samples: 4,
        segments: vec![blip],
    };
    let out = mix_manifest(&manifest);
    assert!((out[0] - 0.5).abs() < 1e-6);
    assert_eq!(out[2], 0.0);
    assert_eq!(out[6], 0.0);
}

#[test]
fn f32le_file_has_four_bytes_per_sample() {
    let path = std::env::temp_dir().join(format!(
        "reelsmith_mix_{}_{}.f32le",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    write_mix_to_f32le_file(&[0.0, 0.5, -0.5], &path).unwrap();
    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(bytes.len(), 12);
    assert_eq!(f32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]), 0.5);
    std::fs::remove_file(&path).ok();
}
