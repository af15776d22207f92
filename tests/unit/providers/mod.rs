use std::sync::Mutex;

use super::*;
use crate::script::model::{ComedyMeta, Scene};

struct FixedVoice;

impl VoiceSynthesizer for FixedVoice {
    fn synthesize(&self, _text: &str, out_path: &Path) -> ReelResult<AudioAsset> {
        Ok(AudioAsset::new(out_path, 1.5))
    }
}

#[derive(Default)]
struct RecordingImages {
    seen: Mutex<Vec<Option<String>>>,
    fail_at: Option<usize>,
}

impl ImageGenerator for RecordingImages {
    fn generate(
        &self,
        _prompt: &str,
        continuity: Option<&ImageId>,
        out_path: &Path,
    ) -> ReelResult<(ImageAsset, ImageId)> {
        let mut seen = self.seen.lock().unwrap();
        let n = seen.len();
        seen.push(continuity.map(|id| id.0.clone()));
        if self.fail_at == Some(n) {
            return Err(ReelError::acquisition("generation timed out"));
        }
        Ok((
            ImageAsset {
                path: out_path.to_path_buf(),
                width: 512,
                height: 768,
            },
            ImageId(format!("img-{n}")),
        ))
    }
}

fn script(n: usize) -> Script {
    Script {
        title: "t".to_owned(),
        scenes: (0..n)
            .map(|index| Scene {
                index,
                speech_text: format!("line {index}"),
                visual_prompt: format!("prompt {index}"),
                caption: String::new(),
                meta: ComedyMeta::default(),
            })
            .collect(),
    }
}

fn workspace(name: &str) -> Workspace {
    Workspace::prepare(
        std::env::temp_dir().join(format!("reelsmith_acquire_{name}_{}", std::process::id())),
    )
    .unwrap()
}

#[test]
fn first_image_is_the_continuity_reference_for_later_scenes() {
    let ws = workspace("continuity");
    let images = RecordingImages::default();
    let media = acquire_media(&script(3), &ws, &FixedVoice, &images).unwrap();

    assert_eq!(
        *images.seen.lock().unwrap(),
        vec![None, Some("img-0".to_owned()), Some("img-0".to_owned())]
    );
    assert_eq!(media.len(), 3);
    assert_eq!(media[0].image_path, ws.image_path(0));
    assert_eq!(media[2].voice.path, ws.voice_path(2));
    assert_eq!(media[1].voice.duration_secs, 1.5);
}

#[test]
fn provider_failure_halts_and_names_the_scene() {
    let ws = workspace("failure");
    let images = RecordingImages {
        fail_at: Some(1),
        ..RecordingImages::default()
    };
    let err = acquire_media(&script(3), &ws, &FixedVoice, &images).unwrap_err();
    assert_eq!(err.scene_index(), Some(1));
    assert_eq!(images.seen.lock().unwrap().len(), 2);
}

#[test]
fn image_id_displays_raw_value() {
    assert_eq!(ImageId("abc".to_owned()).to_string(), "abc");
}
