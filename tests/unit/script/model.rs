use super::*;

const SCRIPT: &str = r#"{
  "title": "Leave Maangna: A Crime?!",
  "scenes": [
    {
      "hindi_speech": "Sir, family function hai.",
      "visual_prompt": "employee at desk",
      "caption": "Sir, family function hai"
    },
    {
      "hindi_speech": "Matlab, burnout ho gaya.",
      "visual_prompt": "employee asleep",
      "caption": "bas burnout hogaya",
      "comedy_meta": {
        "sfx": "whoosh",
        "laugh_intensity": "medium",
        "punchline_beat": 0.5,
        "zoom_style": "snap",
        "highlight_word": "burnout"
      }
    }
  ]
}"#;

#[test]
fn parses_scenes_in_order_with_defaults() {
    let script = Script::from_json_str(SCRIPT).unwrap();
    assert_eq!(script.scenes.len(), 2);
    assert_eq!(script.scenes[0].index, 0);
    assert_eq!(script.scenes[1].index, 1);

    let first = &script.scenes[0].meta;
    assert_eq!(*first, ComedyMeta::default());
    assert_eq!(first.punchline_beat, 0.2);
    assert_eq!(first.laugh_tag(), None);

    let second = &script.scenes[1].meta;
    assert_eq!(second.sfx_tag.as_deref(), Some("whoosh"));
    assert_eq!(second.laugh_tag().as_deref(), Some("laugh_medium"));
    assert_eq!(second.punchline_beat, 0.5);
    assert_eq!(second.zoom_style, ZoomStyle::Snap);
    assert_eq!(second.highlight_word.as_deref(), Some("burnout"));
}

#[test]
fn empty_tags_are_treated_as_absent() {
    let json = r#"{"title":"t","scenes":[{"hindi_speech":"a","visual_prompt":"b","caption":"c",
        "comedy_meta":{"sfx":"","laugh_intensity":"  ","highlight_word":"","zoom_style":"zoom"}}]}"#;
    let script = Script::from_json_str(json).unwrap();
    let meta = &script.scenes[0].meta;
    assert_eq!(meta.sfx_tag, None);
    assert_eq!(meta.laugh_intensity, None);
    assert_eq!(meta.highlight_word, None);
    assert_eq!(meta.zoom_style, ZoomStyle::None);
}

#[test]
fn rejects_empty_and_negative_beat() {
    assert!(matches!(
        Script::from_json_str(r#"{"title":"t","scenes":[]}"#),
        Err(ReelError::Validation(_))
    ));

    let json = r#"{"scenes":[{"hindi_speech":"a","visual_prompt":"b","caption":"c",
        "comedy_meta":{"punchline_beat":-1.0}}]}"#;
    assert!(matches!(
        Script::from_json_str(json),
        Err(ReelError::Validation(_))
    ));
}

#[test]
fn malformed_json_is_a_serde_error() {
    assert!(matches!(
        Script::from_json_str("{\"scenes\": 3}"),
        Err(ReelError::Serde(_))
    ));
}

#[test]
fn title_slug_strips_punctuation() {
    let script = Script::from_json_str(SCRIPT).unwrap();
    assert_eq!(script.title_slug(), "Leave-Maangna-A-Crime");

    let untitled = Script {
        title: "?!".to_string(),
        scenes: script.scenes.clone(),
    };
    assert_eq!(untitled.title_slug(), "reel");
}

#[test]
fn output_file_name_appends_timestamp() {
    let script = Script::from_json_str(SCRIPT).unwrap();
    let at = chrono::NaiveDate::from_ymd_opt(2026, 3, 4)
        .unwrap()
        .and_hms_opt(5, 6, 7)
        .unwrap();
    assert_eq!(
        script.output_file_name(at),
        "Leave-Maangna-A-Crime-20260304-050607.mp4"
    );
}
