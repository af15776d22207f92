use super::*;

fn scratch(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("reelsmith_ws_{name}_{}", std::process::id()))
}

#[test]
fn prepare_wipes_and_recreates_layout() {
    let root = scratch("prepare");
    std::fs::create_dir_all(root.join("images")).unwrap();
    std::fs::write(root.join("images/stale.jpg"), b"old").unwrap();

    let ws = Workspace::prepare(&root).unwrap();
    assert!(ws.images_dir().is_dir());
    assert!(ws.voice_dir().is_dir());
    assert!(!root.join("images/stale.jpg").exists());

    let _ = std::fs::remove_dir_all(&root);
}

#[test]
fn file_names_follow_scene_index() {
    let ws = Workspace {
        root: PathBuf::from("target"),
    };
    assert_eq!(
        ws.image_path(0),
        PathBuf::from("target/images/title_scene_0.jpg")
    );
    assert_eq!(ws.image_path(3), PathBuf::from("target/images/scene_3.jpg"));
    assert_eq!(
        ws.voice_path(3),
        PathBuf::from("target/voice-over/voice_3.mp3")
    );
    assert_eq!(
        ws.output_path("reel-20250101-000000.mp4"),
        PathBuf::from("target/reel-20250101-000000.mp4")
    );
}

#[test]
fn open_requires_existing_layout() {
    let root = scratch("open_missing");
    let _ = std::fs::remove_dir_all(&root);
    assert!(Workspace::open(&root).is_err());

    Workspace::prepare(&root).unwrap();
    assert!(Workspace::open(&root).is_ok());
    let _ = std::fs::remove_dir_all(&root);
}

#[test]
fn temp_sibling_prefixes_file_name() {
    let tmp = temp_sibling(Path::new("sfx/whoosh_1.wav")).unwrap();
    assert_eq!(tmp, PathBuf::from("sfx/temp_whoosh_1.wav"));
}
