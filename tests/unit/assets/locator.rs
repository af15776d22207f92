use std::collections::HashSet;

use rand::SeedableRng;
use rand::rngs::StdRng;

use super::*;

fn library_with(files: &[&str]) -> (SfxLibrary, PathBuf) {
    let dir = std::env::temp_dir().join(format!(
        "reelsmith_sfx_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).unwrap();
    for f in files {
        std::fs::write(dir.join(f), b"").unwrap();
    }
    (SfxLibrary::new(&dir), dir)
}

#[test]
fn prefix_match_is_case_insensitive_and_filters_extensions() {
    let (lib, dir) = library_with(&[
        "Whoosh_1.wav",
        "whoosh_2.MP3",
        "whoosh_notes.txt",
        "laugh_medium_1.mp3",
    ]);

    let found = lib.candidates("WHOOSH");
    let names: Vec<_> = found
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["Whoosh_1.wav", "whoosh_2.MP3"]);

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn empty_or_absent_prefix_resolves_to_none() {
    let (lib, dir) = library_with(&["whoosh_1.wav"]);
    assert_eq!(lib.locate(None), None);
    assert_eq!(lib.locate(Some("")), None);
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn no_match_resolves_to_none() {
    let (lib, dir) = library_with(&["whoosh_1.wav"]);
    assert_eq!(lib.locate(Some("rimshot")), None);
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn unreadable_directory_is_not_fatal() {
    let lib = SfxLibrary::new(std::env::temp_dir().join("reelsmith_no_such_sfx_dir"));
    assert!(lib.candidates("whoosh").is_empty());
    assert_eq!(lib.locate(Some("whoosh")), None);
}

#[test]
fn random_pick_covers_all_ties() {
    let (lib, dir) = library_with(&["laugh_big_1.wav", "laugh_big_2.wav", "laugh_big_3.mp3"]);
    let mut rng = StdRng::seed_from_u64(7);
    let mut seen = HashSet::new();
    for _ in 0..200 {
        seen.insert(lib.locate_with(Some("laugh_big"), &mut rng).unwrap());
    }
    assert_eq!(seen.len(), 3);
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn seeded_pick_is_reproducible() {
    let (lib, dir) = library_with(&["pop_a.wav", "pop_b.wav", "pop_c.wav"]);
    let a = lib.locate_with(Some("pop"), &mut StdRng::seed_from_u64(42));
    let b = lib.locate_with(Some("pop"), &mut StdRng::seed_from_u64(42));
    assert_eq!(a, b);
    std::fs::remove_dir_all(&dir).ok();
}
