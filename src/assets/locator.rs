use std::path::{Path, PathBuf};

use rand::Rng;
use rand::seq::SliceRandom;

/// Extensions the library accepts as audio stingers.
pub const AUDIO_EXTENSIONS: [&str; 2] = ["wav", "mp3"];

/// Directory of auxiliary sound assets searched by file-name prefix.
///
/// Lookups never fail: an empty prefix, a missing directory, or no matching file all resolve to
/// `None` so the scene simply goes without that track.
#[derive(Clone, Debug)]
pub struct SfxLibrary {
    dir: PathBuf,
}

impl SfxLibrary {
    /// Library rooted at `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Library directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// All audio files whose name starts with `prefix` (case-insensitive), sorted by path.
    pub fn candidates(&self, prefix: &str) -> Vec<PathBuf> {
        let prefix = prefix.to_lowercase();
        if prefix.is_empty() {
            return Vec::new();
        }

        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(dir = %self.dir.display(), "sfx library unreadable: {e}");
                return Vec::new();
            }
        };

        let mut out: Vec<PathBuf> = entries
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry.path()),
                Err(e) => {
                    tracing::warn!(dir = %self.dir.display(), "skipping sfx entry: {e}");
                    None
                }
            })
            .filter(|path| path.is_file() && is_audio_file(path))
            .filter(|path| {
                path.file_name()
                    .map(|n| n.to_string_lossy().to_lowercase().starts_with(&prefix))
                    .unwrap_or(false)
            })
            .collect();
        out.sort();
        out
    }

    /// Pick one matching asset uniformly at random using the thread-local RNG.
    pub fn locate(&self, prefix: Option<&str>) -> Option<PathBuf> {
        self.locate_with(prefix, &mut rand::thread_rng())
    }

    /// Pick one matching asset uniformly at random using `rng`.
    pub fn locate_with<R: Rng + ?Sized>(&self, prefix: Option<&str>, rng: &mut R) -> Option<PathBuf> {
        let prefix = prefix?;
        let picked = self.candidates(prefix).choose(rng).cloned();
        match &picked {
            Some(path) => tracing::debug!(prefix, path = %path.display(), "sfx resolved"),
            None => tracing::debug!(prefix, "no sfx match"),
        }
        picked
    }
}

/// Return `true` for `.wav`/`.mp3` files (case-insensitive).
pub fn is_audio_file(path: &Path) -> bool {
    path.extension()
        .map(|ext| {
            let ext = ext.to_string_lossy().to_lowercase();
            AUDIO_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/locator.rs"]
mod tests;
