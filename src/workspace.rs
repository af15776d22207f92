//! On-disk layout of a reel run and SFX library maintenance.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::Context as _;

use crate::assets::locator::is_audio_file;
use crate::foundation::error::{ReelError, ReelResult};

/// Default working directory.
pub const DEFAULT_WORK_DIR: &str = "target";
/// Default sound-effect library directory.
pub const DEFAULT_SFX_DIR: &str = "sfx";

const IMAGES_DIR: &str = "images";
const VOICE_DIR: &str = "voice-over";

/// Working directory holding generated images, voice lines and the output reel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    /// Wipe `root` if it exists and recreate the empty layout.
    pub fn prepare(root: impl Into<PathBuf>) -> ReelResult<Self> {
        let root = root.into();
        if root.exists() {
            std::fs::remove_dir_all(&root)
                .with_context(|| format!("remove old workspace '{}'", root.display()))?;
        }
        let ws = Self { root };
        for dir in [ws.images_dir(), ws.voice_dir()] {
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("create workspace dir '{}'", dir.display()))?;
        }
        tracing::debug!(root = %ws.root.display(), "workspace prepared");
        Ok(ws)
    }

    /// Use an existing workspace as is (offline composition).
    pub fn open(root: impl Into<PathBuf>) -> ReelResult<Self> {
        let ws = Self { root: root.into() };
        for dir in [ws.images_dir(), ws.voice_dir()] {
            if !dir.is_dir() {
                return Err(ReelError::composition(format!(
                    "workspace directory '{}' does not exist",
                    dir.display()
                )));
            }
        }
        Ok(ws)
    }

    /// Workspace root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory of generated images.
    pub fn images_dir(&self) -> PathBuf {
        self.root.join(IMAGES_DIR)
    }

    /// Directory of synthesized voice lines.
    pub fn voice_dir(&self) -> PathBuf {
        self.root.join(VOICE_DIR)
    }

    /// Image path of scene `index`; the first scene is the title scene.
    pub fn image_path(&self, index: usize) -> PathBuf {
        let name = if index == 0 {
            "title_scene_0.jpg".to_owned()
        } else {
            format!("scene_{index}.jpg")
        };
        self.images_dir().join(name)
    }

    /// Voice-line path of scene `index`.
    pub fn voice_path(&self, index: usize) -> PathBuf {
        self.voice_dir().join(format!("voice_{index}.mp3"))
    }

    /// Path of the final reel named `file_name`.
    pub fn output_path(&self, file_name: &str) -> PathBuf {
        self.root.join(file_name)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// Outcome of [`clean_sfx_library`].
pub struct CleanReport {
    /// Files rewritten without metadata.
    pub cleaned: usize,
    /// Files ffmpeg could not process; left untouched.
    pub failed: usize,
}

/// Strip metadata and chapters from every `.wav`/`.mp3` in `dir`.
///
/// Each file is re-muxed through `ffmpeg` into a sibling temp file which then replaces the
/// original. A file that fails is logged, its temp file removed, and the scan continues.
pub fn clean_sfx_library(dir: &Path) -> ReelResult<CleanReport> {
    if !crate::encode::ffmpeg::is_ffmpeg_on_path() {
        return Err(ReelError::encoding(
            "ffmpeg is required to clean the sfx library, but was not found on PATH",
        ));
    }
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("read sfx library '{}'", dir.display()))?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|e| e.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && is_audio_file(p))
        .collect();
    files.sort();

    let mut report = CleanReport::default();
    for path in files {
        match clean_one(&path) {
            Ok(()) => {
                tracing::info!(file = %path.display(), "cleaned");
                report.cleaned += 1;
            }
            Err(e) => {
                tracing::warn!(file = %path.display(), error = %e, "failed to clean");
                report.failed += 1;
            }
        }
    }
    Ok(report)
}

fn clean_one(path: &Path) -> ReelResult<()> {
    let tmp = temp_sibling(path)?;
    let status = Command::new("ffmpeg")
        .args(["-y", "-loglevel", "error", "-i"])
        .arg(path)
        .args(["-map_metadata", "-1", "-map_chapters", "-1"])
        .arg(&tmp)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    let outcome = match status {
        Ok(s) if s.success() => std::fs::rename(&tmp, path).map_err(|e| {
            ReelError::encoding(format!("replace '{}': {e}", path.display()))
        }),
        Ok(s) => Err(ReelError::encoding(format!("ffmpeg exited with status {s}"))),
        Err(e) => Err(ReelError::encoding(format!("failed to spawn ffmpeg: {e}"))),
    };
    if outcome.is_err() {
        let _ = std::fs::remove_file(&tmp);
    }
    outcome
}

fn temp_sibling(path: &Path) -> ReelResult<PathBuf> {
    let name = path
        .file_name()
        .ok_or_else(|| ReelError::validation(format!("'{}' has no file name", path.display())))?;
    Ok(path.with_file_name(format!("temp_{}", name.to_string_lossy())))
}

#[cfg(test)]
#[path = "../tests/unit/workspace.rs"]
mod tests;
