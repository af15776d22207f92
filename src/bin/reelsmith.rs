use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use reelsmith::providers::leonardo::LeonardoOpts;
use reelsmith::providers::murf::MurfOpts;
use reelsmith::providers::{LeonardoImages, MurfVoice, acquire_media};
use reelsmith::{
    AudioAsset, EncodeOpts, FfmpegSink, ReelError, RenderConfig, SceneMedia, Script, Sequencer,
    SfxLibrary, Workspace,
};

#[derive(Parser, Debug)]
#[command(name = "reelsmith", version, about = "Compose short vertical comedy reels")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate voice and images for a script, then compose and encode the reel.
    Render(RenderArgs),
    /// Compose and encode from media already in the working directory (no network).
    Compose(ComposeArgs),
    /// Strip metadata from every sound effect in the library.
    CleanSfx(CleanSfxArgs),
}

#[derive(Parser, Debug)]
struct CompositionArgs {
    /// Input script JSON.
    #[arg(long = "script", default_value = "script.json")]
    script: PathBuf,

    /// Working directory for generated media and the output reel.
    #[arg(long, default_value = reelsmith::workspace::DEFAULT_WORK_DIR)]
    work_dir: PathBuf,

    /// Sound-effect library directory.
    #[arg(long, default_value = reelsmith::workspace::DEFAULT_SFX_DIR)]
    sfx_dir: PathBuf,

    /// Caption font (TTF/OTF).
    #[arg(long, env = "REELSMITH_FONT")]
    font: PathBuf,

    /// Override rayon worker threads.
    #[arg(long)]
    threads: Option<usize>,

    /// Frames rendered per parallel batch.
    #[arg(long, default_value_t = 32)]
    chunk_size: u64,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    #[command(flatten)]
    composition: CompositionArgs,

    /// Leonardo.ai API key.
    #[arg(long, env = "LEONARDO_API_KEY", hide_env_values = true)]
    leonardo_api_key: String,

    /// Murf API key.
    #[arg(long, env = "MURF_API_KEY", hide_env_values = true)]
    murf_api_key: String,
}

#[derive(Parser, Debug)]
struct ComposeArgs {
    #[command(flatten)]
    composition: CompositionArgs,
}

#[derive(Parser, Debug)]
struct CleanSfxArgs {
    /// Sound-effect library directory.
    #[arg(long, default_value = reelsmith::workspace::DEFAULT_SFX_DIR)]
    sfx_dir: PathBuf,
}

fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let result = match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Compose(args) => cmd_compose(args),
        Command::CleanSfx(args) => cmd_clean_sfx(args),
    };

    if let Err(err) = result {
        match err.downcast_ref::<ReelError>().and_then(ReelError::scene_index) {
            Some(scene) => tracing::error!(scene, "halted: {err:#}"),
            None => tracing::error!("halted: {err:#}"),
        }
        std::process::exit(1);
    }
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let script = load_script(&args.composition)?;

    let images = LeonardoImages::new(args.leonardo_api_key, LeonardoOpts::default())?;
    match images.remaining_tokens() {
        Ok(Some(tokens)) => tracing::info!(tokens, "Leonardo.ai tokens remaining"),
        Ok(None) => tracing::info!("Leonardo.ai token balance not reported"),
        Err(e) => tracing::warn!("Leonardo.ai quota check failed: {e}"),
    }
    let voice = MurfVoice::new(args.murf_api_key, MurfOpts::default())?;

    let workspace = Workspace::prepare(&args.composition.work_dir)?;
    let media = acquire_media(&script, &workspace, &voice, &images)?;
    compose(&args.composition, &script, &workspace, &media)
}

fn cmd_compose(args: ComposeArgs) -> anyhow::Result<()> {
    let script = load_script(&args.composition)?;
    let workspace = Workspace::open(&args.composition.work_dir)?;

    let media = script
        .scenes
        .iter()
        .map(|scene| {
            let voice = AudioAsset::probe(workspace.voice_path(scene.index))
                .map_err(|e| e.in_scene(scene.index))?;
            Ok(SceneMedia {
                voice,
                image_path: workspace.image_path(scene.index),
            })
        })
        .collect::<Result<Vec<_>, ReelError>>()?;
    compose(&args.composition, &script, &workspace, &media)
}

fn cmd_clean_sfx(args: CleanSfxArgs) -> anyhow::Result<()> {
    tracing::info!(dir = %args.sfx_dir.display(), "cleaning sfx metadata");
    let report = reelsmith::workspace::clean_sfx_library(&args.sfx_dir)?;
    tracing::info!(
        cleaned = report.cleaned,
        failed = report.failed,
        "sfx library cleaned"
    );
    Ok(())
}

fn load_script(args: &CompositionArgs) -> anyhow::Result<Script> {
    let script = Script::from_path(&args.script)?;
    tracing::info!(
        title = %script.title,
        slug = %script.title_slug(),
        scenes = script.scenes.len(),
        "loaded script"
    );
    Ok(script)
}

fn compose(
    args: &CompositionArgs,
    script: &Script,
    workspace: &Workspace,
    media: &[SceneMedia],
) -> anyhow::Result<()> {
    let font = std::fs::read(&args.font)
        .with_context(|| format!("read caption font '{}'", args.font.display()))?;
    let config = RenderConfig {
        threads: args.threads,
        chunk_size: args.chunk_size,
        ..RenderConfig::default()
    };
    let library = SfxLibrary::new(&args.sfx_dir);
    let sequencer = Sequencer::new(config, &library, font)?;

    let out = workspace.output_path(&script.output_file_name(chrono::Local::now().naive_local()));
    let mut sink = FfmpegSink::new(EncodeOpts::new(&out));
    let summary = sequencer.run(script, media, &mut sink)?;

    tracing::info!(
        out = %out.display(),
        scenes = summary.scenes,
        frames = summary.frames,
        duration = summary.duration_secs,
        "reel generated"
    );
    Ok(())
}
