//! Whispera command line front end.
//!
//! Stands in for the desktop interaction layer: collects the file,
//! credential, and ffmpeg hint, runs the transcription pipeline on a
//! worker thread, and drains the progress channel on the main thread.

use std::path::PathBuf;
use std::thread;

use anyhow::{anyhow, Context};
use clap::Parser;

use whispera_core::config::{default_settings_path, SettingsStore};
use whispera_core::media::FfmpegToolkit;
use whispera_core::pipeline::{
    progress_channel, PipelineConfig, TranscriptionPipeline, DEFAULT_MODEL,
};
use whispera_core::transcribe::WhisperClient;

#[derive(Parser)]
#[command(
    name = "whispera",
    version,
    about = "Transcribe audio/video files with the OpenAI Whisper API"
)]
struct Cli {
    /// Audio or video file to transcribe
    file: PathBuf,

    /// API key (overrides the settings file and OPENAI_API_KEY)
    #[arg(long)]
    api_key: Option<String>,

    /// Persist the provided --api-key to the settings file
    #[arg(long, requires = "api_key")]
    save_key: bool,

    /// Path to the ffmpeg executable or the directory containing it
    #[arg(long)]
    ffmpeg: Option<PathBuf>,

    /// Settings file (defaults to whispera.env next to the executable)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let settings_path = cli.config.clone().unwrap_or_else(default_settings_path);
    let mut store = SettingsStore::new(&settings_path);
    store
        .load()
        .with_context(|| format!("loading settings from {}", settings_path.display()))?;

    let api_key = cli
        .api_key
        .clone()
        .or_else(|| store.settings().api_key.clone())
        .or_else(|| std::env::var("OPENAI_API_KEY").ok());

    if cli.save_key {
        store.settings_mut().api_key = cli.api_key.clone();
        store
            .save()
            .with_context(|| format!("saving settings to {}", store.path().display()))?;
        tracing::info!("API key saved to {}", store.path().display());
    }

    let ffmpeg_hint = cli
        .ffmpeg
        .clone()
        .or_else(|| std::env::var_os("FFMPEG_PATH").map(PathBuf::from));

    let pipeline = TranscriptionPipeline::new(
        PipelineConfig::default(),
        Box::new(FfmpegToolkit::new(ffmpeg_hint)),
        Box::new(WhisperClient::new(api_key)),
    );

    let (tx, rx) = progress_channel(64);
    let file = cli.file.clone();
    let worker = thread::spawn(move || pipeline.process(&file, Some(&tx)));

    // The iterator ends when the worker finishes and drops its sender.
    for update in rx {
        eprintln!("[{:>3}%] {}", update.percent, update.message);
    }

    let result = worker
        .join()
        .map_err(|_| anyhow!("transcription worker panicked"))?;

    let text = result.map_err(|e| anyhow!("{}", e))?;

    if cli.json {
        let payload = serde_json::json!({
            "file": cli.file,
            "model": DEFAULT_MODEL,
            "text": text,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        println!("{}", text);
    }

    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(false))
        .with(filter)
        .init();
}
