use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(name = "airpaint", version, about = "Paint and point with your hand in front of a webcam")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve the painted camera feed as an MJPEG stream.
    Web(WebArgs),
    /// Local window painter with virtual mouse control.
    Desk(DeskArgs),
}

/// Options shared by both front ends.
#[derive(Debug, Args)]
pub struct SourceArgs {
    /// Camera index, device path, file or stream URL.
    #[arg(long, default_value = "0")]
    pub source: String,
    #[arg(long, default_value_t = 1280)]
    pub width: i32,
    #[arg(long, default_value_t = 720)]
    pub height: i32,
    /// Command that reads frames on stdin and prints hand landmarks as JSON lines.
    #[arg(long, conflicts_with = "landmarks_replay")]
    pub landmarks_cmd: Option<String>,
    /// File of recorded landmark JSON lines, one per frame.
    #[arg(long)]
    pub landmarks_replay: Option<PathBuf>,
    /// Capture backend.
    #[arg(long, value_enum, default_value_t = BackendArg::Ffmpeg)]
    pub backend: BackendArg,
    #[arg(long)]
    pub verbose: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum BackendArg {
    Ffmpeg,
    Opencv,
}

#[derive(Debug, Args)]
pub struct WebArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    #[arg(long, default_value = "0.0.0.0")]
    pub bind: String,
    #[arg(long, default_value_t = 5000)]
    pub port: u16,
    #[arg(long, default_value_t = 85)]
    pub jpeg_quality: i32,
    /// Skip the selfie-view horizontal flip.
    #[arg(long)]
    pub no_mirror: bool,
    /// Write span timings to a chrome://tracing JSON file.
    #[arg(long)]
    pub chrome_trace: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct DeskArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    #[arg(long, default_value_t = 1920)]
    pub screen_width: i32,
    #[arg(long, default_value_t = 1080)]
    pub screen_height: i32,
    #[arg(long, value_enum, default_value_t = ClickTriggerArg::Level)]
    pub click_trigger: ClickTriggerArg,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ClickTriggerArg {
    /// Click on every frame the finger stays bent.
    Level,
    /// Click once per bend.
    Edge,
}
