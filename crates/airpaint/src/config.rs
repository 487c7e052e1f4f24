//! Validated run configuration built from the command line.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use frame_ingest::CaptureBackend;
use hand_core::{LandmarkProvider, NoHands, ReplayProvider, SidecarProvider};
use tracing::warn;

use crate::{
    board::BoardSettings,
    cli::{BackendArg, ClickTriggerArg, DeskArgs, SourceArgs, WebArgs},
    desk::ClickTrigger,
};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TelemetryOptions {
    pub chrome_trace_path: Option<PathBuf>,
    pub verbose: bool,
}

/// Where hand landmarks come from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LandmarkSource {
    /// No detector: the camera feed is shown but no gestures are recognised.
    Disabled,
    Command(String),
    Replay(PathBuf),
}

impl LandmarkSource {
    pub fn build(&self) -> Result<Box<dyn LandmarkProvider>> {
        Ok(match self {
            LandmarkSource::Disabled => {
                warn!("no landmark source configured; gestures are disabled");
                Box::new(NoHands)
            }
            LandmarkSource::Command(cmd) => Box::new(
                SidecarProvider::spawn(cmd)
                    .with_context(|| format!("failed to start landmark command `{cmd}`"))?,
            ),
            LandmarkSource::Replay(path) => Box::new(
                ReplayProvider::open(path)
                    .with_context(|| format!("failed to open landmark replay {}", path.display()))?,
            ),
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CaptureSettings {
    pub uri: String,
    pub width: i32,
    pub height: i32,
    pub backend: CaptureBackend,
}

#[derive(Clone, Debug, PartialEq)]
pub struct WebConfig {
    pub capture: CaptureSettings,
    pub landmarks: LandmarkSource,
    pub bind: String,
    pub port: u16,
    pub jpeg_quality: u8,
    pub mirror: bool,
    pub board: BoardSettings,
    pub telemetry: TelemetryOptions,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DeskConfig {
    pub capture: CaptureSettings,
    pub landmarks: LandmarkSource,
    pub screen_width: i32,
    pub screen_height: i32,
    pub click_trigger: ClickTrigger,
    pub telemetry: TelemetryOptions,
}

fn split_source(args: SourceArgs) -> Result<(CaptureSettings, LandmarkSource, bool)> {
    if args.width <= 0 || args.height <= 0 {
        bail!(
            "frame size must be positive, got {}x{}",
            args.width,
            args.height
        );
    }
    let backend = match args.backend {
        BackendArg::Ffmpeg => CaptureBackend::Ffmpeg,
        #[cfg(feature = "opencv")]
        BackendArg::Opencv => CaptureBackend::OpenCv,
        #[cfg(not(feature = "opencv"))]
        BackendArg::Opencv => bail!("--backend opencv requires building with the `opencv` feature"),
    };
    let landmarks = match (args.landmarks_cmd, args.landmarks_replay) {
        (Some(_), Some(_)) => bail!("--landmarks-cmd and --landmarks-replay are mutually exclusive"),
        (Some(cmd), None) => LandmarkSource::Command(cmd),
        (None, Some(path)) => LandmarkSource::Replay(path),
        (None, None) => LandmarkSource::Disabled,
    };
    let capture = CaptureSettings {
        uri: args.source,
        width: args.width,
        height: args.height,
        backend,
    };
    Ok((capture, landmarks, args.verbose))
}

impl TryFrom<WebArgs> for WebConfig {
    type Error = anyhow::Error;

    fn try_from(args: WebArgs) -> Result<Self> {
        if !(1..=100).contains(&args.jpeg_quality) {
            bail!("--jpeg-quality must be an integer between 1 and 100");
        }
        let (capture, landmarks, verbose) = split_source(args.source)?;
        Ok(Self {
            capture,
            landmarks,
            bind: args.bind,
            port: args.port,
            jpeg_quality: args.jpeg_quality as u8,
            mirror: !args.no_mirror,
            board: BoardSettings::default(),
            telemetry: TelemetryOptions {
                chrome_trace_path: args.chrome_trace,
                verbose,
            },
        })
    }
}

impl TryFrom<DeskArgs> for DeskConfig {
    type Error = anyhow::Error;

    fn try_from(args: DeskArgs) -> Result<Self> {
        if args.screen_width <= 0 || args.screen_height <= 0 {
            bail!(
                "screen size must be positive, got {}x{}",
                args.screen_width,
                args.screen_height
            );
        }
        let (capture, landmarks, verbose) = split_source(args.source)?;
        Ok(Self {
            capture,
            landmarks,
            screen_width: args.screen_width,
            screen_height: args.screen_height,
            click_trigger: match args.click_trigger {
                ClickTriggerArg::Level => ClickTrigger::Level,
                ClickTriggerArg::Edge => ClickTrigger::Edge,
            },
            telemetry: TelemetryOptions {
                chrome_trace_path: None,
                verbose,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::cli::{Cli, Command};

    fn web(args: &[&str]) -> Result<WebConfig> {
        let mut argv = vec!["airpaint", "web"];
        argv.extend_from_slice(args);
        match Cli::try_parse_from(argv)?.command {
            Command::Web(args) => WebConfig::try_from(args),
            Command::Desk(_) => bail!("parsed the wrong subcommand"),
        }
    }

    #[test]
    fn web_defaults_validate() {
        let config = web(&[]).unwrap();
        assert_eq!(config.jpeg_quality, 85);
        assert!(config.mirror);
        assert_eq!(config.landmarks, LandmarkSource::Disabled);
        assert_eq!(config.capture.backend, CaptureBackend::Ffmpeg);
    }

    #[test]
    fn rejects_bad_quality_and_size() {
        assert!(web(&["--jpeg-quality", "0"]).is_err());
        assert!(web(&["--jpeg-quality", "101"]).is_err());
        assert!(web(&["--width", "0"]).is_err());
    }

    #[test]
    fn replay_and_mirror_flags() {
        let config = web(&["--landmarks-replay", "hands.jsonl", "--no-mirror"]).unwrap();
        assert_eq!(
            config.landmarks,
            LandmarkSource::Replay(PathBuf::from("hands.jsonl"))
        );
        assert!(!config.mirror);
    }

    #[test]
    fn desk_maps_click_trigger() {
        let cli = Cli::try_parse_from(["airpaint", "desk", "--click-trigger", "edge"]).unwrap();
        let Command::Desk(args) = cli.command else {
            panic!("expected desk command");
        };
        let config = DeskConfig::try_from(args).unwrap();
        assert_eq!(config.click_trigger, ClickTrigger::Edge);
    }
}
