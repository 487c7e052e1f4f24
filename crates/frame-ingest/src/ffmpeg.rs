//! FFmpeg-backed capture: the camera is read by an `ffmpeg` child process that
//! scales to the requested size and writes `bgr24` rawvideo on stdout.

use std::{
    io::Read,
    process::{Child, ChildStdout, Command, Stdio},
};

use anyhow::anyhow;
use chrono::Utc;
use tracing::debug;

use crate::{
    FrameSource,
    camera::parse_device_index,
    types::{CaptureError, Frame, FrameFormat},
};

/// Camera handle backed by a running `ffmpeg` process.
pub struct FfmpegCamera {
    uri: String,
    child: Child,
    stdout: ChildStdout,
    target_size: (i32, i32),
    buffer: Vec<u8>,
}

impl FfmpegCamera {
    /// Spawn `ffmpeg` for `uri`, producing frames of `target_size` (width, height).
    pub fn open(uri: &str, target_size: (i32, i32), fps: u32) -> Result<Self, CaptureError> {
        let args = ffmpeg_args(uri, target_size, fps, std::env::consts::OS);
        debug!("spawning ffmpeg {}", args.join(" "));

        let mut child = Command::new("ffmpeg")
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|err| CaptureError::Other(err.into()))?;

        let stdout = match child.stdout.take() {
            Some(stdout) => stdout,
            None => {
                let _ = child.kill();
                return Err(CaptureError::Other(anyhow!("failed to capture ffmpeg stdout")));
            }
        };

        let frame_bytes = (target_size.0.max(0) as usize) * (target_size.1.max(0) as usize) * 3;
        Ok(Self {
            uri: uri.to_string(),
            child,
            stdout,
            target_size,
            buffer: vec![0u8; frame_bytes],
        })
    }
}

impl FrameSource for FfmpegCamera {
    fn read_frame(&mut self) -> Result<Frame, CaptureError> {
        match self.stdout.read_exact(&mut self.buffer) {
            Ok(()) => Ok(Frame {
                data: self.buffer.clone(),
                width: self.target_size.0,
                height: self.target_size.1,
                timestamp_ms: Utc::now().timestamp_millis(),
                format: FrameFormat::Bgr8,
            }),
            Err(err) if err.kind() == std::io::ErrorKind::UnexpectedEof => Err(CaptureError::Ended {
                uri: self.uri.clone(),
            }),
            Err(err) => Err(CaptureError::Other(err.into())),
        }
    }

    fn resolution(&self) -> (i32, i32) {
        self.target_size
    }
}

impl Drop for FfmpegCamera {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// Build the ffmpeg argument list for a capture source on the given OS.
///
/// Device indices (`0`, `/dev/video0`) map to the platform camera demuxer;
/// anything else (files, `rtsp://`, `http://`) is handed to ffmpeg verbatim.
pub(crate) fn ffmpeg_args(uri: &str, target_size: (i32, i32), fps: u32, os: &str) -> Vec<String> {
    let mut args: Vec<String> = ["-hide_banner", "-loglevel", "error"]
        .iter()
        .map(|s| s.to_string())
        .collect();

    match parse_device_index(uri) {
        Some(index) => {
            let (format, device) = match os {
                "macos" => ("avfoundation", format!("{index}")),
                "windows" => ("dshow", format!("video={uri}")),
                _ => ("video4linux2", format!("/dev/video{index}")),
            };
            args.extend([
                "-f".to_string(),
                format.to_string(),
                "-framerate".to_string(),
                fps.to_string(),
                "-i".to_string(),
                device,
            ]);
        }
        None => {
            if uri.starts_with("rtsp://") || uri.starts_with("rtsps://") {
                args.extend(["-rtsp_transport".to_string(), "tcp".to_string()]);
            }
            args.extend(["-i".to_string(), uri.to_string()]);
        }
    }

    args.extend([
        "-an".to_string(),
        "-vf".to_string(),
        format!("scale={}:{}", target_size.0, target_size.1),
        "-pix_fmt".to_string(),
        "bgr24".to_string(),
        "-f".to_string(),
        "rawvideo".to_string(),
        "-".to_string(),
    ]);
    args
}
