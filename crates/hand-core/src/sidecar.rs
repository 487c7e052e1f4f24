//! Landmark provider backed by an external detector process.
//!
//! For every frame the process receives a header line `<width> <height>\n`
//! followed by `width * height * 3` BGR bytes on stdin, and answers with one
//! JSON detection line on stdout.

use std::{
    io::{BufRead, BufReader, Write},
    process::{Child, ChildStdin, ChildStdout, Command, Stdio},
};

use tracing::{debug, warn};

use crate::{
    landmarks::Hand,
    provider::{FrameView, LandmarkProvider, ProviderError},
    wire::parse_detection_line,
};

pub struct SidecarProvider {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    line: String,
}

impl SidecarProvider {
    /// Spawn `command` (whitespace separated program and arguments).
    pub fn spawn(command: &str) -> Result<Self, ProviderError> {
        let mut parts = command.split_whitespace();
        let program = parts.next().ok_or_else(|| {
            ProviderError::Process(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "empty landmark provider command",
            ))
        })?;
        let mut cmd = Command::new(program);
        cmd.args(parts);
        Self::from_command(cmd)
    }

    pub fn from_command(mut cmd: Command) -> Result<Self, ProviderError> {
        let mut child = cmd
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()?;
        let (stdin, stdout) = match (child.stdin.take(), child.stdout.take()) {
            (Some(stdin), Some(stdout)) => (stdin, stdout),
            _ => {
                let _ = child.kill();
                return Err(ProviderError::Closed);
            }
        };
        debug!("landmark sidecar started (pid {})", child.id());
        Ok(Self {
            child,
            stdin,
            stdout: BufReader::new(stdout),
            line: String::new(),
        })
    }
}

impl LandmarkProvider for SidecarProvider {
    fn detect(&mut self, frame: FrameView<'_>) -> Result<Option<Hand>, ProviderError> {
        let expected = (frame.width.max(0) as usize) * (frame.height.max(0) as usize) * 3;
        if frame.bgr.len() != expected {
            return Err(ProviderError::FrameSize {
                got: frame.bgr.len(),
                expected,
            });
        }

        writeln!(self.stdin, "{} {}", frame.width, frame.height)?;
        self.stdin.write_all(frame.bgr)?;
        self.stdin.flush()?;

        self.line.clear();
        if self.stdout.read_line(&mut self.line)? == 0 {
            return Err(ProviderError::Closed);
        }
        parse_detection_line(&self.line)
    }
}

impl Drop for SidecarProvider {
    fn drop(&mut self) {
        if let Err(err) = self.child.kill() {
            warn!("failed to stop landmark sidecar: {err}");
        }
        let _ = self.child.wait();
    }
}
