//! Replays recorded detections, one JSON line per frame.

use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use crate::{
    landmarks::Hand,
    provider::{FrameView, LandmarkProvider, ProviderError},
    wire::parse_detection_line,
};

pub struct ReplayProvider<R> {
    reader: R,
    line: String,
    exhausted: bool,
}

impl ReplayProvider<BufReader<File>> {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ProviderError> {
        Ok(Self::new(BufReader::new(File::open(path)?)))
    }
}

impl<R: BufRead> ReplayProvider<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: String::new(),
            exhausted: false,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }
}

impl<R: BufRead + Send> LandmarkProvider for ReplayProvider<R> {
    fn detect(&mut self, _frame: FrameView<'_>) -> Result<Option<Hand>, ProviderError> {
        if self.exhausted {
            return Ok(None);
        }
        self.line.clear();
        if self.reader.read_line(&mut self.line)? == 0 {
            self.exhausted = true;
            return Ok(None);
        }
        parse_detection_line(&self.line)
    }
}
