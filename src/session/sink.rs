use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use crate::markup::RenderedDocument;
use crate::process_manager::StreamKind;

use super::buffer::OutputBuffer;
use super::state::{ProcessRun, RunState};

/// What triggered a render pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderCause {
    /// A new run was created and the surface cleared.
    Reset,
    Transition(RunState),
    Output(StreamKind),
}

/// Full snapshot handed to the display surface; it replaces whatever was shown.
#[derive(Debug)]
pub struct RenderFrame<'a> {
    pub run: &'a ProcessRun,
    pub cause: RenderCause,
    pub output: &'a OutputBuffer,
    pub document: &'a RenderedDocument,
    pub markup: &'a str,
}

pub trait PresentationSink: Send {
    fn present(&mut self, frame: &RenderFrame<'_>);
}

#[derive(Debug, Default)]
pub struct NullSink;

impl PresentationSink for NullSink {
    fn present(&mut self, _frame: &RenderFrame<'_>) {}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedFrame {
    pub run_id: u64,
    pub state: RunState,
    pub cause: RenderCause,
    pub chunks: usize,
    pub markup: String,
}

/// Keeps every frame it receives; the log stays readable after the sink was
/// moved into a session.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    frames: Arc<Mutex<Vec<RecordedFrame>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> Vec<RecordedFrame> {
        self.frames
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn transitions(&self) -> Vec<RunState> {
        self.frames()
            .into_iter()
            .filter_map(|frame| match frame.cause {
                RenderCause::Transition(state) => Some(state),
                _ => None,
            })
            .collect()
    }

    pub fn output_frames(&self) -> usize {
        self.frames()
            .iter()
            .filter(|frame| matches!(frame.cause, RenderCause::Output(_)))
            .count()
    }
}

impl PresentationSink for RecordingSink {
    fn present(&mut self, frame: &RenderFrame<'_>) {
        let recorded = RecordedFrame {
            run_id: frame.run.id,
            state: frame.run.state(),
            cause: frame.cause,
            chunks: frame.output.total_chunks(),
            markup: frame.markup.to_owned(),
        };
        self.frames
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(recorded);
    }
}

/// Rewrites a file with the latest markup on every frame.
#[derive(Debug, Clone)]
pub struct MarkupFileSink {
    path: PathBuf,
}

impl MarkupFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl PresentationSink for MarkupFileSink {
    fn present(&mut self, frame: &RenderFrame<'_>) {
        if let Err(error) = fs::write(&self.path, frame.markup) {
            tracing::error!(path = %self.path.display(), %error, "failed to write rendered output");
        }
    }
}
