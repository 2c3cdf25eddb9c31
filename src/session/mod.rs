//! Single-run search session.
//!
//! The session is the one serialization point between the supervisor's
//! threads and the display: every chunk and every state change is applied to
//! the buffer, translated, and presented while the session lock is held.
//! Only one run may be active at a time; starting another while it runs is
//! rejected with [`SessionError::RunActive`].

pub mod buffer;
pub mod sink;
pub mod state;

use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::Duration;

use crate::markup::{self, MarkupTheme, RenderedDocument};
use crate::process_manager::{
    CancelOutcome, LaunchError, LaunchSpec, ProcessControl, ProcessSupervisor, SupervisorEvent,
};

pub use buffer::{OutputBuffer, RawStreamBuffer};
pub use sink::{
    MarkupFileSink, NullSink, PresentationSink, RecordedFrame, RecordingSink, RenderCause,
    RenderFrame,
};
pub use state::{ProcessRun, RunState, TransitionError};

#[derive(Debug)]
pub enum SessionError {
    RunActive { run_id: u64 },
    NoActiveRun,
    Launch(LaunchError),
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionError::RunActive { run_id } => {
                write!(f, "search run #{run_id} is still running; cancel it first")
            }
            SessionError::NoActiveRun => write!(f, "no search is running"),
            SessionError::Launch(error) => write!(f, "{error}"),
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SessionError::Launch(error) => Some(error),
            _ => None,
        }
    }
}

impl From<LaunchError> for SessionError {
    fn from(value: LaunchError) -> Self {
        Self::Launch(value)
    }
}

struct Inner {
    next_run_id: u64,
    run: Option<ProcessRun>,
    control: Option<ProcessControl>,
    buffer: OutputBuffer,
    theme: MarkupTheme,
    sink: Box<dyn PresentationSink>,
    document: RenderedDocument,
    markup: String,
}

impl Inner {
    fn active_run_id(&self) -> Option<u64> {
        self.run
            .as_ref()
            .filter(|run| run.state() == RunState::Running)
            .map(|run| run.id)
    }

    fn render(&mut self, cause: RenderCause) {
        let Some(run) = self.run.as_ref() else {
            return;
        };
        let document = markup::translate(&self.buffer.combined());
        let rendered = markup::render_markup(&document, &self.theme);
        self.sink.present(&RenderFrame {
            run,
            cause,
            output: &self.buffer,
            document: &document,
            markup: &rendered,
        });
        self.document = document;
        self.markup = rendered;
    }

    fn apply(&mut self, run_id: u64, event: SupervisorEvent) -> bool {
        if self.run.as_ref().map(|run| run.id) != Some(run_id) {
            tracing::debug!(run_id, "dropping event from a replaced run");
            return false;
        }
        match event {
            SupervisorEvent::Output { stream, text } => {
                self.buffer.append(stream, &text);
                self.render(RenderCause::Output(stream));
                false
            }
            SupervisorEvent::Terminated(result) => {
                let Some(run) = self.run.as_mut() else {
                    return true;
                };
                match run.finish(&result) {
                    Ok(state) => {
                        tracing::info!(
                            run_id,
                            state = state.label(),
                            outcome = %result.diagnostic(),
                            elapsed_ms = run.elapsed().as_millis() as u64,
                            "search finished"
                        );
                        self.control = None;
                        self.render(RenderCause::Transition(state));
                    }
                    Err(error) => tracing::warn!(run_id, %error, "ignoring termination"),
                }
                true
            }
        }
    }
}

struct Shared {
    inner: Mutex<Inner>,
    finished: Condvar,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Owns the active run, its output buffers and the presentation sink.
#[derive(Clone)]
pub struct SearchSession {
    shared: Arc<Shared>,
}

impl SearchSession {
    pub fn new(sink: Box<dyn PresentationSink>) -> Self {
        Self::with_theme(sink, MarkupTheme::default())
    }

    pub fn with_theme(sink: Box<dyn PresentationSink>, theme: MarkupTheme) -> Self {
        Self {
            shared: Arc::new(Shared {
                inner: Mutex::new(Inner {
                    next_run_id: 1,
                    run: None,
                    control: None,
                    buffer: OutputBuffer::default(),
                    theme,
                    sink,
                    document: RenderedDocument::default(),
                    markup: String::new(),
                }),
                finished: Condvar::new(),
            }),
        }
    }

    /// Starts a new run after resetting the buffers of the previous one.
    ///
    /// Fails with [`SessionError::RunActive`] while another run is running and
    /// with [`SessionError::Launch`] when the command cannot be spawned; in the
    /// latter case the run is recorded as [`RunState::LaunchFailed`].
    pub fn start(&self, spec: LaunchSpec) -> Result<u64, SessionError> {
        let mut inner = self.shared.lock();
        if let Some(run_id) = inner.active_run_id() {
            tracing::debug!(run_id, "rejecting start while a run is active");
            return Err(SessionError::RunActive { run_id });
        }

        let run_id = inner.next_run_id;
        inner.next_run_id += 1;
        inner.buffer.reset();
        inner.control = None;
        inner.run = Some(ProcessRun::new(run_id, &spec));
        inner.render(RenderCause::Reset);

        let supervisor = match ProcessSupervisor::start(&spec) {
            Ok(supervisor) => supervisor,
            Err(error) => {
                tracing::warn!(run_id, %error, "search command failed to launch");
                advance(&mut inner, RunState::LaunchFailed);
                inner.render(RenderCause::Transition(RunState::LaunchFailed));
                self.shared.finished.notify_all();
                return Err(SessionError::Launch(error));
            }
        };

        advance(&mut inner, RunState::Running);
        inner.control = Some(supervisor.control());
        inner.render(RenderCause::Transition(RunState::Running));
        tracing::info!(run_id, command = %spec.command_line(), "search started");

        let shared = self.shared.clone();
        thread::spawn(move || pump_events(shared, run_id, supervisor));
        Ok(run_id)
    }

    /// Cancels the active run, then starts `spec` once the old run finished.
    pub fn restart(&self, spec: LaunchSpec, timeout: Duration) -> Result<u64, SessionError> {
        if self.is_running() {
            if let Err(error) = self.cancel() {
                tracing::debug!(%error, "run ended before restart cancelled it");
            }
            self.wait(Some(timeout));
        }
        self.start(spec)
    }

    pub fn cancel(&self) -> Result<CancelOutcome, SessionError> {
        let control = self.active_control()?;
        let outcome = control.cancel();
        tracing::info!(pid = control.pid(), ?outcome, "cancel requested");
        Ok(outcome)
    }

    pub fn cancel_graceful(&self, timeout: Duration) -> Result<CancelOutcome, SessionError> {
        // The grace period runs without the session lock so output keeps flowing.
        let control = self.active_control()?;
        let outcome = control.cancel_graceful(timeout);
        tracing::info!(pid = control.pid(), ?outcome, "graceful cancel requested");
        Ok(outcome)
    }

    fn active_control(&self) -> Result<ProcessControl, SessionError> {
        let inner = self.shared.lock();
        inner.control.clone().ok_or(SessionError::NoActiveRun)
    }

    /// Blocks until the current run is no longer running, or `timeout` passes.
    /// Returns the state observed when returning.
    pub fn wait(&self, timeout: Option<Duration>) -> Option<RunState> {
        let inner = self.shared.lock();
        let still_running = |inner: &mut Inner| inner.active_run_id().is_some();
        let inner = match timeout {
            Some(timeout) => {
                self.shared
                    .finished
                    .wait_timeout_while(inner, timeout, still_running)
                    .unwrap_or_else(PoisonError::into_inner)
                    .0
            }
            None => self
                .shared
                .finished
                .wait_while(inner, still_running)
                .unwrap_or_else(PoisonError::into_inner),
        };
        inner.run.as_ref().map(ProcessRun::state)
    }

    pub fn is_running(&self) -> bool {
        self.shared.lock().active_run_id().is_some()
    }

    pub fn current_run(&self) -> Option<ProcessRun> {
        self.shared.lock().run.clone()
    }

    pub fn state(&self) -> Option<RunState> {
        self.shared.lock().run.as_ref().map(ProcessRun::state)
    }

    pub fn combined_output(&self) -> String {
        self.shared.lock().buffer.combined()
    }

    pub fn document(&self) -> RenderedDocument {
        self.shared.lock().document.clone()
    }

    /// Markup of the most recent render pass.
    pub fn markup(&self) -> String {
        self.shared.lock().markup.clone()
    }
}

fn advance(inner: &mut Inner, next: RunState) {
    if let Some(run) = inner.run.as_mut() {
        if let Err(error) = run.advance(next) {
            tracing::warn!(run_id = run.id, %error, "unexpected run transition");
        }
    }
}

fn pump_events(shared: Arc<Shared>, run_id: u64, supervisor: ProcessSupervisor) {
    while let Some(event) = supervisor.next_event() {
        let finished = shared.lock().apply(run_id, event);
        if finished {
            shared.finished.notify_all();
            break;
        }
    }
}
