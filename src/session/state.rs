use std::path::PathBuf;
use std::time::{Duration, Instant, SystemTime};

use crate::process_manager::{LaunchSpec, TerminationResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunState {
    Pending,
    Running,
    Succeeded,
    Failed,
    Cancelled,
    LaunchFailed,
}

impl RunState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            RunState::Succeeded | RunState::Failed | RunState::Cancelled | RunState::LaunchFailed
        )
    }

    pub fn label(self) -> &'static str {
        match self {
            RunState::Pending => "pending",
            RunState::Running => "running",
            RunState::Succeeded => "succeeded",
            RunState::Failed => "failed",
            RunState::Cancelled => "cancelled",
            RunState::LaunchFailed => "launch-failed",
        }
    }

    fn can_advance_to(self, next: RunState) -> bool {
        matches!(
            (self, next),
            (RunState::Pending, RunState::Running)
                | (RunState::Pending, RunState::LaunchFailed)
                | (RunState::Running, RunState::Succeeded)
                | (RunState::Running, RunState::Failed)
                | (RunState::Running, RunState::Cancelled)
        )
    }

    pub fn for_termination(result: &TerminationResult) -> RunState {
        if result.cancelled {
            RunState::Cancelled
        } else if result.exit_code == Some(0) {
            RunState::Succeeded
        } else {
            RunState::Failed
        }
    }
}

impl std::fmt::Display for RunState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionError {
    pub from: RunState,
    pub to: RunState,
}

impl std::fmt::Display for TransitionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "run cannot move from {} to {}", self.from, self.to)
    }
}

impl std::error::Error for TransitionError {}

/// One invocation of the search command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessRun {
    pub id: u64,
    pub program: PathBuf,
    pub args: Vec<String>,
    pub working_dir: PathBuf,
    pub started_at: SystemTime,
    started_instant: Instant,
    finished_after: Option<Duration>,
    exit_code: Option<i32>,
    state: RunState,
}

impl ProcessRun {
    pub fn new(id: u64, spec: &LaunchSpec) -> Self {
        Self {
            id,
            program: spec.program.clone(),
            args: spec.args.clone(),
            working_dir: spec.working_dir(),
            started_at: SystemTime::now(),
            started_instant: Instant::now(),
            finished_after: None,
            exit_code: None,
            state: RunState::Pending,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Present only once the run reached a terminal state with a numeric code.
    pub fn exit_code(&self) -> Option<i32> {
        self.exit_code
    }

    pub fn elapsed(&self) -> Duration {
        self.finished_after
            .unwrap_or_else(|| self.started_instant.elapsed())
    }

    pub fn advance(&mut self, next: RunState) -> Result<RunState, TransitionError> {
        if !self.state.can_advance_to(next) {
            return Err(TransitionError {
                from: self.state,
                to: next,
            });
        }
        self.state = next;
        if next.is_terminal() {
            self.finished_after = Some(self.started_instant.elapsed());
        }
        Ok(next)
    }

    pub fn finish(&mut self, result: &TerminationResult) -> Result<RunState, TransitionError> {
        let next = self.advance(RunState::for_termination(result))?;
        self.exit_code = result.exit_code;
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run() -> ProcessRun {
        ProcessRun::new(1, &LaunchSpec::new("/opt/tools/search.sh"))
    }

    fn exited(code: i32) -> TerminationResult {
        TerminationResult {
            exit_code: Some(code),
            signal: None,
            cancelled: false,
        }
    }

    #[test]
    fn run_reaches_succeeded_or_failed_from_exit_code() {
        let mut ok = run();
        ok.advance(RunState::Running).expect("running");
        assert_eq!(ok.finish(&exited(0)), Ok(RunState::Succeeded));
        assert_eq!(ok.exit_code(), Some(0));

        let mut failed = run();
        failed.advance(RunState::Running).expect("running");
        assert_eq!(failed.finish(&exited(2)), Ok(RunState::Failed));
        assert_eq!(failed.exit_code(), Some(2));
    }

    #[test]
    fn cancelled_result_maps_to_cancelled_without_exit_code() {
        let mut cancelled = run();
        cancelled.advance(RunState::Running).expect("running");
        let result = TerminationResult {
            exit_code: None,
            signal: Some(9),
            cancelled: true,
        };
        assert_eq!(cancelled.finish(&result), Ok(RunState::Cancelled));
        assert_eq!(cancelled.exit_code(), None);
    }

    #[test]
    fn terminal_states_are_absorbing() {
        let mut failed = run();
        failed.advance(RunState::LaunchFailed).expect("launch failed");
        assert_eq!(
            failed.advance(RunState::Running),
            Err(TransitionError {
                from: RunState::LaunchFailed,
                to: RunState::Running,
            })
        );

        let mut done = run();
        done.advance(RunState::Running).expect("running");
        done.finish(&exited(0)).expect("finish");
        assert!(done.finish(&exited(1)).is_err());
        assert!(done.advance(RunState::Running).is_err());
        assert_eq!(done.state(), RunState::Succeeded);
        assert_eq!(done.exit_code(), Some(0));
    }

    #[test]
    fn pending_cannot_skip_to_exit_states() {
        let mut pending = run();
        assert!(pending.finish(&exited(0)).is_err());
        assert_eq!(pending.state(), RunState::Pending);
    }
}
