use std::fs;
use std::io::{ErrorKind, Read};
#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;
#[cfg(unix)]
use std::os::unix::process::CommandExt;
#[cfg(unix)]
use std::os::unix::process::ExitStatusExt;
use std::path::{Path, PathBuf};
use std::process::{Child, Command as ProcessCommand, ExitStatus, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

#[cfg(unix)]
use nix::errno::Errno;
#[cfg(unix)]
use nix::sys::signal::{kill, Signal};
#[cfg(unix)]
use nix::unistd::{setpgid, Pid};

const READ_CHUNK_BYTES: usize = 8 * 1024;
const EXIT_POLL_INTERVAL: Duration = Duration::from_millis(40);
/// How long descendants may keep the output pipes open after the child exited.
const READER_DRAIN_TIMEOUT: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchSpec {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
}

impl LaunchSpec {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_cwd(mut self, cwd: Option<PathBuf>) -> Self {
        self.cwd = cwd;
        self
    }

    /// Explicit working directory, else the directory holding the program.
    pub fn working_dir(&self) -> PathBuf {
        if let Some(cwd) = &self.cwd {
            return cwd.clone();
        }
        match self.program.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    pub fn command_line(&self) -> String {
        let mut rendered = self.program.display().to_string();
        for arg in &self.args {
            rendered.push(' ');
            rendered.push_str(arg);
        }
        rendered
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamKind {
    Stdout,
    Stderr,
}

impl StreamKind {
    pub fn label(self) -> &'static str {
        match self {
            StreamKind::Stdout => "stdout",
            StreamKind::Stderr => "stderr",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminationResult {
    /// Absent when the process was killed by a signal or could not be waited on.
    pub exit_code: Option<i32>,
    pub signal: Option<i32>,
    pub cancelled: bool,
}

impl TerminationResult {
    fn from_status(status: Option<ExitStatus>, cancelled: bool) -> Self {
        let Some(status) = status else {
            return Self {
                exit_code: None,
                signal: None,
                cancelled,
            };
        };
        #[cfg(unix)]
        let signal = status.signal();
        #[cfg(not(unix))]
        let signal = None;
        Self {
            exit_code: if cancelled { None } else { status.code() },
            signal,
            cancelled,
        }
    }

    pub fn succeeded(&self) -> bool {
        !self.cancelled && self.exit_code == Some(0)
    }

    pub fn diagnostic(&self) -> String {
        if self.cancelled {
            return "cancelled".to_owned();
        }
        if let Some(code) = self.exit_code {
            return format!("exit={code}");
        }
        if let Some(signal) = self.signal {
            return format!("signal={signal}");
        }
        "exit=unknown".to_owned()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SupervisorEvent {
    Output { stream: StreamKind, text: String },
    Terminated(TerminationResult),
}

#[derive(Debug)]
pub enum LaunchError {
    NotFound {
        program: PathBuf,
    },
    NotExecutable {
        program: PathBuf,
    },
    Spawn {
        program: PathBuf,
        error: std::io::Error,
    },
    MissingStdio {
        program: PathBuf,
    },
}

impl LaunchError {
    pub fn program(&self) -> &Path {
        match self {
            LaunchError::NotFound { program }
            | LaunchError::NotExecutable { program }
            | LaunchError::Spawn { program, .. }
            | LaunchError::MissingStdio { program } => program,
        }
    }
}

impl std::fmt::Display for LaunchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LaunchError::NotFound { program } => {
                write!(f, "search command not found at {}", program.display())
            }
            LaunchError::NotExecutable { program } => {
                write!(f, "search command {} is not executable", program.display())
            }
            LaunchError::Spawn { program, error } => {
                write!(f, "failed to start {}: {error}", program.display())
            }
            LaunchError::MissingStdio { program } => {
                write!(f, "process {} missing stdout/stderr pipe", program.display())
            }
        }
    }
}

impl std::error::Error for LaunchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LaunchError::Spawn { error, .. } => Some(error),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelOutcome {
    /// The child had already exited; the run keeps its own exit status.
    NotRunning,
    /// The child had already exited but descendants still held its output
    /// pipes. They were killed; the run keeps the child's exit status.
    DescendantsKilled,
    Terminated,
    ForceKilled,
}

/// Cloneable handle used to cancel a supervised child from another thread.
#[derive(Debug, Clone)]
pub struct ProcessControl {
    child: Arc<Mutex<Child>>,
    cancelled: Arc<AtomicBool>,
    /// Set right before the terminal event is sent.
    finished: Arc<AtomicBool>,
    pid: u32,
}

impl ProcessControl {
    pub fn pid(&self) -> u32 {
        self.pid
    }

    pub fn has_exited(&self) -> bool {
        matches!(lock_child(&self.child).try_wait(), Ok(Some(_)))
    }

    /// Kills the child's process group immediately.
    pub fn cancel(&self) -> CancelOutcome {
        let mut child = lock_child(&self.child);
        if matches!(child.try_wait(), Ok(Some(_))) {
            return self.release_descendants();
        }
        self.cancelled.store(true, Ordering::SeqCst);
        force_kill(&mut child);
        CancelOutcome::ForceKilled
    }

    fn release_descendants(&self) -> CancelOutcome {
        if self.finished.load(Ordering::SeqCst) {
            return CancelOutcome::NotRunning;
        }
        #[cfg(unix)]
        match signal_group(self.pid, Signal::SIGKILL) {
            Ok(()) => return CancelOutcome::DescendantsKilled,
            Err(Errno::ESRCH) => {}
            Err(error) => {
                tracing::warn!(pid = self.pid, %error, "failed to signal lingering process group")
            }
        }
        CancelOutcome::NotRunning
    }

    /// Sends SIGTERM to the process group, escalating to SIGKILL after `timeout`.
    pub fn cancel_graceful(&self, timeout: Duration) -> CancelOutcome {
        {
            let mut child = lock_child(&self.child);
            if matches!(child.try_wait(), Ok(Some(_))) {
                return self.release_descendants();
            }
            self.cancelled.store(true, Ordering::SeqCst);
            #[cfg(unix)]
            {
                if signal_group(self.pid, Signal::SIGTERM).is_err() {
                    let _ = child.kill();
                }
            }
            #[cfg(not(unix))]
            {
                let _ = child.kill();
            }
        }

        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if self.has_exited() {
                return CancelOutcome::Terminated;
            }
            thread::sleep(EXIT_POLL_INTERVAL);
        }

        let mut child = lock_child(&self.child);
        if matches!(child.try_wait(), Ok(Some(_))) {
            return CancelOutcome::Terminated;
        }
        force_kill(&mut child);
        CancelOutcome::ForceKilled
    }
}

/// Supervises one spawned search command.
///
/// Output arrives as raw decoded chunks on [`SupervisorEvent::Output`]; exactly
/// one [`SupervisorEvent::Terminated`] follows once the child exited and both
/// pipes reached end-of-stream. Descendants left holding the pipes are killed
/// after a short drain window so a finished child always ends its run.
pub struct ProcessSupervisor {
    control: ProcessControl,
    events_rx: Receiver<SupervisorEvent>,
}

impl ProcessSupervisor {
    pub fn start(spec: &LaunchSpec) -> Result<Self, LaunchError> {
        let program = resolve_program(&spec.program)?;
        let mut process = ProcessCommand::new(&program);
        process
            .args(&spec.args)
            .current_dir(spec.working_dir())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        #[cfg(unix)]
        unsafe {
            process.pre_exec(|| {
                setpgid(Pid::from_raw(0), Pid::from_raw(0)).map_err(std::io::Error::from)
            });
        }

        let mut child = process.spawn().map_err(|error| LaunchError::Spawn {
            program: program.clone(),
            error,
        })?;
        let (Some(stdout), Some(stderr)) = (child.stdout.take(), child.stderr.take()) else {
            let _ = child.kill();
            let _ = child.wait();
            return Err(LaunchError::MissingStdio { program });
        };

        let (events_tx, events_rx) = mpsc::channel::<SupervisorEvent>();
        let control = ProcessControl {
            pid: child.id(),
            child: Arc::new(Mutex::new(child)),
            cancelled: Arc::new(AtomicBool::new(false)),
            finished: Arc::new(AtomicBool::new(false)),
        };

        let readers = vec![
            spawn_reader(stdout, StreamKind::Stdout, events_tx.clone()),
            spawn_reader(stderr, StreamKind::Stderr, events_tx.clone()),
        ];

        {
            let child = control.child.clone();
            let cancelled = control.cancelled.clone();
            let finished = control.finished.clone();
            let pid = control.pid;
            let tx = events_tx;
            thread::spawn(move || {
                let status = wait_for_exit(&child);
                drain_readers(readers, pid);
                finished.store(true, Ordering::SeqCst);
                let result = TerminationResult::from_status(status, cancelled.load(Ordering::SeqCst));
                let _ = tx.send(SupervisorEvent::Terminated(result));
            });
        }

        tracing::debug!(pid = control.pid, command = %spec.command_line(), "spawned search command");
        Ok(Self { control, events_rx })
    }

    pub fn control(&self) -> ProcessControl {
        self.control.clone()
    }

    /// Blocks for the next event; `None` once the terminal event was consumed.
    pub fn next_event(&self) -> Option<SupervisorEvent> {
        self.events_rx.recv().ok()
    }

    pub fn next_event_timeout(&self, timeout: Duration) -> Option<SupervisorEvent> {
        self.events_rx.recv_timeout(timeout).ok()
    }
}

/// Checks that `program` names an executable file. Bare names are looked up
/// on `PATH` only.
fn resolve_program(program: &Path) -> Result<PathBuf, LaunchError> {
    let is_bare_name = program.components().count() == 1 && !program.is_absolute();
    let candidate = if is_bare_name {
        search_path(program).ok_or_else(|| LaunchError::NotFound {
            program: program.to_path_buf(),
        })?
    } else if program.is_relative() {
        // Relative paths name files under our cwd, not the child's.
        std::env::current_dir()
            .map(|cwd| cwd.join(program))
            .unwrap_or_else(|_| program.to_path_buf())
    } else {
        program.to_path_buf()
    };

    let metadata = fs::metadata(&candidate).map_err(|error| match error.kind() {
        ErrorKind::NotFound => LaunchError::NotFound {
            program: program.to_path_buf(),
        },
        _ => LaunchError::Spawn {
            program: program.to_path_buf(),
            error,
        },
    })?;
    if !metadata.is_file() || !is_executable(&metadata) {
        return Err(LaunchError::NotExecutable {
            program: program.to_path_buf(),
        });
    }
    Ok(candidate)
}

fn search_path(name: &Path) -> Option<PathBuf> {
    let path = std::env::var_os("PATH")?;
    std::env::split_paths(&path)
        .map(|dir| dir.join(name))
        .find(|candidate| {
            fs::metadata(candidate)
                .map(|metadata| metadata.is_file() && is_executable(&metadata))
                .unwrap_or(false)
        })
}

#[cfg(unix)]
fn is_executable(metadata: &fs::Metadata) -> bool {
    metadata.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
fn is_executable(_metadata: &fs::Metadata) -> bool {
    true
}

fn spawn_reader<R>(mut source: R, stream: StreamKind, tx: Sender<SupervisorEvent>) -> JoinHandle<()>
where
    R: Read + Send + 'static,
{
    thread::spawn(move || {
        let mut decoder = Utf8ChunkDecoder::default();
        let mut buf = [0u8; READ_CHUNK_BYTES];
        loop {
            match source.read(&mut buf) {
                Ok(0) => break,
                Ok(read) => {
                    let text = decoder.decode(&buf[..read]);
                    if !text.is_empty() {
                        let _ = tx.send(SupervisorEvent::Output { stream, text });
                    }
                }
                Err(error) if error.kind() == ErrorKind::Interrupted => continue,
                Err(error) => {
                    tracing::warn!(stream = stream.label(), %error, "output pipe read failed");
                    break;
                }
            }
        }
        let text = decoder.finish();
        if !text.is_empty() {
            let _ = tx.send(SupervisorEvent::Output { stream, text });
        }
    })
}

fn wait_for_exit(child: &Mutex<Child>) -> Option<ExitStatus> {
    loop {
        let status = lock_child(child).try_wait();
        match status {
            Ok(Some(status)) => return Some(status),
            Ok(None) => thread::sleep(EXIT_POLL_INTERVAL),
            Err(error) => {
                tracing::warn!(%error, "waiting on search command failed");
                return None;
            }
        }
    }
}

/// Waits for both readers to reach end-of-stream. Descendants that outlive
/// the child and keep the pipes open get [`READER_DRAIN_TIMEOUT`]; then the
/// process group is killed, and readers still blocked after that are detached.
fn drain_readers(readers: Vec<JoinHandle<()>>, pid: u32) {
    let pending = |readers: &[JoinHandle<()>]| readers.iter().any(|reader| !reader.is_finished());
    let wait_until = |deadline: Instant| {
        while pending(&readers) && Instant::now() < deadline {
            thread::sleep(EXIT_POLL_INTERVAL);
        }
    };

    wait_until(Instant::now() + READER_DRAIN_TIMEOUT);
    if pending(&readers) {
        tracing::warn!(pid, "descendants still hold the output pipes; killing process group");
        #[cfg(unix)]
        if let Err(error) = signal_group(pid, Signal::SIGKILL) {
            tracing::debug!(pid, %error, "process group already gone");
        }
        wait_until(Instant::now() + READER_DRAIN_TIMEOUT);
    }
    for reader in readers {
        if reader.is_finished() {
            let _ = reader.join();
        } else {
            tracing::warn!(pid, "detaching output reader blocked past the drain window");
        }
    }
}

fn lock_child(child: &Mutex<Child>) -> MutexGuard<'_, Child> {
    child.lock().unwrap_or_else(PoisonError::into_inner)
}

fn force_kill(child: &mut Child) {
    #[cfg(unix)]
    {
        if signal_group(child.id(), Signal::SIGKILL).is_ok() {
            return;
        }
    }
    let _ = child.kill();
}

#[cfg(unix)]
fn signal_group(pid: u32, signal: Signal) -> Result<(), nix::Error> {
    let pid = pid as i32;
    if pid > 0 {
        kill(Pid::from_raw(-pid), signal)
    } else {
        Ok(())
    }
}

/// Decodes byte chunks as UTF-8, holding back a sequence cut off at the end of
/// a chunk until the next one arrives.
#[derive(Debug, Default)]
pub(crate) struct Utf8ChunkDecoder {
    pending: Vec<u8>,
}

impl Utf8ChunkDecoder {
    pub(crate) fn decode(&mut self, bytes: &[u8]) -> String {
        self.pending.extend_from_slice(bytes);
        let mut out = String::new();
        let mut consumed = 0usize;
        loop {
            let rest = &self.pending[consumed..];
            match std::str::from_utf8(rest) {
                Ok(valid) => {
                    out.push_str(valid);
                    consumed = self.pending.len();
                    break;
                }
                Err(error) => {
                    let valid_up_to = error.valid_up_to();
                    out.push_str(&String::from_utf8_lossy(&rest[..valid_up_to]));
                    match error.error_len() {
                        Some(invalid) => {
                            out.push(char::REPLACEMENT_CHARACTER);
                            consumed += valid_up_to + invalid;
                        }
                        None => {
                            consumed += valid_up_to;
                            break;
                        }
                    }
                }
            }
        }
        self.pending.drain(..consumed);
        out
    }

    pub(crate) fn finish(&mut self) -> String {
        let tail = String::from_utf8_lossy(&self.pending).into_owned();
        self.pending.clear();
        tail
    }
}
