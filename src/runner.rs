use std::fs;
use std::io::{IsTerminal, Read};
use std::path::PathBuf;
use std::time::Duration;

use crate::config::{load_config, ConfigError};
use crate::markup::translate_to_markup;
use crate::models::{extract_code, ModelCatalog, ModelCatalogError};
use crate::process_manager::{LaunchError, LaunchSpec};
use crate::session::{
    MarkupFileSink, PresentationSink, RenderCause, RenderFrame, RunState, SearchSession,
    SessionError,
};
use crate::ui::theme::resolve_color_enabled;
use crate::ui::{
    KeyValue, NoticeLevel, OutputMode, PlainRenderer, Renderer, SpinnerHandle, TableSpec,
};
use crate::{Command, ModelsArgs, RenderArgs, RunArgs};

/// Grace period between SIGTERM and SIGKILL when `--timeout` expires.
const CANCEL_GRACE: Duration = Duration::from_secs(2);

pub const EXIT_FAILED: i32 = 1;
pub const EXIT_USAGE: i32 = 2;
pub const EXIT_LAUNCH_FAILED: i32 = 127;
pub const EXIT_CANCELLED: i32 = 130;

#[derive(Debug)]
pub enum RunnerError {
    Config(ConfigError),
    Models(ModelCatalogError),
    Session(SessionError),
    MissingProgram,
    InputRead {
        path: Option<PathBuf>,
        error: std::io::Error,
    },
    UnknownModel(String),
    Ui(String),
}

impl RunnerError {
    pub fn exit_code(&self) -> i32 {
        match self {
            RunnerError::Session(SessionError::Launch(_)) => EXIT_LAUNCH_FAILED,
            RunnerError::MissingProgram => EXIT_USAGE,
            _ => EXIT_FAILED,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            RunnerError::Session(SessionError::Launch(_)) => "Search failed to start",
            RunnerError::MissingProgram => "No search program configured",
            RunnerError::Config(_) => "Invalid configuration",
            RunnerError::UnknownModel(_) => "Unknown model code",
            _ => "Command failed",
        }
    }

    pub fn hint(&self) -> Option<&'static str> {
        match self {
            RunnerError::MissingProgram => {
                Some("pass a program after `run` or set [search].program in config-search.toml")
            }
            RunnerError::Session(SessionError::Launch(LaunchError::NotExecutable { .. })) => {
                Some("check the file's permissions (chmod +x)")
            }
            _ => None,
        }
    }
}

impl std::fmt::Display for RunnerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunnerError::Config(err) => write!(f, "{err}"),
            RunnerError::Models(err) => write!(f, "{err}"),
            RunnerError::Session(err) => write!(f, "{err}"),
            RunnerError::MissingProgram => write!(f, "no search program given"),
            RunnerError::InputRead { path: Some(path), error } => {
                write!(f, "failed to read {}: {error}", path.display())
            }
            RunnerError::InputRead { path: None, error } => {
                write!(f, "failed to read stdin: {error}")
            }
            RunnerError::UnknownModel(code) => {
                write!(f, "model code `{code}` is not in the model database")
            }
            RunnerError::Ui(msg) => write!(f, "ui render failed: {msg}"),
        }
    }
}

impl std::error::Error for RunnerError {}

impl From<ConfigError> for RunnerError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<ModelCatalogError> for RunnerError {
    fn from(value: ModelCatalogError) -> Self {
        Self::Models(value)
    }
}

impl From<SessionError> for RunnerError {
    fn from(value: SessionError) -> Self {
        Self::Session(value)
    }
}

impl From<crate::ui::UiError> for RunnerError {
    fn from(value: crate::ui::UiError) -> Self {
        Self::Ui(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub exit_code: i32,
}

impl CommandOutput {
    fn success(stdout: String) -> Self {
        Self {
            stdout,
            exit_code: 0,
        }
    }
}

pub fn exit_code_for(state: RunState) -> i32 {
    match state {
        RunState::Succeeded => 0,
        RunState::Cancelled => EXIT_CANCELLED,
        RunState::LaunchFailed => EXIT_LAUNCH_FAILED,
        RunState::Pending | RunState::Running | RunState::Failed => EXIT_FAILED,
    }
}

pub fn run_command(cmd: Command) -> Result<CommandOutput, RunnerError> {
    match cmd {
        Command::Help => Ok(CommandOutput::success(String::new())),
        Command::Run(args) => run_search(args),
        Command::Render(args) => run_render(args),
        Command::Models(args) => run_models(args),
    }
}

/// Mirrors every frame to the optional output file and drives the spinner.
struct CliSink {
    file: Option<MarkupFileSink>,
    spinner: Box<dyn SpinnerHandle>,
}

impl PresentationSink for CliSink {
    fn present(&mut self, frame: &RenderFrame<'_>) {
        if let Some(file) = self.file.as_mut() {
            file.present(frame);
        }
        match frame.cause {
            RenderCause::Reset => {}
            RenderCause::Output(_) => {
                let lines = frame.document.lines().len();
                self.spinner.set_message(&format!(
                    "searching with {} ({lines} lines)",
                    frame.run.program.display()
                ));
            }
            RenderCause::Transition(state) if state.is_terminal() => {
                let message = match frame.run.exit_code() {
                    Some(code) => format!("search {} (exit {code})", state.label()),
                    None => format!("search {}", state.label()),
                };
                if state == RunState::Succeeded {
                    self.spinner.finish_success(&message);
                } else {
                    self.spinner.finish_error(&message);
                }
            }
            RenderCause::Transition(_) => {}
        }
    }
}

pub fn run_search(args: RunArgs) -> Result<CommandOutput, RunnerError> {
    let config = load_config(args.config.as_deref())?.config;
    let program = args
        .program
        .or(config.search.program)
        .ok_or(RunnerError::MissingProgram)?;
    let spec = LaunchSpec::new(program)
        .with_args(args.args)
        .with_cwd(args.cwd.or(config.search.working_dir));

    let mut status = PlainRenderer::stderr(OutputMode::from_env());
    let spinner = status.spinner(&format!("searching: {}", spec.command_line()))?;
    let sink = CliSink {
        file: args.output.map(MarkupFileSink::new),
        spinner,
    };
    let session = SearchSession::with_theme(Box::new(sink), config.theme);
    session.start(spec)?;

    let mut state = session.wait(args.timeout);
    if let (Some(RunState::Running), Some(timeout)) = (state, args.timeout) {
        tracing::info!(timeout_ms = timeout.as_millis() as u64, "search timed out; cancelling");
        status.notice(
            NoticeLevel::Warning,
            &format!("search timed out after {:.1}s; cancelling", timeout.as_secs_f64()),
        )?;
        if let Err(error) = session.cancel_graceful(CANCEL_GRACE) {
            tracing::debug!(%error, "search ended before cancellation");
        }
        state = session.wait(None);
    }

    let exit_code = state.map_or(EXIT_FAILED, exit_code_for);
    Ok(CommandOutput {
        stdout: session.markup(),
        exit_code,
    })
}

pub fn run_render(args: RenderArgs) -> Result<CommandOutput, RunnerError> {
    let config = load_config(args.config.as_deref())?.config;
    let raw = match &args.input {
        Some(path) => fs::read(path).map_err(|error| RunnerError::InputRead {
            path: Some(path.clone()),
            error,
        })?,
        None => {
            let mut raw = Vec::new();
            std::io::stdin()
                .read_to_end(&mut raw)
                .map_err(|error| RunnerError::InputRead { path: None, error })?;
            raw
        }
    };
    let text = String::from_utf8_lossy(&raw);
    Ok(CommandOutput::success(translate_to_markup(
        &text,
        &config.theme,
    )))
}

pub fn run_models(args: ModelsArgs) -> Result<CommandOutput, RunnerError> {
    let config = load_config(args.config.as_deref())?.config;
    let file = args.file.or(config.models.file);
    let catalog = ModelCatalog::load(file.as_deref())?;

    if let Some(label) = args.code {
        let code = extract_code(&label);
        if catalog.lookup(code).is_none() {
            return Err(RunnerError::UnknownModel(code.to_owned()));
        }
        return Ok(CommandOutput::success(catalog.display_name(code)));
    }

    let color_enabled =
        resolve_color_enabled(OutputMode::from_env(), std::io::stdout().is_terminal());
    let mut renderer = PlainRenderer::new(Vec::<u8>::new(), color_enabled);
    let source = file
        .as_ref()
        .filter(|path| path.exists())
        .map_or_else(|| "built-in".to_owned(), |path| path.display().to_string());
    renderer.key_values(&[
        KeyValue::new("models", catalog.len().to_string()),
        KeyValue::new("source", source),
    ])?;
    renderer.text("")?;
    renderer.table(&TableSpec::new(
        vec!["code".to_owned(), "name".to_owned()],
        catalog
            .iter()
            .map(|(code, name)| vec![code.to_owned(), name.to_owned()])
            .collect(),
    ))?;
    let out = renderer.into_inner();
    String::from_utf8(out)
        .map(CommandOutput::success)
        .map_err(|error| RunnerError::Ui(format!("invalid utf-8 in rendered output: {error}")))
}

#[cfg(test)]
#[path = "tests/runner_tests.rs"]
mod tests;
