pub mod config;
pub mod logging;
pub mod markup;
pub mod models;
pub mod process_manager;
pub mod runner;
pub mod session;
pub mod ui;

use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Run(RunArgs),
    Render(RenderArgs),
    Models(ModelsArgs),
    Help,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunArgs {
    pub config: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub cwd: Option<PathBuf>,
    pub timeout: Option<Duration>,
    pub program: Option<PathBuf>,
    pub args: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderArgs {
    pub config: Option<PathBuf>,
    pub input: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelsArgs {
    pub config: Option<PathBuf>,
    pub file: Option<PathBuf>,
    pub code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliParseError {
    MissingValue(&'static str),
    InvalidTimeout(String),
    UnknownCommand(String),
    UnknownArgument(String),
}

impl std::fmt::Display for CliParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliParseError::MissingValue(flag) => write!(f, "{flag} requires a value"),
            CliParseError::InvalidTimeout(value) => {
                write!(f, "--timeout expects a number of seconds, got `{value}`")
            }
            CliParseError::UnknownCommand(cmd) => write!(f, "unknown command: {cmd}"),
            CliParseError::UnknownArgument(arg) => write!(f, "unknown argument: {arg}"),
        }
    }
}

impl std::error::Error for CliParseError {}

pub fn parse_command<I>(args: I) -> Result<Command, CliParseError>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let Some(cmd) = args.next() else {
        return Ok(Command::Help);
    };

    match cmd.as_str() {
        "--help" | "-h" | "help" => Ok(Command::Help),
        "run" => parse_run(args),
        "render" => parse_render(args),
        "models" => parse_models(args),
        other => Err(CliParseError::UnknownCommand(other.to_owned())),
    }
}

fn take_value<I>(args: &mut I, flag: &'static str) -> Result<String, CliParseError>
where
    I: Iterator<Item = String>,
{
    args.next().ok_or(CliParseError::MissingValue(flag))
}

fn parse_timeout(value: String) -> Result<Duration, CliParseError> {
    match value.parse::<f64>() {
        Ok(secs) if secs.is_finite() && secs > 0.0 => Ok(Duration::from_secs_f64(secs)),
        _ => Err(CliParseError::InvalidTimeout(value)),
    }
}

fn parse_run<I>(args: I) -> Result<Command, CliParseError>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let mut parsed = RunArgs::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => parsed.config = Some(take_value(&mut args, "--config")?.into()),
            "--output" | "-o" => parsed.output = Some(take_value(&mut args, "--output")?.into()),
            "--cwd" => parsed.cwd = Some(take_value(&mut args, "--cwd")?.into()),
            "--timeout" => parsed.timeout = Some(parse_timeout(take_value(&mut args, "--timeout")?)?),
            "--help" | "-h" => return Ok(Command::Help),
            "--" => {
                if let Some(program) = args.next() {
                    parsed.program = Some(program.into());
                }
                break;
            }
            other if other.starts_with('-') && other.len() > 1 => {
                return Err(CliParseError::UnknownArgument(other.to_owned()))
            }
            _ => {
                parsed.program = Some(arg.into());
                break;
            }
        }
    }
    // Everything after the program belongs to the search command.
    parsed.args = args.collect();

    Ok(Command::Run(parsed))
}

fn parse_render<I>(args: I) -> Result<Command, CliParseError>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let mut parsed = RenderArgs::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => parsed.config = Some(take_value(&mut args, "--config")?.into()),
            "--help" | "-h" => return Ok(Command::Help),
            "-" => parsed.input = None,
            other if other.starts_with('-') => {
                return Err(CliParseError::UnknownArgument(other.to_owned()))
            }
            _ if parsed.input.is_some() => return Err(CliParseError::UnknownArgument(arg)),
            _ => parsed.input = Some(arg.into()),
        }
    }

    Ok(Command::Render(parsed))
}

fn parse_models<I>(args: I) -> Result<Command, CliParseError>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let mut parsed = ModelsArgs::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => parsed.config = Some(take_value(&mut args, "--config")?.into()),
            "--file" => parsed.file = Some(take_value(&mut args, "--file")?.into()),
            "--help" | "-h" => return Ok(Command::Help),
            other if other.starts_with('-') => {
                return Err(CliParseError::UnknownArgument(other.to_owned()))
            }
            _ if parsed.code.is_some() => return Err(CliParseError::UnknownArgument(arg)),
            _ => parsed.code = Some(arg),
        }
    }

    Ok(Command::Models(parsed))
}

pub fn usage() -> &'static str {
    "config-search\n\nUSAGE:\n  config-search run [OPTIONS] [--] [PROGRAM [ARGS...]]\n  config-search render [--config <PATH>] [FILE]\n  config-search models [--config <PATH>] [--file <PATH>] [CODE]\n\nCOMMANDS:\n  run               Launch the search command and print its output as markup\n  render            Translate captured ANSI output (FILE or stdin) to markup\n  models            List model codes and market names, or resolve one CODE\n\nOPTIONS (run):\n  --config <PATH>   Config file (default: $CONFIG_SEARCH_CONFIG or ./config-search.toml)\n  -o, --output <FILE>\n                    Rewrite FILE with the markup after every update\n  --cwd <DIR>       Working directory for the search command\n  --timeout <SECS>  Cancel the search after SECS seconds\n  PROGRAM           Search command; defaults to [search].program from config\n\nOPTIONS (models):\n  --file <PATH>     Model database overlay (default: [models].file from config)\n\nGENERAL:\n  -h, --help        Print help\n\nENVIRONMENT:\n  CONFIG_SEARCH_LOG    Log filter, e.g. `info` or `config_search=debug`\n  CONFIG_SEARCH_COLOR  always | never | auto\n  NO_COLOR             Disable colored status output\n"
}

pub fn print_usage() {
    eprintln!("{}", usage());
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
