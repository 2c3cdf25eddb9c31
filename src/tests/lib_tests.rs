use super::{parse_command, usage, CliParseError, Command, ModelsArgs, RenderArgs, RunArgs};
use std::path::PathBuf;
use std::time::Duration;

fn args(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| (*item).to_owned()).collect()
}

#[test]
fn parse_defaults_to_help_without_command() {
    let cmd = parse_command(Vec::<String>::new()).expect("parse should succeed");
    assert_eq!(cmd, Command::Help);
    assert_eq!(parse_command(args(&["-h"])).expect("parse"), Command::Help);
}

#[test]
fn parse_run_collects_options_then_program_and_its_args() {
    let cmd = parse_command(args(&[
        "run",
        "--config",
        "/etc/cs.toml",
        "-o",
        "out.html",
        "--cwd",
        "/opt/tools",
        "--timeout",
        "2.5",
        "./search.sh",
        "--verbose",
        "-x",
    ]))
    .expect("parse should succeed");
    assert_eq!(
        cmd,
        Command::Run(RunArgs {
            config: Some(PathBuf::from("/etc/cs.toml")),
            output: Some(PathBuf::from("out.html")),
            cwd: Some(PathBuf::from("/opt/tools")),
            timeout: Some(Duration::from_millis(2500)),
            program: Some(PathBuf::from("./search.sh")),
            args: args(&["--verbose", "-x"]),
        })
    );
}

#[test]
fn parse_run_double_dash_allows_dash_prefixed_program() {
    let cmd = parse_command(args(&["run", "--", "-weird", "a"])).expect("parse should succeed");
    let Command::Run(run) = cmd else {
        panic!("expected run command");
    };
    assert_eq!(run.program, Some(PathBuf::from("-weird")));
    assert_eq!(run.args, args(&["a"]));
}

#[test]
fn parse_run_without_program_defers_to_config() {
    let cmd = parse_command(args(&["run"])).expect("parse should succeed");
    assert_eq!(cmd, Command::Run(RunArgs::default()));
}

#[test]
fn parse_run_rejects_bad_options() {
    assert_eq!(
        parse_command(args(&["run", "--output"])),
        Err(CliParseError::MissingValue("--output"))
    );
    assert_eq!(
        parse_command(args(&["run", "--timeout", "soon"])),
        Err(CliParseError::InvalidTimeout("soon".to_owned()))
    );
    assert_eq!(
        parse_command(args(&["run", "--timeout", "0"])),
        Err(CliParseError::InvalidTimeout("0".to_owned()))
    );
    assert_eq!(
        parse_command(args(&["run", "--bogus"])),
        Err(CliParseError::UnknownArgument("--bogus".to_owned()))
    );
}

#[test]
fn parse_render_accepts_optional_file() {
    assert_eq!(
        parse_command(args(&["render"])).expect("parse"),
        Command::Render(RenderArgs::default())
    );
    assert_eq!(
        parse_command(args(&["render", "capture.txt"])).expect("parse"),
        Command::Render(RenderArgs {
            config: None,
            input: Some(PathBuf::from("capture.txt")),
        })
    );
    assert_eq!(
        parse_command(args(&["render", "a.txt", "b.txt"])),
        Err(CliParseError::UnknownArgument("b.txt".to_owned()))
    );
}

#[test]
fn parse_models_reads_file_and_code() {
    let cmd = parse_command(args(&["models", "--file", "db.json", "akita"])).expect("parse");
    assert_eq!(
        cmd,
        Command::Models(ModelsArgs {
            config: None,
            file: Some(PathBuf::from("db.json")),
            code: Some("akita".to_owned()),
        })
    );
}

#[test]
fn parse_unknown_command_is_an_error() {
    let err = parse_command(args(&["serve"])).expect_err("unknown command");
    assert_eq!(err.to_string(), "unknown command: serve");
}

#[test]
fn usage_lists_every_command() {
    let text = usage();
    for needle in ["config-search run", "config-search render", "config-search models", "--timeout"] {
        assert!(text.contains(needle), "usage missing {needle}");
    }
}
