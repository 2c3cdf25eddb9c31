use config_search::ui::{MessageBlock, OutputMode, PlainRenderer, Renderer};
use config_search::{logging, parse_command, print_usage, Command};

fn main() {
    logging::init();
    let args: Vec<String> = std::env::args().skip(1).collect();
    let output_mode = OutputMode::from_env();
    let cmd = match parse_command(args) {
        Ok(cmd) => cmd,
        Err(err) => {
            let mut renderer = PlainRenderer::stderr(output_mode);
            let _ = renderer.error_block(
                &MessageBlock::new("Invalid command arguments", err.to_string())
                    .with_hint("Run `config-search --help` to see supported command forms"),
            );
            print_usage();
            std::process::exit(config_search::runner::EXIT_USAGE);
        }
    };

    match cmd {
        Command::Help => {
            print_usage();
        }
        _ => match config_search::runner::run_command(cmd) {
            Ok(output) => {
                if !output.stdout.trim().is_empty() {
                    println!("{}", output.stdout);
                }
                if output.exit_code != 0 {
                    std::process::exit(output.exit_code);
                }
            }
            Err(err) => {
                let mut renderer = PlainRenderer::stderr(output_mode);
                let block = MessageBlock::new(err.title(), err.to_string())
                    .with_optional_hint(err.hint().map(str::to_owned));
                let _ = renderer.error_block(&block);
                std::process::exit(err.exit_code());
            }
        },
    }
}
