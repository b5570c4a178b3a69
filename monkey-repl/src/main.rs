mod repl;
mod runner;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use log::LevelFilter;

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Script to run. Without one an interactive session is started.
    path: Option<PathBuf>,
    /// Log more; repeat for debug and trace output.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logger(verbose: u8) {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(LevelFilter::Warn).parse_default_env();

    let level = match verbose {
        0 => None,
        1 => Some(LevelFilter::Info),
        2 => Some(LevelFilter::Debug),
        _ => Some(LevelFilter::Trace),
    };
    if let Some(level) = level {
        builder.filter_level(level);
    }
    builder.init();
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    match cli.path {
        None => {
            repl::start()?;
            Ok(ExitCode::SUCCESS)
        }
        Some(path) => {
            let source = std::fs::read_to_string(&path)
                .with_context(|| format!("could not read {}", path.display()))?;
            log::info!("running {}", path.display());
            Ok(runner::run(&source))
        }
    }
}
