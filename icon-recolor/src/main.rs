mod cli;
mod job;
mod task;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use std::process::ExitCode;

fn main() -> ExitCode {
    init_logger();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Run(args) => {
            args.into_task().execute()?;
        }
        Command::Batch { jobs, keep_going } => {
            let failed = job::run_batch(&jobs, keep_going)?;
            if failed > 0 {
                anyhow::bail!("{failed} job(s) failed");
            }
        }
    }

    Ok(())
}

/// Sets up env_logger with `[time LEVEL file line] message` lines.
/// Defaults to `info`, `RUST_LOG` overrides.
fn init_logger() {
    use std::io::Write;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let style = buf.default_level_style(record.level());
            let ts = buf.timestamp_seconds();

            writeln!(
                buf,
                "[{} {style}{}{style:#} {} {}] {}",
                ts,
                record.level(),
                record
                    .file()
                    .unwrap_or("None")
                    .split('/')
                    .next_back()
                    .unwrap_or("None"),
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .init();
}
