//! Entry point for the dupes CLI.

use clap::Parser;
use dupes::{cli::Cli, error::ExitCode};

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // --help and --version are reported through the same path
            let code = if err.use_stderr() {
                ExitCode::UsageError
            } else {
                ExitCode::Success
            };
            let _ = err.print();
            std::process::exit(code.as_i32());
        }
    };

    match dupes::run_app(cli) {
        Ok(code) => std::process::exit(code.as_i32()),
        Err(err) => {
            let exit_code = ExitCode::from_error(&err);
            eprintln!("[{}] Error: {:#}", exit_code.code_prefix(), err);
            std::process::exit(exit_code.as_i32());
        }
    }
}
