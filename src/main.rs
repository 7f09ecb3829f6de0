use std::process::ExitCode;

use clap::Parser;
use console::{Term, style};

use leadtime::cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    leadtime::init_tracing(cli.verbose);

    match leadtime::run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let _ = Term::stderr().write_line(&format!("{} {err:#}", style("Error:").red()));
            ExitCode::FAILURE
        }
    }
}
