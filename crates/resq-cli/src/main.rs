use resq_core::logging;

mod cli;

use crate::cli::Cli;

#[tokio::main]
async fn main() {
    // Initialize logging as early as possible; fall back to stderr if the state dir is unusable.
    if logging::init_logging().is_err() {
        logging::init_logging_stderr();
    }

    match Cli::run_from_args().await {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("resq error: {:#}", err);
            std::process::exit(1);
        }
    }
}
