mod platform;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;

/// Submits a batch of documents to the remote agent service, polls the job
/// until it resolves and renders the per-item extraction results.
#[derive(Debug, Parser)]
#[command(name = "relay_app", version, about)]
struct Cli {
    /// Documents to submit as one batch.
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Agent service base URL.
    #[arg(long, default_value = "https://api.know360.io/finance_agent")]
    base_url: String,

    /// Seconds between status queries.
    #[arg(long, default_value_t = 5)]
    interval_secs: u64,

    /// Overall ceiling for one job, in seconds.
    #[arg(long, default_value_t = 300)]
    timeout_secs: u64,

    /// Directory for the CSV export and the session file.
    #[arg(long, default_value = "output")]
    output_dir: PathBuf,

    /// Demo account email.
    #[arg(long, default_value = "demo@example.com")]
    email: String,

    /// Demo account password.
    #[arg(long, default_value = "demo123")]
    password: String,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let options = platform::AppOptions {
        files: cli.files,
        base_url: cli.base_url,
        interval: Duration::from_secs(cli.interval_secs),
        overall_timeout: Duration::from_secs(cli.timeout_secs),
        output_dir: cli.output_dir,
        email: cli.email,
        password: cli.password,
    };

    match platform::run_app(options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
