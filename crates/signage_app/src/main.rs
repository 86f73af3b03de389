//! signage - runs a board definition against the wall clock and prints what
//! each widget shows whenever the board changes.

use std::path::PathBuf;

use clap::Parser;

mod platform;

use platform::logging::LogDestination;

#[derive(Parser, Debug)]
#[command(name = "signage")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Board definition (RON)
    #[arg(short, long, default_value = "board.ron")]
    config: PathBuf,

    /// Where log lines go
    #[arg(long, value_enum, default_value_t = LogDestination::File)]
    log: LogDestination,

    /// Shorten or skip content transitions
    #[arg(long)]
    reduced_motion: bool,

    /// Exit after this many seconds instead of running until killed
    #[arg(long)]
    run_for_secs: Option<u64>,

    /// Print each view as a JSON line instead of text
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    platform::logging::initialize(cli.log);
    platform::app::run(platform::app::AppOptions {
        config: cli.config,
        reduced_motion: cli.reduced_motion,
        run_for_secs: cli.run_for_secs,
        json: cli.json,
    })
}
