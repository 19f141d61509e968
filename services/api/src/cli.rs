use crate::demo::{run_demo, DemoArgs};
use crate::screening::{run_filter, run_screen, FilterArgs, ScreenArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use tradeshub::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "TradesHub",
    about = "Run the TradesHub trust and safety service or screen report text from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Check report text for personal information before submission
    Filter(FilterArgs),
    /// Screen every row of a legacy report CSV export
    Screen(ScreenArgs),
    /// Run an end-to-end CLI demo covering reports, disputes and reviews
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Filter(args) => run_filter(args),
        Command::Screen(args) => run_screen(args),
        Command::Demo(args) => run_demo(args),
    }
}
