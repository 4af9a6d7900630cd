use crate::demo::{run_demo, run_track, set_language, show_language, DemoArgs, TrackArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use jansunwai::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "JanSunwai",
    about = "Run and demonstrate the JanSunwai citizen grievance service",
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
    /// Walk a complaint through validation, OTP verification and tracking
    Demo(DemoArgs),
    /// Look up a complaint and print its status timeline
    Track(TrackArgs),
    /// Inspect or change the persisted display language
    Language {
        #[command(subcommand)]
        command: LanguageCommand,
    },
}

#[derive(Subcommand, Debug)]
enum LanguageCommand {
    /// Print the active and supported languages
    Show,
    /// Switch the active language (e.g. `en`, `hi`)
    Set { code: String },
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
        Command::Demo(args) => run_demo(args).await,
        Command::Track(args) => run_track(args),
        Command::Language {
            command: LanguageCommand::Show,
        } => show_language(),
        Command::Language {
            command: LanguageCommand::Set { code },
        } => set_language(&code),
    }
}
