use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "mindpause", version, about = "MindPause CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// The decision each pause reminds you of
    Decision {
        #[command(subcommand)]
        action: commands::decision::DecisionAction,
    },
    /// Habits being given up
    Habit {
        #[command(subcommand)]
        action: commands::habit::HabitAction,
    },
    /// Run or record a pause
    Pause {
        #[command(subcommand)]
        action: commands::pause::PauseAction,
    },
    /// Attempt statistics
    Stats {
        #[command(subcommand)]
        action: commands::stats::StatsAction,
    },
    /// Stored data management
    Data {
        #[command(subcommand)]
        action: commands::data::DataAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

/// Logs go to stderr so stdout stays machine-readable JSON.
fn init_logging() {
    let filter = EnvFilter::try_from_env("MINDPAUSE_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    init_logging();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Decision { action } => commands::decision::run(action),
        Commands::Habit { action } => commands::habit::run(action),
        Commands::Pause { action } => commands::pause::run(action),
        Commands::Stats { action } => commands::stats::run(action),
        Commands::Data { action } => commands::data::run(action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
