use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "intently-cli", version, about = "Intently CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Intention and session control
    Session {
        #[command(subcommand)]
        action: commands::session::SessionAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Usage statistics and milestones
    Stats {
        #[command(subcommand)]
        action: commands::stats::StatsAction,
    },
    /// NPS feedback
    Feedback {
        #[command(subcommand)]
        action: commands::feedback::FeedbackAction,
    },
}

fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Session { action } => commands::session::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Stats { action } => commands::stats::run(action),
        Commands::Feedback { action } => commands::feedback::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
