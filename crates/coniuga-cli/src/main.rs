//! coniuga CLI: study Italian conjugation tables and quiz yourself.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "coniuga", version, about = "Italian verb conjugation trainer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Quiz yourself on generated conjugation questions
    Quiz {
        /// Restrict verbs to a category (see `coniuga verbs`)
        #[arg(long)]
        category: Option<String>,

        /// Restrict to a mood (e.g. "Indicativo")
        #[arg(long)]
        mood: Option<String>,

        /// Restrict to a tense (dropped if not valid for --mood)
        #[arg(long)]
        tense: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Show the full conjugation table of a verb
    Learn {
        /// Verb infinitive
        #[arg(default_value = commands::learn::DEFAULT_VERB)]
        verb: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// List verb categories, moods and tenses
    Verbs {
        /// Reference data TOML replacing the built-in tables
        #[arg(long)]
        reference: Option<PathBuf>,
    },

    /// List available models
    ListModels {
        /// Filter to specific provider
        #[arg(long)]
        provider: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create a starter config
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(
                "coniuga=info"
                    .parse()
                    .unwrap_or_else(|_| tracing_subscriber::filter::LevelFilter::INFO.into()),
            ),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Quiz {
            category,
            mood,
            tense,
            config,
        } => commands::quiz::execute(category, mood, tense, config).await,
        Commands::Learn { verb, config } => commands::learn::execute(verb, config).await,
        Commands::Verbs { reference } => commands::verbs::execute(reference),
        Commands::ListModels { provider, config } => {
            commands::list_models::execute(provider, config).await
        }
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
