use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod cmd;
mod context;
mod render;

#[derive(Parser)]
#[command(name = "affilizap")]
#[command(about = "Turn product links and screenshots into WhatsApp-ready offers")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate copy for up to 5 links and/or screenshots
    Generate {
        /// Product links, one per argument
        links: Vec<String>,

        /// File with one link per line
        #[arg(long)]
        links_file: Option<PathBuf>,

        /// Screenshot file or data URL (repeatable)
        #[arg(short, long = "image")]
        images: Vec<String>,

        /// Print the entries as JSON
        #[arg(long)]
        json: bool,

        /// Do not add the results to history
        #[arg(long)]
        no_save: bool,
    },

    /// Browse and edit saved copies
    #[command(subcommand)]
    History(cmd::history::HistoryCommand),

    /// Account commands (requires SUPABASE_URL and SUPABASE_ANON_KEY)
    #[command(subcommand)]
    Auth(cmd::auth::AuthCommand),
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let _ = dotenvy::dotenv();

    // Logs go to stderr so generated copy can be piped from stdout.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("affilizap=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    run().await
}

async fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    let ctx = context::AppContext::from_env()?;

    match cli.command {
        Commands::Generate {
            links,
            links_file,
            images,
            json,
            no_save,
        } => {
            let args = cmd::generate::GenerateArgs {
                links,
                links_file,
                images,
                json,
                save: !no_save,
            };
            cmd::generate::run(&ctx, args).await
        }
        Commands::History(command) => cmd::history::run(&ctx, command).await,
        Commands::Auth(command) => cmd::auth::run(&ctx, command).await,
    }
}
