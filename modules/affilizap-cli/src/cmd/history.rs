use std::process::ExitCode;

use affilizap_common::Platform;
use affilizap_store::HistoryQuery;
use anyhow::{bail, Result};
use clap::Subcommand;

use crate::context::AppContext;
use crate::render;

#[derive(Subcommand)]
pub enum HistoryCommand {
    /// List saved copies, newest first
    List {
        /// Only this marketplace (amazon, shopee, mercado-livre, magalu, aliexpress, other)
        #[arg(short, long)]
        platform: Option<Platform>,

        /// Case-insensitive match against the link or the text
        #[arg(short, long)]
        search: Option<String>,

        #[arg(long)]
        json: bool,

        /// Refresh from the account's remote history first
        #[arg(long)]
        sync: bool,
    },

    /// Delete one entry (local history only)
    Remove { id: String },

    /// Replace the text of an entry
    Edit { id: String, text: String },

    /// Delete all entries (local history only)
    Clear,
}

pub async fn run(ctx: &AppContext, command: HistoryCommand) -> Result<ExitCode> {
    let history = ctx.history().await?;
    let count = history.load_local().await?;

    match command {
        HistoryCommand::List {
            platform,
            search,
            json,
            sync,
        } => {
            // Remote rows only seed an empty local history unless asked.
            if sync || count == 0 {
                history.load().await?;
            }

            let mut query = HistoryQuery::new();
            if let Some(platform) = platform {
                query = query.platform(platform);
            }
            if let Some(term) = search {
                query = query.search(term);
            }

            let entries = history.query(&query).await;
            if json {
                render::print_json(&entries)?;
            } else if entries.is_empty() {
                eprintln!("Nenhum histórico encontrado.");
            } else {
                render::print_copies(&entries);
            }
        }
        HistoryCommand::Remove { id } => {
            if !history.remove(&id).await? {
                bail!("No history entry with id {id}");
            }
            eprintln!("Removido: {id}");
        }
        HistoryCommand::Edit { id, text } => {
            if !history.update_text(&id, &text).await? {
                bail!("No history entry with id {id}");
            }
            eprintln!("Atualizado: {id}");
        }
        HistoryCommand::Clear => {
            history.clear().await?;
            eprintln!("Histórico limpo.");
        }
    }

    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[derive(Parser)]
    struct Args {
        #[command(subcommand)]
        command: HistoryCommand,
    }

    #[test]
    fn test_list_syncs_only_on_request() {
        let args = Args::try_parse_from(["history", "list"]).unwrap();
        assert!(matches!(args.command, HistoryCommand::List { sync: false, .. }));

        let args = Args::try_parse_from(["history", "list", "--sync", "-p", "shopee"]).unwrap();
        match args.command {
            HistoryCommand::List { sync, platform, .. } => {
                assert!(sync);
                assert_eq!(platform, Some(Platform::Shopee));
            }
            _ => panic!("expected list"),
        }
    }
}
