use std::process::ExitCode;

use affilizap_store::AuthOutcome;
use anyhow::Result;
use clap::Subcommand;

use crate::context::AppContext;

#[derive(Subcommand)]
pub enum AuthCommand {
    /// Sign in with email and password
    SignIn {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    /// Create an account
    SignUp {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        /// Full name stored with the account
        #[arg(long)]
        name: String,
    },

    /// Forget the saved session
    SignOut,

    /// Show the signed-in account
    Status,
}

pub async fn run(ctx: &AppContext, command: AuthCommand) -> Result<ExitCode> {
    let auth = ctx.authenticator()?;

    match command {
        AuthCommand::SignIn { email, password } => {
            let outcome = auth.sign_in(&email, &password).await?;
            report(&outcome);
        }
        AuthCommand::SignUp {
            email,
            password,
            name,
        } => {
            let outcome = auth.sign_up(&email, &password, &name).await?;
            report(&outcome);
        }
        AuthCommand::SignOut => {
            auth.sign_out().await?;
            eprintln!("Sessão encerrada.");
        }
        AuthCommand::Status => match auth.current_session().await? {
            Some(session) => {
                let name = session.user.display_name().unwrap_or_else(|| session.user.id.clone());
                println!("{name}");
            }
            None => {
                eprintln!("Nenhuma sessão ativa.");
                return Ok(ExitCode::FAILURE);
            }
        },
    }

    Ok(ExitCode::SUCCESS)
}

fn report(outcome: &AuthOutcome) {
    match outcome {
        AuthOutcome::SignedIn(session) => {
            let name = session
                .user
                .display_name()
                .unwrap_or_else(|| session.user.id.clone());
            eprintln!("Conectado como {name}.");
        }
        AuthOutcome::SignUpPending { message } => eprintln!("{message}"),
    }
}
