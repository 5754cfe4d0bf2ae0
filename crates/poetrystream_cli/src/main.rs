//! Command-line entry point over `poetrystream_core`.
//!
//! # Responsibility
//! - Render poem files, sanitize redirects and reconcile sign-ins from a shell.
//! - Resolve database and logging settings from the environment.

use clap::{Parser, Subcommand, ValueEnum};
use log::error;
use poetrystream_core::db::open_db;
use poetrystream_core::{
    core_version, init_from_config, render_document, resolve_redirect, to_html, AppConfig,
    CandidateUser, PoemService, ProviderAccount, SignInCallback, SignInReconciler,
    SqliteAccountRepository, SqlitePoemRepository,
};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "poetrystream")]
#[command(about = "Render and manage PoetryStream poems")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render a poem JSON document.
    Render {
        file: PathBuf,
        #[arg(long, value_enum, default_value_t = RenderFormat::Html)]
        format: RenderFormat,
    },
    /// Print the sanitized post-auth redirect target.
    Redirect {
        #[arg(long)]
        url: String,
        /// Defaults to POETRYSTREAM_BASE_URL.
        #[arg(long)]
        base_url: Option<String>,
    },
    /// Reconcile a provider identity with the account store.
    SignIn {
        #[arg(long)]
        provider: String,
        #[arg(long)]
        account_id: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        image: Option<String>,
    },
    /// List a user's stored poems.
    Poems {
        #[arg(long)]
        user: String,
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long, default_value_t = 0)]
        offset: u32,
    },
    /// Print the core version.
    Version,
}

#[derive(Clone, Copy, ValueEnum)]
enum RenderFormat {
    Html,
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            error!("event=cli_exit module=cli status=error error={message}");
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), String> {
    let config = AppConfig::from_env().map_err(|err| err.to_string())?;
    init_from_config(&config).map_err(|err| err.to_string())?;

    match cli.command {
        Command::Render { file, format } => {
            let raw = fs::read_to_string(&file)
                .map_err(|err| format!("cannot read `{}`: {err}", file.display()))?;
            let view = render_document(&raw).map_err(|err| err.to_string())?;
            match format {
                RenderFormat::Html => println!("{}", to_html(&view)),
                RenderFormat::Json => println!(
                    "{}",
                    serde_json::to_string_pretty(&view).map_err(|err| err.to_string())?
                ),
            }
        }
        Command::Redirect { url, base_url } => {
            let base = base_url.unwrap_or_else(|| config.base_url.clone());
            println!("{}", resolve_redirect(&url, &base));
        }
        Command::SignIn {
            provider,
            account_id,
            email,
            name,
            image,
        } => {
            let conn = open_db(&config.db_path).map_err(|err| err.to_string())?;
            let repo = SqliteAccountRepository::try_new(&conn).map_err(|err| err.to_string())?;
            let callback = SignInCallback {
                user: CandidateUser {
                    name,
                    email: Some(email),
                    image,
                },
                account: ProviderAccount {
                    provider,
                    provider_account_id: account_id,
                },
            };
            let allowed = SignInReconciler::new(repo).sign_in(&callback);
            println!("{}", if allowed { "allow" } else { "deny" });
        }
        Command::Poems {
            user,
            limit,
            offset,
        } => {
            let conn = open_db(&config.db_path).map_err(|err| err.to_string())?;
            let repo = SqlitePoemRepository::try_new(&conn).map_err(|err| err.to_string())?;
            let page = PoemService::new(repo)
                .list_poems(&user, limit, offset)
                .map_err(|err| err.to_string())?;
            for stored in page.items {
                println!(
                    "{}\t{}\t{} stanza(s)\t{}",
                    stored.poem.id,
                    stored.updated_at,
                    stored.poem.stanzas.len(),
                    stored.title.as_deref().unwrap_or("(untitled)")
                );
            }
        }
        Command::Version => println!("poetrystream {}", core_version()),
    }
    Ok(())
}
