//! # libris CLI entry point
//!
//! Parses arguments, installs the log subscriber, opens the client around
//! the file-backed credential store and dispatches to the subcommand
//! handlers on a single-threaded runtime.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use libris_app::{FileCredentialStore, Libris};
use libris_cli::admin::{run_admin, AdminArgs};
use libris_cli::catalog::{run_books, run_popular, run_recommend, BooksArgs, RecommendArgs};
use libris_cli::loans::{run_borrow, run_loans, run_return, BorrowArgs, LoansArgs, ReturnArgs};
use libris_cli::profile::{run_profile, ProfileArgs};
use libris_cli::session::{
    run_login, run_logout, run_register, run_whoami, LoginArgs, RegisterArgs,
};
use libris_cli::{expire_rejected_session, load_config, print_notifications};

/// Libris catalog client.
///
/// Search the catalog, borrow and return books, rate what you read, and
/// manage the inventory as an administrator.
#[derive(Parser, Debug)]
#[command(name = "libris", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a YAML configuration file. Defaults to `LIBRIS_*` variables.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Backend base URL, overriding the configuration.
    #[arg(long, global = true)]
    backend_url: Option<String>,

    /// Log line format.
    #[arg(long, value_enum, default_value = "text", global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Log in and remember the session.
    Login(LoginArgs),
    /// Forget the stored session.
    Logout,
    /// Show who the stored session belongs to.
    Whoami,
    /// Create a member account.
    Register(RegisterArgs),
    /// List or search the catalog.
    Books(BooksArgs),
    /// Show the most borrowed books.
    Popular,
    /// Recommend books similar to a title.
    Recommend(RecommendArgs),
    /// Borrow a book.
    Borrow(BorrowArgs),
    /// List your loans.
    Loans(LoansArgs),
    /// Return a loan, optionally rating the book.
    Return(ReturnArgs),
    /// View or edit your profile.
    Profile(ProfileArgs),
    /// Administration.
    Admin(AdminArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    match cli.log_format {
        LogFormat::Text => subscriber.init(),
        LogFormat::Json => subscriber.json().init(),
    }

    match run(cli) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

fn run(cli: Cli) -> Result<u8> {
    let config = load_config(cli.config.as_deref(), cli.backend_url.as_deref())?;
    tracing::debug!(backend = %config.backend_url, "configuration loaded");

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("starting async runtime")?;

    runtime.block_on(async {
        let store = Arc::new(FileCredentialStore::new(config.credential_path.clone()));
        let (mut libris, mut inbox) = Libris::open(&config, store)?;

        let had_session = libris.session().credential().is_some();
        let result = dispatch(cli.command, &mut libris).await;
        if let Err(e) = &result {
            expire_rejected_session(&libris, had_session, e);
        }
        print_notifications(&mut inbox);
        result
    })
}

async fn dispatch(command: Commands, libris: &mut Libris) -> Result<u8> {
    match command {
        Commands::Login(args) => run_login(&args, libris).await,
        Commands::Logout => run_logout(libris).await,
        Commands::Whoami => run_whoami(libris).await,
        Commands::Register(args) => run_register(&args, libris).await,
        Commands::Books(args) => run_books(&args, libris).await,
        Commands::Popular => run_popular(libris).await,
        Commands::Recommend(args) => run_recommend(&args, libris).await,
        Commands::Borrow(args) => run_borrow(&args, libris).await,
        Commands::Loans(args) => run_loans(&args, libris).await,
        Commands::Return(args) => run_return(&args, libris).await,
        Commands::Profile(args) => run_profile(&args, libris).await,
        Commands::Admin(args) => run_admin(&args, libris).await,
    }
}
