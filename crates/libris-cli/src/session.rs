//! # Session Subcommands
//!
//! `login`, `logout`, `whoami` and `register`. The credential is persisted
//! by the file-backed store, so a login carries over to later invocations.

use anyhow::Result;
use clap::Args;
use zeroize::Zeroizing;

use libris_app::Libris;
use libris_client::users::Registration;

use crate::render::identity_line;

/// Arguments for `libris login`.
#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Account name.
    pub username: String,
    /// Password. Read from `LIBRIS_PASSWORD` when omitted.
    #[arg(long, env = "LIBRIS_PASSWORD", hide_env_values = true)]
    pub password: String,
}

/// Arguments for `libris register`.
#[derive(Args, Debug)]
pub struct RegisterArgs {
    /// Account name.
    pub username: String,
    /// Contact email.
    #[arg(long)]
    pub email: String,
    /// Display name.
    #[arg(long)]
    pub full_name: String,
    /// Password. Read from `LIBRIS_PASSWORD` when omitted.
    #[arg(long, env = "LIBRIS_PASSWORD", hide_env_values = true)]
    pub password: String,
}

pub async fn run_login(args: &LoginArgs, libris: &Libris) -> Result<u8> {
    let password = Zeroizing::new(args.password.clone());
    match libris.session().login(&args.username, &password).await? {
        Some(identity) => println!("Logged in as {}", identity_line(&identity)),
        // The server accepted the login but its token carries no readable
        // claims; it is still stored and sent.
        None => println!("Logged in as {}", args.username),
    }
    Ok(0)
}

pub async fn run_logout(libris: &Libris) -> Result<u8> {
    libris.session().logout()?;
    println!("Logged out");
    Ok(0)
}

pub async fn run_whoami(libris: &Libris) -> Result<u8> {
    match (libris.session().credential(), libris.session().identity()) {
        (None, _) => {
            println!("Not logged in");
            Ok(1)
        }
        (Some(_), Some(identity)) => {
            println!("{}", identity_line(&identity));
            Ok(0)
        }
        (Some(_), None) => {
            println!("Logged in (credential carries no readable identity)");
            Ok(0)
        }
    }
}

pub async fn run_register(args: &RegisterArgs, libris: &Libris) -> Result<u8> {
    let registration = Registration {
        username: args.username.clone(),
        password: Zeroizing::new(args.password.clone()),
        email: args.email.clone(),
        full_name: args.full_name.clone(),
    };
    libris.session().register(&registration).await?;
    println!("Registered {}. Log in to continue.", args.username);
    Ok(0)
}
