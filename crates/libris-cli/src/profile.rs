//! `libris profile show | update`.

use anyhow::Result;
use clap::{Args, Subcommand};

use libris_app::Libris;

/// Arguments for `libris profile`.
#[derive(Args, Debug)]
pub struct ProfileArgs {
    #[command(subcommand)]
    pub command: ProfileCommand,
}

#[derive(Subcommand, Debug)]
pub enum ProfileCommand {
    /// Show your account.
    Show,
    /// Change your display name and email. Omitted fields keep their
    /// current value.
    Update {
        #[arg(long)]
        full_name: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },
}

pub async fn run_profile(args: &ProfileArgs, libris: &Libris) -> Result<u8> {
    let account = libris.account();
    let current = account.profile().await?;

    match &args.command {
        ProfileCommand::Show => {
            println!("Username:  {}", current.username);
            println!("Full name: {}", current.full_name);
            println!("Email:     {}", current.email);
            println!("Role:      {}", current.role());
        }
        ProfileCommand::Update { full_name, email } => {
            let full_name = full_name.as_deref().unwrap_or(&current.full_name);
            let email = email.as_deref().unwrap_or(&current.email);
            account.update_profile(full_name, email).await?;
            println!("Profile saved");
        }
    }
    Ok(0)
}
