//! Maps validated CLI matches to an [`Action`].

use crate::cli::actions::{
    session::{self, Command},
    Action,
};
use crate::cli::commands::{self, session as cmd};
use crate::cli::globals::GlobalArgs;
use anyhow::{anyhow, Context, Result};
use clap::ArgMatches;
use secrecy::SecretString;
use std::path::PathBuf;
use url::Url;

fn required(matches: &ArgMatches, id: &str) -> Result<String> {
    matches
        .get_one::<String>(id)
        .cloned()
        .with_context(|| format!("missing required argument: {id}"))
}

fn password(matches: &ArgMatches) -> Result<SecretString> {
    required(matches, cmd::ARG_PASSWORD).map(SecretString::from)
}

/// # Errors
/// Returns an error if required arguments are missing or malformed.
pub fn handler(matches: &ArgMatches) -> Result<Action> {
    let api_url = required(matches, commands::ARG_API_URL)?;
    let store_path = matches
        .get_one::<String>(commands::ARG_STORE)
        .map(PathBuf::from);
    let globals = GlobalArgs::new(api_url, store_path);

    let (name, sub) = matches
        .subcommand()
        .ok_or_else(|| anyhow!("no command given"))?;

    let command = match name {
        cmd::CMD_LOGIN => Command::Login {
            email: required(sub, cmd::ARG_EMAIL)?,
            password: password(sub)?,
        },
        cmd::CMD_REGISTER => Command::Register {
            email: sub.get_one::<String>(cmd::ARG_EMAIL).cloned(),
            password: password(sub)?,
            name: required(sub, cmd::ARG_NAME)?,
            invitation: sub.get_one::<String>(cmd::ARG_INVITATION).cloned(),
        },
        cmd::CMD_LOGOUT => Command::Logout,
        cmd::CMD_WHOAMI => Command::WhoAmI,
        cmd::CMD_GOOGLE_URL => Command::GoogleUrl,
        cmd::CMD_CALLBACK => {
            let raw = required(sub, cmd::ARG_URL)?;
            Command::Callback {
                url: Url::parse(&raw).context("invalid callback URL")?,
            }
        }
        cmd::CMD_QUICK_LOGIN => Command::QuickLogin,
        cmd::CMD_REFRESH => Command::Refresh,
        cmd::CMD_RENEW => Command::Renew,
        cmd::CMD_INVITATION => Command::Invitation {
            token: required(sub, cmd::ARG_TOKEN)?,
        },
        cmd::CMD_CHECK => Command::Check {
            path: required(sub, cmd::ARG_PATH)?,
            require_admin: sub.get_flag(cmd::ARG_ADMIN),
        },
        other => return Err(anyhow!("unknown command: {other}")),
    };

    Ok(Action::Session(session::Args { globals, command }))
}
