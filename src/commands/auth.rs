//! Keyring token management
//!
//! `login` and `logout` write to the OS keyring through
//! [`TokenStore`]; `status` reports which credential source the next request
//! would use without printing the token itself.

use colored::Colorize;

use crate::cli::AuthCommand;
use crate::config::Config;
use crate::error::Result;
use crate::rpc::token_store::TokenStore;

/// Dispatch an `auth` subcommand.
pub fn handle_auth(config: &Config, command: AuthCommand) -> Result<()> {
    match command {
        AuthCommand::Login { token, user_id } => {
            let user_id = user_id.unwrap_or_else(|| config.auth.user_id.clone());
            login(&user_id, &token)
        }
        AuthCommand::Logout { user_id } => {
            let user_id = user_id.unwrap_or_else(|| config.auth.user_id.clone());
            logout(&user_id)
        }
        AuthCommand::Status => status(config),
    }
}

fn login(user_id: &str, token: &str) -> Result<()> {
    let stored = TokenStore.save_token(user_id, token)?;
    println!(
        "{} token for account '{}' saved to the system keyring",
        "✓".green(),
        TokenStore::account_name(&stored.user_id)
    );
    if !user_id.trim().is_empty() {
        println!("Set auth.use_keyring: true in your config to send it with every request.");
    }
    Ok(())
}

fn logout(user_id: &str) -> Result<()> {
    TokenStore.delete_token(user_id)?;
    println!(
        "Removed stored token for account '{}'",
        TokenStore::account_name(user_id)
    );
    Ok(())
}

fn status(config: &Config) -> Result<()> {
    println!("Service URL: {}", config.service.url);
    println!("{}", describe_credentials(config, keyring_state(config)));
    Ok(())
}

/// What the keyring holds for the configured account.
#[derive(Debug, Clone, PartialEq, Eq)]
enum KeyringState {
    NotConsulted,
    Stored(String),
    Empty,
    Unavailable(String),
}

fn keyring_state(config: &Config) -> KeyringState {
    if !config.auth.use_keyring {
        return KeyringState::NotConsulted;
    }
    match TokenStore.load_token(&config.auth.user_id) {
        Ok(Some(stored)) => KeyringState::Stored(stored.saved_at.to_rfc3339()),
        Ok(None) => KeyringState::Empty,
        Err(e) => KeyringState::Unavailable(format!("{:#}", e)),
    }
}

fn describe_credentials(config: &Config, keyring: KeyringState) -> String {
    let account = TokenStore::account_name(&config.auth.user_id);
    match keyring {
        KeyringState::Stored(saved_at) => {
            format!("Credentials: keyring token for '{}' (saved {})", account, saved_at)
        }
        KeyringState::Empty => format!(
            "Credentials: keyring enabled but no token stored for '{}'; requests are unauthenticated",
            account
        ),
        KeyringState::Unavailable(reason) => {
            format!("Credentials: keyring unavailable ({})", reason)
        }
        KeyringState::NotConsulted if !config.auth.token.is_empty() => {
            "Credentials: static token from configuration".to_string()
        }
        KeyringState::NotConsulted => "Credentials: none; requests are unauthenticated".to_string(),
    }
}
