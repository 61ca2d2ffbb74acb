//! Settings API token in the OS keyring.

use anyhow::{Context, Result};
use keyring::Entry;

const SERVICE_SYNC: &str = "healthtrack-sync";
const ACCOUNT: &str = "default";

fn token_entry() -> Result<Entry> {
    Entry::new(SERVICE_SYNC, ACCOUNT).context("Failed to open keyring entry for the API token")
}

/// Trim a pasted token and drop a leading `Bearer ` so the header is not
/// doubled when the client adds its own.
pub fn normalize_token(raw: &str) -> Result<&str> {
    let token = raw.trim_start();
    let token = match token.get(..7) {
        Some(prefix) if prefix.eq_ignore_ascii_case("bearer ") => &token[7..],
        _ => token,
    }
    .trim();

    if token.is_empty() {
        anyhow::bail!("Token must not be empty");
    }
    if token.chars().any(char::is_whitespace) {
        anyhow::bail!("Token must not contain whitespace");
    }
    Ok(token)
}

pub fn store_api_token(token: &str) -> Result<()> {
    let token = normalize_token(token)?;
    token_entry()?
        .set_password(token)
        .context("Failed to store API token in keyring")
}

/// `None` when no token has been stored.
pub fn get_api_token() -> Result<Option<String>> {
    match token_entry()?.get_password() {
        Ok(token) => Ok(Some(token)),
        Err(::keyring::Error::NoEntry) => Ok(None),
        Err(e) => Err(e).context("Failed to read API token from keyring"),
    }
}

/// Returns whether a token was actually removed.
pub fn delete_api_token() -> Result<bool> {
    match token_entry()?.delete_credential() {
        Ok(()) => Ok(true),
        Err(::keyring::Error::NoEntry) => Ok(false),
        Err(e) => Err(e).context("Failed to delete API token from keyring"),
    }
}
