use crate::config::Config;
use crate::keyring;
use anyhow::Result;

/// Save the settings API token in the system keyring
pub fn login(token: &str) -> Result<()> {
    keyring::store_api_token(token)?;
    println!("✓ API token saved to secure storage");
    Ok(())
}

pub fn logout() -> Result<()> {
    if keyring::delete_api_token()? {
        println!("✓ API token removed");
    } else {
        println!("No stored API token.");
    }
    Ok(())
}

pub fn status(config: &Config) -> Result<()> {
    if !config.sync.enabled {
        println!("Sync disabled.");
    } else if config.get_api_token().is_some() {
        println!("Sync enabled: {}", config.sync.api_url);
    } else {
        println!("Sync enabled but no API token. Run 'htrack auth login <TOKEN>'.");
    }
    Ok(())
}
