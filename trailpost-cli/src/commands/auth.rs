//! The one-time console authorization flow.

use super::load_config;
use anyhow::{Context, Result};
use std::path::Path;
use trailpost_core::Secrets;
use trailpost_photos::oauth_helper;

pub fn auth_url(config_path: &Path) -> Result<()> {
    let config = load_config(config_path)?;
    let helper = oauth_helper(&config.photos, &Secrets::from_env())
        .context("Client credentials are required")?;

    println!("Authorize this app by visiting this url:");
    println!("{}", helper.authorize_url());
    Ok(())
}

pub async fn auth_token(config_path: &Path, code: &str) -> Result<()> {
    let config = load_config(config_path)?;
    let helper = oauth_helper(&config.photos, &Secrets::from_env())
        .context("Client credentials are required")?;

    let refresh_token = helper
        .redeem_code(code)
        .await
        .context("Error retrieving refresh token")?;

    println!("\nSUCCESS! Here is your refresh token:\n");
    println!("{}", refresh_token);
    println!("\nAdd this to your .env file as GOOGLE_REFRESH_TOKEN");
    Ok(())
}
