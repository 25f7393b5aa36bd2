//! Security module
//!
//! Keeps the suggestion service API key out of the config file: OS keyring
//! first, a private file as fallback, and an environment override.

pub mod keyring;

use anyhow::Result;

/// Set API key in secure keyring
pub fn set_api_key(key: &str) -> Result<()> {
    keyring::set_api_key(key)
}

/// Get API key (environment, then keyring, then file)
pub fn get_api_key() -> Result<String> {
    keyring::get_api_key()
}

/// Delete API key from keyring and file
pub fn delete_api_key() -> Result<()> {
    keyring::delete_api_key()
}

/// Check if an API key is available from any source
pub fn has_api_key() -> bool {
    keyring::has_api_key()
}
