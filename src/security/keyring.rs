//! Keyring integration for secure API key storage
//! Falls back to file storage if keyring is unavailable

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;
use tracing::debug;

const SERVICE_NAME: &str = "course-flow";
const API_KEY_USERNAME: &str = "suggestion-api-key";
const API_KEY_FILE: &str = "api_key.txt";

/// Environment variable that takes precedence over stored keys
pub const API_KEY_ENV: &str = "COURSE_FLOW_API_KEY";

/// Get the path for the fallback API key file
fn api_key_file_path() -> Result<PathBuf> {
    let path = crate::config::config_path()?;
    let dir = path.parent().context("Config path has no parent")?;
    fs::create_dir_all(dir).context("Failed to create config directory")?;
    Ok(dir.join(API_KEY_FILE))
}

/// Set API key - tries keyring first, falls back to file
pub fn set_api_key(key: &str) -> Result<()> {
    if let Ok(entry) = keyring::Entry::new(SERVICE_NAME, API_KEY_USERNAME) {
        if entry.set_password(key).is_ok() {
            // Keep a file copy in case keyring retrieval fails later
            let _ = save_to_file(key);
            return Ok(());
        }
    }

    save_to_file(key)?;
    println!("Note: Using file-based storage (keyring unavailable)");
    Ok(())
}

fn save_to_file(key: &str) -> Result<()> {
    let path = api_key_file_path()?;
    fs::write(&path, key).context("Failed to write API key file")?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&path, fs::Permissions::from_mode(0o600))
            .context("Failed to set file permissions")?;
    }

    Ok(())
}

/// Get API key - environment, then keyring, then file
pub fn get_api_key() -> Result<String> {
    if let Some(key) = key_from_env() {
        debug!("Using API key from {}", API_KEY_ENV);
        return Ok(key);
    }

    if let Ok(entry) = keyring::Entry::new(SERVICE_NAME, API_KEY_USERNAME) {
        if let Ok(key) = entry.get_password() {
            return Ok(key);
        }
    }

    let path = api_key_file_path()?;
    let key = fs::read_to_string(&path)
        .context("Failed to read API key. Run 'course-flow config --set-api-key YOUR_KEY' first.")?;
    Ok(key.trim().to_string())
}

/// Delete API key from both keyring and file
pub fn delete_api_key() -> Result<()> {
    if let Ok(entry) = keyring::Entry::new(SERVICE_NAME, API_KEY_USERNAME) {
        let _ = entry.delete_credential();
    }

    let path = api_key_file_path()?;
    if path.exists() {
        fs::remove_file(&path).context("Failed to delete API key file")?;
    }

    Ok(())
}

/// Check if API key is set (environment, keyring or file)
pub fn has_api_key() -> bool {
    if key_from_env().is_some() {
        return true;
    }

    if let Ok(entry) = keyring::Entry::new(SERVICE_NAME, API_KEY_USERNAME) {
        if entry.get_password().is_ok() {
            return true;
        }
    }

    api_key_file_path().map(|p| p.exists()).unwrap_or(false)
}

fn key_from_env() -> Option<String> {
    normalize_key(std::env::var(API_KEY_ENV).ok())
}

/// Trimmed key, or `None` when blank
fn normalize_key(raw: Option<String>) -> Option<String> {
    raw.map(|k| k.trim().to_string()).filter(|k| !k.is_empty())
}
