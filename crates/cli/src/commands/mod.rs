//! Command implementations. Each returns the text to print.

pub mod cart;
pub mod catalog;
pub mod checkout;

use std::path::{Path, PathBuf};

use dropship_cart::{CartStore, FileStorage, StorageError};
use dropship_storefront::api::{ApiError, CommerceClient};
use dropship_storefront::checkout::CheckoutError;
use dropship_storefront::config::{CommerceApiConfig, ConfigError};
use thiserror::Error;

/// Environment variable naming the profile directory.
const PROFILE_DIR_VAR: &str = "DROPSHIP_PROFILE_DIR";

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Commerce API error: {0}")]
    Api(#[from] ApiError),

    #[error("Checkout failed: {0}")]
    Checkout(#[from] CheckoutError),

    #[error("Cannot open profile directory: {0}")]
    Storage(#[from] StorageError),

    #[error("No profile directory: pass --profile-dir or set {PROFILE_DIR_VAR}")]
    NoProfileDir,

    #[error("Product {id} is priced in {product}, the cart is in {cart}")]
    CurrencyMismatch {
        id: String,
        product: String,
        cart: String,
    },
}

/// The directory a browser profile's cart is persisted in.
#[derive(Debug, Clone)]
pub struct Profile {
    dir: PathBuf,
}

impl Profile {
    /// Pick the profile directory: explicit flag, then `DROPSHIP_PROFILE_DIR`,
    /// then `$HOME/.dropship`.
    ///
    /// # Errors
    ///
    /// Returns `CliError::NoProfileDir` if none of them is available.
    pub fn resolve(explicit: Option<PathBuf>) -> Result<Self, CliError> {
        dotenvy::dotenv().ok();

        let dir = resolve_dir(
            explicit,
            std::env::var_os(PROFILE_DIR_VAR).map(PathBuf::from),
            std::env::var_os("HOME").map(PathBuf::from),
        )
        .ok_or(CliError::NoProfileDir)?;
        Ok(Self { dir })
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Restore this profile's cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the directory
    /// cannot be created.
    pub fn open_cart(&self) -> Result<CartStore<FileStorage>, CliError> {
        let currency = CommerceApiConfig::from_env()?.currency;
        let storage = FileStorage::open(&self.dir)?;
        Ok(CartStore::restore_in(storage, currency))
    }
}

fn resolve_dir(
    explicit: Option<PathBuf>,
    from_env: Option<PathBuf>,
    home: Option<PathBuf>,
) -> Option<PathBuf> {
    explicit
        .or_else(|| from_env.filter(|dir| !dir.as_os_str().is_empty()))
        .or_else(|| home.map(|home| home.join(".dropship")))
}

/// Commerce API client configured from the environment.
///
/// # Errors
///
/// Returns an error if the configuration is invalid.
pub fn client() -> Result<CommerceClient, CliError> {
    let config = CommerceApiConfig::from_env()?;
    Ok(CommerceClient::new(&config)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_dir_precedence() {
        let flag = Some(PathBuf::from("/flag"));
        let env = Some(PathBuf::from("/env"));
        let home = Some(PathBuf::from("/home/ada"));

        assert_eq!(
            resolve_dir(flag, env.clone(), home.clone()),
            Some(PathBuf::from("/flag"))
        );
        assert_eq!(
            resolve_dir(None, env, home.clone()),
            Some(PathBuf::from("/env"))
        );
        assert_eq!(
            resolve_dir(None, Some(PathBuf::new()), home),
            Some(PathBuf::from("/home/ada/.dropship"))
        );
        assert_eq!(resolve_dir(None, None, None), None);
    }
}
