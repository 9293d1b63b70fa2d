//! Layered settings loading.
//!
//! Sources, lowest precedence first:
//! 1. built-in defaults from [`ClientSettings::default`];
//! 2. a TOML file, either given explicitly (must exist) or the default
//!    `<config dir>/parley/config.toml` (optional);
//! 3. `PARLEY_*` environment variables, e.g. `PARLEY_BASE_URL` or
//!    `PARLEY_REFRESH_TIMEOUT_MS`.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File, FileFormat};
use parley_domain::{ClientSettings, DomainError};
use tracing::debug;

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "PARLEY";

/// Errors raised while loading settings.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A source could not be read or deserialized.
    #[error("failed to load settings: {0}")]
    Load(#[from] config::ConfigError),

    /// The merged settings are not usable.
    #[error("invalid settings: {0}")]
    Invalid(#[from] DomainError),
}

/// Default settings file location.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("parley").join("config.toml"))
}

/// Loads settings from defaults, the settings file and the process
/// environment.
///
/// # Errors
///
/// Returns an error if an explicitly given file is missing, a source cannot
/// be parsed, or the merged settings fail validation.
pub fn load_settings(file: Option<&Path>) -> Result<ClientSettings, ConfigError> {
    load_with_env(file, Environment::with_prefix(ENV_PREFIX))
}

fn load_with_env(file: Option<&Path>, env: Environment) -> Result<ClientSettings, ConfigError> {
    let defaults = ClientSettings::default();

    let mut builder = Config::builder()
        .set_default("base_url", defaults.base_url)?
        .set_default("login_path", defaults.login_path)?
        .set_default("register_path", defaults.register_path)?
        .set_default("refresh_path", defaults.refresh_path)?
        .set_default("profile_path", defaults.profile_path)?
        .set_default("access_field", defaults.access_field)?
        .set_default("refresh_timeout_ms", defaults.refresh_timeout_ms)?
        .set_default("request_timeout_ms", defaults.request_timeout_ms)?
        .set_default("user_agent", defaults.user_agent)?;

    match file {
        Some(path) => {
            debug!(path = %path.display(), "loading settings file");
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(true));
        }
        None => {
            if let Some(path) = default_config_path() {
                builder = builder.add_source(
                    File::from(path.as_path())
                        .format(FileFormat::Toml)
                        .required(false),
                );
            }
        }
    }

    let settings: ClientSettings = builder
        .add_source(env.try_parsing(true))
        .build()?
        .try_deserialize()?;

    settings.validate()?;
    Ok(settings)
}
