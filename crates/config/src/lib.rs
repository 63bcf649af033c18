//! Configuration loading, validation, env substitution and env overrides.
//!
//! Config files: `inbox-relay.toml`, `inbox-relay.yaml`, or `inbox-relay.json`,
//! searched in `./` then `~/.config/inbox-relay/`. Deployment environment
//! variables (`BOT_TOKEN`, `DYNALIST_TOKEN`, `TG_USER_ID`, `CF_*`) override
//! file values.
//!
//! Supports `${ENV_VAR}` substitution in all string values.

pub mod env_subst;
pub mod error;
pub mod loader;
pub mod schema;
pub mod validate;

pub use {
    error::{Error, Result},
    loader::{apply_env_overrides, config_dir, find_config_file, load, load_config},
    schema::{InboxConfig, RelayConfig, StorageConfig, TelegramConfig},
    validate::{Diagnostic, Severity, ValidationResult, validate},
};
