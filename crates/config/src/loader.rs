use std::path::{Path, PathBuf};

use {secrecy::Secret, tracing::debug};

use crate::{Error, Result, env_subst::substitute_env, schema::RelayConfig};

/// Standard config file names, checked in order.
const CONFIG_FILENAMES: &[&str] = &[
    "inbox-relay.toml",
    "inbox-relay.yaml",
    "inbox-relay.yml",
    "inbox-relay.json",
];

/// Load config from the given path (any supported format).
pub fn load_config(path: &Path) -> Result<RelayConfig> {
    let raw = std::fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&substitute_env(&raw), path)
}

/// Load the effective configuration.
///
/// Reads `explicit` when given, otherwise the first discovered config file,
/// otherwise starts from defaults. Environment overrides are applied last.
pub fn load(explicit: Option<&Path>) -> Result<RelayConfig> {
    let path = explicit.map(Path::to_path_buf).or_else(find_config_file);
    let mut config = match path {
        Some(path) => {
            debug!(path = %path.display(), "loading config");
            load_config(&path)?
        },
        None => {
            debug!("no config file found, using environment only");
            RelayConfig::default()
        },
    };
    apply_env_overrides(&mut config, |name| std::env::var(name).ok())?;
    Ok(config)
}

/// Find the first config file in standard locations.
///
/// Search order:
/// 1. `./inbox-relay.{toml,yaml,yml,json}`
/// 2. `~/.config/inbox-relay/inbox-relay.{toml,yaml,yml,json}`
pub fn find_config_file() -> Option<PathBuf> {
    let local = CONFIG_FILENAMES.iter().map(PathBuf::from);
    let global = config_dir()
        .into_iter()
        .flat_map(|dir| CONFIG_FILENAMES.iter().map(move |name| dir.join(name)));
    local.chain(global).find(|p| p.exists())
}

/// Returns the user-global config directory (`~/.config/inbox-relay/`).
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "inbox-relay").map(|d| d.config_dir().to_path_buf())
}

/// Apply the deployment environment variables on top of `config`.
///
/// Only non-empty variables override file values.
pub fn apply_env_overrides(
    config: &mut RelayConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<()> {
    let var = |name: &str| lookup(name).filter(|v| !v.is_empty());

    if let Some(token) = var("BOT_TOKEN") {
        config.telegram.token = Secret::new(token);
    }
    if let Some(raw) = var("TG_USER_ID") {
        let id = raw
            .trim()
            .parse::<u64>()
            .map_err(|e| Error::invalid_value("TG_USER_ID", e.to_string()))?;
        config.telegram.authorized_user_id = Some(id);
    }
    if let Some(token) = var("DYNALIST_TOKEN") {
        config.inbox.token = Secret::new(token);
    }
    if let Some(account_id) = var("CF_ACCOUNT_ID") {
        config.storage.account_id = account_id;
    }
    if let Some(key_id) = var("CF_ACCESS_KEY_ID") {
        config.storage.access_key_id = key_id;
    }
    if let Some(secret) = var("CF_ACCESS_KEY_SECRET") {
        config.storage.access_key_secret = Secret::new(secret);
    }
    if let Some(bucket) = var("CF_BUCKET_NAME") {
        config.storage.bucket = bucket;
    }
    Ok(())
}

fn parse_config(raw: &str, path: &Path) -> Result<RelayConfig> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match ext {
        "toml" => toml::from_str(raw).map_err(|e| Error::parse(path, e)),
        "yaml" | "yml" => serde_yaml::from_str(raw).map_err(|e| Error::parse(path, e)),
        "json" => serde_json::from_str(raw).map_err(|e| Error::parse(path, e)),
        other => Err(Error::UnsupportedFormat(other.to_string())),
    }
}
