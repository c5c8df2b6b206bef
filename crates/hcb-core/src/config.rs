use std::{
    env, fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{errors::Error, Result};

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];

/// Credentials and display name the backend logs in with.
#[derive(Clone, Debug, Default)]
pub struct BotIdentity {
    /// Authentication token. Validated by the backend, not here.
    pub token: Option<String>,
    pub name: String,
}

#[derive(Clone, Debug)]
pub struct LogSettings {
    pub level: String,
    pub file: Option<PathBuf>,
}

/// Typed bot configuration.
///
/// Storage and plugin directories are passed through to the host framework as-is.
#[derive(Clone, Debug)]
pub struct Config {
    pub backend: String,
    pub identity: BotIdentity,
    pub data_dir: PathBuf,
    pub extra_plugin_dir: Option<PathBuf>,
    pub extra_backend_dir: Option<PathBuf>,
    pub log: LogSettings,
    pub admins: Vec<String>,
    pub poll_interval: Duration,
}

impl Config {
    /// Load from the process environment, reading `.env` first if present.
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).and_then(non_empty);

        let backend = get("BACKEND").unwrap_or_else(|| "hoge".to_string());

        let identity = BotIdentity {
            token: get("BOT_IDENTITY_TOKEN"),
            name: get("BOT_IDENTITY_NAME").unwrap_or_else(|| "hcb".to_string()),
        };

        let data_dir = get("BOT_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./data"));
        let extra_plugin_dir = get("BOT_EXTRA_PLUGIN_DIR").map(PathBuf::from);
        let extra_backend_dir = get("BOT_EXTRA_BACKEND_DIR").map(PathBuf::from);

        let log = LogSettings {
            level: get("BOT_LOG_LEVEL")
                .map(|s| s.trim().to_lowercase())
                .unwrap_or_else(|| "info".to_string()),
            file: get("BOT_LOG_FILE").map(PathBuf::from),
        };

        if !LOG_LEVELS.contains(&log.level.as_str()) {
            return Err(Error::Config(format!(
                "BOT_LOG_LEVEL must be one of {}, got {:?}",
                LOG_LEVELS.join(", "),
                log.level
            )));
        }

        let admins = parse_csv(get("BOT_ADMINS"));

        let poll_interval = Duration::from_millis(
            get("BOT_POLL_INTERVAL_MS")
                .and_then(|s| s.trim().parse::<u64>().ok())
                .unwrap_or(1000),
        );

        Ok(Self {
            backend,
            identity,
            data_dir,
            extra_plugin_dir,
            extra_backend_dir,
            log,
            admins,
            poll_interval,
        })
    }
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim();
        if key.is_empty() {
            continue;
        }
        if env::var_os(key).is_some() {
            continue; // do not override existing env
        }

        env::set_var(key, strip_quotes(v.trim()));
    }
}

fn strip_quotes(val: &str) -> &str {
    if val.len() >= 2
        && ((val.starts_with('"') && val.ends_with('"'))
            || (val.starts_with('\'') && val.ends_with('\'')))
    {
        &val[1..val.len() - 1]
    } else {
        val
    }
}

fn parse_csv(v: Option<String>) -> Vec<String> {
    v.unwrap_or_default()
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}
