use std::{
    env,
    path::{Component, Path, PathBuf},
};

use axum::http::HeaderValue;

use super::schema::Settings;

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_VAR: &str = "CADENZA_CONFIG_PATH";

/// The config file a server run reads, and whether it has to exist.
///
/// A path named through `CADENZA_CONFIG_PATH` is required, so a typo fails
/// loudly instead of silently serving the default library. The XDG default
/// is optional.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigSource {
    pub path: PathBuf,
    pub required: bool,
}

impl Settings {
    /// Layer `CADENZA__*` environment variables over `source` (if any) and
    /// the struct defaults.
    pub fn load_with(source: Option<&ConfigSource>) -> Result<Self, ::config::ConfigError> {
        let mut builder = ::config::Config::builder();

        if let Some(source) = source {
            builder = builder.add_source(
                ::config::File::from(source.path.as_path()).required(source.required),
            );
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("CADENZA")
                .separator("__")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }

    /// Reject settings the server cannot run with.
    pub fn validate(&self) -> Result<(), String> {
        if self.server.host.trim().is_empty() {
            return Err("server.host must not be empty".to_string());
        }
        if self.library.extensions.iter().all(|e| e.trim().is_empty()) {
            return Err("library.extensions must name at least one extension".to_string());
        }
        let metadata_file = self.library.metadata_file.trim();
        if metadata_file.is_empty() {
            return Err("library.metadata_file must not be empty".to_string());
        }
        // The sidecar lives inside the library, never beside or above it.
        if Path::new(metadata_file)
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return Err("library.metadata_file must be a path inside the library root".to_string());
        }
        if HeaderValue::from_str(&self.stream.cache_control).is_err() {
            return Err("stream.cache_control is not a valid header value".to_string());
        }
        Ok(())
    }
}

/// Pick the config file: `CADENZA_CONFIG_PATH` when set, else the XDG default.
pub fn resolve_config_source() -> Option<ConfigSource> {
    match env::var_os(CONFIG_PATH_VAR) {
        Some(p) if !p.is_empty() => Some(ConfigSource {
            path: PathBuf::from(p),
            required: true,
        }),
        _ => default_config_path().map(|path| ConfigSource {
            path,
            required: false,
        }),
    }
}

/// Compute the default config path under `$XDG_CONFIG_HOME/cadenza/config.toml`
/// or `~/.config/cadenza/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    let config_home = if let Some(xdg) = env::var_os("XDG_CONFIG_HOME") {
        Some(PathBuf::from(xdg))
    } else if let Some(home) = env::var_os("HOME") {
        Some(PathBuf::from(home).join(".config"))
    } else {
        None
    };

    config_home.map(|d| d.join("cadenza").join("config.toml"))
}
