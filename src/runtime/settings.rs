use tracing::{info, warn};

use crate::config::{self, ConfigSource, Settings};

use super::cli::Cli;

/// Settings for one server run plus how they were arrived at.
///
/// Logging is not up yet while settings load, so the outcome is kept here
/// and reported once the subscriber exists.
#[derive(Debug)]
pub struct LoadedSettings {
    pub settings: Settings,
    pub source: Option<ConfigSource>,
    /// Why the config was discarded in favor of defaults, if it was.
    pub fallback: Option<String>,
}

impl LoadedSettings {
    pub fn report(&self) {
        let path = self.source.as_ref().map(|s| s.path.display().to_string());
        match &self.fallback {
            Some(reason) => warn!(config = ?path, %reason, "config rejected, serving with defaults"),
            None => info!(config = ?path, "configuration loaded"),
        }
    }
}

pub fn load_settings(cli: &Cli) -> LoadedSettings {
    let source = config::resolve_config_source();
    let loaded = Settings::load_with(source.as_ref());
    resolve_settings(loaded, source, cli)
}

/// Validate what was loaded and layer the command-line flags on top.
///
/// A config that fails to load or validate is replaced by defaults so a bad
/// file never keeps the server down. Flags apply either way: the library
/// root given on the command line is served even when the file is broken.
pub fn resolve_settings(
    loaded: Result<Settings, ::config::ConfigError>,
    source: Option<ConfigSource>,
    cli: &Cli,
) -> LoadedSettings {
    let (mut settings, fallback) = match loaded {
        Ok(s) => match s.validate() {
            Ok(()) => (s, None),
            Err(msg) => (Settings::default(), Some(format!("invalid config: {msg}"))),
        },
        Err(e) => (Settings::default(), Some(format!("failed to load config: {e}"))),
    };

    cli.apply(&mut settings);

    LoadedSettings {
        settings,
        source,
        fallback,
    }
}
