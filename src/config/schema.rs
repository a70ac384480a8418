use std::path::PathBuf;

use serde::Deserialize;

/// Top-level server settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/cadenza/config.toml` or `~/.config/cadenza/config.toml`
///
/// Precedence (highest wins):
/// 1) Command-line flags (applied after loading)
/// 2) Environment variables (prefix `CADENZA__`, `__` as nested separator)
/// 3) Config file (if present)
/// 4) Struct defaults
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub library: LibrarySettings,
    pub stream: StreamSettings,
    pub logging: LoggingSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerSettings::default(),
            library: LibrarySettings::default(),
            stream: StreamSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Interface to bind.
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// Music library root. Relative paths resolve against the working directory.
    pub root: PathBuf,
    /// Name of the JSON sidecar with metadata overrides, relative to `root`.
    pub metadata_file: String,
    /// File extensions to treat as audio (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// Whether to follow symlinks during scanning.
    pub follow_links: bool,
    /// Whether to include hidden files/directories (dotfiles).
    pub include_hidden: bool,
    /// Whether to recurse into subdirectories.
    pub recursive: bool,
    /// Optional cap on directory recursion depth.
    pub max_depth: Option<usize>,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            root: PathBuf::from("data"),
            metadata_file: "music-metadata.json".to_string(),
            extensions: vec![
                "mp3".into(),
                "ogg".into(),
                "opus".into(),
                "flac".into(),
                "m4a".into(),
                "wav".into(),
            ],
            follow_links: true,
            include_hidden: true,
            recursive: true,
            max_depth: None,
        }
    }
}

impl LibrarySettings {
    /// Absolute or working-directory-relative location of the metadata sidecar.
    pub fn metadata_path(&self) -> PathBuf {
        self.root.join(&self.metadata_file)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StreamSettings {
    /// `Cache-Control` value sent with every audio response.
    pub cache_control: String,
}

impl Default for StreamSettings {
    fn default() -> Self {
        Self {
            cache_control: "public, max-age=31536000, immutable".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// `EnvFilter` directive, e.g. `info` or `cadenza=debug,tower_http=info`.
    /// `RUST_LOG` takes precedence when set.
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Compact,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LogFormat {
    /// Multi-line, human-oriented output.
    Pretty,
    Compact,
    /// One JSON object per event.
    Json,
}
