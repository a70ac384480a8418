use std::path::PathBuf;

use clap::Parser;

use crate::config::Settings;

#[derive(Debug, Parser)]
#[command(name = "cadenza", version, about = "Serve a music folder over HTTP with range streaming")]
pub struct Cli {
    /// Music library root (overrides `library.root`).
    pub library: Option<PathBuf>,

    /// Interface to bind (overrides `server.host`).
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on (overrides `server.port`).
    #[arg(short, long)]
    pub port: Option<u16>,
}

impl Cli {
    /// Layer command-line flags over loaded settings.
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(library) = &self.library {
            settings.library.root = library.clone();
        }
        if let Some(host) = &self.host {
            settings.server.host = host.clone();
        }
        if let Some(port) = self.port {
            settings.server.port = port;
        }
    }
}
