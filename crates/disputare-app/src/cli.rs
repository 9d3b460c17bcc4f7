//! CLI argument definitions for the Disputare binary.
//!
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::Parser;
use std::path::PathBuf;

use disputare_core::config::DisputareConfig;
use disputare_core::types::Depth;

/// Disputare - share an opinion, get a devil's advocate.
#[derive(Parser, Debug)]
#[command(name = "disputare", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Starting depth: casual, thoughtful, deep or socratic.
    #[arg(short = 'd', long = "depth")]
    pub depth: Option<Depth>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,

    /// Model name to request.
    #[arg(short = 'm', long = "model")]
    pub model: Option<String>,

    /// Skip the disclaimer prompt.
    #[arg(long = "accept-disclaimer")]
    pub accept_disclaimer: bool,

    /// Answer locally with a canned reply instead of calling the remote API.
    #[arg(long = "offline")]
    pub offline: bool,
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > DISPUTARE_CONFIG env var > ~/.disputare/config.toml.
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("DISPUTARE_CONFIG") {
            return PathBuf::from(p);
        }
        default_config_path()
    }

    /// Resolve the log filter directive.
    ///
    /// Priority: --log-level flag > config file value.
    pub fn resolve_log_level(&self, config: &DisputareConfig) -> String {
        self.log_level
            .clone()
            .unwrap_or_else(|| config.general.log_level.clone())
    }

    /// Fold CLI overrides into the loaded configuration.
    pub fn apply_overrides(&self, config: &mut DisputareConfig) {
        if let Some(depth) = self.depth {
            config.conversation.default_depth = depth;
        }
        if let Some(ref model) = self.model {
            config.completion.model = model.clone();
        }
        if let Some(ref level) = self.log_level {
            config.general.log_level = level.clone();
        }
    }
}

/// Default config file path for the current platform.
fn default_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    if let Ok(home) = std::env::var("USERPROFILE") {
        return PathBuf::from(home).join(".disputare").join("config.toml");
    }
    #[cfg(not(target_os = "windows"))]
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".disputare").join("config.toml");
    }
    PathBuf::from("config.toml")
}
