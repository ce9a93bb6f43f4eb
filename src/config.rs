use std::{
    env, fmt, fs,
    path::{Path, PathBuf},
    time::Duration,
};

use clap::{Parser, Subcommand};

use crate::error::ConfigError;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Environment variables searched for the generation credential, in order.
pub const API_KEY_VARS: [&str; 3] = ["SPROUT_API_KEY", "GEMINI_API_KEY", "API_KEY"];

const LOG_FILE_NAME: &str = "sprout.log";

#[derive(Debug, Parser)]
#[command(name = "sprout", version, about = "Write and deliver sermons from the terminal")]
pub struct Cli {
    /// Directory holding the saved sermon and the log file
    #[arg(long, env = "SPROUT_DATA_DIR", value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Log file (defaults to sprout.log inside the data directory)
    #[arg(long, env = "SPROUT_LOG_FILE", value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Model used for sermon generation
    #[arg(long, env = "SPROUT_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Base URL of the generation API
    #[arg(long, env = "SPROUT_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand, PartialEq, Eq)]
pub enum Command {
    /// Write the saved sermon to a JSON file
    Export {
        /// Target file (defaults to sprout-sermon-<date>.json)
        path: Option<PathBuf>,
    },
    /// Replace the saved sermon with a JSON file
    Import { path: PathBuf },
    /// Generate every section from the saved reference, verses and one point
    Generate,
    /// Clear the saved sermon
    Reset {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Print the saved sermon as plain text
    Show,
}

/// Settings for the text-generation service.
#[derive(Clone)]
pub struct GenerationSettings {
    pub api_key: Option<String>,
    pub model: String,
    pub endpoint: String,
    pub timeout: Duration,
}

impl fmt::Debug for GenerationSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerationSettings")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Fully resolved runtime configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub data_dir: PathBuf,
    pub log_file: PathBuf,
    pub generation: GenerationSettings,
}

impl Config {
    pub fn from_cli(cli: &Cli) -> Self {
        Self::resolve(cli, |name| env::var(name).ok(), dirs::data_dir())
    }

    /// Resolves the configuration from parsed arguments, an environment
    /// lookup and the platform data directory.
    pub fn resolve(
        cli: &Cli,
        lookup: impl Fn(&str) -> Option<String>,
        platform_data_dir: Option<PathBuf>,
    ) -> Self {
        let data_dir = cli.data_dir.clone().unwrap_or_else(|| {
            platform_data_dir
                .map(|dir| dir.join("sprout"))
                .unwrap_or_else(|| PathBuf::from("."))
        });
        let log_file = cli
            .log_file
            .clone()
            .unwrap_or_else(|| data_dir.join(LOG_FILE_NAME));
        let api_key = API_KEY_VARS
            .iter()
            .filter_map(|name| lookup(name))
            .find(|value| !value.trim().is_empty());

        Self {
            data_dir,
            log_file,
            generation: GenerationSettings {
                api_key,
                model: cli.model.clone(),
                endpoint: cli.endpoint.clone(),
                timeout: REQUEST_TIMEOUT,
            },
        }
    }

    pub fn ensure_data_dir(&self) -> Result<&Path, ConfigError> {
        fs::create_dir_all(&self.data_dir).map_err(|error| ConfigError::CreateDir {
            path: self.data_dir.clone(),
            error,
        })?;
        Ok(&self.data_dir)
    }
}
