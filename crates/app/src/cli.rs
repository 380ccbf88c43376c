//! Command-line surface.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "agreement-lens",
    version,
    about = "Send an agreement page or link to the analysis server and view the report"
)]
pub struct Cli {
    /// Analysis server base URL
    #[arg(long, env = "AGREEMENT_LENS_SERVER", global = true)]
    pub server: Option<String>,

    /// Settings file (defaults to the user config directory)
    #[arg(long, global = true)]
    pub settings: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the context-menu entries
    Menus,
    /// Analyze the text of a local page (HTML or plain text)
    Page {
        file: PathBuf,
        #[command(flatten)]
        display: DisplayArgs,
    },
    /// Analyze the agreement behind a link
    Link {
        url: String,
        /// Page the link was clicked in; used as the overlay host
        #[arg(long)]
        from: Option<PathBuf>,
        #[command(flatten)]
        display: DisplayArgs,
    },
    /// Show or change the stored configuration
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
    /// Check that the analysis server is reachable
    Status,
}

#[derive(Debug, Args)]
pub struct DisplayArgs {
    /// Show the result as an overlay on the page instead of a result tab
    #[arg(long)]
    pub overlay: bool,
    /// Send only the key and the input; let the server pick the model
    #[arg(long)]
    pub minimal_payload: bool,
    /// Write result pages without opening them in the browser
    #[arg(long)]
    pub no_open: bool,
    /// Directory for generated result pages
    #[arg(long)]
    pub out_dir: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum SettingsAction {
    Show,
    Set(SettingsUpdate),
}

#[derive(Debug, Args)]
pub struct SettingsUpdate {
    #[arg(long)]
    pub api_key: Option<String>,
    #[arg(long)]
    pub provider: Option<String>,
    #[arg(long)]
    pub model: Option<String>,
    #[arg(long)]
    pub temperature: Option<f64>,
    #[arg(long)]
    pub free_tier: Option<bool>,
    #[arg(long)]
    pub rpm_limit: Option<u32>,
    #[arg(long)]
    pub language: Option<String>,
}

impl SettingsUpdate {
    pub fn is_empty(&self) -> bool {
        self.api_key.is_none()
            && self.provider.is_none()
            && self.model.is_none()
            && self.temperature.is_none()
            && self.free_tier.is_none()
            && self.rpm_limit.is_none()
            && self.language.is_none()
    }

    pub fn apply(self, config: &mut shared::settings::Configuration) {
        if let Some(v) = self.api_key {
            config.api_key = v;
        }
        if let Some(v) = self.provider {
            config.model_provider = v;
        }
        if let Some(v) = self.model {
            config.model_name = v;
        }
        if let Some(v) = self.temperature {
            config.temperature = v;
        }
        if let Some(v) = self.free_tier {
            config.free_tier_enabled = v;
        }
        if let Some(v) = self.rpm_limit {
            config.requests_per_minute_limit = v;
        }
        if let Some(v) = self.language {
            config.language = v;
        }
    }
}
