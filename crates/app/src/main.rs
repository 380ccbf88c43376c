mod cli;
mod host;

use anyhow::{bail, Context, Result};
use clap::Parser;
use cli::{Cli, Command, DisplayArgs, SettingsAction};
use controller::{ClickReport, MenuController, ResultPresenter};
use host::DesktopHost;
use providers::{AnalysisClient, DEFAULT_SERVER_URL};
use services::{FilePageTextExtractor, JsonSettingsStore};
use shared::analysis::PayloadFields;
use shared::menu::{menu_entries, MenuClick};
use shared::page::{PageTextExtractor, Tab, TabId};
use shared::presentation::PresentationStrategy;
use shared::settings::{SettingsStore, PERSISTED_KEYS};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings_path = match cli.settings.clone() {
        Some(path) => path,
        None => JsonSettingsStore::default_path()
            .context("no config directory available; pass --settings")?,
    };
    let store = Arc::new(JsonSettingsStore::new(settings_path.clone()));
    let server = cli.server.clone().unwrap_or_else(|| DEFAULT_SERVER_URL.to_string());

    match cli.command {
        Command::Menus => {
            for entry in menu_entries() {
                let contexts: Vec<&str> = entry.contexts.iter().map(|c| c.as_str()).collect();
                println!("{:<14} {:<32} [{}]", entry.id, entry.title, contexts.join(", "));
            }
        }
        Command::Page { file, display } => {
            if !file.exists() {
                bail!("page not found: {}", file.display());
            }
            let pages = Arc::new(FilePageTextExtractor::new());
            let tab = pages.open(&file);
            let controller = build_controller(&server, store, settings_path, pages, &display)?;
            report(controller.handle_click(MenuClick::page(tab)).await?);
        }
        Command::Link { url, from, display } => {
            let pages = Arc::new(FilePageTextExtractor::new());
            let tab = match from {
                Some(page) => pages.open(page),
                None => Tab::new(TabId(0)),
            };
            if display.overlay && pages.page_path(tab.id).is_none() {
                bail!("--overlay needs the page the link was clicked in (--from <FILE>)");
            }
            let controller = build_controller(&server, store, settings_path, pages, &display)?;
            report(controller.handle_click(MenuClick::link(tab, url)).await?);
        }
        Command::Settings { action } => match action {
            SettingsAction::Show => {
                let config = store.get().await?;
                println!("file: {}", store.path().display());
                println!("{:<14} {}", PERSISTED_KEYS[0], config.masked_api_key());
                println!("{:<14} {}", PERSISTED_KEYS[1], config.model_provider);
                println!("{:<14} {}", PERSISTED_KEYS[2], config.model_name);
                println!("{:<14} {}", PERSISTED_KEYS[3], config.temperature);
                println!("{:<14} {}", PERSISTED_KEYS[4], config.free_tier_enabled);
                println!("{:<14} {}", PERSISTED_KEYS[5], config.requests_per_minute_limit);
                println!("{:<14} {}", PERSISTED_KEYS[6], config.language);
            }
            SettingsAction::Set(update) => {
                if update.is_empty() {
                    bail!("nothing to change; see `agreement-lens settings set --help`");
                }
                let mut config = store.get().await?;
                update.apply(&mut config);
                store.set(&config).await?;
                println!("Saved!");
            }
        },
        Command::Status => {
            let client = AnalysisClient::new(&server, PayloadFields::Full)?;
            let status = client
                .status()
                .await
                .with_context(|| format!("analysis server at {} is not reachable", server))?;
            println!("{}: {}", client.base_url(), status);
        }
    }
    Ok(())
}

fn build_controller(
    server: &str,
    store: Arc<JsonSettingsStore>,
    settings_path: PathBuf,
    pages: Arc<FilePageTextExtractor>,
    display: &DisplayArgs,
) -> Result<MenuController> {
    let strategy = if display.overlay {
        PresentationStrategy::InPageOverlay
    } else {
        PresentationStrategy::NewTab
    };
    let fields = if display.minimal_payload {
        PayloadFields::Minimal
    } else {
        PayloadFields::Full
    };
    let out_dir = display
        .out_dir
        .clone()
        .unwrap_or_else(DesktopHost::default_out_dir);

    let host = Arc::new(DesktopHost::new(
        pages.clone(),
        out_dir,
        settings_path,
        !display.no_open,
    ));
    let client = Arc::new(AnalysisClient::new(server, fields)?);
    let presenter = ResultPresenter::new(host.clone(), strategy);
    let extractor: Arc<dyn PageTextExtractor> = pages;
    Ok(MenuController::new(store, extractor, client, host, presenter))
}

fn report(outcome: ClickReport) {
    match outcome {
        ClickReport::Presented(_)
        | ClickReport::AbortedMissingKey
        | ClickReport::AbortedNoText => {}
        ClickReport::Dropped(target) => {
            eprintln!("Result tab {} was closed before the report arrived", target.tab());
        }
        ClickReport::AbortedNoTab => eprintln!("Could not open a result tab"),
    }
}
