use std::path::PathBuf;

mod backend_bridge;
mod controller;
mod ui;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use client_core::{HttpTodoStore, Settings};
use crossbeam_channel::bounded;
use tracing_subscriber::EnvFilter;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::ui::{Startup, TodoApp};

#[derive(Parser, Debug)]
#[command(name = "todo-desktop", about = "Desktop client for a remote todo list")]
struct Args {
    /// Base url of the todo API.
    #[arg(long)]
    api_url: Option<String>,
    /// Owner whose todos are shown.
    #[arg(long)]
    owner_id: Option<i64>,
    /// Config file to read instead of ./todo.toml.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let args = Args::parse();

    let settings = Settings::load(args.config.as_deref())
        .context("failed to load settings")?
        .with_overrides(args.api_url, args.owner_id);

    let startup = match settings.require_owner() {
        Ok(owner) => {
            let store = HttpTodoStore::from_settings(&settings)
                .context("failed to set up the todo api client")?;
            tracing::info!(api_url = store.api_url(), owner = owner.0, "starting desktop client");

            let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
            let (ui_tx, ui_rx) = bounded::<UiEvent>(1024);
            backend_bridge::runtime::launch(store, cmd_rx, ui_tx);
            Startup::Ready {
                owner,
                cmd_tx,
                ui_rx,
            }
        }
        Err(err) => {
            tracing::warn!("no owner configured: {err}");
            Startup::MissingOwner {
                reason: err.to_string(),
            }
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("todos")
            .with_inner_size([560.0, 680.0])
            .with_min_inner_size([380.0, 420.0]),
        ..Default::default()
    };
    eframe::run_native(
        "todos",
        options,
        Box::new(|_cc| Ok(Box::new(TodoApp::new(startup)))),
    )
    .map_err(|err| anyhow!("desktop ui exited with an error: {err}"))
}
