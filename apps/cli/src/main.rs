use std::{fmt::Write as _, io, path::PathBuf, process::ExitCode};

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use client_core::{ConfigError, HttpTodoStore, ListState, Settings, TodoController};
use shared::domain::{Filter, OwnerId, TodoId};
use tracing_subscriber::EnvFilter;

const MISSING_OWNER_EXIT: u8 = 2;

#[derive(Parser, Debug)]
#[command(name = "todo", about = "Manage a remote todo list from the terminal")]
struct Args {
    /// Base url of the todo API.
    #[arg(long, global = true)]
    api_url: Option<String>,
    /// Owner whose todos are listed and created.
    #[arg(long, global = true)]
    owner_id: Option<i64>,
    /// Config file to read instead of ./todo.toml.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show todos, optionally filtered.
    List {
        #[arg(long, default_value_t = Filter::All)]
        filter: Filter,
    },
    /// Create a todo from the given words.
    Add {
        #[arg(required = true, num_args = 1..)]
        title: Vec<String>,
    },
    /// Delete a single todo by id.
    Delete { id: i64 },
    /// Delete every completed todo.
    ClearCompleted,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let settings = Settings::load(args.config.as_deref())?
        .with_overrides(args.api_url.clone(), args.owner_id);
    let owner = match check_owner(&settings, &mut io::stderr()) {
        Ok(owner) => owner,
        Err(code) => return Ok(code),
    };

    let store = HttpTodoStore::from_settings(&settings)?;
    tracing::debug!(api_url = store.api_url(), owner = owner.0, "using todo api");
    let mut controller = TodoController::new(store);

    if let Err(err) = controller.load().await {
        eprintln!("error: {err}");
        return Ok(ExitCode::FAILURE);
    }

    let outcome = match args.command {
        Command::List { filter } => {
            controller.state_mut().set_filter(filter);
            Ok(())
        }
        Command::Add { title } => {
            let title = title.join(" ");
            controller
                .add(&title)
                .await
                .map(|todo| println!("added #{} {}", todo.id, todo.title))
        }
        Command::Delete { id } => {
            let id = TodoId(id);
            if !controller.state().items().iter().any(|todo| todo.id == id) {
                bail!("no todo with id {id}");
            }
            controller
                .delete(id)
                .await
                .map(|()| println!("deleted #{id}"))
        }
        Command::ClearCompleted => {
            if !controller.state().has_completed() {
                println!("nothing to clear");
            }
            let cleared = controller.clear_completed().await;
            if !cleared.deleted.is_empty() {
                println!("cleared {} completed todo(s)", cleared.deleted.len());
            }
            controller
                .state()
                .banner()
                .current()
                .map_or(Ok(()), Err)
        }
    };

    print!("{}", render_list(controller.state()));

    match outcome {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(err) => {
            eprintln!("error: {err}");
            Ok(ExitCode::FAILURE)
        }
    }
}

/// The list cannot be shown without an owner. Prints the warning to `err_out`
/// and hands back the exit code in that case.
fn check_owner(settings: &Settings, err_out: &mut impl io::Write) -> Result<OwnerId, ExitCode> {
    settings.require_owner().map_err(|err| {
        let _ = writeln!(err_out, "{}", owner_warning(&err));
        ExitCode::from(MISSING_OWNER_EXIT)
    })
}

fn owner_warning(err: &ConfigError) -> String {
    format!(
        "Cannot show the todo list: {err}.\n\
         Pass --owner-id, set TODO_OWNER_ID, or add `owner_id = <id>` to todo.toml and run again."
    )
}

fn render_list(state: &ListState) -> String {
    let mut out = String::new();
    for todo in state.visible() {
        let mark = if todo.completed { 'x' } else { ' ' };
        let _ = writeln!(out, "[{mark}] {:>4}  {}", todo.id.0, todo.title);
    }

    if state.shows_footer() {
        let _ = writeln!(
            out,
            "{} items left  (filter: {})",
            state.active_count(),
            state.filter()
        );
    } else {
        out.push_str("no todos yet\n");
    }
    out
}
