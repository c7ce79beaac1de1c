//! Backend worker: owns the tokio runtime and the HTTP store, runs each queued
//! command to completion and reports the settled result back to the UI.

use std::{sync::Arc, thread};

use client_core::{delete_all_settled, HttpTodoStore, TodoStore};
use crossbeam_channel::{Receiver, Sender, TrySendError};
use tracing::{error, warn};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;

pub fn launch(store: HttpTodoStore, cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>) {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                error!("failed to build backend runtime: {err}");
                let _ = ui_tx.try_send(UiEvent::BackendUnavailable(format!(
                    "backend worker startup failure: {err}"
                )));
                return;
            }
        };

        let store = Arc::new(store);
        runtime.block_on(async move {
            while let Ok(cmd) = cmd_rx.recv() {
                let store = Arc::clone(&store);
                let ui_tx = ui_tx.clone();
                tokio::spawn(async move {
                    let name = cmd.name();
                    let event = execute(store.as_ref(), cmd).await;
                    match ui_tx.try_send(event) {
                        Ok(()) => {}
                        Err(TrySendError::Full(_)) => {
                            error!(command = name, "ui event queue full; result dropped");
                        }
                        Err(TrySendError::Disconnected(_)) => {}
                    }
                });
            }
        });
    });
}

/// Runs one command against the store. Errors are logged here and reduced to
/// text; the UI only needs to know that the request failed.
pub async fn execute<S>(store: &S, cmd: BackendCommand) -> UiEvent
where
    S: TodoStore + ?Sized,
{
    match cmd {
        BackendCommand::Load => UiEvent::Loaded(store.list().await.map_err(|err| {
            warn!("load todos failed: {err:#}");
            format!("{err:#}")
        })),
        BackendCommand::Create(body) => UiEvent::Created(store.create(&body).await.map_err(|err| {
            warn!("create todo failed: {err:#}");
            format!("{err:#}")
        })),
        BackendCommand::Delete(id) => UiEvent::Deleted {
            id,
            result: store.delete(id).await.map_err(|err| {
                warn!(todo_id = id.0, "delete todo failed: {err:#}");
                format!("{err:#}")
            }),
        },
        BackendCommand::ClearCompleted(ids) => {
            UiEvent::ClearedCompleted(delete_all_settled(store, &ids).await)
        }
    }
}
