//! Hands UI actions to the backend command queue.

use crossbeam_channel::{Sender, TrySendError};

use crate::backend_bridge::commands::BackendCommand;

/// Queues `cmd` for the backend worker. Returns `false` when the command could
/// not be queued; `status` then describes why.
pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
    status: &mut String,
) -> bool {
    let cmd_name = cmd.name();
    match cmd_tx.try_send(cmd) {
        Ok(()) => {
            tracing::debug!(command = cmd_name, "queued ui->backend command");
            true
        }
        Err(TrySendError::Full(_)) => {
            *status = "UI command queue is full; please retry".to_string();
            false
        }
        Err(TrySendError::Disconnected(_)) => {
            *status = "Backend command processor disconnected; restart the app".to_string();
            false
        }
    }
}
