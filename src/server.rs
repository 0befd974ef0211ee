use std::{fs, io::ErrorKind, os::unix::fs::FileTypeExt, path::Path, sync::Arc};

use anyhow::{Context, Result, bail};
use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
    net::{UnixListener, UnixStream},
    signal::unix::{SignalKind, signal},
    sync::mpsc,
    task::JoinSet,
};

use crate::{
    membership::EventIngress,
    protocol::{ClientMessage, ServerMessage, encode_server_message, parse_client_message},
    resource::{CallerIdentity, ResolutionRequest, ResourceProvider},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    SocketMessage,
    Signal(&'static str),
}

/// Serves NDJSON clients on `socket_path` until a signal or an `exit`
/// message arrives. On return the ingress is closed and every client
/// task has stopped, so the event channel drains and closes.
pub async fn run(
    socket_path: &Path,
    provider: Arc<dyn ResourceProvider>,
    ingress: EventIngress,
) -> Result<ExitReason> {
    prepare_socket_path(socket_path)?;
    let listener = UnixListener::bind(socket_path)
        .with_context(|| format!("unable to bind socket {}", socket_path.display()))?;

    let mut sigint =
        signal(SignalKind::interrupt()).context("unable to listen for SIGINT (Ctrl+C)")?;
    let mut sigterm = signal(SignalKind::terminate()).context("unable to listen for SIGTERM")?;
    let (exit_tx, mut exit_rx) = mpsc::unbounded_channel::<()>();
    let mut clients = JoinSet::new();

    tracing::info!(
        target: "server",
        socket_path = %socket_path.display(),
        roots = ?provider.roots(),
        "bridge_listening"
    );

    let exit_reason = loop {
        tokio::select! {
            _ = sigint.recv() => break ExitReason::Signal("SIGINT"),
            _ = sigterm.recv() => break ExitReason::Signal("SIGTERM"),
            Some(()) = exit_rx.recv() => break ExitReason::SocketMessage,
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, _)) => {
                        clients.spawn(handle_client(
                            stream,
                            Arc::clone(&provider),
                            ingress.clone(),
                            exit_tx.clone(),
                        ));
                    }
                    Err(err) => tracing::warn!(target: "server", error = %err, "accept_failed"),
                }
            }
            Some(finished) = clients.join_next(), if !clients.is_empty() => {
                match finished {
                    Ok(Ok(())) => {}
                    Ok(Err(err)) => tracing::warn!(
                        target: "server",
                        error = %format!("{err:#}"),
                        "client_handling_failed"
                    ),
                    Err(err) => tracing::warn!(target: "server", error = %err, "client_task_failed"),
                }
            }
        }
    };

    ingress.close();
    clients.shutdown().await;
    drop(ingress);

    cleanup_socket_path(socket_path)?;
    tracing::info!(target: "server", exit_reason = ?exit_reason, "bridge_stopped");
    Ok(exit_reason)
}

async fn handle_client(
    stream: UnixStream,
    provider: Arc<dyn ResourceProvider>,
    ingress: EventIngress,
    exit_tx: mpsc::UnboundedSender<()>,
) -> Result<()> {
    let (reader, mut writer) = stream.into_split();
    let mut lines = BufReader::new(reader).lines();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let reply = match parse_client_message(line) {
            Ok(ClientMessage::Exit) => {
                let _ = exit_tx.send(());
                return Ok(());
            }
            Ok(ClientMessage::Resolve {
                user_id,
                path,
                request,
            }) => resolve_blocking(Arc::clone(&provider), user_id, path, request).await?,
            Ok(ClientMessage::Event(event)) => match ingress.send(event).await {
                Ok(()) => ServerMessage::Accepted,
                Err(err) => ServerMessage::Rejected {
                    reason: err.to_string(),
                },
            },
            Err(err) => {
                tracing::debug!(target: "server", error = %err, "invalid_protocol_message");
                ServerMessage::Rejected {
                    reason: format!("invalid message: {err}"),
                }
            }
        };

        let encoded = encode_server_message(&reply).context("failed to encode reply")?;
        writer
            .write_all(encoded.as_bytes())
            .await
            .context("failed to write reply")?;
    }

    Ok(())
}

/// Resolution blocks on the content store, so it runs off the async workers.
async fn resolve_blocking(
    provider: Arc<dyn ResourceProvider>,
    user_id: String,
    path: String,
    request: Option<ResolutionRequest>,
) -> Result<ServerMessage> {
    tokio::task::spawn_blocking(move || {
        let caller = CallerIdentity::new(user_id);
        let resolved = match &request {
            Some(request) => provider.resolve_request(&caller, request, &path),
            None => provider.resolve(&caller, &path),
        };
        ServerMessage::from_resolution(&path, resolved)
    })
    .await
    .context("resolution task failed")
}

fn prepare_socket_path(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("unable to create {}", parent.display()))?;
    }

    match fs::symlink_metadata(path) {
        Ok(metadata) => {
            if metadata.file_type().is_socket() || metadata.is_file() {
                fs::remove_file(path)
                    .with_context(|| format!("unable to remove stale socket {}", path.display()))?;
            } else {
                bail!(
                    "socket path exists but is not removable as file/socket: {}",
                    path.display()
                );
            }
        }
        Err(err) if err.kind() == ErrorKind::NotFound => {}
        Err(err) => {
            return Err(err).with_context(|| format!("unable to inspect {}", path.display()));
        }
    }

    Ok(())
}

fn cleanup_socket_path(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(_) => Ok(()),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err).with_context(|| format!("unable to remove {}", path.display())),
    }
}
