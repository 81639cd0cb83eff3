use std::{path::PathBuf, sync::Arc};

use serde_json::Value;
use thiserror::Error;
use tokio::sync::{broadcast, mpsc, oneshot};

use crate::{
    core::{DictionaryError, localized::LocalizedDictionary},
    record::{Record, ValidationError, normalize_extend, validate_code, validate_locale, validate_message},
    types::Outcome,
};

use super::events::DictionaryEvent;

/// Failure of a call made through a [`SharedDictionary`].
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// The store rejected or failed the operation.
    #[error(transparent)]
    Dictionary(#[from] DictionaryError),
    /// The owning task has stopped.
    #[error("shared dictionary has shut down")]
    ChannelClosed,
    /// A blocking load task panicked or was cancelled.
    #[error("dictionary load task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl From<ValidationError> for RuntimeError {
    fn from(value: ValidationError) -> Self {
        Self::Dictionary(DictionaryError::Validation(value))
    }
}

/// Channel sizing for a shared dictionary task.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Commands that may wait in the queue before senders back off.
    pub command_queue_bound: usize,
    /// Events retained for slow subscribers.
    pub event_capacity: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            command_queue_bound: 256,
            event_capacity: 1024,
        }
    }
}

/// Cloneable handle to a [`LocalizedDictionary`] owned by one task.
///
/// The task handles commands strictly one at a time and awaits each write
/// before taking the next, so every clone shares one writer per file.
#[derive(Debug, Clone)]
pub struct SharedDictionary {
    cmd_tx: mpsc::Sender<Command>,
    events_tx: broadcast::Sender<DictionaryEvent>,
    path: Arc<PathBuf>,
}

type Reply<T> = oneshot::Sender<Result<T, DictionaryError>>;

#[derive(Debug)]
enum Command {
    Add {
        code: String,
        locale: String,
        message: String,
        extend: Option<Value>,
        resp: Reply<Outcome>,
    },
    Update {
        code: String,
        locale: String,
        message: String,
        extend: Option<Value>,
        resp: Reply<Outcome>,
    },
    Delete {
        code: String,
        resp: Reply<Outcome>,
    },
    DeleteLocale {
        code: String,
        locale: String,
        resp: Reply<Outcome>,
    },
    Get {
        code: String,
        locale: Option<String>,
        resp: oneshot::Sender<Record>,
    },
    List {
        resp: oneshot::Sender<Vec<Record>>,
    },
    Reload {
        resp: Reply<Outcome>,
    },
    Drop {
        resp: Reply<()>,
    },
    Shutdown {
        resp: oneshot::Sender<()>,
    },
}

/// Moves `dict` into a new task and returns the first handle to it.
pub fn spawn_shared(dict: LocalizedDictionary, config: RuntimeConfig) -> SharedDictionary {
    let (cmd_tx, mut cmd_rx) = mpsc::channel::<Command>(config.command_queue_bound);
    let (events_tx, _) = broadcast::channel::<DictionaryEvent>(config.event_capacity);
    let path = Arc::new(dict.path().to_path_buf());

    let events_tx_loop = events_tx.clone();
    tokio::spawn(async move {
        let mut dict = dict;
        tracing::info!(path = %dict.path().display(), "shared dictionary started");

        while let Some(cmd) = cmd_rx.recv().await {
            if let Some(done) = handle_command(cmd, &mut dict, &events_tx_loop).await {
                // Close before acknowledging so `is_closed` is already true for the caller.
                cmd_rx.close();
                let _ = done.send(());
                break;
            }
        }

        tracing::info!(path = %dict.path().display(), "shared dictionary stopped");
    });

    SharedDictionary {
        cmd_tx,
        events_tx,
        path,
    }
}

impl SharedDictionary {
    /// New receiver for events emitted after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<DictionaryEvent> {
        self.events_tx.subscribe()
    }

    /// Backing file of the owned store.
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// True once the owning task has stopped.
    pub fn is_closed(&self) -> bool {
        self.cmd_tx.is_closed()
    }

    /// Same contract as [`LocalizedDictionary::add`]; input is validated
    /// here, before anything is queued.
    pub async fn add(
        &self,
        code: &str,
        locale: &str,
        message: &str,
        extend: Option<Value>,
    ) -> Result<Outcome, RuntimeError> {
        let extend = validate(code, locale, message, extend)?;
        let (tx, rx) = oneshot::channel();
        self.send(Command::Add {
            code: code.to_string(),
            locale: locale.to_string(),
            message: message.to_string(),
            extend,
            resp: tx,
        })
        .await?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?.map_err(RuntimeError::from)
    }

    /// Same contract as [`LocalizedDictionary::update`], validated here.
    pub async fn update(
        &self,
        code: &str,
        locale: &str,
        message: &str,
        extend: Option<Value>,
    ) -> Result<Outcome, RuntimeError> {
        let extend = validate(code, locale, message, extend)?;
        let (tx, rx) = oneshot::channel();
        self.send(Command::Update {
            code: code.to_string(),
            locale: locale.to_string(),
            message: message.to_string(),
            extend,
            resp: tx,
        })
        .await?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?.map_err(RuntimeError::from)
    }

    /// Same contract as [`LocalizedDictionary::delete`].
    pub async fn delete(&self, code: &str) -> Result<Outcome, RuntimeError> {
        validate_code(code)?;
        let (tx, rx) = oneshot::channel();
        self.send(Command::Delete {
            code: code.to_string(),
            resp: tx,
        })
        .await?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?.map_err(RuntimeError::from)
    }

    /// Same contract as [`LocalizedDictionary::delete_locale`].
    pub async fn delete_locale(&self, code: &str, locale: &str) -> Result<Outcome, RuntimeError> {
        validate_code(code)?;
        validate_locale(locale)?;
        let (tx, rx) = oneshot::channel();
        self.send(Command::DeleteLocale {
            code: code.to_string(),
            locale: locale.to_string(),
            resp: tx,
        })
        .await?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?.map_err(RuntimeError::from)
    }

    /// Record for `code`, or the sentinel.
    pub async fn get(&self, code: &str) -> Result<Record, RuntimeError> {
        self.lookup(code, None).await
    }

    /// Record for `code` projected to `locale`.
    pub async fn get_locale(&self, code: &str, locale: &str) -> Result<Record, RuntimeError> {
        self.lookup(code, Some(locale.to_string())).await
    }

    /// Snapshot of the table at the time the command is handled.
    pub async fn list(&self) -> Result<Vec<Record>, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::List { resp: tx }).await?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }

    /// Replaces the table from disk; read failures are returned.
    pub async fn reload(&self) -> Result<Outcome, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Reload { resp: tx }).await?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?.map_err(RuntimeError::from)
    }

    /// Clears the table and deletes the backing file.
    pub async fn drop(&self) -> Result<(), RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Drop { resp: tx }).await?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?.map_err(RuntimeError::from)
    }

    /// Stops the task after every command queued before this one.
    pub async fn shutdown(&self) -> Result<(), RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Shutdown { resp: tx }).await?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }

    async fn lookup(&self, code: &str, locale: Option<String>) -> Result<Record, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Get {
            code: code.to_string(),
            locale,
            resp: tx,
        })
        .await?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }

    async fn send(&self, cmd: Command) -> Result<(), RuntimeError> {
        self.cmd_tx
            .send(cmd)
            .await
            .map_err(|_| RuntimeError::ChannelClosed)
    }
}

fn validate(
    code: &str,
    locale: &str,
    message: &str,
    extend: Option<Value>,
) -> Result<Option<Value>, ValidationError> {
    validate_code(code)?;
    validate_locale(locale)?;
    validate_message(message)?;
    let extend = normalize_extend(extend)?;
    Ok((!extend.is_empty()).then_some(Value::Object(extend)))
}

async fn handle_command(
    cmd: Command,
    dict: &mut LocalizedDictionary,
    events_tx: &broadcast::Sender<DictionaryEvent>,
) -> Option<oneshot::Sender<()>> {
    match cmd {
        Command::Add {
            code,
            locale,
            message,
            extend,
            resp,
        } => {
            let existed = dict.list().iter().any(|r| r.code == code);
            let res = dict.add(&code, &locale, &message, extend).await;
            if res.as_ref().is_ok_and(|o| o.status) {
                let event = if existed {
                    DictionaryEvent::Updated { code, locale }
                } else {
                    DictionaryEvent::Added { code, locale }
                };
                let _ = events_tx.send(event);
            }
            let _ = resp.send(res);
        }
        Command::Update {
            code,
            locale,
            message,
            extend,
            resp,
        } => {
            let res = dict.update(&code, &locale, &message, extend).await;
            if res.as_ref().is_ok_and(|o| o.status) {
                let _ = events_tx.send(DictionaryEvent::Updated { code, locale });
            }
            let _ = resp.send(res);
        }
        Command::Delete { code, resp } => {
            let res = dict.delete(&code).await;
            if res.as_ref().is_ok_and(|o| o.status) {
                let _ = events_tx.send(DictionaryEvent::Deleted { code });
            }
            let _ = resp.send(res);
        }
        Command::DeleteLocale { code, locale, resp } => {
            let res = dict.delete_locale(&code, &locale).await;
            if res.as_ref().is_ok_and(|o| o.status) {
                let _ = events_tx.send(DictionaryEvent::LocaleDeleted { code, locale });
            }
            let _ = resp.send(res);
        }
        Command::Get { code, locale, resp } => {
            let record = match locale {
                Some(locale) => dict.get_locale(&code, &locale),
                None => dict.get(&code),
            };
            let _ = resp.send(record);
        }
        Command::List { resp } => {
            let _ = resp.send(dict.list().to_vec());
        }
        Command::Reload { resp } => {
            let res = dict.reload().await;
            match &res {
                Ok(_) => {
                    let _ = events_tx.send(DictionaryEvent::Reloaded {
                        records: dict.list().len(),
                    });
                }
                Err(err) => {
                    tracing::warn!(path = %dict.path().display(), error = %err, "reload failed");
                }
            }
            let _ = resp.send(res);
        }
        Command::Drop { resp } => {
            let res = dict.drop().await;
            if res.is_ok() {
                let _ = events_tx.send(DictionaryEvent::Dropped);
            }
            let _ = resp.send(res);
        }
        Command::Shutdown { resp } => return Some(resp),
    }

    None
}
