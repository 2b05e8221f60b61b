//! Fire-and-forget storage writer
//!
//! [`BackgroundStorage`] wraps another [`Storage`] and hands saves and removes
//! to a worker task running on a tokio runtime. Callers return as soon as the
//! write is queued. The worker applies writes strictly in queue order, so the
//! last write queued for a key is the one that ends up stored.
//!
//! Worker-side failures are logged and dropped. [`Storage::flush`] blocks until
//! everything queued before it has been applied.
//!
//! # Runtime requirements
//!
//! `flush` blocks the calling thread, so it must not be called from inside an
//! async context. Drive the store from a plain thread and give the worker a
//! multi-threaded runtime handle.

use crate::core::traits::Storage;
use crate::types::StorageError;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

enum WriteMsg {
    Save { key: String, blob: String },
    Remove { key: String },
    Flush { resp: oneshot::Sender<()> },
}

/// Storage wrapper that applies writes on a background task
pub struct BackgroundStorage<S> {
    inner: Arc<S>,
    tx: mpsc::UnboundedSender<WriteMsg>,
}

impl<S> BackgroundStorage<S>
where
    S: Storage + 'static,
{
    /// Spawn the writer task for `inner` on `runtime`
    pub fn spawn(inner: S, runtime: &Handle) -> Self {
        let inner = Arc::new(inner);
        let (tx, rx) = mpsc::unbounded_channel();
        runtime.spawn(run_writer(Arc::clone(&inner), rx));
        BackgroundStorage { inner, tx }
    }

    /// The wrapped storage
    pub fn inner(&self) -> &S {
        &self.inner
    }

    fn enqueue(&self, msg: WriteMsg) -> Result<(), StorageError> {
        self.tx.send(msg).map_err(|_| StorageError::WorkerStopped)
    }
}

impl<S> Storage for BackgroundStorage<S>
where
    S: Storage + 'static,
{
    fn save(&self, key: &str, blob: &str) -> Result<(), StorageError> {
        self.enqueue(WriteMsg::Save {
            key: key.to_string(),
            blob: blob.to_string(),
        })
    }

    /// Reads go straight to the wrapped storage and may not see queued writes
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.load(key)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.enqueue(WriteMsg::Remove {
            key: key.to_string(),
        })
    }

    fn flush(&self) -> Result<(), StorageError> {
        let (resp, done) = oneshot::channel();
        self.enqueue(WriteMsg::Flush { resp })?;
        done.blocking_recv().map_err(|_| StorageError::WorkerStopped)?;
        self.inner.flush()
    }
}

async fn run_writer<S>(inner: Arc<S>, mut rx: mpsc::UnboundedReceiver<WriteMsg>)
where
    S: Storage + 'static,
{
    while let Some(msg) = rx.recv().await {
        match msg {
            WriteMsg::Save { key, blob } => {
                let storage = Arc::clone(&inner);
                let result =
                    tokio::task::spawn_blocking(move || storage.save(&key, &blob).map(|_| key))
                        .await;
                log_write("save", result);
            }
            WriteMsg::Remove { key } => {
                let storage = Arc::clone(&inner);
                let result =
                    tokio::task::spawn_blocking(move || storage.remove(&key).map(|_| key)).await;
                log_write("remove", result);
            }
            WriteMsg::Flush { resp } => {
                let _ = resp.send(());
            }
        }
    }
    debug!("storage writer stopped");
}

fn log_write(
    operation: &str,
    result: Result<Result<String, StorageError>, tokio::task::JoinError>,
) {
    match result {
        Ok(Ok(key)) => debug!(operation, key = %key, "storage write applied"),
        Ok(Err(e)) => warn!(operation, error = %e, "storage write failed"),
        Err(e) => warn!(operation, error = %e, "storage write task failed"),
    }
}
