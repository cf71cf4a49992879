// ABOUTME: Live pass-through of client output to this process's own streams.
// ABOUTME: Keeps client chatter visible while the transcript captures it.

use std::pin::Pin;
use std::sync::Arc;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;

type Sink = Pin<Box<dyn AsyncWrite + Send>>;

/// A shared, best-effort output sink.
///
/// Clones write to the same sink. After the first failed write the mirror
/// goes quiet; a broken terminal must not abort the session.
#[derive(Clone)]
pub struct Mirror {
    name: &'static str,
    sink: Arc<Mutex<Option<Sink>>>,
}

impl std::fmt::Debug for Mirror {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mirror").field("name", &self.name).finish()
    }
}

impl Mirror {
    pub fn new(name: &'static str, sink: impl AsyncWrite + Send + 'static) -> Self {
        Self {
            name,
            sink: Arc::new(Mutex::new(Some(Box::pin(sink)))),
        }
    }

    pub fn stdout() -> Self {
        Self::new("stdout", tokio::io::stdout())
    }

    pub fn stderr() -> Self {
        Self::new("stderr", tokio::io::stderr())
    }

    /// A mirror that discards everything.
    pub fn discard() -> Self {
        Self::new("discard", tokio::io::sink())
    }

    /// Write and flush a chunk of output.
    pub async fn write(&self, chunk: &[u8]) {
        let mut guard = self.sink.lock().await;
        let Some(sink) = guard.as_mut() else {
            return;
        };

        let result = match sink.write_all(chunk).await {
            Ok(()) => sink.flush().await,
            Err(e) => Err(e),
        };

        if let Err(e) = result {
            tracing::warn!("mirroring client output to {} failed: {}", self.name, e);
            *guard = None;
        }
    }

    /// Write a blank line so log output that follows starts on its own line.
    pub async fn separator(&self) {
        self.write(b"\n").await;
    }
}
