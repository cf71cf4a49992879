// ABOUTME: Shared, append-only record of everything the client process printed.
// ABOUTME: Output pumps append to it; the prompt scanner and error scan read it.

use super::scan;
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Accumulated stdout and stderr of the client since it started.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    buf: Mutex<Vec<u8>>,
    writers: AtomicUsize,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append bytes at the end of the transcript.
    pub fn append(&self, bytes: &[u8]) {
        self.inner.buf.lock().extend_from_slice(bytes);
    }

    /// Copy of everything recorded so far.
    pub fn snapshot(&self) -> Vec<u8> {
        self.inner.buf.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.inner.buf.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Register a writer. The transcript stays open while any guard is alive.
    pub fn attach_writer(&self) -> WriterGuard {
        self.inner.writers.fetch_add(1, Ordering::SeqCst);
        WriterGuard {
            transcript: self.clone(),
        }
    }

    /// True once every attached writer has gone away.
    pub fn is_closed(&self) -> bool {
        self.inner.writers.load(Ordering::SeqCst) == 0
    }

    /// A reader positioned at the start of the transcript.
    pub fn reader(&self) -> TranscriptReader {
        TranscriptReader {
            transcript: self.clone(),
            cursor: 0,
        }
    }

    /// Number of lines reporting an `ORA-`/`SP2-` error.
    pub fn count_errors(&self) -> usize {
        scan::count_errors(&self.inner.buf.lock())
    }
}

/// Keeps a transcript open for as long as its writer is producing output.
#[derive(Debug)]
pub struct WriterGuard {
    transcript: Transcript,
}

impl WriterGuard {
    pub fn append(&self, bytes: &[u8]) {
        self.transcript.append(bytes);
    }
}

impl Drop for WriterGuard {
    fn drop(&mut self) {
        self.transcript.inner.writers.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Why a prompt wait ended without seeing the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitError {
    /// Every writer finished and no line matched.
    Closed,
}

/// Line-oriented cursor over a [`Transcript`].
#[derive(Debug)]
pub struct TranscriptReader {
    transcript: Transcript,
    cursor: usize,
}

impl TranscriptReader {
    /// Next complete line, without its `\n`. `None` if only a partial line is buffered.
    pub fn next_line(&mut self) -> Option<Vec<u8>> {
        let buf = self.transcript.inner.buf.lock();
        let rest = buf.get(self.cursor..)?;
        let end = rest.iter().position(|&b| b == b'\n')?;
        let line = rest[..end].to_vec();
        self.cursor += end + 1;
        Some(line)
    }

    /// The unterminated tail of the transcript past the cursor.
    #[cfg(test)]
    fn pending(&self) -> Vec<u8> {
        let buf = self.transcript.inner.buf.lock();
        buf.get(self.cursor..).map(<[u8]>::to_vec).unwrap_or_default()
    }

    /// Check buffered output for a line starting with `prompt`.
    ///
    /// Complete lines are consumed. The partial tail is checked in place
    /// because interactive prompts are not followed by a newline.
    fn scan_for(&mut self, prompt: &[u8]) -> bool {
        let buf = self.transcript.inner.buf.lock();
        while let Some(rest) = buf.get(self.cursor..) {
            match rest.iter().position(|&b| b == b'\n') {
                Some(end) => {
                    self.cursor += end + 1;
                    if rest[..end].starts_with(prompt) {
                        return true;
                    }
                }
                None => return rest.starts_with(prompt),
            }
        }
        false
    }

    /// Wait until a line beginning with `prompt` appears.
    ///
    /// Sleeps `poll_interval` between checks. Callers bound the wait with
    /// `tokio::time::timeout`.
    pub async fn wait_for(
        &mut self,
        prompt: &str,
        poll_interval: Duration,
    ) -> Result<(), WaitError> {
        loop {
            // Read the flag before scanning so output appended just before close is seen.
            let closed = self.transcript.is_closed();
            if self.scan_for(prompt.as_bytes()) {
                return Ok(());
            }
            if closed {
                return Err(WaitError::Closed);
            }
            tokio::time::sleep(poll_interval).await;
        }
    }
}
