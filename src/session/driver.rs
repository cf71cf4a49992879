// ABOUTME: Drives an interactive client (sqlplus) through login and script submission.
// ABOUTME: Waits for prompts in the client's output, feeds stdin, and checks the result.

use super::error::{Error, Result};
use super::mirror::Mirror;
use super::transcript::{Transcript, TranscriptReader, WaitError, WriterGuard};
use crate::config::SessionConfig;
use secrecy::ExposeSecret;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::process::{Child, ChildStdin, Command};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::Instrument;

const READ_CHUNK: usize = 4096;

/// Outcome of a session that ran to completion without errors.
#[derive(Debug)]
pub struct SessionReport {
    /// Everything the client printed.
    pub transcript: Transcript,
    /// The client's exit status (always successful).
    pub status: ExitStatus,
}

/// Runs one script through the client.
#[derive(Debug)]
pub struct Driver {
    config: SessionConfig,
    stdout: Mirror,
    stderr: Mirror,
}

/// A started client with its stdin and output pumps.
struct Running {
    child: Child,
    stdin: ChildStdin,
    pumps: Vec<JoinHandle<()>>,
}

impl Driver {
    /// Driver mirroring client output to this process's stdout and stderr.
    pub fn new(config: SessionConfig) -> Self {
        Self::with_mirrors(config, Mirror::stdout(), Mirror::stderr())
    }

    pub fn with_mirrors(config: SessionConfig, stdout: Mirror, stderr: Mirror) -> Self {
        Self {
            config,
            stdout,
            stderr,
        }
    }

    /// Run the full handshake.
    ///
    /// Login prompt, password, ready prompt, script, exit, error scan. Any
    /// failure ends the session; the client is killed if it is still running.
    pub async fn run(self) -> Result<SessionReport> {
        let span = tracing::info_span!("session", connect = %self.config.connect_target());
        self.run_phases().instrument(span).await
    }

    async fn run_phases(self) -> Result<SessionReport> {
        let transcript = Transcript::new();
        let Running {
            mut child,
            mut stdin,
            pumps,
        } = self.spawn(&transcript)?;
        let mut reader = transcript.reader();

        let prompts = &self.config.prompts;
        let timeouts = self.config.timeouts;

        self.await_prompt(&mut reader, "login", &prompts.password, timeouts.login)
            .await?;
        let password = self.config.password.expose_secret().as_bytes();
        if tokio::time::timeout(timeouts.prompt, send_line(&mut stdin, password, "password"))
            .await
            .is_err()
        {
            return Err(Error::PromptTimeout {
                prompt: prompts.ready.clone(),
                timeout: timeouts.prompt,
            });
        }

        self.await_prompt(&mut reader, "SQL", &prompts.ready, timeouts.prompt)
            .await?;

        tracing::info!("executing SQL script:");
        for line in self.config.script.lines() {
            tracing::info!("> {}", line);
        }
        let deadline = Instant::now() + timeouts.completion;
        let script = self.config.script.as_bytes();
        let submitted = tokio::time::timeout_at(deadline, async move {
            send_line(&mut stdin, script, "script").await;
            // Closing stdin is the client's cue to exit.
            drop(stdin);
        })
        .await;
        // A client that stops reading can fill the pipe and stall the write.
        if submitted.is_err() {
            return Err(Error::CompletionTimeout(timeouts.completion));
        }

        let status = match tokio::time::timeout_at(deadline, child.wait()).await {
            Ok(Ok(status)) => status,
            Ok(Err(e)) => return Err(Error::Wait(e)),
            Err(_) => return Err(Error::CompletionTimeout(timeouts.completion)),
        };
        if !status.success() {
            return Err(Error::ExitStatus(status));
        }
        tracing::debug!("client exited with {}", status);

        // The pumps may still hold the last chunk of output.
        if tokio::time::timeout_at(deadline, join_pumps(pumps))
            .await
            .is_err()
        {
            return Err(Error::CompletionTimeout(timeouts.completion));
        }

        let count = transcript.count_errors();
        if count != 0 {
            return Err(Error::ScriptErrors(count));
        }

        tracing::info!("finished");
        Ok(SessionReport { transcript, status })
    }

    fn spawn(&self, transcript: &Transcript) -> Result<Running> {
        let client = &self.config.client;
        let target = self.config.connect_target();

        let mut command = Command::new(client);
        command
            .arg(&target)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        tracing::info!("executing {} {}", client.display(), target);
        let mut child = command.spawn().map_err(|source| Error::Spawn {
            program: client.clone(),
            source,
        })?;

        let stdin = child.stdin.take().ok_or(Error::StdinUnavailable)?;
        let stdout = child.stdout.take().ok_or(Error::OutputUnavailable)?;
        let stderr = child.stderr.take().ok_or(Error::OutputUnavailable)?;

        let pumps = vec![
            pump(stdout, transcript.attach_writer(), self.stdout.clone()),
            pump(stderr, transcript.attach_writer(), self.stderr.clone()),
        ];

        Ok(Running {
            child,
            stdin,
            pumps,
        })
    }

    /// Wait up to `timeout` for a line starting with `prompt`.
    async fn await_prompt(
        &self,
        reader: &mut TranscriptReader,
        label: &str,
        prompt: &str,
        timeout: Duration,
    ) -> Result<()> {
        tracing::info!(
            "waiting for {} prompt... (max {})",
            label,
            humantime::format_duration(timeout)
        );

        let outcome =
            tokio::time::timeout(timeout, reader.wait_for(prompt, self.config.poll_interval))
                .await;
        self.stdout.separator().await;

        match outcome {
            Ok(Ok(())) => {
                tracing::debug!("saw prompt '{}'", prompt);
                Ok(())
            }
            Ok(Err(WaitError::Closed)) => Err(Error::OutputClosed {
                prompt: prompt.to_string(),
            }),
            Err(_) => Err(Error::PromptTimeout {
                prompt: prompt.to_string(),
                timeout,
            }),
        }
    }
}

/// Write `payload` and a newline to the client in one write.
///
/// No reply is awaited. A failed write is only logged; the client has most
/// likely exited and the following phase reports why.
async fn send_line(stdin: &mut ChildStdin, payload: &[u8], what: &str) {
    let mut line = Vec::with_capacity(payload.len() + 1);
    line.extend_from_slice(payload);
    line.push(b'\n');

    let result = match stdin.write_all(&line).await {
        Ok(()) => stdin.flush().await,
        Err(e) => Err(e),
    };
    if let Err(e) = result {
        tracing::warn!("writing {} to client failed: {}", what, e);
    }
}

/// Copy one client stream into the transcript, mirroring it as it arrives.
fn pump<R>(mut source: R, writer: WriterGuard, mirror: Mirror) -> JoinHandle<()>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(
        async move {
            let mut buf = [0u8; READ_CHUNK];
            loop {
                match source.read(&mut buf).await {
                    Ok(0) => break,
                    Ok(n) => {
                        mirror.write(&buf[..n]).await;
                        writer.append(&buf[..n]);
                    }
                    Err(e) => {
                        tracing::warn!("reading client output failed: {}", e);
                        break;
                    }
                }
            }
        }
        .in_current_span(),
    )
}

async fn join_pumps(pumps: Vec<JoinHandle<()>>) {
    for handle in pumps {
        if let Err(e) = handle.await {
            tracing::warn!("output pump ended abnormally: {}", e);
        }
    }
}
