//! Out-of-process evaluator.
//!
//! Spawns the configured evaluator command once per evaluation, sends one
//! request over a JSON-lines stdin/stdout protocol and waits a bounded time
//! for the single response line.

use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use tracing::{debug, info, instrument, warn};

use promptcraft_shared::{
    Context, EvaluationResult, EvaluatorConfig, PromptCraftError, Result, RigorLevel,
};

use crate::evaluation::PromptEvaluator;

// ---------------------------------------------------------------------------
// Protocol types
// ---------------------------------------------------------------------------

/// Request message written to the evaluator's stdin.
#[derive(Debug, serde::Serialize)]
#[serde(tag = "type")]
enum RequestMessage<'a> {
    #[serde(rename = "evaluate")]
    Evaluate {
        id: String,
        document: &'a str,
        context: &'a Context,
        rigor_level: RigorLevel,
    },
}

/// Response message read from the evaluator's stdout.
#[derive(Debug, serde::Deserialize)]
#[serde(tag = "type")]
enum ResponseMessage {
    #[serde(rename = "result")]
    Result { id: String, result: EvaluationResult },
    #[serde(rename = "error")]
    Error { id: String, error: String },
}

// ---------------------------------------------------------------------------
// Evaluator
// ---------------------------------------------------------------------------

/// [`PromptEvaluator`] backed by an external command.
#[derive(Debug)]
pub struct SubprocessEvaluator {
    command: String,
    args: Vec<String>,
    working_dir: Option<PathBuf>,
    timeout: Duration,
    request_counter: AtomicU64,
}

impl SubprocessEvaluator {
    pub fn new<I, S>(command: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            command: command.into(),
            args: args.into_iter().map(Into::into).collect(),
            working_dir: None,
            timeout: Duration::from_secs(30),
            request_counter: AtomicU64::new(0),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Build from the `[evaluator]` config section. `None` when no command is set.
    pub fn from_config(config: &EvaluatorConfig) -> Option<Self> {
        let command = config.command.as_deref()?;
        let mut evaluator = Self::new(command, config.args.iter().cloned())
            .with_timeout(Duration::from_secs(config.timeout_secs));
        if let Some(dir) = &config.working_dir {
            evaluator = evaluator.with_working_dir(dir);
        }
        Some(evaluator)
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn spawn(&self) -> Result<Child> {
        let mut cmd = Command::new(&self.command);
        cmd.args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit()); // evaluator logs go to our stderr
        if let Some(dir) = &self.working_dir {
            cmd.current_dir(dir);
        }

        cmd.spawn().map_err(|e| {
            PromptCraftError::evaluation(format!(
                "failed to spawn evaluator: {e}. Is `{}` installed?",
                self.command
            ))
        })
    }

    fn next_id(&self) -> String {
        let n = self.request_counter.fetch_add(1, Ordering::Relaxed) + 1;
        format!("eval-{n}")
    }
}

impl PromptEvaluator for SubprocessEvaluator {
    #[instrument(skip_all, fields(cmd = %self.command, %rigor))]
    fn evaluate(
        &self,
        document: &str,
        context: &Context,
        rigor: RigorLevel,
    ) -> Result<EvaluationResult> {
        let id = self.next_id();
        let request = RequestMessage::Evaluate {
            id: id.clone(),
            document,
            context,
            rigor_level: rigor,
        };
        let json = serde_json::to_string(&request)?;

        let mut child = self.spawn()?;
        info!(%id, "evaluator spawned");

        let result = exchange(&mut child, &json, self.timeout);
        reap(&mut child);

        let line = result?;
        parse_response(&line, &id)
    }

    fn name(&self) -> &str {
        &self.command
    }
}

/// Write the request and read one line, both within `timeout`.
///
/// The write runs on its own thread; a request larger than the pipe buffer
/// blocks until the child reads it.
fn exchange(child: &mut Child, request: &str, timeout: Duration) -> Result<String> {
    let mut stdin = child
        .stdin
        .take()
        .ok_or_else(|| PromptCraftError::evaluation("failed to capture evaluator stdin"))?;
    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| PromptCraftError::evaluation("failed to capture evaluator stdout"))?;

    let payload = format!("{request}\n");
    thread::spawn(move || {
        // A child that answers without draining stdin closes the pipe early.
        if let Err(e) = stdin.write_all(payload.as_bytes()).and_then(|()| stdin.flush()) {
            debug!("evaluator stdin write ended early: {e}");
        }
    });

    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let mut line = String::new();
        let read = BufReader::new(stdout).read_line(&mut line).map(|_| line);
        // The receiver is gone if we already timed out.
        let _ = tx.send(read);
    });

    match rx.recv_timeout(timeout) {
        Ok(Ok(line)) if line.trim().is_empty() => Err(PromptCraftError::evaluation(
            "evaluator closed stdout without responding",
        )),
        Ok(Ok(line)) => Ok(line),
        Ok(Err(e)) => Err(PromptCraftError::evaluation(format!(
            "evaluator read error: {e}"
        ))),
        Err(mpsc::RecvTimeoutError::Timeout) => {
            warn!(?timeout, "evaluator did not answer in time, killing it");
            Err(PromptCraftError::Timeout(timeout))
        }
        Err(mpsc::RecvTimeoutError::Disconnected) => Err(PromptCraftError::evaluation(
            "evaluator reader thread exited unexpectedly",
        )),
    }
}

/// Make sure the child is gone before returning.
fn reap(child: &mut Child) {
    match child.try_wait() {
        Ok(Some(status)) => debug!(?status, "evaluator exited"),
        Ok(None) => {
            if let Err(e) = child.kill() {
                warn!("failed to kill evaluator: {e}");
            }
            let _ = child.wait();
        }
        Err(e) => warn!("evaluator wait error: {e}"),
    }
}

fn parse_response(line: &str, expected_id: &str) -> Result<EvaluationResult> {
    let msg: ResponseMessage = serde_json::from_str(line.trim()).map_err(|e| {
        PromptCraftError::evaluation(format!(
            "invalid evaluator response: {e} (got: {})",
            truncate(line.trim(), 200)
        ))
    })?;

    match msg {
        ResponseMessage::Result { id, result } if id == expected_id => Ok(result),
        ResponseMessage::Error { id, error } if id == expected_id => {
            Err(PromptCraftError::evaluation(error))
        }
        ResponseMessage::Result { id, .. } | ResponseMessage::Error { id, .. } => {
            Err(PromptCraftError::evaluation(format!(
                "response id mismatch: expected {expected_id}, got {id}"
            )))
        }
    }
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((i, _)) => &s[..i],
        None => s,
    }
}
