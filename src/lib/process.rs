//! Child process helpers: planned commands, exit status mapping, and output duplication.

use std::{collections::BTreeMap, future, io, path::PathBuf, process::ExitStatus};

use serde::Serialize;
use tokio::{
    io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt},
    process::Command,
};

use super::exit::FAILURE_CODE;

const CHUNK_SIZE: usize = 8 * 1024;

/// A fully resolved external command, printable with `--dry-run` before it is spawned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedCommand {
    pub program: String,
    pub args: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub working_dir: Option<PathBuf>,
    /// Variables added on top of the inherited environment.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub env: BTreeMap<String, String>,
}

impl PlannedCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            working_dir: None,
            env: BTreeMap::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append `flag value` as two arguments.
    pub fn flag(self, flag: &str, value: impl ToString) -> Self {
        self.arg(flag).arg(value.to_string())
    }

    pub fn has_flag(&self, flag: &str) -> bool {
        self.args.iter().any(|arg| arg == flag)
    }

    /// Value following `flag`, if present.
    pub fn flag_value(&self, flag: &str) -> Option<&str> {
        self.args
            .iter()
            .position(|arg| arg == flag)
            .and_then(|index| self.args.get(index + 1))
            .map(String::as_str)
    }

    /// Shell-style rendering for logs and the console.
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Build the tokio command; stdio configuration is left to the caller.
    pub fn to_command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        if let Some(dir) = &self.working_dir {
            command.current_dir(dir);
        }
        for (key, value) in &self.env {
            command.env(key, value);
        }
        command
    }
}

/// Translate a child's exit status into the code this process should exit with.
///
/// Normal exits pass through unchanged. A child killed by a signal maps to
/// `128 + signal`, the same convention shells use.
pub fn exit_code_of(status: ExitStatus) -> u8 {
    if let Some(code) = status.code() {
        return u8::try_from(code).unwrap_or(FAILURE_CODE);
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return u8::try_from(128 + signal).unwrap_or(FAILURE_CODE);
        }
    }

    FAILURE_CODE
}

/// Copy both child streams into `console` and `log` as data arrives.
///
/// Chunks are written in arrival order, so the log holds the combined stream
/// the way `2>&1 | tee -a` would. Returns the number of bytes relayed.
pub async fn tee_streams<O, E, C, L>(
    mut stdout: Option<O>,
    mut stderr: Option<E>,
    console: &mut C,
    log: &mut L,
) -> io::Result<u64>
where
    O: AsyncRead + Unpin,
    E: AsyncRead + Unpin,
    C: AsyncWrite + Unpin,
    L: AsyncWrite + Unpin,
{
    let mut out_buf = vec![0u8; CHUNK_SIZE];
    let mut err_buf = vec![0u8; CHUNK_SIZE];
    let mut relayed = 0u64;

    while stdout.is_some() || stderr.is_some() {
        let (read, from_stdout) = tokio::select! {
            read = read_chunk(stdout.as_mut(), &mut out_buf) => (read?, true),
            read = read_chunk(stderr.as_mut(), &mut err_buf) => (read?, false),
        };

        if read == 0 {
            if from_stdout {
                stdout = None;
            } else {
                stderr = None;
            }
            continue;
        }

        let chunk = if from_stdout {
            &out_buf[..read]
        } else {
            &err_buf[..read]
        };
        console.write_all(chunk).await?;
        log.write_all(chunk).await?;
        relayed += read as u64;
    }

    console.flush().await?;
    log.flush().await?;
    Ok(relayed)
}

async fn read_chunk<R>(reader: Option<&mut R>, buf: &mut [u8]) -> io::Result<usize>
where
    R: AsyncRead + Unpin,
{
    match reader {
        Some(reader) => reader.read(buf).await,
        None => future::pending().await,
    }
}
