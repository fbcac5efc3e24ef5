//! External command execution.
//!
//! Builder-based API for running a program with stdin piping and captured
//! output, used by the pre-processing hook.
//!
//! ```ignore
//! use crate::utils::exec::Cmd;
//!
//! let output = Cmd::new("scripts/clean.sh")
//!     .cwd(root)
//!     .envs([("LLMSTXT_TITLE", "Usage")])
//!     .stdin(html)
//!     .run()?;
//! ```

use crate::log;
use anyhow::{Context, Result};
use regex::Regex;
use std::{
    ffi::{OsStr, OsString},
    io::{self, Write},
    path::{Path, PathBuf},
    process::{ChildStdin, Command, Output, Stdio},
    sync::OnceLock,
    thread,
};

// ============================================================================
// Builder API
// ============================================================================

/// Command builder for external process execution.
#[derive(Debug, Default)]
pub struct Cmd {
    program: OsString,
    cwd: Option<PathBuf>,
    envs: Vec<(String, String)>,
    stdin_data: Option<Vec<u8>>,
}

impl Cmd {
    /// Create a new command builder.
    pub fn new<S: AsRef<OsStr>>(program: S) -> Self {
        Self {
            program: program.as_ref().to_owned(),
            ..Default::default()
        }
    }

    /// Set working directory.
    pub fn cwd<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.cwd = Some(dir.as_ref().to_owned());
        self
    }

    /// Set environment variables for the subprocess.
    pub fn envs<K, V, I>(mut self, vars: I) -> Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
        I: IntoIterator<Item = (K, V)>,
    {
        for (k, v) in vars {
            self.envs.push((k.as_ref().to_owned(), v.as_ref().to_owned()));
        }
        self
    }

    /// Set stdin data to pipe to the process.
    pub fn stdin<D: AsRef<[u8]>>(mut self, data: D) -> Self {
        self.stdin_data = Some(data.as_ref().to_vec());
        self
    }

    /// Execute the command and return its output.
    ///
    /// A non-zero exit status is an error carrying the program's stderr.
    pub fn run(self) -> Result<Output> {
        let name = self.program_name();

        let mut cmd = Command::new(&self.program);
        cmd.envs(self.envs.iter().cloned())
            .stdin(if self.stdin_data.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        if let Some(dir) = &self.cwd {
            cmd.current_dir(dir);
        }

        let mut child = cmd
            .spawn()
            .with_context(|| format!("Failed to spawn `{name}`"))?;

        // Feed stdin while stdout/stderr drain, so large pages cannot fill
        // both pipes and block each other.
        let stdin = child.stdin.take();
        let (output, written) = thread::scope(|scope| {
            let writer = scope.spawn(|| write_stdin(stdin, self.stdin_data.as_deref()));
            let output = child.wait_with_output();
            let written = writer
                .join()
                .unwrap_or_else(|_| Err(io::Error::other("stdin writer panicked")));
            (output, written)
        });
        let output = output.with_context(|| format!("Failed to wait for `{name}`"))?;

        if !output.status.success() {
            anyhow::bail!(format_error(&name, &output));
        }

        written.with_context(|| format!("Failed to write stdin to `{name}`"))?;
        log_stderr(&name, &output);
        Ok(output)
    }

    /// Get the program name for error messages.
    fn program_name(&self) -> String {
        self.program.to_string_lossy().to_string()
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Write `data` to the child's stdin and close it.
///
/// A program may exit without consuming its input; the exit status decides
/// the outcome then, so a broken pipe is not an error.
fn write_stdin(stdin: Option<ChildStdin>, data: Option<&[u8]>) -> io::Result<()> {
    let (Some(mut stdin), Some(data)) = (stdin, data) else {
        return Ok(());
    };
    match stdin.write_all(data) {
        Err(err) if err.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        result => result,
    }
}

/// Strip ANSI escape codes from string.
fn strip_ansi(s: &str) -> std::borrow::Cow<'_, str> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"\x1b\[[0-9;]*m").unwrap());
    re.replace_all(s, "")
}

/// Forward what a successful program printed on stderr.
fn log_stderr(name: &str, output: &Output) {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let lines: Vec<_> = stderr
        .lines()
        .map(strip_ansi)
        .filter(|line| !line.trim().is_empty())
        .collect();

    if !lines.is_empty() {
        log!(name; "{}", lines.join("\n"));
    }
}

/// Format error message for failed command.
fn format_error(name: &str, output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stderr = strip_ansi(stderr.trim());

    let mut msg = format!("Command `{name}` failed with {}", output.status);
    if !stderr.is_empty() {
        msg.push('\n');
        msg.push_str(&stderr);
    }
    msg
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[cfg(unix)]
    fn script(dir: &TempDir, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.path().join("hook.sh");
        fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[test]
    fn test_cmd_builder() {
        let cmd = Cmd::new("clean.sh").cwd("/tmp").envs([("A", "1")]);

        assert_eq!(cmd.program, OsString::from("clean.sh"));
        assert_eq!(cmd.cwd, Some(PathBuf::from("/tmp")));
        assert_eq!(cmd.envs, vec![("A".to_string(), "1".to_string())]);
    }

    #[test]
    fn test_strip_ansi() {
        assert_eq!(strip_ansi("\x1b[31mRed\x1b[0m"), "Red");
        assert_eq!(strip_ansi("Plain text"), "Plain text");
    }

    #[cfg(unix)]
    #[test]
    fn test_stdin_pipe() {
        let output = Cmd::new("cat").stdin(b"test data").run().unwrap();
        assert!(output.status.success());
        assert_eq!(output.stdout, b"test data");
    }

    #[cfg(unix)]
    #[test]
    fn test_stdin_larger_than_pipe_buffer() {
        let data = vec![b'a'; 1 << 20];
        let output = Cmd::new("cat").stdin(&data).run().unwrap();
        assert_eq!(output.stdout.len(), data.len());
    }

    #[cfg(unix)]
    #[test]
    fn test_program_ignoring_stdin() {
        let dir = TempDir::new().unwrap();
        let hook = script(&dir, "printf '<p>ok</p>'");

        let output = Cmd::new(hook).stdin(vec![b'a'; 1 << 20]).run().unwrap();
        assert_eq!(output.stdout, b"<p>ok</p>");
    }

    #[cfg(unix)]
    #[test]
    fn test_env_and_failure() {
        let dir = TempDir::new().unwrap();
        let hook = script(&dir, "printf %s \"$GREETING\"");
        let output = Cmd::new(&hook).envs([("GREETING", "hi")]).run().unwrap();
        assert_eq!(output.stdout, b"hi");

        let hook = script(&dir, "echo broken >&2; exit 3");
        let err = Cmd::new(hook).stdin(b"x").run().unwrap_err();
        assert!(err.to_string().contains("broken"));
    }
}
