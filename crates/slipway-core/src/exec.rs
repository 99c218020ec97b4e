//! The command-execution capability every deployment step runs through.
//!
//! Steps never touch `std::process` directly: they issue shell command lines
//! to an [`Executor`], which is either the operator machine (`LocalExecutor`)
//! or a production host reached through the system ssh client
//! (`SshExecutor`). Tests substitute a recording fake.

use crate::error::{Result, SlipwayError};
use std::path::Path;
use std::process::{Command, Stdio};

// ---------------------------------------------------------------------------
// ExecOutput
// ---------------------------------------------------------------------------

/// Captured result of one command. A non-zero `code` is not an error at this
/// level; call sites that cannot tolerate failure use `run_checked`.
#[derive(Debug, Clone)]
pub struct ExecOutput {
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ExecOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    pub fn line(&self) -> &str {
        self.stdout.trim()
    }
}

// ---------------------------------------------------------------------------
// Executor
// ---------------------------------------------------------------------------

pub trait Executor {
    /// Run `command` through the target's shell, capturing output.
    /// `Err` only when the command could not be started at all.
    fn run(&self, command: &str) -> Result<ExecOutput>;

    /// Run `command` with inherited stdio and wait for it to finish.
    /// Used for long-lived foreground processes like the dev server.
    fn run_interactive(&self, command: &str) -> Result<()>;

    /// Human-readable target name for log lines.
    fn target(&self) -> String;

    /// Like `run`, but a non-zero exit becomes `CommandFailed`.
    fn run_checked(&self, command: &str) -> Result<ExecOutput> {
        let out = self.run(command)?;
        if !out.success() {
            return Err(SlipwayError::CommandFailed {
                command: command.to_string(),
                code: out.code,
                stderr: out.stderr,
            });
        }
        Ok(out)
    }
}

// ---------------------------------------------------------------------------
// LocalExecutor
// ---------------------------------------------------------------------------

/// Runs commands on the operator machine via `sh -c`.
pub struct LocalExecutor;

impl Executor for LocalExecutor {
    fn run(&self, command: &str) -> Result<ExecOutput> {
        let out = Command::new("sh")
            .arg("-c")
            .arg(command)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| SlipwayError::Spawn {
                command: command.to_string(),
                source: e,
            })?;
        Ok(ExecOutput {
            code: out.status.code(),
            stdout: String::from_utf8_lossy(&out.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&out.stderr).into_owned(),
        })
    }

    fn run_interactive(&self, command: &str) -> Result<()> {
        let status = Command::new("sh")
            .arg("-c")
            .arg(command)
            .status()
            .map_err(|e| SlipwayError::Spawn {
                command: command.to_string(),
                source: e,
            })?;
        if !status.success() {
            return Err(SlipwayError::CommandFailed {
                command: command.to_string(),
                code: status.code(),
                stderr: String::new(),
            });
        }
        Ok(())
    }

    fn target(&self) -> String {
        "localhost".to_string()
    }
}

// ---------------------------------------------------------------------------
// SshExecutor
// ---------------------------------------------------------------------------

/// Runs commands on a remote host through the system ssh client.
/// The remote shell does the word splitting, exactly as it would for an
/// operator typing the same line.
pub struct SshExecutor {
    user: String,
    host: String,
}

impl SshExecutor {
    pub fn new(user: &str, host: &str) -> Result<Self> {
        which::which("ssh").map_err(|_| SlipwayError::CommandMissing {
            name: "ssh".to_string(),
            target: "localhost".to_string(),
        })?;
        Ok(Self {
            user: user.to_string(),
            host: host.to_string(),
        })
    }

    fn destination(&self) -> String {
        format!("{}@{}", self.user, self.host)
    }
}

impl Executor for SshExecutor {
    fn run(&self, command: &str) -> Result<ExecOutput> {
        let out = Command::new("ssh")
            .arg(self.destination())
            .arg(command)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| SlipwayError::Spawn {
                command: command.to_string(),
                source: e,
            })?;
        Ok(ExecOutput {
            code: out.status.code(),
            stdout: String::from_utf8_lossy(&out.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&out.stderr).into_owned(),
        })
    }

    fn run_interactive(&self, command: &str) -> Result<()> {
        let status = Command::new("ssh")
            .args(["-t", &self.destination(), command])
            .status()
            .map_err(|e| SlipwayError::Spawn {
                command: command.to_string(),
                source: e,
            })?;
        if !status.success() {
            return Err(SlipwayError::CommandFailed {
                command: command.to_string(),
                code: status.code(),
                stderr: String::new(),
            });
        }
        Ok(())
    }

    fn target(&self) -> String {
        self.destination()
    }
}

// ---------------------------------------------------------------------------
// Shell helpers
// ---------------------------------------------------------------------------

/// Single-quote `value` for safe embedding in a command line. Plain
/// path-like tokens pass through unquoted to keep log output readable.
pub fn quote(value: &str) -> String {
    let plain = !value.is_empty()
        && value
            .bytes()
            .all(|b| {
                b.is_ascii_alphanumeric()
                    || matches!(b, b'/' | b'.' | b'_' | b'-' | b':' | b'@' | b'+' | b'=')
            });
    if plain {
        return value.to_string();
    }
    format!("'{}'", value.replace('\'', r"'\''"))
}

pub fn quote_path(path: &Path) -> String {
    quote(&path.to_string_lossy())
}

/// Fail with `CommandMissing` unless `name` resolves on the target's PATH.
pub fn require_command(exec: &dyn Executor, name: &str) -> Result<()> {
    let out = exec.run(&format!("command -v {} >/dev/null 2>&1", quote(name)))?;
    if !out.success() {
        return Err(SlipwayError::CommandMissing {
            name: name.to_string(),
            target: exec.target(),
        });
    }
    Ok(())
}

pub fn path_exists(exec: &dyn Executor, path: &Path) -> Result<bool> {
    Ok(exec.run(&format!("test -e {}", quote_path(path)))?.success())
}

pub fn dir_exists(exec: &dyn Executor, path: &Path) -> Result<bool> {
    Ok(exec.run(&format!("test -d {}", quote_path(path)))?.success())
}

// ---------------------------------------------------------------------------
// Recording fake (test support)
// ---------------------------------------------------------------------------


// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
