use std::{
    io::Read,
    process::{Child, ExitStatus, Stdio},
    thread::{self, JoinHandle},
    time::{Duration, Instant},
};

use tracing::{debug, warn};
use weft_core::{Error, Result};

use crate::CommandSpec;

const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Captured result of a finished process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    /// Exit code, `None` if the process was terminated by a signal.
    pub exit_code: Option<i32>,
}

impl ProcessOutput {
    pub fn new(stdout: Vec<u8>, stderr: Vec<u8>, exit_code: Option<i32>) -> Self {
        Self {
            stdout,
            stderr,
            exit_code,
        }
    }

    /// Get stdout as a UTF-8 string, lossy conversion.
    pub fn stdout_string(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    /// Get stderr as a UTF-8 string, lossy conversion.
    pub fn stderr_string(&self) -> String {
        String::from_utf8_lossy(&self.stderr).into_owned()
    }

    /// Check if the process exited with code 0.
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Runs a command to completion and captures what it wrote.
///
/// A non-zero exit is a normal [`ProcessOutput`]; only failures to start,
/// wait on, or finish the process within its timeout are errors.
pub trait Executable {
    fn run(&self, cmd: &CommandSpec) -> Result<ProcessOutput>;
}

impl<T: Executable + ?Sized> Executable for &T {
    fn run(&self, cmd: &CommandSpec) -> Result<ProcessOutput> {
        (**self).run(cmd)
    }
}

/// Spawns real child processes.
///
/// Stdout and stderr are drained on background threads so a chatty child
/// cannot block on a full pipe while the caller waits on its deadline.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeExecutable;

impl NativeExecutable {
    pub const fn new() -> Self {
        Self
    }
}

impl Executable for NativeExecutable {
    fn run(&self, cmd: &CommandSpec) -> Result<ProcessOutput> {
        let label = cmd.describe();
        debug!(command = %label, args = ?cmd.get_args(), "spawning");

        let mut child = cmd
            .to_command()
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| Error::spawn(label.clone(), e))?;

        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let status = match cmd.get_timeout() {
            Some(limit) => match wait_until(&mut child, Instant::now() + limit) {
                Ok(Some(status)) => status,
                Ok(None) => {
                    kill(&mut child, &label);
                    // Readers are not joined: a process outside the group may
                    // still hold the pipes open.
                    return Err(Error::timeout(label, limit));
                }
                Err(e) => return Err(Error::spawn(label, e)),
            },
            None => child.wait().map_err(|e| Error::spawn(label.clone(), e))?,
        };

        let output = ProcessOutput::new(collect(stdout), collect(stderr), status.code());
        debug!(command = %label, exit_code = ?output.exit_code, "finished");
        Ok(output)
    }
}

fn drain<R>(pipe: Option<R>) -> Option<JoinHandle<Vec<u8>>>
where
    R: Read + Send + 'static,
{
    pipe.map(|mut pipe| {
        thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = pipe.read_to_end(&mut buf);
            buf
        })
    })
}

fn collect(handle: Option<JoinHandle<Vec<u8>>>) -> Vec<u8> {
    handle
        .and_then(|h| h.join().ok())
        .unwrap_or_default()
}

fn wait_until(child: &mut Child, deadline: Instant) -> std::io::Result<Option<ExitStatus>> {
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if Instant::now() >= deadline {
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL);
    }
}

/// Kill the child's whole process group, then reap the child.
#[cfg(unix)]
fn kill(child: &mut Child, label: &str) {
    use nix::sys::signal::{Signal, killpg};
    use nix::unistd::Pid;

    let pgid = Pid::from_raw(child.id() as i32);
    if let Err(e) = killpg(pgid, Signal::SIGKILL) {
        warn!(command = %label, error = %e, "failed to kill timed out process group");
        let _ = child.kill();
    }
    let _ = child.wait();
}

#[cfg(not(unix))]
fn kill(child: &mut Child, label: &str) {
    if let Err(e) = child.kill() {
        warn!(command = %label, error = %e, "failed to kill timed out process");
    }
    let _ = child.wait();
}
