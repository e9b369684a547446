//! Handle for a locally spawned analysis backend.
//!
//! The child lives exactly as long as the handle: dropping it kills and
//! reaps the process on every exit path.

use std::io;
use std::net::{TcpStream, ToSocketAddrs};
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(200);

#[derive(Debug)]
pub struct BackendProcess {
    child: Child,
    command: Vec<String>,
}

impl BackendProcess {
    /// Start `command` (program followed by its arguments).
    pub fn spawn(command: &[String]) -> io::Result<Self> {
        let Some((program, args)) = command.split_first() else {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "backend command is empty",
            ));
        };

        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;

        tracing::info!(pid = child.id(), command = ?command, "Backend process started");
        Ok(Self {
            child,
            command: command.to_vec(),
        })
    }

    pub fn id(&self) -> u32 {
        self.child.id()
    }

    pub fn is_running(&mut self) -> bool {
        matches!(self.child.try_wait(), Ok(None))
    }

    /// Poll until `host:port` accepts connections or `timeout` elapses.
    ///
    /// Returns `false` on timeout or when the process exits first.
    pub fn wait_until_listening(&mut self, host: &str, port: u16, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            let reachable = (host, port)
                .to_socket_addrs()
                .map(|mut addrs| addrs.any(|addr| TcpStream::connect_timeout(&addr, POLL_INTERVAL).is_ok()))
                .unwrap_or(false);
            if reachable {
                tracing::info!(host, port, "Backend is accepting connections");
                return true;
            }
            if !self.is_running() {
                tracing::warn!(command = ?self.command, "Backend exited before listening");
                return false;
            }
            if Instant::now() >= deadline {
                tracing::warn!(host, port, "Timed out waiting for backend");
                return false;
            }
            thread::sleep(POLL_INTERVAL);
        }
    }

    /// Kill the child if it is still running and reap it.
    pub fn shutdown(&mut self) {
        if self.is_running() {
            if let Err(e) = self.child.kill() {
                tracing::warn!(pid = self.child.id(), error = %e, "Failed to kill backend");
            }
        }
        match self.child.wait() {
            Ok(status) => tracing::info!(pid = self.child.id(), %status, "Backend process stopped"),
            Err(e) => tracing::warn!(pid = self.child.id(), error = %e, "Failed to reap backend"),
        }
    }
}

impl Drop for BackendProcess {
    fn drop(&mut self) {
        self.shutdown();
    }
}
