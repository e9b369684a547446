//! Line-driven interactive session.
//!
//! Input lines arrive on a channel so the loop can keep reporting finished
//! analyses and notice a shutdown request while the user is idle.

use std::io::{self, BufRead, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, RecvTimeoutError, channel};
use std::thread;
use std::time::Duration;

use docline_core::AnalysisOutcome;

use crate::form::{render_mode, render_mode_list, render_outcome};
use crate::session::Session;
use crate::worker::{DispatchWorker, SendError};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

const HELP: &str = "\
Commands:
  modes              list analysis modes
  mode <n|name>      select a mode (resets its parameters)
  set <id> <value>   change a parameter of the active mode
  file [path]        attach a source document (no path clears it)
  show               show the active mode's form
  start              send the analysis to the backend
  status             show whether an analysis is running
  help               show this help
  quit               leave the shell
";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Modes,
    Mode(String),
    Set { id: String, value: String },
    File(Option<String>),
    Show,
    Start,
    Status,
    Help,
    Quit,
}

impl ShellCommand {
    /// Parse one input line. Blank lines and `#` comments yield `None`.
    pub fn parse(line: &str) -> Result<Option<Self>, String> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }

        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word.to_ascii_lowercase().as_str() {
            "modes" | "list" => ShellCommand::Modes,
            "mode" | "use" if !rest.is_empty() => ShellCommand::Mode(rest.to_string()),
            "mode" | "use" => return Err("usage: mode <n|name>".to_string()),
            "set" => match rest.split_once(char::is_whitespace) {
                Some((id, value)) => ShellCommand::Set {
                    id: id.to_string(),
                    value: value.trim().to_string(),
                },
                None => return Err("usage: set <id> <value>".to_string()),
            },
            "file" => ShellCommand::File((!rest.is_empty()).then(|| rest.to_string())),
            "show" => ShellCommand::Show,
            "start" | "run" => ShellCommand::Start,
            "status" => ShellCommand::Status,
            "help" | "?" => ShellCommand::Help,
            "quit" | "exit" | "q" => ShellCommand::Quit,
            other => return Err(format!("unknown command `{other}` (try `help`)")),
        };
        Ok(Some(command))
    }
}

/// Forward stdin lines to a channel from a background thread.
///
/// The channel disconnects at end of input.
pub fn spawn_stdin_reader() -> Receiver<String> {
    let (tx, rx) = channel();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

pub struct Shell<'r, W: Write> {
    session: Session<'r>,
    worker: DispatchWorker,
    out: W,
    /// A request was accepted and its outcome not yet reported
    awaiting: bool,
    last_outcome: Option<AnalysisOutcome>,
}

impl<'r, W: Write> Shell<'r, W> {
    pub fn new(session: Session<'r>, worker: DispatchWorker, out: W) -> Self {
        Self {
            session,
            worker,
            out,
            awaiting: false,
            last_outcome: None,
        }
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Process `lines` until `quit`, end of input or `shutdown` is raised.
    ///
    /// At end of input a running analysis is still awaited and reported.
    pub fn run(&mut self, lines: &Receiver<String>, shutdown: &AtomicBool) -> io::Result<()> {
        tracing::info!("Shell session started");
        self.show()?;

        loop {
            if shutdown.load(Ordering::SeqCst) {
                writeln!(self.out, "Interrupted, shutting down")?;
                break;
            }
            self.report_finished()?;

            match lines.recv_timeout(POLL_INTERVAL) {
                Ok(line) => {
                    if !self.handle_line(&line)? {
                        break;
                    }
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    while self.awaiting && !shutdown.load(Ordering::SeqCst) {
                        if let Some(outcome) = self.worker.recv_timeout(POLL_INTERVAL) {
                            self.report(outcome)?;
                        }
                    }
                    break;
                }
            }
        }

        self.out.flush()?;
        tracing::info!("Shell session ended");
        Ok(())
    }

    fn report_finished(&mut self) -> io::Result<()> {
        while let Some(outcome) = self.worker.try_recv() {
            self.report(outcome)?;
        }
        Ok(())
    }

    fn report(&mut self, outcome: AnalysisOutcome) -> io::Result<()> {
        self.awaiting = false;
        write!(self.out, "{}", render_outcome(&outcome))?;
        self.last_outcome = Some(outcome);
        Ok(())
    }

    /// Returns `false` when the session should end.
    fn handle_line(&mut self, line: &str) -> io::Result<bool> {
        let command = match ShellCommand::parse(line) {
            Ok(Some(command)) => command,
            Ok(None) => return Ok(true),
            Err(message) => {
                writeln!(self.out, "{message}")?;
                return Ok(true);
            }
        };

        match command {
            ShellCommand::Quit => return Ok(false),
            ShellCommand::Help => write!(self.out, "{HELP}")?,
            ShellCommand::Modes => {
                write!(self.out, "{}", render_mode_list(self.session.registry()))?
            }
            ShellCommand::Mode(target) => {
                let selected = match target.parse::<usize>() {
                    Ok(index) => self.session.select_mode(index),
                    Err(_) => self.session.select_mode_by_name(&target),
                };
                match selected {
                    Ok(_) => self.show()?,
                    Err(e) => writeln!(self.out, "{e}")?,
                }
            }
            ShellCommand::Set { id, value } => match self.session.set(&id, &value) {
                Ok(Some(warning)) => writeln!(self.out, "{warning}")?,
                Ok(None) => {}
                Err(e) => writeln!(self.out, "{e}")?,
            },
            ShellCommand::File(Some(path)) => match self.session.select_file(path) {
                Ok(file) => writeln!(self.out, "Attached {}", file.file_name())?,
                Err(e) => writeln!(self.out, "{e}")?,
            },
            ShellCommand::File(None) => {
                self.session.clear_file();
                writeln!(self.out, "No source file attached")?;
            }
            ShellCommand::Show => self.show()?,
            ShellCommand::Start => self.start()?,
            ShellCommand::Status => self.status()?,
        }
        Ok(true)
    }

    fn show(&mut self) -> io::Result<()> {
        match self.session.mode() {
            Ok(mode) => write!(
                self.out,
                "{}",
                render_mode(mode, self.session.values(), self.session.source_file())
            ),
            Err(e) => writeln!(self.out, "{e}"),
        }
    }

    fn start(&mut self) -> io::Result<()> {
        let request = match self.session.request() {
            Ok(request) => request,
            Err(e) => return writeln!(self.out, "{e}"),
        };
        let mode = request.mode();
        match self.worker.send(request) {
            Ok(()) => {
                self.awaiting = true;
                writeln!(self.out, "{mode}: analysis started")
            }
            Err(e @ SendError::Busy(_)) => writeln!(self.out, "{e}"),
            Err(e @ SendError::Disconnected) => {
                tracing::error!("Dispatch worker is gone");
                writeln!(self.out, "{e}")
            }
        }
    }

    fn status(&mut self) -> io::Result<()> {
        let mode = self.session.mode().map_err(io::Error::other)?;
        writeln!(self.out, "Active mode: {} ({})", mode.name(), mode.endpoint())?;
        if self.worker.is_busy() {
            writeln!(self.out, "An analysis is running")?;
        }
        match &self.last_outcome {
            Some(outcome) => write!(self.out, "Last result: {}", render_outcome(outcome)),
            None => writeln!(self.out, "No analysis has finished yet"),
        }
    }
}
