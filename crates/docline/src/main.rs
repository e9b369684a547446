use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{WrapErr, eyre};
use docline::backend::BackendProcess;
use docline::config::default_data_dir;
use docline::form::{render_mode, render_mode_list, render_outcome};
use docline::shell::{Shell, spawn_stdin_reader};
use docline::{DispatchWorker, Overrides, Session, Settings, init_logging};
use docline_core::{AnalysisDispatcher, ModeRegistry, ParameterValues};

/// How long a spawned backend gets to start accepting connections
const BACKEND_STARTUP_TIMEOUT: Duration = Duration::from_secs(60);
const POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Parser, Debug)]
#[command(name = "docline")]
#[command(about = "Configure and launch clone-detection analyses on documentation")]
struct Args {
    /// Path to the data directory (default: ~/.docline/)
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Log level (debug, info, warn, error)
    #[arg(short, long)]
    log_level: Option<String>,

    /// Backend base address (default: http://localhost:8080)
    #[arg(long)]
    backend_url: Option<String>,

    /// Request timeout in seconds; 0 waits indefinitely
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Start the backend from the configured command before dispatching
    #[arg(long)]
    spawn_backend: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the analysis modes
    Modes,
    /// Show a mode's parameters with their defaults
    Show {
        /// Mode index, name, endpoint or alias
        mode: String,
    },
    /// Build and send one analysis request
    Run {
        /// Mode index, name, endpoint or alias
        mode: String,
        /// Parameter assignment, repeatable
        #[arg(long = "set", value_name = "ID=VALUE")]
        set: Vec<String>,
        /// Source document to analyse
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Interactive session (default)
    Shell,
}

fn select_mode(session: &mut Session<'_>, target: &str) -> color_eyre::Result<()> {
    match target.parse::<usize>() {
        Ok(index) => session.select_mode(index)?,
        Err(_) => session.select_mode_by_name(target)?,
    };
    Ok(())
}

fn start_backend(
    settings: &Settings,
    dispatcher: &AnalysisDispatcher,
) -> color_eyre::Result<BackendProcess> {
    let mut backend = BackendProcess::spawn(&settings.backend_command)
        .wrap_err_with(|| format!("Failed to start backend {:?}", settings.backend_command))?;

    let (host, port) = dispatcher
        .backend_addr()
        .ok_or_else(|| eyre!("Backend address {} has no host or port", dispatcher.base_url()))?;
    if !backend.wait_until_listening(&host, port, BACKEND_STARTUP_TIMEOUT) {
        eprintln!(
            "Warning: backend (pid {}) is not accepting connections on {host}:{port}",
            backend.id()
        );
    }
    Ok(backend)
}

fn run_once(
    session: &mut Session<'_>,
    worker: &DispatchWorker,
    assignments: &[String],
    file: Option<PathBuf>,
    shutdown: &AtomicBool,
) -> color_eyre::Result<ExitCode> {
    for assignment in assignments {
        let (id, value) = assignment
            .split_once('=')
            .ok_or_else(|| eyre!("Expected ID=VALUE, got {assignment:?}"))?;
        if let Some(warning) = session.set(id.trim(), value)? {
            eprintln!("Warning: {warning}");
        }
    }
    if let Some(path) = file {
        session.select_file(path)?;
    }

    let request = session.request()?;
    worker.send(request)?;

    loop {
        if shutdown.load(Ordering::SeqCst) {
            eprintln!("Interrupted before the analysis finished");
            return Ok(ExitCode::from(130));
        }
        if let Some(outcome) = worker.recv_timeout(POLL_INTERVAL) {
            print!("{}", render_outcome(&outcome));
            return Ok(if outcome.succeeded {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            });
        }
    }
}

fn main() -> color_eyre::Result<ExitCode> {
    color_eyre::install()?;

    let args = Args::parse();
    let data_dir = args.data_dir.unwrap_or_else(default_data_dir);
    let overrides = Overrides {
        backend_url: args.backend_url,
        timeout_secs: args.timeout_secs,
        log_level: args.log_level,
    };
    let settings = Settings::load(data_dir, overrides).wrap_err("Failed to load configuration")?;

    init_logging(&settings.data_dir, &settings.log_level)?;
    tracing::debug!(?settings, "Settings resolved");

    let registry = ModeRegistry::global();
    let mut session = Session::new(registry);
    let command = args.command.unwrap_or(Command::Shell);

    match &command {
        Command::Modes => {
            print!("{}", render_mode_list(registry));
            return Ok(ExitCode::SUCCESS);
        }
        Command::Show { mode } => {
            select_mode(&mut session, mode)?;
            let mode = session.mode()?;
            print!("{}", render_mode(mode, &ParameterValues::defaults_for(mode), None));
            return Ok(ExitCode::SUCCESS);
        }
        Command::Run { .. } | Command::Shell => {}
    }

    let shutdown = Arc::new(AtomicBool::new(false));
    let flag = shutdown.clone();
    ctrlc::set_handler(move || {
        flag.store(true, Ordering::SeqCst);
    })
    .wrap_err("Failed to install signal handler")?;

    let dispatcher = AnalysisDispatcher::new(settings.dispatcher_config())?;
    tracing::info!(backend = %dispatcher.base_url(), "Dispatcher ready");

    let worker = DispatchWorker::new(Box::new(dispatcher.clone()));

    // Declared after the worker so the child is stopped first
    let mut backend = if args.spawn_backend {
        Some(start_backend(&settings, &dispatcher)?)
    } else {
        None
    };

    let code = match command {
        Command::Run { mode, set, file } => {
            select_mode(&mut session, &mode)?;
            run_once(&mut session, &worker, &set, file, &shutdown)?
        }
        _ => {
            let lines = spawn_stdin_reader();
            let mut shell = Shell::new(session, worker, io::stdout());
            let result = shell.run(&lines, &shutdown);
            // A request still waiting on the backend fails once it is gone
            drop(backend.take());
            result?;
            ExitCode::SUCCESS
        }
    };

    tracing::info!("docline shutting down");
    Ok(code)
}
