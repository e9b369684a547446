//! File logging for the front-end.
//!
//! Everything goes to `<data_dir>/docline.log`. The file is capped once at
//! start-up, never while running.

use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Size limits applied to the log file before a session starts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LogCap {
    /// Files at or below this size are left alone
    limit: u64,
    /// Bytes of recent history kept once the limit is exceeded
    tail: u64,
}

impl Default for LogCap {
    fn default() -> Self {
        Self {
            limit: 5 * 1024 * 1024,
            tail: 1024 * 1024,
        }
    }
}

fn log_path(data_dir: &Path) -> PathBuf {
    data_dir.join("docline.log")
}

/// Cut the log down to its last `cap.tail` bytes, starting at a line.
///
/// Returns whether anything was cut.
fn cap_log(path: &Path, cap: LogCap) -> io::Result<bool> {
    let contents = match fs::read(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e),
    };
    if contents.len() as u64 <= cap.limit {
        return Ok(false);
    }

    let cut = contents.len().saturating_sub(cap.tail as usize);
    let tail = &contents[cut..];
    let start = match tail.iter().position(|&b| b == b'\n') {
        Some(newline) if cut > 0 && contents[cut - 1] != b'\n' => newline + 1,
        _ => 0,
    };
    fs::write(path, &tail[start..])?;
    Ok(true)
}

/// Route `tracing` output for both crates into the data directory log.
///
/// `RUST_LOG` overrides `level` when set.
pub fn init_logging(data_dir: &Path, level: &str) -> color_eyre::Result<()> {
    fs::create_dir_all(data_dir)?;
    let path = log_path(data_dir);

    let trimmed = cap_log(&path, LogCap::default()).unwrap_or_else(|e| {
        eprintln!("Warning: could not trim {}: {e}", path.display());
        false
    });

    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("docline={level},docline_core={level}")));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(true),
        )
        .try_init()?;

    tracing::info!(log_path = %path.display(), trimmed, "docline logging initialized");
    Ok(())
}
