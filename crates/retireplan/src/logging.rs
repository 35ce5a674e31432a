use std::fs::{self, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub const LOG_FILE_NAME: &str = "retireplan.log";

const ROTATED_MARKER: &[u8] = b"--- Log rotated (older entries removed) ---\n";

/// `~/.retireplan`, or `./.retireplan` without a home directory
pub fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".retireplan")
}

/// Size-based truncation of the log file, applied once at startup
#[derive(Debug, Clone, Copy)]
struct LogRotation {
    max_bytes: u64,
    keep_bytes: u64,
}

impl Default for LogRotation {
    fn default() -> Self {
        Self {
            max_bytes: 5 * 1024 * 1024,
            keep_bytes: 1024 * 1024,
        }
    }
}

impl LogRotation {
    /// Rewrites the file with only its newest whole lines once it grows
    /// past `max_bytes`. Returns whether anything was removed.
    fn apply(&self, log_path: &Path) -> std::io::Result<bool> {
        let contents = match fs::read(log_path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(e),
        };
        if contents.len() as u64 <= self.max_bytes {
            return Ok(false);
        }

        let tail_start = contents.len().saturating_sub(self.keep_bytes as usize);
        let tail = &contents[tail_start..];
        let tail = match tail.iter().position(|&b| b == b'\n') {
            Some(newline) if tail_start > 0 => &tail[newline + 1..],
            _ => tail,
        };

        let mut rotated = Vec::with_capacity(ROTATED_MARKER.len() + tail.len());
        rotated.extend_from_slice(ROTATED_MARKER);
        rotated.extend_from_slice(tail);
        fs::write(log_path, rotated)?;
        Ok(true)
    }
}

/// Send `tracing` output to `{data_dir}/retireplan.log`.
///
/// `RUST_LOG` takes precedence over `level`. The core crate logs at `warn`
/// unless `RUST_LOG` says otherwise.
pub fn init_logging(data_dir: &Path, level: &str) -> color_eyre::Result<()> {
    fs::create_dir_all(data_dir)?;
    let log_path = data_dir.join(LOG_FILE_NAME);

    let rotated = LogRotation::default().apply(&log_path).unwrap_or_else(|e| {
        eprintln!("Warning: could not rotate {}: {}", log_path.display(), e);
        false
    });

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("retireplan={level},retireplan_core=warn")));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(true),
        )
        .try_init()?;

    tracing::info!(log_path = %log_path.display(), rotated, "Logging started");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rotation(max_bytes: u64, keep_bytes: u64) -> LogRotation {
        LogRotation {
            max_bytes,
            keep_bytes,
        }
    }

    #[test]
    fn test_small_log_is_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(LOG_FILE_NAME);
        fs::write(&path, "line one\nline two\n").unwrap();

        assert!(!rotation(1024, 10).apply(&path).unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), "line one\nline two\n");
    }

    #[test]
    fn test_rotation_keeps_recent_whole_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(LOG_FILE_NAME);
        let content: String = (0..100).map(|i| format!("entry {i:03}\n")).collect();
        fs::write(&path, &content).unwrap();

        assert!(rotation(500, 50).apply(&path).unwrap());
        let rotated = fs::read_to_string(&path).unwrap();

        assert!(rotated.starts_with("--- Log rotated"));
        assert!(rotated.ends_with("entry 099\n"));
        assert!(!rotated.contains("entry 000"));
        for line in rotated.lines().skip(1) {
            assert!(line.starts_with("entry "), "partial line kept: {line:?}");
        }
    }

    #[test]
    fn test_missing_log_is_fine() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!rotation(10, 5).apply(&dir.path().join("absent.log")).unwrap());
    }
}
