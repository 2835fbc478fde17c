//! Logger initialization for the command-line tool.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use log::LevelFilter;

use crate::error::{ListError, Result};

/// A log file at or above this size is truncated instead of appended to
pub const MAX_LOG_FILE_SIZE: u64 = 128 * 1000;

/// Open the log file: append while it is under [`MAX_LOG_FILE_SIZE`], else start over.
pub fn open_log_file(path: impl AsRef<Path>) -> io::Result<File> {
    let path = path.as_ref();
    let append = fs::metadata(path)
        .map(|meta| meta.len() < MAX_LOG_FILE_SIZE)
        .unwrap_or(false);

    let mut options = OpenOptions::new();
    options.create(true);
    if append {
        options.append(true);
    } else {
        options.write(true).truncate(true);
    }
    options.open(path)
}

/// Writes every log line to stderr and the log file
struct Tee {
    file: File,
}

impl Write for Tee {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stderr().write_all(buf)?;
        self.file.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()?;
        self.file.flush()
    }
}

/// Install the global logger.
///
/// `RUST_LOG` overrides `level` when set.
pub fn init_logger(level: LevelFilter, log_file: Option<&Path>) -> Result<()> {
    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(level)
        .parse_default_env()
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] {:<5} {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        });

    if let Some(path) = log_file {
        let file = open_log_file(path)?;
        builder.target(env_logger::Target::Pipe(Box::new(Tee { file })));
    }

    builder
        .try_init()
        .map_err(|e| ListError::ConfigError(format!("Failed to initialize logger: {}", e)))
}
