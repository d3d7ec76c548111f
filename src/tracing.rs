//! Log output. Stderr always gets logs so stdout stays reserved for tables;
//! `--log-file` adds a plain-text copy appended to a file.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, OnceLock};

use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Log file slot shared with the file layer. Records are dropped while empty.
#[derive(Clone, Default)]
struct LogFile {
    file: Arc<Mutex<Option<File>>>,
}

struct LogFileWriter {
    file: Arc<Mutex<Option<File>>>,
}

impl LogFile {
    fn replace(&self, file: Option<File>) {
        if let Ok(mut slot) = self.file.lock() {
            *slot = file;
        }
    }
}

impl<'a> MakeWriter<'a> for LogFile {
    type Writer = LogFileWriter;

    fn make_writer(&'a self) -> Self::Writer {
        LogFileWriter {
            file: self.file.clone(),
        }
    }
}

impl Write for LogFileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let Ok(mut slot) = self.file.lock() else {
            return Ok(buf.len());
        };
        match slot.as_mut() {
            Some(file) => file.write_all(buf).map(|_| buf.len()),
            None => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.file.lock() {
            Ok(mut slot) => slot.as_mut().map_or(Ok(()), |file| file.flush()),
            Err(_) => Ok(()),
        }
    }
}

static LOG_FILE: OnceLock<LogFile> = OnceLock::new();

/// Install the global subscriber and route `log` records into it.
/// `RUST_LOG` overrides the default `warn`.
pub fn init() {
    let _ = tracing_log::LogTracer::init();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let log_file = LOG_FILE.get_or_init(LogFile::default).clone();

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr).with_target(false))
        .with(
            fmt::layer()
                .with_writer(log_file)
                .with_ansi(false)
                .with_target(false),
        )
        .try_init();
}

/// Append logs to `log_file` from now on, or stop with `None`.
pub fn set_log_file(log_file: Option<&Path>) -> io::Result<()> {
    let Some(slot) = LOG_FILE.get() else {
        return Ok(());
    };
    slot.replace(log_file.map(open_append).transpose()?);
    Ok(())
}

fn open_append(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}
