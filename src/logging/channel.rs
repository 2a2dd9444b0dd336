use super::{ChannelName, Severity};
use chrono::Local;
use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// One named log sink: an append-mode file handle opened once and kept
/// open for the channel's lifetime, with a fixed severity floor.
///
/// Record template: `[{timestamp}] {line} - {channel} - {LEVEL} - {message}`.
/// The app channel additionally mirrors Warning+ records to stderr as
/// `{channel} - {LEVEL} - {message}`.
pub struct Channel {
    name: ChannelName,
    path: PathBuf,
    floor: Severity,
    console_echo: bool,
    file: Mutex<File>,
}

impl Channel {
    pub(crate) fn open(name: ChannelName, path: PathBuf) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self {
            name,
            floor: name.floor(),
            console_echo: name.console_echo(),
            path,
            file: Mutex::new(file),
        })
    }

    pub fn name(&self) -> ChannelName {
        self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn floor(&self) -> Severity {
        self.floor
    }

    /// Write one record if `severity` clears the floor.
    ///
    /// `line` is the caller's source line, embedded in the record. A failed
    /// file write drops the record with a `tracing` warning; run logging
    /// never fails upward into the workflow.
    pub(crate) fn write(&self, severity: Severity, line: u32, message: &str) {
        if severity < self.floor {
            return;
        }

        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        {
            let mut file = self.file.lock();
            if let Err(e) = writeln!(
                file,
                "[{}] {} - {} - {} - {}",
                timestamp, line, self.name, severity, message
            ) {
                tracing::warn!(channel = %self.name, error = %e, "log record dropped");
            }
        }

        if self.console_echo && severity >= Severity::Warning {
            eprintln!("{} - {} - {}", self.name, severity, message);
        }
    }
}
