use std::{
    fs::{self, File, OpenOptions},
    io::{self, BufWriter, Write},
    path::Path,
    sync::Mutex,
};

use serde::Serialize;

/// JSONL sink for submission traces. Each record is written and flushed on
/// its own line, so a trace stays readable if the process dies mid-submit.
pub struct TraceLogger {
    sink: Option<Mutex<BufWriter<File>>>,
}

impl TraceLogger {
    /// Opens `path` for appending, creating missing parent directories.
    /// On failure the logger warns once and drops every record.
    pub fn new(path: &str) -> Self {
        match open_append(Path::new(path)) {
            Ok(file) => Self {
                sink: Some(Mutex::new(BufWriter::new(file))),
            },
            Err(e) => {
                eprintln!("Warning: trace disabled, cannot open '{}': {}", path, e);
                Self::disabled()
            }
        }
    }

    pub fn disabled() -> Self {
        Self { sink: None }
    }

    pub fn log<T: Serialize>(&self, record: &T) {
        let Some(sink) = &self.sink else { return };

        let line = match serde_json::to_string(record) {
            Ok(line) => line,
            Err(e) => {
                eprintln!("Warning: trace record not serializable: {}", e);
                return;
            }
        };

        // A poisoned lock still holds a usable writer
        let mut writer = sink.lock().unwrap_or_else(|p| p.into_inner());
        if let Err(e) = writeln!(writer, "{}", line).and_then(|_| writer.flush()) {
            eprintln!("Warning: trace write failed: {}", e);
        }
    }
}

fn open_append(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}
