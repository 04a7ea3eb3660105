//! `tracing` output to the browser console
//!
//! Each formatted event is buffered and handed to the console method that
//! matches its level, so devtools filtering by level keeps working.

use std::io::{self, Write};
use tracing::{Level, Metadata};
use tracing_subscriber::fmt::MakeWriter;
use wasm_bindgen::JsValue;
use web_sys::console;

/// Hands out one [`ConsoleWriter`] per event
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleMakeWriter;

/// Buffers one formatted event and emits it on drop
pub struct ConsoleWriter {
    level: Level,
    buffer: Vec<u8>,
}

impl ConsoleWriter {
    fn new(level: Level) -> Self {
        Self {
            level,
            buffer: Vec::with_capacity(128),
        }
    }
}

impl Write for ConsoleWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        let text = String::from_utf8_lossy(&self.buffer);
        let line = text.trim_end();
        if line.is_empty() {
            return;
        }

        let message = JsValue::from_str(line);
        match self.level {
            Level::ERROR => console::error_1(&message),
            Level::WARN => console::warn_1(&message),
            Level::INFO => console::info_1(&message),
            _ => console::debug_1(&message),
        }
    }
}

impl<'a> MakeWriter<'a> for ConsoleMakeWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter::new(Level::INFO)
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        ConsoleWriter::new(*meta.level())
    }
}

/// Install the console subscriber. Safe to call more than once.
pub fn init() {
    let max_level = if cfg!(debug_assertions) {
        Level::DEBUG
    } else {
        Level::INFO
    };

    // no clock on wasm32-unknown-unknown, so no timestamps; ansi is off by feature
    let result = tracing_subscriber::fmt()
        .with_writer(ConsoleMakeWriter)
        .with_max_level(max_level)
        .with_target(false)
        .without_time()
        .try_init();

    if result.is_err() {
        tracing::debug!("Console logging already installed");
    }
}
