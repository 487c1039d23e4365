use core::cell::RefCell;
use core::fmt::{self, Write};

use embassy_sync::blocking_mutex::{raw::CriticalSectionRawMutex, Mutex};
use heapless::String;
use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};

use crate::config::LOG_LINE_MAX;

/// Byte sink for log lines, e.g. a UART or a ring buffer.
pub trait DebugChannel {
    fn put_bytes(&mut self, bytes: &[u8]);
}

pub struct DebugChannelLogger<C> {
    channel: Mutex<CriticalSectionRawMutex, RefCell<C>>,
    level: LevelFilter,
}

impl<C: DebugChannel + Send> DebugChannelLogger<C> {
    pub const fn new(channel: C, level: LevelFilter) -> Self {
        Self {
            channel: Mutex::new(RefCell::new(channel)),
            level,
        }
    }

    pub fn install(&'static self) -> Result<(), SetLoggerError> {
        log::set_logger(self)?;
        log::set_max_level(self.level);
        Ok(())
    }

    pub fn with_channel<R>(&self, f: impl FnOnce(&mut C) -> R) -> R {
        self.channel.lock(|cell| f(&mut cell.borrow_mut()))
    }
}

impl<C: DebugChannel + Send> Log for DebugChannelLogger<C> {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let mut line = String::<LOG_LINE_MAX>::new();
        let _ = write!(TruncatingLine(&mut line), "[{}] {}", record.level(), record.args());

        self.channel.lock(|cell| {
            // A channel that logs from inside put_bytes would re-enter here.
            if let Ok(mut channel) = cell.try_borrow_mut() {
                channel.put_bytes(line.as_bytes());
                channel.put_bytes(b"\r\n");
            }
        });
    }

    fn flush(&self) {}
}

/// Keeps every char that fits and silently drops the rest of the line.
struct TruncatingLine<'a, const N: usize>(&'a mut String<N>);

impl<const N: usize> Write for TruncatingLine<'_, N> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for ch in s.chars() {
            if self.0.push(ch).is_err() {
                break;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use log::Level;

    use super::*;

    #[derive(Default)]
    struct Capture {
        bytes: Vec<u8>,
    }

    impl DebugChannel for Capture {
        fn put_bytes(&mut self, bytes: &[u8]) {
            self.bytes.extend_from_slice(bytes);
        }
    }

    fn captured(logger: &DebugChannelLogger<Capture>) -> std::string::String {
        logger.with_channel(|channel| std::string::String::from_utf8_lossy(&channel.bytes).into_owned())
    }

    #[test]
    fn writes_level_and_message_with_crlf() {
        let logger = DebugChannelLogger::new(Capture::default(), LevelFilter::Info);
        logger.log(
            &Record::builder()
                .level(Level::Info)
                .args(format_args!("netwizard: start mode={}", "IniLoadOnly"))
                .build(),
        );
        assert_eq!(captured(&logger), "[INFO] netwizard: start mode=IniLoadOnly\r\n");
    }

    #[test]
    fn records_below_level_are_dropped() {
        let logger = DebugChannelLogger::new(Capture::default(), LevelFilter::Info);
        logger.log(
            &Record::builder()
                .level(Level::Debug)
                .args(format_args!("fsm: phase Init -> ActionSelect"))
                .build(),
        );
        assert!(captured(&logger).is_empty());
    }

    #[test]
    fn long_lines_are_truncated() {
        let logger = DebugChannelLogger::new(Capture::default(), LevelFilter::Trace);
        let long = "x".repeat(LOG_LINE_MAX * 2);
        logger.log(
            &Record::builder()
                .level(Level::Warn)
                .args(format_args!("{}", long))
                .build(),
        );
        let expected = format!("[WARN] {}\r\n", &long[..LOG_LINE_MAX - "[WARN] ".len()]);
        assert_eq!(captured(&logger), expected);
    }

    #[test]
    fn long_argument_keeps_its_head() {
        let logger = DebugChannelLogger::new(Capture::default(), LevelFilter::Trace);
        let detail = "e".repeat(200);
        logger.log(
            &Record::builder()
                .level(Level::Warn)
                .args(format_args!("netwizard: ini not loaded err={}", detail))
                .build(),
        );
        let out = captured(&logger);
        assert_eq!(out.len(), LOG_LINE_MAX + 2);
        assert!(out.starts_with("[WARN] netwizard: ini not loaded err=eeee"));
        assert!(out.ends_with("e\r\n"));
    }
}
