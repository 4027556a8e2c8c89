// Copyright (c) 2022 Huawei Technologies Co.,Ltd. All rights reserved.
//
// sysMaster is licensed under Mulan PSL v2.
// You can use this software according to the terms and conditions of the Mulan
// PSL v2.
// You may obtain a copy of Mulan PSL v2 at:
//         http://license.coscl.org.cn/MulanPSL2
// THIS SOFTWARE IS PROVIDED ON AN "AS IS" BASIS, WITHOUT WARRANTIES OF ANY
// KIND, EITHER EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO
// NON-INFRINGEMENT, MERCHANTABILITY OR FIT FOR A PARTICULAR PURPOSE.
// See the Mulan PSL v2 for more details.

//!
use log::{Level, Log, Metadata, Record};
use std::{
    fs::{self, File, OpenOptions},
    io::{Error, Write},
    os::unix::{fs::OpenOptionsExt, net::UnixDatagram},
    path::{Path, PathBuf},
    sync::Mutex,
};

const SYSLOG_SOCKET: &str = "/dev/log";
/* LOG_DAEMON facility */
const SYSLOG_FACILITY: u8 = 3;

fn write_msg_common(writer: &mut impl Write, level: Level, module: &str, msg: String) {
    let now = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
    if let Err(e) = writeln!(writer, "{} {} {} {}", now, level, module, msg) {
        eprintln!("Failed to log message: {}", e);
    }
}

fn syslog_severity(level: Level) -> u8 {
    match level {
        Level::Error => 3,
        Level::Warn => 4,
        Level::Info => 6,
        Level::Debug | Level::Trace => 7,
    }
}

struct SysLogger {
    ident: String,
    dgram: Mutex<Option<UnixDatagram>>,
}

impl SysLogger {
    fn new(ident: &str) -> Result<Self, Error> {
        let dgram = Self::connect()?;
        Ok(Self {
            ident: ident.to_string(),
            dgram: Mutex::new(Some(dgram)),
        })
    }

    fn connect() -> Result<UnixDatagram, Error> {
        let sock = UnixDatagram::unbound()?;
        sock.connect(SYSLOG_SOCKET)?;
        Ok(sock)
    }
}

/* This is an extremely simple implementation, and only
 * supports the very basic log function. */
impl Log for SysLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        let pri = SYSLOG_FACILITY * 8 + syslog_severity(record.level());
        let msg = format!(
            "<{}>{}: {} {}",
            pri,
            self.ident,
            record.module_path().unwrap_or("unknown"),
            record.args()
        );

        let mut dgram = match self.dgram.lock() {
            Ok(v) => v,
            Err(_) => return,
        };
        if dgram.is_none() {
            /* journald may have been restarted, try once more */
            *dgram = Self::connect().ok();
        }
        if let Some(sock) = dgram.as_ref() {
            if let Err(e) = sock.send(msg.as_bytes()) {
                eprintln!("Failed to send message to syslogger: {}", e);
                *dgram = None;
            }
        }
    }

    fn flush(&self) {}
}

struct ConsoleLogger;

/* stdout is left to the command output, diagnostics go to stderr */
impl Log for ConsoleLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        let mut stderr = std::io::stderr();
        write_msg_common(
            &mut stderr,
            record.level(),
            record.module_path().unwrap_or("unknown"),
            record.args().to_string(),
        );
    }

    fn flush(&self) {}
}

struct FileLogger {
    file_path: PathBuf,
    file: Mutex<File>,
}

impl FileLogger {
    fn file_open(file_path: &Path, file_mode: u32) -> Result<File, Error> {
        if let Some(dir) = file_path.parent() {
            if !dir.exists() {
                fs::create_dir_all(dir)?;
            }
        }

        OpenOptions::new()
            .create(true)
            .append(true)
            .mode(file_mode)
            .open(file_path)
    }

    fn new(file_path: PathBuf, file_mode: u32) -> Result<Self, Error> {
        let file = Self::file_open(&file_path, file_mode)?;
        Ok(Self {
            file_path,
            file: Mutex::new(file),
        })
    }
}

impl Log for FileLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        let mut file = match self.file.lock() {
            Err(_) => return,
            Ok(v) => v,
        };
        write_msg_common(
            &mut *file,
            record.level(),
            record.module_path().unwrap_or("unknown"),
            record.args().to_string(),
        );
    }

    fn flush(&self) {
        let mut file = match self.file.lock() {
            Err(_) => return,
            Ok(v) => v,
        };
        if let Err(e) = file.flush() {
            eprintln!(
                "Failed to flush log file {}: {}",
                self.file_path.display(),
                e
            );
        }
    }
}

/// Collect different kinds of loggers together.
///
/// Include: SysLogger, ConsoleLogger, FileLogger
struct CombinedLogger {
    loggers: Vec<Box<dyn Log>>,
}

impl Log for CombinedLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        for logger in &self.loggers {
            logger.log(record);
        }
    }

    fn flush(&self) {
        for logger in &self.loggers {
            logger.flush();
        }
    }
}

/// Parse the textual log level used in the configuration file.
///
/// Unknown strings fall back to `Info`.
pub fn parse_level(level: &str) -> Level {
    match level.trim().to_lowercase().as_str() {
        "error" => Level::Error,
        "warn" | "warning" => Level::Warn,
        "debug" => Level::Debug,
        "trace" => Level::Trace,
        _ => Level::Info,
    }
}

/// Initialize the global static logger instance.
/// Available log `targets` include `file`, `syslog`, `console`.
/// `file_path` only takes effect on the `file` target.
///
/// Repeated targets take effect only once. The global logger can be set only
/// once per process, later calls only change the max level.
///
/// # Arguments
///
/// * `name` - The application name, used as syslog identifier.
/// * `level` - Log message level.
/// * `targets` - A set of log targets.
/// * `file_path` - The log file path.
pub fn init_log(name: &str, level: Level, targets: &[&str], file_path: &str) {
    let mut loggers: Vec<Box<dyn Log>> = Vec::new();
    let mut seen: Vec<&str> = Vec::new();

    for target in targets.iter().map(|t| t.trim()) {
        if seen.contains(&target) {
            continue;
        }
        seen.push(target);

        let logger = match target {
            "console" => Box::new(ConsoleLogger) as Box<dyn Log>,
            "syslog" => match SysLogger::new(name) {
                Ok(logger) => Box::new(logger) as Box<dyn Log>,
                Err(e) => {
                    eprintln!("{} failed to create syslogger: {}", name, e);
                    continue;
                }
            },
            "file" => match FileLogger::new(PathBuf::from(file_path), 0o600) {
                Ok(logger) => Box::new(logger) as Box<dyn Log>,
                Err(e) => {
                    eprintln!("{} failed to create '{}' file logger: {}", name, file_path, e);
                    continue;
                }
            },
            _ => {
                eprintln!("{}: log target '{}' is strange, ignoring.", name, target);
                continue;
            }
        };
        loggers.push(logger);
    }

    if loggers.is_empty() {
        eprintln!("{}: no available log targets.", name);
    }

    log::set_max_level(level.to_level_filter());
    if log::set_boxed_logger(Box::new(CombinedLogger { loggers })).is_err() {
        /* already initialized, keep the first set of targets */
        log::debug!("{}: logger already initialized", name);
    }
}
