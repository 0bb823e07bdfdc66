//! Process-wide `tracing` setup: stdout plus an optional per-run log file.

use crate::{Error, Result};
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer, Registry};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// One of trace/debug/info/warn/error. `RUST_LOG` takes precedence when set.
    pub level: String,
    /// Directory for `pipeline_<timestamp>.log`; `None` disables the file sink.
    pub dir: Option<PathBuf>,
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            dir: Some(PathBuf::from("logs")),
            format: LogFormat::Text,
        }
    }
}

impl LogConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        Self::from_lookup_with_level(lookup, None)
    }

    /// `level`, when given, replaces `LOG_LEVEL` before validation, so a bad
    /// environment value does not block an explicit override.
    pub fn from_lookup_with_level(
        lookup: impl Fn(&str) -> Option<String>,
        level: Option<&str>,
    ) -> Result<Self> {
        let mut cfg = Self::default();

        if let Some(v) = level {
            cfg.level = v.to_string();
        } else if let Some(v) = lookup("LOG_LEVEL").filter(|v| !v.trim().is_empty()) {
            cfg.level = v;
        }
        if let Some(v) = lookup("LOG_DIR") {
            // An empty LOG_DIR turns the file sink off.
            cfg.dir = (!v.trim().is_empty()).then(|| PathBuf::from(v));
        }
        if let Some(v) = lookup("LOG_FORMAT").filter(|v| !v.trim().is_empty()) {
            cfg.format = match v.trim().to_ascii_lowercase().as_str() {
                "text" | "plain" => LogFormat::Text,
                "json" => LogFormat::Json,
                _ => return Err(Error::config(format!("invalid LOG_FORMAT: {v}"))),
            };
        }

        cfg.validate()?;
        Ok(cfg)
    }

    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.normalized_level().map(|_| ())
    }

    /// Lower-cased `tracing` level name; accepts `WARNING` as an alias of `warn`.
    pub fn normalized_level(&self) -> Result<&'static str> {
        match self.level.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok("trace"),
            "debug" => Ok("debug"),
            "info" => Ok("info"),
            "warn" | "warning" => Ok("warn"),
            "error" => Ok("error"),
            other => Err(Error::config(format!("invalid LOG_LEVEL: {other}"))),
        }
    }
}

/// Keeps the file writer alive; drop it last so buffered lines are flushed.
pub struct LogGuard {
    pub log_file: Option<PathBuf>,
    _worker: Option<WorkerGuard>,
}

pub fn init_global(cfg: &LogConfig) -> Result<LogGuard> {
    let level = cfg.normalized_level()?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();
    layers.push(match cfg.format {
        LogFormat::Text => fmt::layer().with_target(true).boxed(),
        LogFormat::Json => fmt::layer().json().with_target(true).boxed(),
    });

    let mut worker = None;
    let mut log_file = None;
    if let Some(dir) = &cfg.dir {
        std::fs::create_dir_all(dir)
            .map_err(|e| Error::backend(format!("create log dir {}", dir.display()), e))?;
        let name = format!("pipeline_{}.log", chrono::Local::now().format("%Y%m%d_%H%M%S"));
        let appender = tracing_appender::rolling::never(dir, &name);
        let (writer, guard) = tracing_appender::non_blocking(appender);
        layers.push(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true)
                .boxed(),
        );
        worker = Some(guard);
        log_file = Some(dir.join(name));
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()
        .map_err(|e| Error::BackendMessage(format!("tracing already initialized: {e}")))?;

    Ok(LogGuard {
        log_file,
        _worker: worker,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |k| {
            pairs
                .iter()
                .find(|(key, _)| *key == k)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn defaults() {
        let cfg = LogConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg, LogConfig::default());
        assert_eq!(cfg.normalized_level().unwrap(), "info");
    }

    #[test]
    fn reads_level_dir_and_format() {
        let cfg = LogConfig::from_lookup(lookup(&[
            ("LOG_LEVEL", "WARNING"),
            ("LOG_DIR", "/tmp/etl-logs"),
            ("LOG_FORMAT", "json"),
        ]))
        .unwrap();
        assert_eq!(cfg.normalized_level().unwrap(), "warn");
        assert_eq!(cfg.dir, Some(PathBuf::from("/tmp/etl-logs")));
        assert_eq!(cfg.format, LogFormat::Json);
    }

    #[test]
    fn empty_log_dir_disables_file_sink() {
        let cfg = LogConfig::from_lookup(lookup(&[("LOG_DIR", "")])).unwrap();
        assert_eq!(cfg.dir, None);
    }

    #[test]
    fn explicit_level_wins_over_invalid_env_level() {
        let cfg =
            LogConfig::from_lookup_with_level(lookup(&[("LOG_LEVEL", "loud")]), Some("debug"))
                .unwrap();
        assert_eq!(cfg.normalized_level().unwrap(), "debug");
        assert!(LogConfig::from_lookup_with_level(lookup(&[]), Some("loud")).is_err());
    }

    #[test]
    fn init_global_reports_the_log_file() {
        let dir = std::env::temp_dir().join(format!("etl-logs-{}", uuid::Uuid::new_v4()));
        let cfg = LogConfig {
            dir: Some(dir.clone()),
            ..LogConfig::default()
        };
        let guard = init_global(&cfg).unwrap();
        let file = guard.log_file.clone().unwrap();
        assert_eq!(file.parent(), Some(dir.as_path()));
        let name = file.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("pipeline_") && name.ends_with(".log"), "{name}");
        drop(guard);
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn rejects_unknown_level_and_format() {
        assert!(LogConfig::from_lookup(lookup(&[("LOG_LEVEL", "loud")])).is_err());
        assert!(LogConfig::from_lookup(lookup(&[("LOG_FORMAT", "xml")])).is_err());
        assert!(LogConfig::default().with_level("verbose").validate().is_err());
    }
}
