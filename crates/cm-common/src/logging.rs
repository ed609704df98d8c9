use std::path::PathBuf;
use std::sync::OnceLock;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Where log lines go. Stdout is never a target; it carries command output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    /// `<dir>/<app>.log`, rotated daily.
    DailyFile(PathBuf),
}

impl LogTarget {
    /// `CM_LOG_DIR` selects a daily log file; anything else logs to stderr.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        match lookup("CM_LOG_DIR") {
            Some(dir) if !dir.trim().is_empty() => Self::DailyFile(PathBuf::from(dir.trim())),
            _ => Self::Stderr,
        }
    }

    fn make_writer(&self, app_name: &str) -> BoxMakeWriter {
        let Self::DailyFile(dir) = self else {
            return BoxMakeWriter::new(std::io::stderr);
        };
        if let Err(err) = std::fs::create_dir_all(dir) {
            eprintln!("cannot create log dir {} ({err}); logging to stderr", dir.display());
            return BoxMakeWriter::new(std::io::stderr);
        }

        let appender = tracing_appender::rolling::daily(dir, format!("{app_name}.log"));
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let _ = LOG_GUARD.set(guard);
        BoxMakeWriter::new(writer)
    }
}

/// Install the global subscriber once; later calls are no-ops. `RUST_LOG`
/// filters (default `info`).
pub fn init_tracing_subscriber(app_name: &'static str) {
    let target = LogTarget::from_lookup(|key| std::env::var(key).ok());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(target.make_writer(app_name))
        .try_init();
}

/// Route panics through `tracing` before the default hook prints them.
pub fn install_tracing_panic_hook(app_name: &'static str) {
    static INSTALLED: OnceLock<()> = OnceLock::new();

    INSTALLED.get_or_init(|| {
        let default_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            let message = info
                .payload()
                .downcast_ref::<&str>()
                .copied()
                .or_else(|| info.payload().downcast_ref::<String>().map(String::as_str))
                .unwrap_or("non-string panic payload");
            tracing::error!(
                application = app_name,
                location = %info.location().map(ToString::to_string).unwrap_or_default(),
                panic_message = message,
                "panic"
            );
            default_hook(info);
        }));
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_dir_selects_daily_file() {
        let target = LogTarget::from_lookup(|key| {
            (key == "CM_LOG_DIR").then(|| " /var/log/cm ".to_string())
        });
        assert_eq!(target, LogTarget::DailyFile(PathBuf::from("/var/log/cm")));
    }

    #[test]
    fn missing_or_blank_log_dir_uses_stderr() {
        assert_eq!(LogTarget::from_lookup(|_| None), LogTarget::Stderr);
        assert_eq!(
            LogTarget::from_lookup(|_| Some("  ".to_string())),
            LogTarget::Stderr
        );
    }

    #[test]
    fn daily_file_target_creates_its_directory() {
        let dir = tempfile::tempdir().unwrap();
        let logs = dir.path().join("logs");

        let _writer = LogTarget::DailyFile(logs.clone()).make_writer("cm-common-test");
        assert!(logs.is_dir());
    }

    #[test]
    fn init_is_idempotent() {
        init_tracing_subscriber("cm-common-test");
        init_tracing_subscriber("cm-common-test");
        tracing::info!("subscriber installed");
    }
}
