//! CLI settings layered over [`RuntimeConfig`].
use std::env;
use std::path::PathBuf;

use atb_runtime::RuntimeConfig;
use atb_runtime::config::parse_flag;

/// Where and whether to write a log file.
///
/// Read before any subscriber exists, so values it cannot parse are kept in
/// `ignored` and reported once logging is up.
#[derive(Clone, Debug, Default)]
pub struct LoggingConfig {
    /// Overrides the platform log directory.
    pub log_dir: Option<PathBuf>,
    /// Also write logs to `<log_dir>/atb.log`.
    pub file_logging: bool,
    /// Unparsable variables as `(key, value)`.
    pub ignored: Vec<(&'static str, String)>,
}

impl LoggingConfig {
    /// Environment variables:
    /// - `ATB_LOG_DIR` - Directory for the log file (default: platform data dir)
    /// - `ATB_FILE_LOG` - Write a log file next to stderr output
    ///   (default: true if `ATB_LOG_DIR` is set)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut ignored = Vec::new();
        let log_dir = lookup("ATB_LOG_DIR")
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from);
        let file_logging = match lookup("ATB_FILE_LOG") {
            Some(raw) => parse_flag(&raw).unwrap_or_else(|| {
                ignored.push(("ATB_FILE_LOG", raw));
                log_dir.is_some()
            }),
            None => log_dir.is_some(),
        };
        Self {
            log_dir,
            file_logging,
            ignored,
        }
    }
}

/// Battle settings, read after logging is installed.
#[derive(Clone, Debug)]
pub struct CliConfig {
    pub runtime: RuntimeConfig,
    /// Allies are human-controlled and answered by the command provider.
    pub human_allies: bool,
    pub pretty_json: bool,
}

impl CliConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables (in addition to the `RuntimeConfig` ones):
    /// - `ATB_HUMAN_PARTY` - Route ally turns through the command provider (default: false)
    /// - `ATB_PRETTY_JSON` - Pretty-print the battle summary (default: true)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            runtime: RuntimeConfig::from_lookup(&lookup),
            human_allies: read_flag(&lookup, "ATB_HUMAN_PARTY").unwrap_or(false),
            pretty_json: read_flag(&lookup, "ATB_PRETTY_JSON").unwrap_or(true),
        }
    }
}

fn read_flag(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<bool> {
    let raw = lookup(key)?;
    let flag = parse_flag(&raw);
    if flag.is_none() {
        tracing::warn!(key, value = %raw, "ignoring unparsable environment variable");
    }
    flag
}
