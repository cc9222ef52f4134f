//! Tracing subscriber setup for the binary.
//!
//! Filter directives come from `MW_LOG`, then `RUST_LOG`. Without either the
//! level follows the `-v` count: warn, info, debug, trace. Output always
//! goes to stderr so stdout stays parseable.

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Environment variable holding filter directives.
pub const LOG_ENV_VAR: &str = "MW_LOG";

/// Logging options collected from the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogOptions {
    pub verbosity: u8,
    pub json: bool,
}

pub fn default_level(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Build the filter from the given directive source.
pub fn build_filter(directives: Option<String>, verbosity: u8) -> EnvFilter {
    let builder = EnvFilter::builder().with_default_directive(default_level(verbosity).into());
    builder.parse_lossy(directives.unwrap_or_default().trim())
}

/// Install the global subscriber. Safe to call more than once; later calls
/// are ignored.
pub fn init(options: LogOptions) {
    let directives = std::env::var(LOG_ENV_VAR)
        .ok()
        .or_else(|| std::env::var("RUST_LOG").ok());
    let filter = build_filter(directives, options.verbosity);

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    let _ = if options.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_raises_level() {
        assert_eq!(default_level(0), LevelFilter::WARN);
        assert_eq!(default_level(1), LevelFilter::INFO);
        assert_eq!(default_level(2), LevelFilter::DEBUG);
        assert_eq!(default_level(9), LevelFilter::TRACE);
    }

    #[test]
    fn explicit_directives_win() {
        let filter = build_filter(Some("mw_store=trace".to_string()), 0);
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::TRACE));

        let filter = build_filter(None, 1);
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::INFO));

        let filter = build_filter(Some("   ".to_string()), 0);
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::WARN));
    }
}
