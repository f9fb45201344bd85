//! Logger setup for the command-line runner

use env_logger::{Builder, Env};
use log::LevelFilter;

/// Level for this crate's own messages at a given `-v` count
///
/// 0 shows lifecycle events, 1 adds path landings and rest events, 2 and
/// above add everything.
pub fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Default filter: dependencies stay at `warn`, the simulation logs at
/// the requested level
pub fn default_filter(verbosity: u8) -> String {
    let level = level_for(verbosity).as_str().to_lowercase();
    format!("warn,{}={}", env!("CARGO_CRATE_NAME"), level)
}

/// Initializes the global logger.
///
/// `RUST_LOG` replaces the default filter entirely. Timestamps are left out
/// so traces of the same run compare line for line.
pub fn init(verbosity: u8) {
    let env = Env::default().default_filter_or(default_filter(verbosity));
    let mut builder = Builder::from_env(env);
    builder.format_timestamp(None);

    // Only fails if a logger is already installed, which tests do repeatedly
    let _ = builder.try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(level_for(0), LevelFilter::Info);
        assert_eq!(level_for(1), LevelFilter::Debug);
        assert_eq!(level_for(2), LevelFilter::Trace);
        assert_eq!(level_for(9), LevelFilter::Trace);
    }

    #[test]
    fn test_default_filter_scopes_to_crate() {
        assert_eq!(default_filter(0), "warn,slope_roller=info");
        assert_eq!(default_filter(1), "warn,slope_roller=debug");
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init(0);
        init(2);
        log::debug!("logger still usable");
    }
}
