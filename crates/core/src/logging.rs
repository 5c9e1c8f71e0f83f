use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    filter::Targets, fmt, prelude::__tracing_subscriber_SubscriberExt, util::SubscriberInitExt,
    EnvFilter,
};

/// Install a global subscriber for hosts that don't bring their own.
///
/// A valid `RUST_LOG` is the only filter when set. Otherwise the crate logs
/// at INFO (DEBUG when `verbose`) and other targets stay quiet. Calling this
/// twice is harmless: the second install is ignored.
pub fn init_logging(verbose: bool) {
    let fmt_layer = fmt::layer().without_time();
    let _ = match EnvFilter::try_from_default_env() {
        Ok(env_filter) => tracing_subscriber::registry()
            .with(fmt_layer)
            .with(env_filter)
            .try_init(),
        Err(_) => tracing_subscriber::registry()
            .with(fmt_layer)
            .with(default_filter(verbose))
            .try_init(),
    };
}

/// Filter used when `RUST_LOG` is absent or unparsable.
pub fn default_filter(verbose: bool) -> Targets {
    let level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    Targets::new().with_target("linked_portfolio_core", level)
}
