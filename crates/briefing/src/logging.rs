//! Tracing setup for the briefing binary

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Default filter: briefing crates at info, dependencies quiet
const DEFAULT_DIRECTIVES: &str = "warn,briefing=info,briefing_cli=info";

/// Install the global tracing subscriber
///
/// `RUST_LOG` overrides [`DEFAULT_DIRECTIVES`] when set, so noisy
/// dependency targets (reqwest, hyper) stay at warn unless asked for.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
