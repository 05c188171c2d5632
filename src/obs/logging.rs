// crates.io
use tracing_subscriber::EnvFilter;

/// Default filter directive when `RUST_LOG` is unset.
pub const DEFAULT_LOG_DIRECTIVE: &str = "realm_provisioner=info";
/// Filter directive used with `--verbose`.
pub const VERBOSE_LOG_DIRECTIVE: &str = "realm_provisioner=debug";

/// Installs the global formatter; `RUST_LOG` takes precedence over `verbose`.
///
/// Calling this more than once is harmless; later calls leave the first subscriber in place.
pub fn init_logging(verbose: bool) {
	let fallback = if verbose { VERBOSE_LOG_DIRECTIVE } else { DEFAULT_LOG_DIRECTIVE };
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

	let _ = tracing_subscriber::fmt().with_env_filter(filter).with_target(false).try_init();
}
