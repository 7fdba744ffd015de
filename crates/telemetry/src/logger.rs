use std::sync::OnceLock;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::Registry;
use tracing_subscriber::fmt;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::reload;
use tracing_subscriber::util::SubscriberInitExt;

use crate::TelemetryError;

/// Custom time formatter that displays time as "YYYY-MM-DD HH:MM:SS.micros"
struct CustomTimeFormat;

impl FormatTime for CustomTimeFormat {
	fn format_time(&self, w: &mut fmt::format::Writer<'_>) -> std::fmt::Result {
		let now = std::time::SystemTime::now();
		let datetime: chrono::DateTime<chrono::Local> = now.into();
		write!(w, "{}", datetime.format("[%Y-%m-%d %H:%M:%S%.6f]"))
	}
}

type ReloadHandle = reload::Handle<EnvFilter, Registry>;

static RELOAD_HANDLE: OnceLock<ReloadHandle> = OnceLock::new();

const VALID_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Initialize the console logger.
///
/// `filter` is an `EnvFilter` directive string, either a plain level
/// ("info") or per-target directives ("resp_decoder=trace,warn"). Records
/// emitted through the `log` facade are forwarded to the subscriber, which
/// is how the decoder's diagnostics reach the console.
///
/// # Example
///
/// ```no_run
/// telemetry::init("resp_decoder=debug,info")?;
/// log::info!("Decoder starting");
/// # Ok::<(), telemetry::TelemetryError>(())
/// ```
///
/// # Errors
///
/// Returns an error if the filter does not parse or if a global logger was
/// already installed.
pub fn init(filter: &str) -> Result<(), TelemetryError> {
	let env_filter =
		EnvFilter::try_new(filter).map_err(|e| TelemetryError::InvalidLogLevel(e.to_string()))?;
	install(env_filter)
}

/// Initialize the console logger from `RUST_LOG`, falling back to
/// `default_level` when the variable is unset or invalid.
pub fn init_from_env(default_level: &str) -> Result<(), TelemetryError> {
	let env_filter = match EnvFilter::try_from_default_env() {
		Ok(filter) => filter,
		Err(_) => EnvFilter::try_new(default_level)
			.map_err(|e| TelemetryError::InvalidLogLevel(e.to_string()))?,
	};
	install(env_filter)
}

fn install(env_filter: EnvFilter) -> Result<(), TelemetryError> {
	let (filter_layer, reload_handle) = reload::Layer::new(env_filter);

	tracing_subscriber::registry()
		.with(filter_layer)
		.with(
			fmt::layer()
				.with_timer(CustomTimeFormat)
				.with_target(true)
				.with_thread_ids(true)
				.with_line_number(false)
				.with_file(false),
		)
		.try_init()
		.map_err(|e| TelemetryError::AlreadyInitialized(e.to_string()))?;

	let _ = RELOAD_HANDLE.set(reload_handle);
	log::debug!("Console logger initialized");
	Ok(())
}

/// Check that `level` is one of trace, debug, info, warn or error,
/// ignoring case. Returns the lowercase form.
pub fn validate_log_level(level: &str) -> Result<String, TelemetryError> {
	let level_lower = level.to_lowercase();
	if VALID_LEVELS.contains(&level_lower.as_str()) {
		Ok(level_lower)
	} else {
		Err(TelemetryError::InvalidLogLevel(level.to_string()))
	}
}

/// Reload the log level dynamically
///
/// # Arguments
///
/// * `level` - The new log level to set. Valid values: trace, debug, info,
///   warn, error
///
/// # Errors
///
/// Returns an error if:
/// - The provided log level is invalid
/// - The logger has not been initialized
/// - The reload operation fails
pub fn reload_log_level(level: &str) -> Result<(), TelemetryError> {
	let level_lower = validate_log_level(level)?;

	let handle = RELOAD_HANDLE.get().ok_or(TelemetryError::NotInitialized)?;

	handle
		.reload(EnvFilter::new(&level_lower))
		.map_err(|e| TelemetryError::ReloadFailed(e.to_string()))
}

#[cfg(test)]
mod tests {
	use rstest::rstest;

	use super::*;

	#[rstest]
	#[case("trace", "trace")]
	#[case("debug", "debug")]
	#[case("info", "info")]
	#[case("warn", "warn")]
	#[case("error", "error")]
	#[case("TRACE", "trace")]
	#[case("DeBuG", "debug")]
	fn test_valid_log_levels(#[case] level: &str, #[case] expected: &str) {
		assert_eq!(validate_log_level(level).unwrap(), expected);
	}

	#[rstest]
	#[case("invalid")]
	#[case("warning")] // Common mistake (should be "warn")
	#[case("critical")]
	#[case("")]
	fn test_invalid_log_levels(#[case] level: &str) {
		let result = reload_log_level(level);
		assert!(
			matches!(result, Err(TelemetryError::InvalidLogLevel(_))),
			"Expected InvalidLogLevel for: {}",
			level
		);
	}

	/// No test installs the global logger, so a valid level must report
	/// that the logger is missing.
	#[test]
	fn test_reload_before_init() {
		assert!(matches!(
			reload_log_level("debug"),
			Err(TelemetryError::NotInitialized)
		));
	}

	#[test]
	fn test_init_rejects_bad_filter() {
		assert!(matches!(
			init("resp_decoder=loud"),
			Err(TelemetryError::InvalidLogLevel(_))
		));
	}
}
