//! Opt-in tracing setup for hosts and the `generate_step_specs` binary.
//!
//! Library code only emits `tracing` events. Installing a subscriber is left to
//! the host, either through these helpers or its own `tracing` wiring.

/// Installs the default compact subscriber filtered at `info` unless `RUST_LOG` is set.
///
/// Returns `false` when the `telemetry` feature is disabled or a global
/// subscriber already exists.
#[must_use]
pub fn init_default_tracing() -> bool {
    init_tracing_with_default_directive("info")
}

/// Same as [`init_default_tracing`] but with a caller-chosen fallback directive
/// such as `"scrolly_chart=debug"`.
///
/// Events go to stderr so binaries can keep stdout for their own output.
#[must_use]
pub fn init_tracing_with_default_directive(directive: &str) -> bool {
    #[cfg(feature = "telemetry")]
    {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(directive));
        return tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .compact()
            .try_init()
            .is_ok();
    }

    #[cfg(not(feature = "telemetry"))]
    {
        let _ = directive;
        false
    }
}
