//! Subscriber setup for the `flowtools` binary.
//!
//! Logs go to stderr so that envelopes and relay results printed on stdout
//! stay pipeable. With `--otel`, spans (notably `file_relay`) are also
//! exported through OpenTelemetry to stdout.
//!
//! ```no_run
//! use flowtools_observe::tracing_setup::{filter_for_verbosity, init_tracing, shutdown_tracing};
//!
//! init_tracing(filter_for_verbosity(1, false), true).unwrap();
//! // ... run the command ...
//! shutdown_tracing();
//! ```

use std::sync::OnceLock;

use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::trace::SdkTracerProvider;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Instrumentation scope reported on exported spans.
const TRACER_NAME: &str = "flowtools";

static TRACER_PROVIDER: OnceLock<SdkTracerProvider> = OnceLock::new();

/// Map CLI verbosity flags to an `EnvFilter` directive.
///
/// `--quiet` only applies when no `-v` was given.
pub fn filter_for_verbosity(verbose: u8, quiet: bool) -> &'static str {
    match verbose {
        0 if quiet => "error",
        0 => "warn",
        1 => "info,flowtools=debug",
        _ => "trace",
    }
}

/// Install the global subscriber.
///
/// `RUST_LOG` takes precedence over `default_filter`. Fails if a global
/// subscriber is already installed.
pub fn init_tracing(
    default_filter: &str,
    enable_otel: bool,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_span_events(FmtSpan::CLOSE);

    let otel_layer = enable_otel.then(|| {
        let provider = stdout_provider();
        let tracer = provider.tracer(TRACER_NAME);
        let _ = TRACER_PROVIDER.set(provider.clone());
        opentelemetry::global::set_tracer_provider(provider);
        tracing_opentelemetry::layer().with_tracer(tracer)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(otel_layer)
        .try_init()?;

    Ok(())
}

fn stdout_provider() -> SdkTracerProvider {
    SdkTracerProvider::builder()
        .with_simple_exporter(opentelemetry_stdout::SpanExporter::default())
        .build()
}

/// Flush exported spans. No-op unless `init_tracing` enabled OpenTelemetry.
pub fn shutdown_tracing() {
    let Some(provider) = TRACER_PROVIDER.get() else {
        return;
    };
    // The subscriber may already be gone at this point.
    if let Err(e) = provider.shutdown() {
        eprintln!("flowtools: span export shutdown failed: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_maps_to_filters() {
        assert_eq!(filter_for_verbosity(0, false), "warn");
        assert_eq!(filter_for_verbosity(0, true), "error");
        assert_eq!(filter_for_verbosity(1, true), "info,flowtools=debug");
        assert_eq!(filter_for_verbosity(3, false), "trace");
    }

    #[test]
    fn every_verbosity_filter_parses() {
        for verbose in 0..=3 {
            for quiet in [false, true] {
                let directive = filter_for_verbosity(verbose, quiet);
                assert!(EnvFilter::try_new(directive).is_ok(), "{directive}");
            }
        }
    }

    #[test]
    fn shutdown_without_otel_is_noop() {
        shutdown_tracing();
    }
}
