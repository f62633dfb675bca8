//! Logging, tracing export and request log settings.

use std::time::Duration;

use clap::Args;

/// Log output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Args)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// OpenTelemetry export and request log settings.
#[derive(Debug, Args)]
pub struct ObservabilityConfig {
    /// Export traces over OTLP.
    #[arg(long, env = "OTEL_ENABLED", default_value_t = false)]
    pub otel_enabled: bool,

    /// Continue traces from an incoming `traceparent` header.
    #[arg(long, env = "OTEL_PARENT_PROPAGATION_ENABLED", default_value_t = false)]
    pub otel_parent_propagation_enabled: bool,

    /// OTLP gRPC collector endpoint.
    #[arg(
        long,
        env = "OTEL_EXPORTER_OTLP_ENDPOINT",
        default_value = "http://localhost:4317"
    )]
    pub otel_exporter_otlp_endpoint: String,

    /// OTLP export timeout, in seconds.
    #[arg(long, env = "OTEL_EXPORTER_OTLP_TIMEOUT_SECONDS", default_value_t = 3)]
    pub otel_exporter_otlp_timeout_seconds: u64,

    /// `service.name` resource attribute.
    #[arg(long, env = "OTEL_SERVICE_NAME", default_value = "tiffin-json")]
    pub otel_service_name: String,

    /// `service.version` resource attribute.
    #[arg(long, env = "OTEL_SERVICE_VERSION", default_value = env!("CARGO_PKG_VERSION"))]
    pub otel_service_version: String,

    /// `deployment.environment.name` resource attribute.
    #[arg(
        long,
        env = "OTEL_DEPLOYMENT_ENVIRONMENT",
        default_value = "development"
    )]
    pub otel_deployment_environment: String,

    /// Fraction of root traces to sample, clamped to `[0.0, 1.0]`.
    #[arg(long, env = "OTEL_TRACE_SAMPLE_RATIO", default_value_t = 1.0)]
    pub otel_trace_sample_ratio: f64,

    /// Requests slower than this are logged at warn level, in milliseconds.
    #[arg(long, env = "SLOW_REQUEST_THRESHOLD_MS", default_value_t = 1_000)]
    pub slow_request_threshold_ms: u64,
}

impl ObservabilityConfig {
    #[must_use]
    pub fn export_timeout(&self) -> Duration {
        Duration::from_secs(self.otel_exporter_otlp_timeout_seconds)
    }

    #[must_use]
    pub fn slow_request_threshold(&self) -> Duration {
        Duration::from_millis(self.slow_request_threshold_ms)
    }

    /// Sample ratio with out of range and NaN values pulled back into `[0, 1]`.
    #[must_use]
    pub fn sample_ratio(&self) -> f64 {
        if self.otel_trace_sample_ratio.is_nan() {
            return 1.0;
        }

        self.otel_trace_sample_ratio.clamp(0.0, 1.0)
    }

    /// Parent propagation only makes sense while traces are exported.
    #[must_use]
    pub fn propagate_parent(&self) -> bool {
        self.otel_enabled && self.otel_parent_propagation_enabled
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use testresult::TestResult;

    use super::*;

    #[derive(Debug, Parser)]
    struct Harness {
        #[command(flatten)]
        logging: LoggingConfig,

        #[command(flatten)]
        observability: ObservabilityConfig,
    }

    #[test]
    fn defaults_are_quiet_and_local() -> TestResult {
        let harness = Harness::try_parse_from(["tiffin-json"])?;

        assert_eq!(harness.logging.log_format, LogFormat::Compact);
        assert!(!harness.observability.propagate_parent());
        assert_eq!(harness.observability.export_timeout(), Duration::from_secs(3));
        assert_eq!(
            harness.observability.slow_request_threshold(),
            Duration::from_secs(1)
        );

        Ok(())
    }

    #[test]
    fn sample_ratio_is_clamped() -> TestResult {
        let high = Harness::try_parse_from(["tiffin-json", "--otel-trace-sample-ratio", "4"])?;
        let low = Harness::try_parse_from(["tiffin-json", "--otel-trace-sample-ratio", "-1"])?;

        assert!((high.observability.sample_ratio() - 1.0).abs() < f64::EPSILON);
        assert!(low.observability.sample_ratio().abs() < f64::EPSILON);

        Ok(())
    }

    #[test]
    fn propagation_requires_export() -> TestResult {
        let without_export =
            Harness::try_parse_from(["tiffin-json", "--otel-parent-propagation-enabled"])?;
        let with_export = Harness::try_parse_from([
            "tiffin-json",
            "--otel-enabled",
            "--otel-parent-propagation-enabled",
        ])?;

        assert!(!without_export.observability.propagate_parent());
        assert!(with_export.observability.propagate_parent());

        Ok(())
    }
}
